use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported state code: {0}")]
    UnsupportedState(String),
    #[error("{series} series for state {state} is empty")]
    EmptySeries { state: String, series: &'static str },
}

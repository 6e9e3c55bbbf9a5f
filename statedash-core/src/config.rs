use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pipeline configuration, persisted as JSON under the user config dir.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    pub base_url: String,
    pub supported_states: Vec<String>,
    pub default_state: String,
    pub request_timeout_seconds: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://beybla.de/static/data".to_owned(),
            supported_states: vec!["ca".to_owned(), "wa".to_owned()],
            default_state: "wa".to_owned(),
            request_timeout_seconds: 10,
        }
    }
}

impl PipelineConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn config_file_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_dir = dirs::config_dir().ok_or("could not locate the user config directory")?;
        let app_config_dir = config_dir.join("statedash");
        std::fs::create_dir_all(&app_config_dir)?;
        Ok(app_config_dir.join("config.json"))
    }

    /// Load the config file, falling back to defaults (and writing them out)
    /// when the file is missing or unreadable.
    pub fn load() -> Self {
        match Self::load_from_file() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "could not load config, using defaults");
                let default_config = Self::default();
                if let Err(save_err) = default_config.save() {
                    tracing::warn!(error = %save_err, "could not save default config");
                }
                default_config
            }
        }
    }

    fn load_from_file() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::config_file_path()?;
        let config_content = std::fs::read_to_string(config_path)?;
        let config: PipelineConfig = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::config_file_path()?;
        let config_json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, config_json)?;
        Ok(())
    }
}

pub mod config;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod models;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::DashError;
pub use fetch::fetch_snapshot;
pub use metrics::{build_chart_series, deaths_in_last_30_days, derive_metrics};
pub use models::{
    ChartData, ChartPoint, ChartSeries, DerivedMetrics, StateMetadata, StateSnapshot,
    TimeSeriesPoint,
};
pub use pipeline::{Event, SlotStatus, StatePipeline};

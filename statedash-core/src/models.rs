use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Per-state metadata document, fetched once per session from
/// `{base}/{state}/metadata.json` and cached alongside the series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateMetadata {
    pub state_code: String,
    pub state_label: String,
    pub human_label: String,
    pub epi_series_url: String,
    pub breakthrough_series_url: String,
}

/// Wire shape of the metadata endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct MetadataDoc {
    pub state_label: String,
    pub human_label: String,
    pub epi: SeriesRef,
    pub breakthrough: SeriesRef,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeriesRef {
    pub url: String,
}

impl MetadataDoc {
    pub fn into_metadata(self, state_code: &str) -> StateMetadata {
        StateMetadata {
            state_code: state_code.to_owned(),
            state_label: self.state_label,
            human_label: self.human_label,
            epi_series_url: self.epi.url,
            breakthrough_series_url: self.breakthrough.url,
        }
    }
}

/// One point of a cumulative series. Older breakthrough exports name the
/// timestamp `end_date`; the alias normalizes both shapes to `date`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSeriesPoint {
    #[serde(alias = "end_date")]
    pub date: i64,
    pub cumulative_deaths: u64,
}

impl TimeSeriesPoint {
    /// ISO calendar date (`YYYY-MM-DD`) of the point, in UTC.
    pub fn iso_date(&self) -> String {
        DateTime::from_timestamp(self.date, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| self.date.to_string())
    }
}

/// Fully fetched, immutable per-state bundle. Both series are non-empty and
/// ascending by date once the pipeline publishes the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateSnapshot {
    pub metadata: StateMetadata,
    pub epi_series: Vec<TimeSeriesPoint>,
    pub breakthrough_series: Vec<TimeSeriesPoint>,
}

/// Display statistics recomputed from a snapshot on every render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivedMetrics {
    pub latest_epi_deaths: u64,
    pub epi_as_of_date: String,
    pub epi_deaths_last_30_days: u64,
    pub latest_breakthrough_deaths: u64,
    pub breakthrough_as_of_date: String,
    pub breakthrough_deaths_last_30_days: u64,
    /// `None` when the latest epi count is zero; the ratio is undefined then.
    pub breakthrough_percentage: Option<f64>,
}

impl DerivedMetrics {
    /// Percentage formatted for display, e.g. `"2.50%"`, or `"N/A"` when the
    /// latest epi count is zero.
    pub fn breakthrough_percentage_display(&self) -> String {
        match self.breakthrough_percentage {
            Some(pct) => format!("{pct:.2}%"),
            None => "N/A".to_owned(),
        }
    }
}

/// A plottable `(ISO date, cumulative deaths)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartPoint {
    pub x: String,
    pub y: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<ChartPoint>,
}

/// The two lines of the cumulative-over-time chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartData {
    pub epi: ChartSeries,
    pub breakthrough: ChartSeries,
}

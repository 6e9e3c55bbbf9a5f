use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::DashError;
use crate::models::{MetadataDoc, StateSnapshot, TimeSeriesPoint};

/// Run the full fetch chain for one state: metadata, then the epi series,
/// then the breakthrough series. The stages are strictly sequential because
/// the series URLs come out of the metadata document; the two series fetches
/// are kept sequential as well rather than fanned out. Any failure aborts
/// the chain and no partial snapshot escapes.
pub async fn fetch_snapshot(
    client: &Client,
    base_url: &str,
    state: &str,
) -> Result<StateSnapshot, DashError> {
    let metadata_url = format!("{}/{}/metadata.json", base_url.trim_end_matches('/'), state);
    debug!(%state, url = %metadata_url, "fetching state metadata");
    let doc: MetadataDoc = get_json(client, &metadata_url).await?;
    let metadata = doc.into_metadata(state);

    debug!(%state, url = %metadata.epi_series_url, "fetching epi series");
    let epi_series: Vec<TimeSeriesPoint> = get_json(client, &metadata.epi_series_url).await?;

    debug!(%state, url = %metadata.breakthrough_series_url, "fetching breakthrough series");
    let breakthrough_series: Vec<TimeSeriesPoint> =
        get_json(client, &metadata.breakthrough_series_url).await?;

    if epi_series.is_empty() {
        return Err(DashError::EmptySeries {
            state: state.to_owned(),
            series: "epi",
        });
    }
    if breakthrough_series.is_empty() {
        return Err(DashError::EmptySeries {
            state: state.to_owned(),
            series: "breakthrough",
        });
    }

    Ok(StateSnapshot {
        metadata,
        epi_series,
        breakthrough_series,
    })
}

/// GET a JSON document. Non-success statuses surface as `DashError::Network`,
/// malformed bodies as `DashError::Parse`.
async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, DashError> {
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::DashError;
use crate::fetch::fetch_snapshot;
use crate::metrics::{build_chart_series, derive_metrics};
use crate::models::{ChartData, DerivedMetrics, StateMetadata, StateSnapshot};

/// What the render collaborator receives on its channel.
#[derive(Debug, Clone)]
pub enum Event {
    /// A state is ready to display: cache hit, or a fetch chain finished
    /// while its state was still selected.
    Render {
        state: String,
        metadata: StateMetadata,
        metrics: DerivedMetrics,
        chart: ChartData,
    },
    /// A fetch chain aborted. The previously rendered state stays on screen.
    FetchFailed { state: String, reason: String },
}

/// Lifecycle of one state's cache slot. `Populated` is terminal for the
/// session; `Failed` is retried only by an explicit re-selection.
#[derive(Debug, Clone)]
enum Slot {
    Fetching,
    Populated(Arc<StateSnapshot>),
    Failed(String),
}

/// Externally visible slot state, for callers that want to inspect the
/// machine without holding the cache lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotStatus {
    Unfetched,
    Fetching,
    Populated,
    Failed(String),
}

/// Owns the per-session cache and the current selection, and drives the
/// fetch-then-compute-then-render sequence for each selected state.
#[derive(Clone)]
pub struct StatePipeline {
    client: Client,
    config: Arc<PipelineConfig>,
    cache: Arc<RwLock<HashMap<String, Slot>>>,
    selected: Arc<RwLock<Option<String>>>,
    events_tx: mpsc::Sender<Event>,
}

impl StatePipeline {
    pub fn new(client: Client, config: PipelineConfig, events_tx: mpsc::Sender<Event>) -> Self {
        Self {
            client,
            config: Arc::new(config),
            cache: Arc::new(RwLock::new(HashMap::new())),
            selected: Arc::new(RwLock::new(None)),
            events_tx,
        }
    }

    /// Select a state for display. On a cache hit this emits a `Render`
    /// event without touching the network; otherwise it marks the slot
    /// in-flight and spawns the fetch chain, returning immediately. A second
    /// selection of a state whose chain is already running does not start
    /// another chain.
    pub async fn select_state(&self, code: &str) -> Result<(), DashError> {
        let state = code.to_lowercase();
        if !self.config.supported_states.contains(&state) {
            return Err(DashError::UnsupportedState(state));
        }

        *self.selected.write().await = Some(state.clone());

        let mut cache = self.cache.write().await;
        match cache.get(&state) {
            Some(Slot::Populated(snapshot)) => {
                debug!(%state, "cache hit");
                let snapshot = snapshot.clone();
                drop(cache);
                self.emit_render(&state, &snapshot).await;
                return Ok(());
            }
            Some(Slot::Fetching) => {
                debug!(%state, "fetch already in flight");
                return Ok(());
            }
            Some(Slot::Failed(reason)) => {
                info!(%state, %reason, "retrying previously failed state");
            }
            None => {}
        }
        cache.insert(state.clone(), Slot::Fetching);
        drop(cache);

        let pipeline = self.clone();
        tokio::spawn(async move {
            pipeline.run_chain(state).await;
        });
        Ok(())
    }

    /// The cache-miss path: fetch, publish, then render if this state is
    /// still the current selection.
    async fn run_chain(&self, state: String) {
        match fetch_snapshot(&self.client, &self.config.base_url, &state).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.cache
                    .write()
                    .await
                    .insert(state.clone(), Slot::Populated(snapshot.clone()));
                info!(%state, "snapshot populated");
                if self.selected.read().await.as_deref() == Some(state.as_str()) {
                    self.emit_render(&state, &snapshot).await;
                }
            }
            Err(err) => {
                warn!(%state, error = %err, "fetch chain failed");
                let reason = err.to_string();
                self.cache
                    .write()
                    .await
                    .insert(state.clone(), Slot::Failed(reason.clone()));
                if let Err(send_err) = self
                    .events_tx
                    .send(Event::FetchFailed { state, reason })
                    .await
                {
                    warn!(error = %send_err, "render collaborator dropped");
                }
            }
        }
    }

    async fn emit_render(&self, state: &str, snapshot: &StateSnapshot) {
        let event = Event::Render {
            state: state.to_owned(),
            metadata: snapshot.metadata.clone(),
            metrics: derive_metrics(snapshot),
            chart: build_chart_series(snapshot),
        };
        if let Err(err) = self.events_tx.send(event).await {
            warn!(error = %err, "render collaborator dropped");
        }
    }

    /// The state to pre-select on load: a fragment naming a supported state
    /// wins, otherwise the configured default.
    pub fn resolve_initial(&self, fragment: Option<&str>) -> String {
        if let Some(fragment) = fragment {
            let code = fragment.trim_start_matches('#').to_lowercase();
            if self.config.supported_states.contains(&code) {
                return code;
            }
        }
        self.config.default_state.clone()
    }

    pub async fn selected_state(&self) -> Option<String> {
        self.selected.read().await.clone()
    }

    /// The deep-link fragment for the current selection, e.g. `#ca`.
    pub async fn location_fragment(&self) -> Option<String> {
        self.selected
            .read()
            .await
            .as_ref()
            .map(|state| format!("#{state}"))
    }

    pub async fn slot_status(&self, code: &str) -> SlotStatus {
        match self.cache.read().await.get(&code.to_lowercase()) {
            None => SlotStatus::Unfetched,
            Some(Slot::Fetching) => SlotStatus::Fetching,
            Some(Slot::Populated(_)) => SlotStatus::Populated,
            Some(Slot::Failed(reason)) => SlotStatus::Failed(reason.clone()),
        }
    }

    /// The populated snapshot for a state, if its chain has completed.
    pub async fn snapshot(&self, code: &str) -> Option<Arc<StateSnapshot>> {
        match self.cache.read().await.get(&code.to_lowercase()) {
            Some(Slot::Populated(snapshot)) => Some(snapshot.clone()),
            _ => None,
        }
    }

    pub fn supported_states(&self) -> &[String] {
        &self.config.supported_states
    }
}

use metrics_exporter_prometheus::PrometheusHandle;
use saskatoon::error::AppError;
use saskatoon::harvest::{EntityGraph, EntityStore, Locale, StoreError, ViewMode};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

const DEMO_SEED: &str = include_str!("../data/demo_seed.json");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store serving one immutable snapshot loaded at startup.
#[derive(Clone)]
pub(crate) struct InMemoryEntityStore {
    graph: Arc<EntityGraph>,
}

impl InMemoryEntityStore {
    pub(crate) fn new(graph: EntityGraph) -> Self {
        Self {
            graph: Arc::new(graph),
        }
    }
}

impl EntityStore for InMemoryEntityStore {
    fn snapshot(&self) -> Result<Arc<EntityGraph>, StoreError> {
        Ok(self.graph.clone())
    }
}

pub(crate) fn demo_graph() -> Result<EntityGraph, AppError> {
    Ok(EntityGraph::from_json(DEMO_SEED)?)
}

/// Load the snapshot document at `path`, or the bundled demo data when no path is given.
pub(crate) fn load_graph(path: Option<&Path>) -> Result<EntityGraph, AppError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            let graph = EntityGraph::from_json(&raw)?;
            info!(path = %path.display(), "loaded entity snapshot");
            Ok(graph)
        }
        None => {
            info!("no snapshot path configured, serving bundled demo data");
            demo_graph()
        }
    }
}

pub(crate) fn parse_view(raw: &str) -> Result<ViewMode, String> {
    raw.parse::<ViewMode>()
}

pub(crate) fn parse_locale(raw: &str) -> Result<Locale, String> {
    Locale::from_code(raw).ok_or_else(|| format!("unsupported language '{raw}' (expected fr or en)"))
}

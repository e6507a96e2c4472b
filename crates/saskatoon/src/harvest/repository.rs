use std::sync::Arc;

use super::graph::EntityGraph;

/// Storage seam handing the projection layer a fully loaded snapshot.
pub trait EntityStore: Send + Sync {
    fn snapshot(&self) -> Result<Arc<EntityGraph>, StoreError>;
}

/// Upstream data-access failures; surfaced to callers untouched.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("entity store unavailable: {0}")]
    Unavailable(String),
    #[error("entity store returned an unreadable snapshot: {0}")]
    Corrupt(String),
}

//! Harvest coordination read model: snapshot, projections, and the HTTP surface over them.

pub mod domain;
pub mod graph;
pub mod locale;
pub mod projection;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ActorId, AuthUser, AuthUserId, Equipment, EquipmentType, Harvest, HarvestId, HarvestStatus,
    Organization, Person, Property, PropertyId, RequestForParticipation, RequestStatus, Role,
};
pub use graph::{ActorRef, EntityGraph, GraphSeed, SnapshotError};
pub use locale::{DisplayClock, Locale};
pub use projection::{ProjectionContext, ProjectionError, ViewMode};
pub use repository::{EntityStore, StoreError};
pub use router::projection_router;
pub use service::{ProjectionService, ProjectionServiceError};

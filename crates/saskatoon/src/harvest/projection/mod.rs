//! Nested, view-dependent read models assembled from the entity graph.
//!
//! Every projector borrows the graph and a [`ProjectionContext`] and returns a plain
//! `Serialize` struct. Narrowed shapes exist to bound payload size and to stop mutual
//! expansion: a full harvest embeds its full property, and that property only embeds
//! harvests in the narrowed [`PropertyHarvestView`] shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::domain::ActorId;
use super::locale::{DisplayClock, Locale};

pub mod actor;
pub mod community;
pub mod derived;
pub mod equipment;
pub mod harvest;
pub mod location;
pub mod participation;
pub mod property;

pub use actor::{ActorView, OrganizationView, OwnerTypeView, OwnerView, PersonView};
pub use community::CommunityView;
pub use equipment::{EquipmentSummaryView, EquipmentTypeView, EquipmentView};
pub use harvest::{HarvestListView, HarvestProjection, HarvestView, PickLeaderView};
pub use location::{LookupView, TreeTypeView};
pub use participation::ParticipationView;
pub use property::{
    EquipmentPropertyView, PropertyHarvestView, PropertyListHarvestView, PropertyListView,
    PropertyProjection, PropertyView,
};

/// Which shape the caller wants for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Full,
    List,
    #[serde(alias = "owner")]
    OwnerRestricted,
}

impl ViewMode {
    pub const fn label(self) -> &'static str {
        match self {
            ViewMode::Full => "full",
            ViewMode::List => "list",
            ViewMode::OwnerRestricted => "owner",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "full" | "detail" => Ok(ViewMode::Full),
            "list" | "summary" => Ok(ViewMode::List),
            "owner" | "owner_restricted" => Ok(ViewMode::OwnerRestricted),
            other => Err(format!("unknown view mode '{other}'")),
        }
    }
}

/// Per-request inputs threaded through every projector.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext {
    pub locale: Locale,
    pub clock: DisplayClock,
    /// Instant used for time-relative flags such as `is_open_to_requests`.
    pub reference_time: DateTime<Utc>,
}

impl ProjectionContext {
    pub fn new(locale: Locale, clock: DisplayClock) -> Self {
        Self {
            locale,
            clock,
            reference_time: Utc::now(),
        }
    }

    pub fn at(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = reference_time;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

/// Integrity faults found while projecting a snapshot, plus view requests a type cannot serve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    #[error("actor {0} resolves to neither a person nor an organization")]
    UnresolvedActor(ActorId),
    #[error("{kind} {id} referenced by the snapshot is missing")]
    MissingEntity { kind: &'static str, id: u64 },
    #[error("{entity} has no {mode} view")]
    UnsupportedView { entity: &'static str, mode: ViewMode },
}

impl ProjectionError {
    pub(crate) fn missing(kind: &'static str, id: u64) -> Self {
        ProjectionError::MissingEntity { kind, id }
    }
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::domain::{ActorId, AuthUserId, HarvestId, PropertyId};
use super::graph::EntityGraph;
use super::locale::{DisplayClock, Locale};
use super::projection::{
    ActorView, CommunityView, EquipmentView, HarvestProjection, OrganizationView, OwnerView,
    ParticipationView, PersonView, ProjectionContext, ProjectionError, PropertyProjection,
    ViewMode,
};
use super::repository::{EntityStore, StoreError};

/// Service pairing an entity store with the display settings used to project it.
pub struct ProjectionService<S> {
    store: Arc<S>,
    clock: DisplayClock,
    default_locale: Locale,
    pinned_time: Option<DateTime<Utc>>,
}

impl<S> ProjectionService<S>
where
    S: EntityStore + 'static,
{
    pub fn new(store: Arc<S>, clock: DisplayClock, default_locale: Locale) -> Self {
        Self {
            store,
            clock,
            default_locale,
            pinned_time: None,
        }
    }

    /// Freeze the instant time-relative flags are evaluated against.
    pub fn with_reference_time(mut self, instant: DateTime<Utc>) -> Self {
        self.pinned_time = Some(instant);
        self
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    fn context(&self, locale: Option<Locale>) -> ProjectionContext {
        let ctx = ProjectionContext::new(locale.unwrap_or(self.default_locale), self.clock);
        match self.pinned_time {
            Some(instant) => ctx.at(instant),
            None => ctx,
        }
    }

    fn snapshot(&self) -> Result<Arc<EntityGraph>, ProjectionServiceError> {
        self.store.snapshot().map_err(|err| {
            warn!(error = %err, "entity store failed to provide a snapshot");
            ProjectionServiceError::Store(err)
        })
    }

    pub fn property(
        &self,
        id: PropertyId,
        mode: ViewMode,
        locale: Option<Locale>,
    ) -> Result<PropertyProjection, ProjectionServiceError> {
        let graph = self.snapshot()?;
        let ctx = self.context(locale);
        let property = graph
            .property(id)
            .ok_or_else(|| ProjectionServiceError::not_found("property", id.0))?;

        debug!(property = %id, %mode, "projecting property");
        let view = PropertyProjection::project(&graph, &ctx, property, mode)
            .map_err(|err| integrity_fault("property", id.0, err))?;
        Ok(view)
    }

    pub fn properties(
        &self,
        mode: ViewMode,
        locale: Option<Locale>,
    ) -> Result<Vec<PropertyProjection>, ProjectionServiceError> {
        let graph = self.snapshot()?;
        let ctx = self.context(locale);
        let views = graph
            .properties()
            .map(|property| {
                PropertyProjection::project(&graph, &ctx, property, mode)
                    .map_err(|err| integrity_fault("property", property.id.0, err))
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = views.len(), %mode, "projected property directory");
        Ok(views)
    }

    pub fn harvest(
        &self,
        id: HarvestId,
        mode: ViewMode,
        locale: Option<Locale>,
    ) -> Result<HarvestProjection, ProjectionServiceError> {
        let graph = self.snapshot()?;
        let ctx = self.context(locale);
        let harvest = graph
            .harvest(id)
            .ok_or_else(|| ProjectionServiceError::not_found("harvest", id.0))?;

        debug!(harvest = %id, %mode, "projecting harvest");
        let view = HarvestProjection::project(&graph, &ctx, harvest, mode)
            .map_err(|err| integrity_fault("harvest", id.0, err))?;
        Ok(view)
    }

    pub fn harvests(
        &self,
        mode: ViewMode,
        locale: Option<Locale>,
    ) -> Result<Vec<HarvestProjection>, ProjectionServiceError> {
        let graph = self.snapshot()?;
        let ctx = self.context(locale);
        let views = graph
            .harvests()
            .map(|harvest| {
                HarvestProjection::project(&graph, &ctx, harvest, mode)
                    .map_err(|err| integrity_fault("harvest", harvest.id.0, err))
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = views.len(), %mode, "projected harvest calendar");
        Ok(views)
    }

    pub fn actor(
        &self,
        id: ActorId,
        locale: Option<Locale>,
    ) -> Result<ActorView, ProjectionServiceError> {
        let graph = self.snapshot()?;
        let ctx = self.context(locale);
        if graph.actor(id).is_none() {
            return Err(ProjectionServiceError::not_found("actor", id.0));
        }
        ActorView::project(&graph, &ctx, id).map_err(|err| integrity_fault("actor", id.0, err))
    }

    /// Owner-restricted rendering of an actor.
    pub fn owner(&self, id: ActorId) -> Result<OwnerView, ProjectionServiceError> {
        let graph = self.snapshot()?;
        let actor = graph
            .actor(id)
            .ok_or_else(|| ProjectionServiceError::not_found("actor", id.0))?;
        Ok(OwnerView::project(&graph, actor))
    }

    pub fn person(&self, id: ActorId) -> Result<PersonView, ProjectionServiceError> {
        let graph = self.snapshot()?;
        let person = graph
            .person(id)
            .ok_or_else(|| ProjectionServiceError::not_found("person", id.0))?;
        PersonView::project(&graph, person).map_err(|err| integrity_fault("person", id.0, err))
    }

    pub fn organization(
        &self,
        id: ActorId,
        locale: Option<Locale>,
    ) -> Result<OrganizationView, ProjectionServiceError> {
        let graph = self.snapshot()?;
        let ctx = self.context(locale);
        let organization = graph
            .organization(id)
            .ok_or_else(|| ProjectionServiceError::not_found("organization", id.0))?;
        OrganizationView::project(&graph, &ctx, organization)
            .map_err(|err| integrity_fault("organization", id.0, err))
    }

    pub fn equipment(
        &self,
        locale: Option<Locale>,
    ) -> Result<Vec<EquipmentView>, ProjectionServiceError> {
        let graph = self.snapshot()?;
        let ctx = self.context(locale);
        let views = graph
            .equipment()
            .map(|item| {
                EquipmentView::project(&graph, &ctx, item)
                    .map_err(|err| integrity_fault("equipment", item.id.0, err))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(views)
    }

    pub fn community_member(
        &self,
        id: AuthUserId,
    ) -> Result<CommunityView, ProjectionServiceError> {
        let graph = self.snapshot()?;
        let user = graph
            .auth_user(id)
            .ok_or_else(|| ProjectionServiceError::not_found("community member", id.0))?;
        CommunityView::project(&graph, user)
            .map_err(|err| integrity_fault("community member", id.0, err))
    }

    pub fn community(&self) -> Result<Vec<CommunityView>, ProjectionServiceError> {
        let graph = self.snapshot()?;
        let views = graph
            .auth_users()
            .map(|user| {
                CommunityView::project(&graph, user)
                    .map_err(|err| integrity_fault("community member", user.id.0, err))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(views)
    }

    /// Participation requests, optionally narrowed to one harvest.
    pub fn participation_requests(
        &self,
        harvest: Option<HarvestId>,
    ) -> Result<Vec<ParticipationView>, ProjectionServiceError> {
        let graph = self.snapshot()?;
        Ok(graph
            .requests()
            .filter(|request| harvest.map_or(true, |id| request.harvest == id))
            .map(ParticipationView::from)
            .collect())
    }
}

fn integrity_fault(kind: &'static str, id: u64, err: ProjectionError) -> ProjectionServiceError {
    if !matches!(err, ProjectionError::UnsupportedView { .. }) {
        warn!(entity = kind, id, error = %err, "snapshot failed integrity check during projection");
    }
    ProjectionServiceError::Projection(err)
}

/// Error raised by the projection service.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },
}

impl ProjectionServiceError {
    fn not_found(kind: &'static str, id: u64) -> Self {
        Self::NotFound { kind, id }
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ActorId, AuthUserId, HarvestId, PropertyId};
use super::locale::Locale;
use super::projection::{ProjectionError, ViewMode};
use super::repository::EntityStore;
use super::service::{ProjectionService, ProjectionServiceError};

/// Router builder exposing the read-only projection endpoints.
pub fn projection_router<S>(service: Arc<ProjectionService<S>>) -> Router
where
    S: EntityStore + 'static,
{
    Router::new()
        .route("/api/v1/properties", get(properties_handler::<S>))
        .route("/api/v1/properties/:property_id", get(property_handler::<S>))
        .route("/api/v1/harvests", get(harvests_handler::<S>))
        .route("/api/v1/harvests/:harvest_id", get(harvest_handler::<S>))
        .route("/api/v1/actors/:actor_id", get(actor_handler::<S>))
        .route("/api/v1/actors/:actor_id/owner", get(owner_handler::<S>))
        .route("/api/v1/persons/:actor_id", get(person_handler::<S>))
        .route(
            "/api/v1/organizations/:actor_id",
            get(organization_handler::<S>),
        )
        .route("/api/v1/equipment", get(equipment_handler::<S>))
        .route("/api/v1/community", get(community_handler::<S>))
        .route("/api/v1/community/:user_id", get(community_member_handler::<S>))
        .route("/api/v1/participations", get(participations_handler::<S>))
        .with_state(service)
}

/// `?view=full|list|owner&lang=fr|en`; both are validated here so bad values get a JSON error.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectionQuery {
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

impl ProjectionQuery {
    fn locale(&self) -> Result<Option<Locale>, Response> {
        match self.lang.as_deref() {
            None => Ok(None),
            Some(raw) => Locale::from_code(raw)
                .map(Some)
                .ok_or_else(|| bad_request(format!("unsupported language '{raw}'"))),
        }
    }

    fn view(&self) -> Result<Option<ViewMode>, Response> {
        self.view
            .as_deref()
            .map(|raw| raw.parse::<ViewMode>().map_err(bad_request))
            .transpose()
    }

    fn selection(&self) -> Result<(Option<ViewMode>, Option<Locale>), Response> {
        Ok((self.view()?, self.locale()?))
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct ParticipationQuery {
    #[serde(default)]
    pub harvest: Option<HarvestId>,
}

fn render<T: Serialize>(result: Result<T, ProjectionServiceError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_response(err: ProjectionServiceError) -> Response {
    let status = match &err {
        ProjectionServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ProjectionServiceError::Projection(ProjectionError::UnsupportedView { .. }) => {
            StatusCode::BAD_REQUEST
        }
        ProjectionServiceError::Projection(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProjectionServiceError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn properties_handler<S>(
    State(service): State<Arc<ProjectionService<S>>>,
    Query(query): Query<ProjectionQuery>,
) -> Response
where
    S: EntityStore + 'static,
{
    let (view, locale) = match query.selection() {
        Ok(selection) => selection,
        Err(response) => return response,
    };
    render(service.properties(view.unwrap_or(ViewMode::List), locale))
}

pub(crate) async fn property_handler<S>(
    State(service): State<Arc<ProjectionService<S>>>,
    Path(property_id): Path<u64>,
    Query(query): Query<ProjectionQuery>,
) -> Response
where
    S: EntityStore + 'static,
{
    let (view, locale) = match query.selection() {
        Ok(selection) => selection,
        Err(response) => return response,
    };
    render(service.property(
        PropertyId(property_id),
        view.unwrap_or_default(),
        locale,
    ))
}

pub(crate) async fn harvests_handler<S>(
    State(service): State<Arc<ProjectionService<S>>>,
    Query(query): Query<ProjectionQuery>,
) -> Response
where
    S: EntityStore + 'static,
{
    let (view, locale) = match query.selection() {
        Ok(selection) => selection,
        Err(response) => return response,
    };
    render(service.harvests(view.unwrap_or(ViewMode::List), locale))
}

pub(crate) async fn harvest_handler<S>(
    State(service): State<Arc<ProjectionService<S>>>,
    Path(harvest_id): Path<u64>,
    Query(query): Query<ProjectionQuery>,
) -> Response
where
    S: EntityStore + 'static,
{
    let (view, locale) = match query.selection() {
        Ok(selection) => selection,
        Err(response) => return response,
    };
    render(service.harvest(HarvestId(harvest_id), view.unwrap_or_default(), locale))
}

pub(crate) async fn actor_handler<S>(
    State(service): State<Arc<ProjectionService<S>>>,
    Path(actor_id): Path<u64>,
    Query(query): Query<ProjectionQuery>,
) -> Response
where
    S: EntityStore + 'static,
{
    let (view, locale) = match query.selection() {
        Ok(selection) => selection,
        Err(response) => return response,
    };
    match view.unwrap_or_default() {
        ViewMode::OwnerRestricted => render(service.owner(ActorId(actor_id))),
        ViewMode::Full => render(service.actor(ActorId(actor_id), locale)),
        mode @ ViewMode::List => error_response(ProjectionServiceError::Projection(
            ProjectionError::UnsupportedView {
                entity: "actor",
                mode,
            },
        )),
    }
}

pub(crate) async fn owner_handler<S>(
    State(service): State<Arc<ProjectionService<S>>>,
    Path(actor_id): Path<u64>,
) -> Response
where
    S: EntityStore + 'static,
{
    render(service.owner(ActorId(actor_id)))
}

pub(crate) async fn person_handler<S>(
    State(service): State<Arc<ProjectionService<S>>>,
    Path(actor_id): Path<u64>,
) -> Response
where
    S: EntityStore + 'static,
{
    render(service.person(ActorId(actor_id)))
}

pub(crate) async fn organization_handler<S>(
    State(service): State<Arc<ProjectionService<S>>>,
    Path(actor_id): Path<u64>,
    Query(query): Query<ProjectionQuery>,
) -> Response
where
    S: EntityStore + 'static,
{
    let locale = match query.locale() {
        Ok(locale) => locale,
        Err(response) => return response,
    };
    render(service.organization(ActorId(actor_id), locale))
}

pub(crate) async fn equipment_handler<S>(
    State(service): State<Arc<ProjectionService<S>>>,
    Query(query): Query<ProjectionQuery>,
) -> Response
where
    S: EntityStore + 'static,
{
    let locale = match query.locale() {
        Ok(locale) => locale,
        Err(response) => return response,
    };
    render(service.equipment(locale))
}

pub(crate) async fn community_handler<S>(
    State(service): State<Arc<ProjectionService<S>>>,
) -> Response
where
    S: EntityStore + 'static,
{
    render(service.community())
}

pub(crate) async fn community_member_handler<S>(
    State(service): State<Arc<ProjectionService<S>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    S: EntityStore + 'static,
{
    render(service.community_member(AuthUserId(user_id)))
}

pub(crate) async fn participations_handler<S>(
    State(service): State<Arc<ProjectionService<S>>>,
    Query(query): Query<ParticipationQuery>,
) -> Response
where
    S: EntityStore + 'static,
{
    render(service.participation_requests(query.harvest))
}

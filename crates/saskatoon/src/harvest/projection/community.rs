use chrono::{DateTime, Utc};
use serde::Serialize;

use super::actor::PersonView;
use super::derived::{role_codes, role_labels};
use super::ProjectionError;
use crate::harvest::domain::{AuthUser, AuthUserId};
use crate::harvest::graph::EntityGraph;

/// Community member account; credentials never leave the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunityView {
    pub id: AuthUserId,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub person: Option<PersonView>,
    pub roles: Vec<String>,
    pub role_codes: Vec<String>,
    pub date_joined: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

impl CommunityView {
    pub fn project(graph: &EntityGraph, user: &AuthUser) -> Result<Self, ProjectionError> {
        Ok(Self {
            id: user.id,
            email: user.email.clone(),
            is_active: user.is_active,
            is_staff: user.is_staff,
            person: user
                .person
                .and_then(|id| graph.person(id))
                .map(|person| PersonView::project(graph, person))
                .transpose()?,
            roles: role_labels(user),
            role_codes: role_codes(user),
            date_joined: user.date_joined,
            last_login: user.last_login,
        })
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::harvest::domain::{ActorId, HarvestId, RequestForParticipation, RequestId, RequestStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipationView {
    pub id: RequestId,
    pub harvest: HarvestId,
    pub person: ActorId,
    pub number_of_pickers: u32,
    pub comment: Option<String>,
    pub status: RequestStatus,
    pub status_label: &'static str,
    pub creation_date: Option<DateTime<Utc>>,
}

impl From<&RequestForParticipation> for ParticipationView {
    fn from(request: &RequestForParticipation) -> Self {
        Self {
            id: request.id,
            harvest: request.harvest,
            person: request.person,
            number_of_pickers: request.number_of_pickers,
            comment: request.comment.clone(),
            status: request.status,
            status_label: request.status.label(),
            creation_date: request.creation_date,
        }
    }
}

//! Computed fields, evaluated on demand from the loaded graph.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::ProjectionError;
use crate::harvest::domain::{
    ActorId, AuthUser, Harvest, HarvestId, HarvestStatus, Organization, Property, PropertyId,
    RequestStatus,
};
use crate::harvest::graph::EntityGraph;
use crate::harvest::locale::{DisplayClock, Locale};

/// Separator between equipment entries in an organization inventory string.
pub const INVENTORY_DELIMITER: &str = "&;";

/// Role labels of the person's linked account, empty when no account exists.
pub fn person_roles(graph: &EntityGraph, person: ActorId) -> Vec<String> {
    graph
        .auth_user_for_person(person)
        .map(role_labels)
        .unwrap_or_default()
}

pub fn role_labels(user: &AuthUser) -> Vec<String> {
    user.roles.iter().map(ToString::to_string).collect()
}

pub fn role_codes(user: &AuthUser) -> Vec<String> {
    user.roles.iter().map(|role| role.code().to_string()).collect()
}

/// Label a community account is shown under: the person's name, else the email.
pub fn auth_user_label(graph: &EntityGraph, user: &AuthUser) -> String {
    user.person
        .and_then(|id| graph.person(id))
        .map(|person| person.name())
        .unwrap_or_else(|| user.email.clone())
}

/// One localized line per equipment item, joined with [`INVENTORY_DELIMITER`].
pub fn organization_inventory(
    graph: &EntityGraph,
    organization: &Organization,
) -> Result<BTreeMap<Locale, String>, ProjectionError> {
    let mut items = Vec::new();
    for item in graph.equipment_for_owner(organization.actor_id) {
        let kind = graph
            .equipment_type(item.equipment_type)
            .ok_or_else(|| ProjectionError::missing("equipment type", item.equipment_type.0))?;
        items.push((item.count, kind));
    }

    Ok(Locale::ALL
        .iter()
        .map(|locale| {
            let lines: Vec<String> = items
                .iter()
                .map(|(count, kind)| format!("{} {}", count, kind.localized_name(*locale)))
                .collect();
            (*locale, lines.join(INVENTORY_DELIMITER))
        })
        .collect())
}

pub fn property_address(property: &Property) -> String {
    let street = [property.street_number.as_deref(), property.street.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    match property.complement.as_deref().map(str::trim) {
        Some(complement) if !complement.is_empty() && !street.is_empty() => {
            format!("{street}, {complement}")
        }
        Some(complement) if !complement.is_empty() => complement.to_string(),
        _ => street,
    }
}

/// `"{owner} at {address}"`, falling back to the pending contact, then the bare address.
/// The fallbacks apply only to unowned properties; a dangling owner id is an integrity fault.
pub fn property_title(
    graph: &EntityGraph,
    property: &Property,
) -> Result<String, ProjectionError> {
    let address = property_address(property);
    let who = match property.owner {
        Some(id) => Some(
            graph
                .actor(id)
                .ok_or(ProjectionError::UnresolvedActor(id))?
                .display_name(),
        ),
        None => property.pending_contact_name.clone(),
    }
    .filter(|name| !name.trim().is_empty());

    Ok(match (who, address.is_empty()) {
        (Some(who), false) => format!("{who} at {address}"),
        (Some(who), true) => who,
        (None, false) => address,
        (None, true) => format!("Property #{}", property.id),
    })
}

pub fn last_succeeded_harvest_date(
    graph: &EntityGraph,
    clock: &DisplayClock,
    property: PropertyId,
) -> Option<NaiveDate> {
    graph
        .harvests_for_property(property)
        .filter(|harvest| harvest.status == HarvestStatus::Succeeded)
        .map(|harvest| clock.local_start(harvest).date_naive())
        .max()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerEntry {
    pub actor_id: ActorId,
    pub name: String,
    pub number_of_pickers: u32,
}

/// Volunteers whose participation request was accepted.
pub fn harvest_pickers(
    graph: &EntityGraph,
    harvest: HarvestId,
) -> Result<Vec<PickerEntry>, ProjectionError> {
    graph
        .requests_for_harvest(harvest)
        .filter(|request| request.status == RequestStatus::Accepted)
        .map(|request| {
            let person = graph
                .person(request.person)
                .ok_or_else(|| ProjectionError::missing("person", request.person.0))?;
            Ok(PickerEntry {
                actor_id: request.person,
                name: person.name(),
                number_of_pickers: request.number_of_pickers,
            })
        })
        .collect()
}

/// Pounds of fruit distributed from a harvest.
pub fn total_distribution(graph: &EntityGraph, harvest: HarvestId) -> f64 {
    graph
        .yields_for_harvest(harvest)
        .map(|row| row.total_in_lb)
        .sum()
}

pub fn is_open_to_requests(harvest: &Harvest, reference_time: DateTime<Utc>) -> bool {
    let published = harvest
        .publication_date
        .map_or(true, |published| published <= reference_time);

    matches!(
        harvest.status,
        HarvestStatus::Scheduled | HarvestStatus::Ready
    ) && harvest.start_date > reference_time
        && published
}

/// Harvest ids grouped by the role a person played in them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonHarvestHistory {
    pub harvests_as_pickleader: Vec<HarvestId>,
    pub harvests_as_volunteer_succeeded: Vec<HarvestId>,
    pub harvests_as_volunteer_accepted: Vec<HarvestId>,
    pub harvests_as_volunteer_rejected: Vec<HarvestId>,
    pub harvests_as_volunteer_pending: Vec<HarvestId>,
    pub harvests_as_volunteer_cancelled: Vec<HarvestId>,
    pub harvests_as_owner: Vec<HarvestId>,
}

/// Accepted requests on a succeeded harvest count as succeeded, not accepted.
pub fn person_harvest_history(
    graph: &EntityGraph,
    person: ActorId,
) -> Result<PersonHarvestHistory, ProjectionError> {
    let mut history = PersonHarvestHistory::default();

    if let Some(account) = graph.auth_user_for_person(person) {
        history.harvests_as_pickleader = graph
            .harvests()
            .filter(|harvest| harvest.pick_leader == Some(account.id))
            .map(|harvest| harvest.id)
            .collect();
    }

    for request in graph.requests_for_person(person) {
        let succeeded = graph
            .harvest(request.harvest)
            .ok_or_else(|| ProjectionError::missing("harvest", request.harvest.0))?
            .status
            == HarvestStatus::Succeeded;
        let bucket = match request.status {
            RequestStatus::Accepted if succeeded => &mut history.harvests_as_volunteer_succeeded,
            RequestStatus::Accepted => &mut history.harvests_as_volunteer_accepted,
            RequestStatus::Rejected => &mut history.harvests_as_volunteer_rejected,
            RequestStatus::Pending => &mut history.harvests_as_volunteer_pending,
            RequestStatus::Cancelled => &mut history.harvests_as_volunteer_cancelled,
        };
        bucket.push(request.harvest);
    }

    history.harvests_as_owner = graph
        .properties_owned_by(person)
        .flat_map(|property| graph.harvests_for_property(property.id))
        .map(|harvest| harvest.id)
        .collect();

    Ok(history)
}

use std::collections::BTreeMap;

use serde::Serialize;

use super::derived::{
    organization_inventory, person_harvest_history, person_roles, PersonHarvestHistory,
};
use super::equipment::EquipmentSummaryView;
use super::location::{neighborhood_view, LookupView};
use super::{ProjectionContext, ProjectionError};
use crate::harvest::domain::{
    ActorId, CityId, CountryId, LanguageId, NeighborhoodId, Organization, Person, PropertyId,
    StateId,
};
use crate::harvest::graph::{ActorRef, EntityGraph};
use crate::harvest::locale::Locale;

/// Comment shown in place of an organization's notes when it owns a property.
pub const ORGANIZATION_OWNER_COMMENT: &str = "Owner is an Organization";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonView {
    pub actor_id: ActorId,
    pub roles: Vec<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub neighborhood: Option<LookupView>,
    #[serde(flatten)]
    pub history: PersonHarvestHistory,
    pub organizations_as_contact: Vec<ActorId>,
    pub properties: Vec<PropertyId>,
    pub comments: String,
}

impl PersonView {
    pub fn project(graph: &EntityGraph, person: &Person) -> Result<Self, ProjectionError> {
        Ok(Self {
            actor_id: person.actor_id,
            roles: person_roles(graph, person.actor_id),
            name: person.name(),
            email: person.email.clone(),
            phone: person.phone.clone(),
            neighborhood: neighborhood_view(graph, person.location.neighborhood),
            history: person_harvest_history(graph, person.actor_id)?,
            organizations_as_contact: graph
                .organizations_with_contact(person.actor_id)
                .map(|organization| organization.actor_id)
                .collect(),
            properties: graph
                .properties_owned_by(person.actor_id)
                .map(|property| property.id)
                .collect(),
            comments: person.comments.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationView {
    pub actor_id: ActorId,
    pub civil_name: String,
    pub contact_person: Option<PersonView>,
    pub phone: Option<String>,
    pub short_address: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<LookupView>,
    pub is_beneficiary: bool,
    pub beneficiary_description: Option<String>,
    pub is_equipment_point: bool,
    pub equipment_description: Option<String>,
    pub description: Option<String>,
    pub equipment: Vec<EquipmentSummaryView>,
    pub inventory: BTreeMap<Locale, String>,
}

impl OrganizationView {
    pub fn project(
        graph: &EntityGraph,
        ctx: &ProjectionContext,
        organization: &Organization,
    ) -> Result<Self, ProjectionError> {
        let equipment = graph
            .equipment_for_owner(organization.actor_id)
            .map(|item| EquipmentSummaryView::project(graph, ctx, item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            actor_id: organization.actor_id,
            civil_name: organization.civil_name.clone(),
            contact_person: organization
                .contact_person
                .and_then(|id| graph.person(id))
                .map(|person| PersonView::project(graph, person))
                .transpose()?,
            phone: organization.phone.clone(),
            short_address: organization.short_address.clone(),
            address: organization.address.clone(),
            neighborhood: neighborhood_view(graph, organization.location.neighborhood),
            is_beneficiary: organization.is_beneficiary,
            beneficiary_description: organization.beneficiary_description.clone(),
            is_equipment_point: organization.is_equipment_point,
            equipment_description: organization.equipment_description.clone(),
            description: organization.description.clone(),
            equipment,
            inventory: organization_inventory(graph, organization)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    Person,
    Organization,
}

/// Full actor rendering: exactly one of `person` / `organization` is populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorView {
    pub actor_id: ActorId,
    pub actor_type: ActorType,
    pub is_person: bool,
    pub is_organization: bool,
    pub person: Option<PersonView>,
    pub organization: Option<OrganizationView>,
}

impl ActorView {
    pub fn project(
        graph: &EntityGraph,
        ctx: &ProjectionContext,
        actor_id: ActorId,
    ) -> Result<Self, ProjectionError> {
        let actor = graph
            .actor(actor_id)
            .ok_or(ProjectionError::UnresolvedActor(actor_id))?;

        let view = match actor {
            ActorRef::Person(person) => Self {
                actor_id,
                actor_type: ActorType::Person,
                is_person: true,
                is_organization: false,
                person: Some(PersonView::project(graph, person)?),
                organization: None,
            },
            ActorRef::Organization(organization) => Self {
                actor_id,
                actor_type: ActorType::Organization,
                is_person: false,
                is_organization: true,
                person: None,
                organization: Some(OrganizationView::project(graph, ctx, organization)?),
            },
        };
        Ok(view)
    }
}

/// What a property's owner exposes to people coordinating a harvest there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerView {
    pub pk: ActorId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub language: Option<String>,
    pub comments: String,
    pub neighborhood: Option<NeighborhoodId>,
    pub city: Option<CityId>,
    pub state: Option<StateId>,
    pub country: Option<CountryId>,
}

impl OwnerView {
    pub fn project(graph: &EntityGraph, actor: ActorRef<'_>) -> Self {
        match actor {
            ActorRef::Person(person) => Self {
                pk: person.actor_id,
                name: Some(person.name()),
                email: person.email.clone(),
                phone: person.phone.clone(),
                language: language_label(graph, person.language),
                comments: person.comments.clone(),
                neighborhood: person.location.neighborhood,
                city: person.location.city,
                state: person.location.state,
                country: person.location.country,
            },
            ActorRef::Organization(organization) => Self {
                pk: organization.actor_id,
                name: Some(organization.civil_name.clone()),
                email: None,
                phone: organization.phone.clone(),
                language: language_label(graph, organization.language),
                comments: ORGANIZATION_OWNER_COMMENT.to_string(),
                neighborhood: organization.location.neighborhood,
                city: organization.location.city,
                state: organization.location.state,
                country: organization.location.country,
            },
        }
    }

    /// Absent owner is `None`; an owner id that resolves to nothing is an integrity fault.
    pub fn for_owner(
        graph: &EntityGraph,
        owner: Option<ActorId>,
    ) -> Result<Option<Self>, ProjectionError> {
        owner
            .map(|id| {
                graph
                    .actor(id)
                    .map(|actor| Self::project(graph, actor))
                    .ok_or(ProjectionError::UnresolvedActor(id))
            })
            .transpose()
    }
}

fn language_label(graph: &EntityGraph, language: Option<LanguageId>) -> Option<String> {
    language
        .and_then(|id| graph.language(id))
        .map(|row| row.name.clone())
}

/// Subtype flags of a property's owner; both false when there is no owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OwnerTypeView {
    pub is_person: bool,
    pub is_organization: bool,
}

impl OwnerTypeView {
    pub fn for_owner(
        graph: &EntityGraph,
        owner: Option<ActorId>,
    ) -> Result<Self, ProjectionError> {
        let Some(id) = owner else {
            return Ok(Self::default());
        };
        let actor = graph
            .actor(id)
            .ok_or(ProjectionError::UnresolvedActor(id))?;
        Ok(Self {
            is_person: actor.is_person(),
            is_organization: actor.is_organization(),
        })
    }
}

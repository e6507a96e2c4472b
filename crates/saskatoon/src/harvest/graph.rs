//! Read-only, already-loaded snapshot of the relational model.
//!
//! The graph owns every row by id and answers relation traversals so the projectors can stay
//! pure functions over borrowed data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    ActorId, AuthUser, AuthUserId, City, CityId, Country, CountryId, Equipment, EquipmentId,
    EquipmentType, EquipmentTypeId, Harvest, HarvestId, HarvestYield, Language, LanguageId,
    Neighborhood, NeighborhoodId, Organization, Person, Property, PropertyId,
    RequestForParticipation, RequestId, State, StateId, TreeType, TreeTypeId, YieldId,
};

/// Serializable document the graph is built from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSeed {
    pub neighborhoods: Vec<Neighborhood>,
    pub cities: Vec<City>,
    pub states: Vec<State>,
    pub countries: Vec<Country>,
    pub languages: Vec<Language>,
    pub persons: Vec<Person>,
    pub organizations: Vec<Organization>,
    pub auth_users: Vec<AuthUser>,
    pub tree_types: Vec<TreeType>,
    pub properties: Vec<Property>,
    pub harvests: Vec<Harvest>,
    pub equipment_types: Vec<EquipmentType>,
    pub equipment: Vec<Equipment>,
    pub requests: Vec<RequestForParticipation>,
    pub yields: Vec<HarvestYield>,
}

/// Raised while indexing a seed into a graph.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u64 },
    #[error("actor {0} is registered as both a person and an organization")]
    AmbiguousActor(ActorId),
    #[error("snapshot document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Concrete subtype an actor id resolves to.
#[derive(Debug, Clone, Copy)]
pub enum ActorRef<'a> {
    Person(&'a Person),
    Organization(&'a Organization),
}

impl<'a> ActorRef<'a> {
    pub fn actor_id(&self) -> ActorId {
        match self {
            ActorRef::Person(person) => person.actor_id,
            ActorRef::Organization(organization) => organization.actor_id,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            ActorRef::Person(person) => person.name(),
            ActorRef::Organization(organization) => organization.civil_name.clone(),
        }
    }

    pub fn is_person(&self) -> bool {
        matches!(self, ActorRef::Person(_))
    }

    pub fn is_organization(&self) -> bool {
        matches!(self, ActorRef::Organization(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    neighborhoods: BTreeMap<NeighborhoodId, Neighborhood>,
    cities: BTreeMap<CityId, City>,
    states: BTreeMap<StateId, State>,
    countries: BTreeMap<CountryId, Country>,
    languages: BTreeMap<LanguageId, Language>,
    persons: BTreeMap<ActorId, Person>,
    organizations: BTreeMap<ActorId, Organization>,
    auth_users: BTreeMap<AuthUserId, AuthUser>,
    tree_types: BTreeMap<TreeTypeId, TreeType>,
    properties: BTreeMap<PropertyId, Property>,
    harvests: BTreeMap<HarvestId, Harvest>,
    equipment_types: BTreeMap<EquipmentTypeId, EquipmentType>,
    equipment: BTreeMap<EquipmentId, Equipment>,
    requests: BTreeMap<RequestId, RequestForParticipation>,
    yields: BTreeMap<YieldId, HarvestYield>,
}

fn index<K, V>(
    kind: &'static str,
    rows: Vec<V>,
    key: impl Fn(&V) -> K,
    raw: impl Fn(&K) -> u64,
) -> Result<BTreeMap<K, V>, SnapshotError>
where
    K: Ord,
{
    let mut map = BTreeMap::new();
    for row in rows {
        let id = key(&row);
        if map.contains_key(&id) {
            return Err(SnapshotError::DuplicateId { kind, id: raw(&id) });
        }
        map.insert(id, row);
    }
    Ok(map)
}

impl EntityGraph {
    pub fn from_seed(seed: GraphSeed) -> Result<Self, SnapshotError> {
        let persons = index("person", seed.persons, |row| row.actor_id, |id| id.0)?;
        let organizations = index(
            "organization",
            seed.organizations,
            |row| row.actor_id,
            |id| id.0,
        )?;

        if let Some(actor_id) = organizations.keys().find(|id| persons.contains_key(id)) {
            return Err(SnapshotError::AmbiguousActor(*actor_id));
        }

        Ok(Self {
            neighborhoods: index("neighborhood", seed.neighborhoods, |row| row.id, |id| id.0)?,
            cities: index("city", seed.cities, |row| row.id, |id| id.0)?,
            states: index("state", seed.states, |row| row.id, |id| id.0)?,
            countries: index("country", seed.countries, |row| row.id, |id| id.0)?,
            languages: index("language", seed.languages, |row| row.id, |id| id.0)?,
            persons,
            organizations,
            auth_users: index("auth user", seed.auth_users, |row| row.id, |id| id.0)?,
            tree_types: index("tree type", seed.tree_types, |row| row.id, |id| id.0)?,
            properties: index("property", seed.properties, |row| row.id, |id| id.0)?,
            harvests: index("harvest", seed.harvests, |row| row.id, |id| id.0)?,
            equipment_types: index(
                "equipment type",
                seed.equipment_types,
                |row| row.id,
                |id| id.0,
            )?,
            equipment: index("equipment", seed.equipment, |row| row.id, |id| id.0)?,
            requests: index("request", seed.requests, |row| row.id, |id| id.0)?,
            yields: index("yield", seed.yields, |row| row.id, |id| id.0)?,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        let seed: GraphSeed = serde_json::from_str(raw)?;
        Self::from_seed(seed)
    }

    pub fn neighborhood(&self, id: NeighborhoodId) -> Option<&Neighborhood> {
        self.neighborhoods.get(&id)
    }

    pub fn city(&self, id: CityId) -> Option<&City> {
        self.cities.get(&id)
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(&id)
    }

    pub fn country(&self, id: CountryId) -> Option<&Country> {
        self.countries.get(&id)
    }

    pub fn language(&self, id: LanguageId) -> Option<&Language> {
        self.languages.get(&id)
    }

    pub fn person(&self, id: ActorId) -> Option<&Person> {
        self.persons.get(&id)
    }

    pub fn organization(&self, id: ActorId) -> Option<&Organization> {
        self.organizations.get(&id)
    }

    /// Resolve an actor id to its concrete subtype, `None` when neither table has it.
    pub fn actor(&self, id: ActorId) -> Option<ActorRef<'_>> {
        self.persons
            .get(&id)
            .map(ActorRef::Person)
            .or_else(|| self.organizations.get(&id).map(ActorRef::Organization))
    }

    pub fn auth_user(&self, id: AuthUserId) -> Option<&AuthUser> {
        self.auth_users.get(&id)
    }

    pub fn auth_user_for_person(&self, person: ActorId) -> Option<&AuthUser> {
        self.auth_users
            .values()
            .find(|user| user.person == Some(person))
    }

    pub fn tree_type(&self, id: TreeTypeId) -> Option<&TreeType> {
        self.tree_types.get(&id)
    }

    pub fn property(&self, id: PropertyId) -> Option<&Property> {
        self.properties.get(&id)
    }

    pub fn harvest(&self, id: HarvestId) -> Option<&Harvest> {
        self.harvests.get(&id)
    }

    pub fn equipment_type(&self, id: EquipmentTypeId) -> Option<&EquipmentType> {
        self.equipment_types.get(&id)
    }

    pub fn equipment_item(&self, id: EquipmentId) -> Option<&Equipment> {
        self.equipment.get(&id)
    }

    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    pub fn organizations(&self) -> impl Iterator<Item = &Organization> {
        self.organizations.values()
    }

    pub fn auth_users(&self) -> impl Iterator<Item = &AuthUser> {
        self.auth_users.values()
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    pub fn harvests(&self) -> impl Iterator<Item = &Harvest> {
        self.harvests.values()
    }

    pub fn equipment(&self) -> impl Iterator<Item = &Equipment> {
        self.equipment.values()
    }

    pub fn requests(&self) -> impl Iterator<Item = &RequestForParticipation> {
        self.requests.values()
    }

    pub fn harvests_for_property(&self, property: PropertyId) -> impl Iterator<Item = &Harvest> {
        self.harvests
            .values()
            .filter(move |harvest| harvest.property == property)
    }

    pub fn equipment_for_owner(&self, owner: ActorId) -> impl Iterator<Item = &Equipment> {
        self.equipment
            .values()
            .filter(move |item| item.owner == Some(owner))
    }

    pub fn requests_for_harvest(
        &self,
        harvest: HarvestId,
    ) -> impl Iterator<Item = &RequestForParticipation> {
        self.requests
            .values()
            .filter(move |request| request.harvest == harvest)
    }

    pub fn requests_for_person(
        &self,
        person: ActorId,
    ) -> impl Iterator<Item = &RequestForParticipation> {
        self.requests
            .values()
            .filter(move |request| request.person == person)
    }

    pub fn yields_for_harvest(&self, harvest: HarvestId) -> impl Iterator<Item = &HarvestYield> {
        self.yields
            .values()
            .filter(move |row| row.harvest == harvest)
    }

    pub fn properties_owned_by(&self, owner: ActorId) -> impl Iterator<Item = &Property> {
        self.properties
            .values()
            .filter(move |property| property.owner == Some(owner))
    }

    pub fn organizations_with_contact(
        &self,
        contact: ActorId,
    ) -> impl Iterator<Item = &Organization> {
        self.organizations
            .values()
            .filter(move |organization| organization.contact_person == Some(contact))
    }
}

use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::harvest::domain::{
    ActorId, AuthUser, AuthUserId, City, CityId, Country, CountryId, Equipment, EquipmentId,
    EquipmentType, EquipmentTypeId, Harvest, HarvestId, HarvestStatus, HarvestYield, Language,
    LanguageId, Location, Neighborhood, NeighborhoodId, Organization, Person, Property,
    PropertyId, RequestForParticipation, RequestId, RequestStatus, Role, State, StateId,
    TreeType, TreeTypeId, YieldId,
};
use crate::harvest::graph::{EntityGraph, GraphSeed};
use crate::harvest::locale::{DisplayClock, Locale};
use crate::harvest::projection::ProjectionContext;
use crate::harvest::repository::{EntityStore, StoreError};
use crate::harvest::service::ProjectionService;

pub(super) const ALEX: ActorId = ActorId(10);
pub(super) const SAM: ActorId = ActorId(11);
pub(super) const JORDAN: ActorId = ActorId(12);
pub(super) const GREEN_COOP: ActorId = ActorId(20);

pub(super) const PERSON_OWNED: PropertyId = PropertyId(1);
pub(super) const COOP_OWNED: PropertyId = PropertyId(2);
pub(super) const UNOWNED: PropertyId = PropertyId(3);

pub(super) const SUCCEEDED_HARVEST: HarvestId = HarvestId(1000);
pub(super) const SCHEDULED_HARVEST: HarvestId = HarvestId(1001);
pub(super) const READY_HARVEST: HarvestId = HarvestId(1002);

pub(super) fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn reference_time() -> DateTime<Utc> {
    utc(2025, 6, 1, 12, 0)
}

pub(super) fn clock() -> DisplayClock {
    DisplayClock::new(chrono_tz::America::Toronto)
}

pub(super) fn context() -> ProjectionContext {
    ProjectionContext::new(Locale::Fr, clock()).at(reference_time())
}

fn located(neighborhood: u64) -> Location {
    Location {
        neighborhood: Some(NeighborhoodId(neighborhood)),
        city: Some(CityId(1)),
        state: Some(StateId(1)),
        country: Some(CountryId(1)),
    }
}

fn person(actor_id: ActorId, first_name: &str, family_name: Option<&str>) -> Person {
    Person {
        actor_id,
        first_name: first_name.to_string(),
        family_name: family_name.map(str::to_string),
        email: None,
        phone: None,
        location: Location::default(),
        language: None,
        comments: String::new(),
    }
}

fn property(id: PropertyId, owner: Option<ActorId>, trees: Vec<TreeTypeId>) -> Property {
    Property {
        id,
        owner,
        is_active: true,
        authorized: Some(true),
        pending: false,
        pending_contact_name: None,
        pending_contact_phone: None,
        pending_contact_email: None,
        trees,
        trees_location: None,
        street_number: None,
        street: None,
        complement: None,
        postal_code: None,
        publishable_location: None,
        location: Location::default(),
        longitude: None,
        latitude: None,
        additional_info: None,
    }
}

fn harvest(
    id: HarvestId,
    property: PropertyId,
    status: HarvestStatus,
    pick_leader: Option<AuthUserId>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Harvest {
    Harvest {
        id,
        property,
        status,
        pick_leader,
        trees: vec![TreeTypeId(1)],
        start_date: start,
        end_date: end,
        nb_required_pickers: 4,
        about: None,
        publication_date: None,
    }
}

fn request(id: u64, harvest: HarvestId, person: ActorId, status: RequestStatus) -> RequestForParticipation {
    RequestForParticipation {
        id: RequestId(id),
        harvest,
        person,
        number_of_pickers: 2,
        comment: None,
        status,
        creation_date: None,
    }
}

fn account(id: u64, email: &str, person: Option<ActorId>, roles: Vec<Role>) -> AuthUser {
    AuthUser {
        id: AuthUserId(id),
        email: email.to_string(),
        person,
        is_active: true,
        is_staff: false,
        roles,
        date_joined: None,
        last_login: None,
    }
}

pub(super) fn seed() -> GraphSeed {
    let mut alex = person(ALEX, "Alex", Some("Tremblay"));
    alex.email = Some("alex@example.org".to_string());
    alex.phone = Some("514-555-0101".to_string());
    alex.location = located(1);
    alex.language = Some(LanguageId(1));
    alex.comments = "Back gate code 1234".to_string();

    let mut sam = person(SAM, "Sam", Some("Roy"));
    sam.email = Some("sam@example.org".to_string());

    let jordan = person(JORDAN, "Jordan", None);

    let coop = Organization {
        actor_id: GREEN_COOP,
        civil_name: "Green Co-op".to_string(),
        contact_person: Some(ALEX),
        phone: Some("514-555-0199".to_string()),
        short_address: Some("12 Rue Rachel".to_string()),
        address: Some("12 Rue Rachel Est, Montréal".to_string()),
        location: located(2),
        language: Some(LanguageId(2)),
        is_beneficiary: true,
        beneficiary_description: Some("Community fridge".to_string()),
        is_equipment_point: true,
        equipment_description: Some("Ladders in the shed".to_string()),
        description: None,
        comments: "Internal board notes".to_string(),
    };

    let mut alex_home = property(PERSON_OWNED, Some(ALEX), vec![TreeTypeId(1), TreeTypeId(2)]);
    alex_home.street_number = Some("4521".to_string());
    alex_home.street = Some("Rue Fabre".to_string());
    alex_home.location = located(1);

    let mut coop_lot = property(COOP_OWNED, Some(GREEN_COOP), vec![TreeTypeId(2)]);
    coop_lot.street_number = Some("12".to_string());
    coop_lot.street = Some("Rue Rachel".to_string());
    coop_lot.complement = Some("back yard".to_string());
    coop_lot.location = located(2);

    let mut unowned = property(UNOWNED, None, vec![TreeTypeId(1)]);
    unowned.pending = true;
    unowned.authorized = None;
    unowned.pending_contact_name = Some("Robin Pending".to_string());
    unowned.street_number = Some("88".to_string());
    unowned.street = Some("Avenue Papineau".to_string());

    GraphSeed {
        neighborhoods: vec![
            Neighborhood {
                id: NeighborhoodId(1),
                name: "Plateau".to_string(),
            },
            Neighborhood {
                id: NeighborhoodId(2),
                name: "Rosemont".to_string(),
            },
        ],
        cities: vec![City {
            id: CityId(1),
            name: "Montréal".to_string(),
        }],
        states: vec![State {
            id: StateId(1),
            name: "Québec".to_string(),
        }],
        countries: vec![Country {
            id: CountryId(1),
            name: "Canada".to_string(),
        }],
        languages: vec![
            Language {
                id: LanguageId(1),
                name: "Français".to_string(),
            },
            Language {
                id: LanguageId(2),
                name: "English".to_string(),
            },
        ],
        persons: vec![alex, sam, jordan],
        organizations: vec![coop],
        auth_users: vec![
            account(100, "sam@example.org", Some(SAM), vec![Role::PickLeader, Role::Volunteer]),
            account(101, "alex@example.org", Some(ALEX), vec![Role::Owner]),
            account(102, "core@example.org", None, vec![Role::Core]),
        ],
        tree_types: vec![
            TreeType {
                id: TreeTypeId(1),
                name: "Apple tree".to_string(),
                fruit_name: "Apple".to_string(),
                scientific_name: Some("Malus domestica".to_string()),
            },
            TreeType {
                id: TreeTypeId(2),
                name: "Cherry tree".to_string(),
                fruit_name: "Cherry".to_string(),
                scientific_name: None,
            },
        ],
        properties: vec![alex_home, coop_lot, unowned],
        harvests: vec![
            harvest(
                SUCCEEDED_HARVEST,
                PERSON_OWNED,
                HarvestStatus::Succeeded,
                Some(AuthUserId(100)),
                utc(2024, 8, 3, 14, 0),
                utc(2024, 8, 3, 16, 30),
            ),
            harvest(
                SCHEDULED_HARVEST,
                PERSON_OWNED,
                HarvestStatus::Scheduled,
                None,
                utc(2030, 7, 1, 13, 0),
                utc(2030, 7, 1, 15, 0),
            ),
            harvest(
                READY_HARVEST,
                COOP_OWNED,
                HarvestStatus::Ready,
                Some(AuthUserId(100)),
                utc(2025, 5, 20, 13, 0),
                utc(2025, 5, 20, 15, 0),
            ),
        ],
        equipment_types: vec![
            EquipmentType {
                id: EquipmentTypeId(1),
                name_fr: "Échelle".to_string(),
                name_en: "Ladder".to_string(),
            },
            EquipmentType {
                id: EquipmentTypeId(2),
                name_fr: "Seau".to_string(),
                name_en: "Bucket".to_string(),
            },
        ],
        equipment: vec![
            Equipment {
                id: EquipmentId(1),
                equipment_type: EquipmentTypeId(1),
                count: 2,
                description: None,
                property: None,
                owner: Some(GREEN_COOP),
            },
            Equipment {
                id: EquipmentId(2),
                equipment_type: EquipmentTypeId(2),
                count: 10,
                description: Some("Food-grade".to_string()),
                property: None,
                owner: Some(GREEN_COOP),
            },
            Equipment {
                id: EquipmentId(3),
                equipment_type: EquipmentTypeId(1),
                count: 1,
                description: None,
                property: Some(PERSON_OWNED),
                owner: None,
            },
        ],
        requests: vec![
            request(1, SUCCEEDED_HARVEST, JORDAN, RequestStatus::Accepted),
            request(2, SCHEDULED_HARVEST, JORDAN, RequestStatus::Pending),
            request(3, READY_HARVEST, ALEX, RequestStatus::Rejected),
        ],
        yields: vec![
            HarvestYield {
                id: YieldId(1),
                harvest: SUCCEEDED_HARVEST,
                recipient: Some(GREEN_COOP),
                tree: Some(TreeTypeId(1)),
                total_in_lb: 12.5,
            },
            HarvestYield {
                id: YieldId(2),
                harvest: SUCCEEDED_HARVEST,
                recipient: Some(ALEX),
                tree: Some(TreeTypeId(1)),
                total_in_lb: 7.5,
            },
        ],
    }
}

pub(super) fn graph() -> EntityGraph {
    EntityGraph::from_seed(seed()).expect("fixture graph builds")
}

/// Fixture where property 2 points at an actor that no table holds.
pub(super) fn dangling_owner_graph() -> EntityGraph {
    let mut seed = seed();
    seed.properties[1].owner = Some(ActorId(404));
    EntityGraph::from_seed(seed).expect("fixture graph builds")
}

pub(super) struct MemoryStore {
    graph: Arc<EntityGraph>,
}

impl MemoryStore {
    pub(super) fn new(graph: EntityGraph) -> Self {
        Self {
            graph: Arc::new(graph),
        }
    }
}

impl EntityStore for MemoryStore {
    fn snapshot(&self) -> Result<Arc<EntityGraph>, StoreError> {
        Ok(self.graph.clone())
    }
}

pub(super) struct UnavailableStore;

impl EntityStore for UnavailableStore {
    fn snapshot(&self) -> Result<Arc<EntityGraph>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service<S: EntityStore + 'static>(store: S) -> ProjectionService<S> {
    ProjectionService::new(Arc::new(store), clock(), Locale::Fr)
        .with_reference_time(reference_time())
}

pub(super) fn keys(value: &Value) -> Vec<String> {
    let mut keys: Vec<String> = value
        .as_object()
        .expect("json object")
        .keys()
        .cloned()
        .collect();
    keys.sort();
    keys
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

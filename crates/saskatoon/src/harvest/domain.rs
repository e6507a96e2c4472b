use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Key shared by a person or an organization.
    ActorId
);
entity_id!(NeighborhoodId);
entity_id!(CityId);
entity_id!(StateId);
entity_id!(CountryId);
entity_id!(LanguageId);
entity_id!(AuthUserId);
entity_id!(TreeTypeId);
entity_id!(PropertyId);
entity_id!(HarvestId);
entity_id!(EquipmentTypeId);
entity_id!(EquipmentId);
entity_id!(RequestId);
entity_id!(YieldId);

/// `{id, name}` lookup rows (neighborhoods, cities, states, countries, languages).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub id: NeighborhoodId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: LanguageId,
    pub name: String,
}

/// Location references carried by people, organizations, and properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub neighborhood: Option<NeighborhoodId>,
    #[serde(default)]
    pub city: Option<CityId>,
    #[serde(default)]
    pub state: Option<StateId>,
    #[serde(default)]
    pub country: Option<CountryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub actor_id: ActorId,
    pub first_name: String,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, flatten)]
    pub location: Location,
    #[serde(default)]
    pub language: Option<LanguageId>,
    #[serde(default)]
    pub comments: String,
}

impl Person {
    pub fn name(&self) -> String {
        match self.family_name.as_deref().map(str::trim) {
            Some(family) if !family.is_empty() => format!("{} {}", self.first_name, family),
            _ => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub actor_id: ActorId,
    pub civil_name: String,
    #[serde(default)]
    pub contact_person: Option<ActorId>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub short_address: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, flatten)]
    pub location: Location,
    #[serde(default)]
    pub language: Option<LanguageId>,
    #[serde(default)]
    pub is_beneficiary: bool,
    #[serde(default)]
    pub beneficiary_description: Option<String>,
    #[serde(default)]
    pub is_equipment_point: bool,
    #[serde(default)]
    pub equipment_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub comments: String,
}

/// Group membership granted to an authenticated community member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Core,
    #[serde(rename = "pickleader")]
    PickLeader,
    Volunteer,
    Owner,
    Contact,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Core => "Core Member",
            Role::PickLeader => "Pick Leader",
            Role::Volunteer => "Volunteer",
            Role::Owner => "Property Owner",
            Role::Contact => "Contact",
        }
    }

    /// Stable group identifier used by clients for permission checks.
    pub const fn code(self) -> &'static str {
        match self {
            Role::Core => "core",
            Role::PickLeader => "pickleader",
            Role::Volunteer => "volunteer",
            Role::Owner => "owner",
            Role::Contact => "contact",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: AuthUserId,
    pub email: String,
    #[serde(default)]
    pub person: Option<ActorId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeType {
    pub id: TreeTypeId,
    pub name: String,
    pub fruit_name: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    #[serde(default)]
    pub owner: Option<ActorId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub authorized: Option<bool>,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub pending_contact_name: Option<String>,
    #[serde(default)]
    pub pending_contact_phone: Option<String>,
    #[serde(default)]
    pub pending_contact_email: Option<String>,
    #[serde(default)]
    pub trees: Vec<TreeTypeId>,
    #[serde(default)]
    pub trees_location: Option<String>,
    #[serde(default)]
    pub street_number: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub complement: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub publishable_location: Option<String>,
    #[serde(default, flatten)]
    pub location: Location,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

/// Lifecycle of a harvest; the wire code is stable, the label is for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HarvestStatus {
    Orphan,
    Adopted,
    ToBeConfirmed,
    Scheduled,
    Ready,
    Succeeded,
    Cancelled,
}

impl HarvestStatus {
    pub const fn code(self) -> &'static str {
        match self {
            HarvestStatus::Orphan => "orphan",
            HarvestStatus::Adopted => "adopted",
            HarvestStatus::ToBeConfirmed => "to-be-confirmed",
            HarvestStatus::Scheduled => "scheduled",
            HarvestStatus::Ready => "ready",
            HarvestStatus::Succeeded => "succeeded",
            HarvestStatus::Cancelled => "cancelled",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            HarvestStatus::Orphan => "Orphan",
            HarvestStatus::Adopted => "Adopted",
            HarvestStatus::ToBeConfirmed => "To be confirmed",
            HarvestStatus::Scheduled => "Scheduled",
            HarvestStatus::Ready => "Ready",
            HarvestStatus::Succeeded => "Succeeded",
            HarvestStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Harvest {
    pub id: HarvestId,
    pub property: PropertyId,
    pub status: HarvestStatus,
    #[serde(default)]
    pub pick_leader: Option<AuthUserId>,
    #[serde(default)]
    pub trees: Vec<TreeTypeId>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub nb_required_pickers: u32,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub publication_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentType {
    pub id: EquipmentTypeId,
    pub name_fr: String,
    pub name_en: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentTypeId,
    pub count: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub property: Option<PropertyId>,
    #[serde(default)]
    pub owner: Option<ActorId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Accepted => "Accepted",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Cancelled => "Cancelled",
        }
    }
}

/// A volunteer asking to join a harvest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestForParticipation {
    pub id: RequestId,
    pub harvest: HarvestId,
    pub person: ActorId,
    #[serde(default = "default_pickers")]
    pub number_of_pickers: u32,
    #[serde(default)]
    pub comment: Option<String>,
    pub status: RequestStatus,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
}

fn default_pickers() -> u32 {
    1
}

/// Fruit from a harvest handed to a recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestYield {
    pub id: YieldId,
    pub harvest: HarvestId,
    #[serde(default)]
    pub recipient: Option<ActorId>,
    #[serde(default)]
    pub tree: Option<TreeTypeId>,
    pub total_in_lb: f64,
}

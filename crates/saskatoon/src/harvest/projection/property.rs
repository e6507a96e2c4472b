use chrono::NaiveDate;
use serde::Serialize;

use super::actor::{OwnerTypeView, OwnerView, PersonView};
use super::derived::{
    auth_user_label, last_succeeded_harvest_date, property_address, property_title,
};
use super::location::{
    neighborhood_label, resolve_trees, LocationView, PropertyTreeView, TreeTypeView,
};
use super::{ProjectionContext, ProjectionError, ViewMode};
use crate::harvest::domain::{Harvest, HarvestId, Property, PropertyId};
use crate::harvest::graph::EntityGraph;
use crate::harvest::locale::format_date;

/// Harvest shape embedded in a full property. Never embeds the property again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyHarvestView {
    pub id: HarvestId,
    pub status: &'static str,
    pub start_date: String,
    pub pick_leader: Option<PersonView>,
}

impl PropertyHarvestView {
    pub fn project(
        graph: &EntityGraph,
        ctx: &ProjectionContext,
        harvest: &Harvest,
    ) -> Result<Self, ProjectionError> {
        Ok(Self {
            id: harvest.id,
            status: harvest.status.label(),
            start_date: format_date(&ctx.clock.local_start(harvest)),
            pick_leader: harvest
                .pick_leader
                .and_then(|id| graph.auth_user(id))
                .and_then(|user| user.person)
                .and_then(|id| graph.person(id))
                .map(|person| PersonView::project(graph, person))
                .transpose()?,
        })
    }
}

/// Harvest shape embedded in a property list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyListHarvestView {
    pub id: HarvestId,
    pub status: &'static str,
    pub start_date: String,
    pub pick_leader: Option<String>,
}

impl PropertyListHarvestView {
    pub fn project(graph: &EntityGraph, ctx: &ProjectionContext, harvest: &Harvest) -> Self {
        Self {
            id: harvest.id,
            status: harvest.status.label(),
            start_date: format_date(&ctx.clock.local_start(harvest)),
            pick_leader: harvest
                .pick_leader
                .and_then(|id| graph.auth_user(id))
                .map(|user| auth_user_label(graph, user)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyView {
    pub id: PropertyId,
    pub title: String,
    pub address: String,
    pub is_active: bool,
    pub authorized: Option<bool>,
    pub pending: bool,
    pub pending_contact_name: Option<String>,
    pub pending_contact_phone: Option<String>,
    pub pending_contact_email: Option<String>,
    pub owner: Option<OwnerView>,
    pub owner_type: OwnerTypeView,
    pub trees: Vec<TreeTypeView>,
    pub trees_location: Option<String>,
    pub street_number: Option<String>,
    pub street: Option<String>,
    pub complement: Option<String>,
    pub postal_code: Option<String>,
    pub publishable_location: Option<String>,
    #[serde(flatten)]
    pub location: LocationView,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub additional_info: Option<String>,
    pub harvests: Vec<PropertyHarvestView>,
    pub last_succeeded_harvest_date: Option<NaiveDate>,
}

impl PropertyView {
    pub fn project(
        graph: &EntityGraph,
        ctx: &ProjectionContext,
        property: &Property,
    ) -> Result<Self, ProjectionError> {
        Ok(Self {
            id: property.id,
            title: property_title(graph, property)?,
            address: property_address(property),
            is_active: property.is_active,
            authorized: property.authorized,
            pending: property.pending,
            pending_contact_name: property.pending_contact_name.clone(),
            pending_contact_phone: property.pending_contact_phone.clone(),
            pending_contact_email: property.pending_contact_email.clone(),
            owner: OwnerView::for_owner(graph, property.owner)?,
            owner_type: OwnerTypeView::for_owner(graph, property.owner)?,
            trees: resolve_trees(graph, &property.trees)?,
            trees_location: property.trees_location.clone(),
            street_number: property.street_number.clone(),
            street: property.street.clone(),
            complement: property.complement.clone(),
            postal_code: property.postal_code.clone(),
            publishable_location: property.publishable_location.clone(),
            location: LocationView::project(graph, &property.location),
            longitude: property.longitude,
            latitude: property.latitude,
            additional_info: property.additional_info.clone(),
            harvests: graph
                .harvests_for_property(property.id)
                .map(|harvest| PropertyHarvestView::project(graph, ctx, harvest))
                .collect::<Result<Vec<_>, _>>()?,
            last_succeeded_harvest_date: last_succeeded_harvest_date(
                graph,
                &ctx.clock,
                property.id,
            ),
        })
    }
}

/// Row of the property directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyListView {
    pub id: PropertyId,
    pub title: String,
    pub neighborhood: Option<String>,
    pub trees: Vec<PropertyTreeView>,
    pub last_succeeded_harvest_date: Option<NaiveDate>,
    pub is_active: bool,
    pub authorized: Option<bool>,
    pub pending: bool,
    pub harvests: Vec<PropertyListHarvestView>,
}

impl PropertyListView {
    pub fn project(
        graph: &EntityGraph,
        ctx: &ProjectionContext,
        property: &Property,
    ) -> Result<Self, ProjectionError> {
        Ok(Self {
            id: property.id,
            title: property_title(graph, property)?,
            neighborhood: neighborhood_label(graph, property.location.neighborhood),
            trees: resolve_trees(graph, &property.trees)?,
            last_succeeded_harvest_date: last_succeeded_harvest_date(
                graph,
                &ctx.clock,
                property.id,
            ),
            is_active: property.is_active,
            authorized: property.authorized,
            pending: property.pending,
            harvests: graph
                .harvests_for_property(property.id)
                .map(|harvest| PropertyListHarvestView::project(graph, ctx, harvest))
                .collect(),
        })
    }
}

/// Property as seen from an equipment record: where it is and who to talk to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentPropertyView {
    pub id: PropertyId,
    pub title: String,
    pub neighborhood: Option<String>,
    pub owner: Option<OwnerView>,
}

impl EquipmentPropertyView {
    pub fn project(graph: &EntityGraph, property: &Property) -> Result<Self, ProjectionError> {
        Ok(Self {
            id: property.id,
            title: property_title(graph, property)?,
            neighborhood: neighborhood_label(graph, property.location.neighborhood),
            owner: OwnerView::for_owner(graph, property.owner)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyProjection {
    Full(PropertyView),
    List(PropertyListView),
    OwnerRestricted(EquipmentPropertyView),
}

impl PropertyProjection {
    pub fn project(
        graph: &EntityGraph,
        ctx: &ProjectionContext,
        property: &Property,
        mode: ViewMode,
    ) -> Result<Self, ProjectionError> {
        Ok(match mode {
            ViewMode::Full => Self::Full(PropertyView::project(graph, ctx, property)?),
            ViewMode::List => Self::List(PropertyListView::project(graph, ctx, property)?),
            ViewMode::OwnerRestricted => {
                Self::OwnerRestricted(EquipmentPropertyView::project(graph, property)?)
            }
        })
    }
}

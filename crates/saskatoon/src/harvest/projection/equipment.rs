use serde::Serialize;

use super::actor::ActorView;
use super::property::EquipmentPropertyView;
use super::{ProjectionContext, ProjectionError};
use crate::harvest::domain::{Equipment, EquipmentId, EquipmentType, EquipmentTypeId};
use crate::harvest::graph::EntityGraph;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentTypeView {
    pub id: EquipmentTypeId,
    pub name_fr: String,
    pub name_en: String,
}

impl From<&EquipmentType> for EquipmentTypeView {
    fn from(kind: &EquipmentType) -> Self {
        Self {
            id: kind.id,
            name_fr: kind.name_fr.clone(),
            name_en: kind.name_en.clone(),
        }
    }
}

/// Equipment type with its name already picked for the request locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedEquipmentTypeView {
    pub name: String,
    pub name_fr: String,
    pub name_en: String,
}

/// Equipment entry nested under an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentSummaryView {
    #[serde(rename = "type")]
    pub equipment_type: LocalizedEquipmentTypeView,
    pub count: u32,
}

impl EquipmentSummaryView {
    pub fn project(
        graph: &EntityGraph,
        ctx: &ProjectionContext,
        item: &Equipment,
    ) -> Result<Self, ProjectionError> {
        let kind = equipment_type(graph, item)?;
        Ok(Self {
            equipment_type: LocalizedEquipmentTypeView {
                name: kind.localized_name(ctx.locale).to_string(),
                name_fr: kind.name_fr.clone(),
                name_en: kind.name_en.clone(),
            },
            count: item.count,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentView {
    pub id: EquipmentId,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentTypeView,
    pub count: u32,
    pub description: Option<String>,
    pub property: Option<EquipmentPropertyView>,
    pub owner: Option<ActorView>,
}

impl EquipmentView {
    pub fn project(
        graph: &EntityGraph,
        ctx: &ProjectionContext,
        item: &Equipment,
    ) -> Result<Self, ProjectionError> {
        let property = item
            .property
            .map(|id| {
                graph
                    .property(id)
                    .ok_or_else(|| ProjectionError::missing("property", id.0))
                    .and_then(|property| EquipmentPropertyView::project(graph, property))
            })
            .transpose()?;
        let owner = item
            .owner
            .map(|id| ActorView::project(graph, ctx, id))
            .transpose()?;

        Ok(Self {
            id: item.id,
            equipment_type: EquipmentTypeView::from(equipment_type(graph, item)?),
            count: item.count,
            description: item.description.clone(),
            property,
            owner,
        })
    }
}

fn equipment_type<'g>(
    graph: &'g EntityGraph,
    item: &Equipment,
) -> Result<&'g EquipmentType, ProjectionError> {
    graph
        .equipment_type(item.equipment_type)
        .ok_or_else(|| ProjectionError::missing("equipment type", item.equipment_type.0))
}

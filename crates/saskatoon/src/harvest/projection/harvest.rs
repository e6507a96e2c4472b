use chrono::{DateTime, Utc};
use serde::Serialize;

use super::derived::{
    auth_user_label, harvest_pickers, is_open_to_requests, property_title, total_distribution,
    PickerEntry,
};
use super::location::{neighborhood_label, resolve_trees, HarvestTreeView, TreeTypeView};
use super::property::PropertyView;
use super::{ProjectionContext, ProjectionError, ViewMode};
use crate::harvest::domain::{AuthUserId, Harvest, HarvestId, Property};
use crate::harvest::graph::EntityGraph;
use crate::harvest::locale::{format_date, format_time};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickLeaderView {
    pub id: AuthUserId,
    pub name: String,
}

impl PickLeaderView {
    fn for_harvest(graph: &EntityGraph, harvest: &Harvest) -> Option<Self> {
        harvest
            .pick_leader
            .and_then(|id| graph.auth_user(id))
            .map(|user| Self {
                id: user.id,
                name: auth_user_label(graph, user),
            })
    }
}

/// Local date and times of a harvest window, all derived from the display clock.
struct LocalSchedule {
    start_date: String,
    start_time: String,
    end_time: String,
}

impl LocalSchedule {
    fn for_harvest(ctx: &ProjectionContext, harvest: &Harvest) -> Self {
        let start = ctx.clock.local_start(harvest);
        let end = ctx.clock.local_end(harvest);
        Self {
            start_date: format_date(&start),
            start_time: format_time(&start),
            end_time: format_time(&end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarvestView {
    pub id: HarvestId,
    pub status: &'static str,
    pub start_date: String,
    pub start_time: String,
    pub end_time: String,
    pub pick_leader: Option<PickLeaderView>,
    pub trees: Vec<TreeTypeView>,
    pub property: PropertyView,
    pub neighborhood: Option<String>,
    pub pickers: Vec<PickerEntry>,
    pub total_distribution: f64,
    pub is_open_to_requests: bool,
    pub nb_required_pickers: u32,
    pub about: Option<String>,
    pub publication_date: Option<DateTime<Utc>>,
}

impl HarvestView {
    pub fn project(
        graph: &EntityGraph,
        ctx: &ProjectionContext,
        harvest: &Harvest,
    ) -> Result<Self, ProjectionError> {
        let property = harvest_property(graph, harvest)?;
        let schedule = LocalSchedule::for_harvest(ctx, harvest);

        Ok(Self {
            id: harvest.id,
            status: harvest.status.label(),
            start_date: schedule.start_date,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            pick_leader: PickLeaderView::for_harvest(graph, harvest),
            trees: resolve_trees(graph, &harvest.trees)?,
            property: PropertyView::project(graph, ctx, property)?,
            neighborhood: neighborhood_label(graph, property.location.neighborhood),
            pickers: harvest_pickers(graph, harvest.id)?,
            total_distribution: total_distribution(graph, harvest.id),
            is_open_to_requests: is_open_to_requests(harvest, ctx.reference_time),
            nb_required_pickers: harvest.nb_required_pickers,
            about: harvest.about.clone(),
            publication_date: harvest.publication_date,
        })
    }
}

/// Calendar row: the property collapses to its title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestListView {
    pub id: HarvestId,
    pub start_date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: &'static str,
    pub pick_leader: Option<PickLeaderView>,
    pub trees: Vec<HarvestTreeView>,
    pub property: String,
    pub neighborhood: Option<String>,
}

impl HarvestListView {
    pub fn project(
        graph: &EntityGraph,
        ctx: &ProjectionContext,
        harvest: &Harvest,
    ) -> Result<Self, ProjectionError> {
        let property = harvest_property(graph, harvest)?;
        let schedule = LocalSchedule::for_harvest(ctx, harvest);

        Ok(Self {
            id: harvest.id,
            start_date: schedule.start_date,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            status: harvest.status.label(),
            pick_leader: PickLeaderView::for_harvest(graph, harvest),
            trees: resolve_trees(graph, &harvest.trees)?,
            property: property_title(graph, property)?,
            neighborhood: neighborhood_label(graph, property.location.neighborhood),
        })
    }
}

fn harvest_property<'g>(
    graph: &'g EntityGraph,
    harvest: &Harvest,
) -> Result<&'g Property, ProjectionError> {
    graph
        .property(harvest.property)
        .ok_or_else(|| ProjectionError::missing("property", harvest.property.0))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HarvestProjection {
    Full(Box<HarvestView>),
    List(HarvestListView),
}

impl HarvestProjection {
    pub fn project(
        graph: &EntityGraph,
        ctx: &ProjectionContext,
        harvest: &Harvest,
        mode: ViewMode,
    ) -> Result<Self, ProjectionError> {
        match mode {
            ViewMode::Full => Ok(Self::Full(Box::new(HarvestView::project(
                graph, ctx, harvest,
            )?))),
            ViewMode::List => Ok(Self::List(HarvestListView::project(graph, ctx, harvest)?)),
            ViewMode::OwnerRestricted => Err(ProjectionError::UnsupportedView {
                entity: "harvest",
                mode,
            }),
        }
    }
}

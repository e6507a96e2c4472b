use serde::Serialize;

use super::ProjectionError;
use crate::harvest::domain::{
    City, Country, Location, Neighborhood, NeighborhoodId, State, TreeType, TreeTypeId,
};
use crate::harvest::graph::EntityGraph;

/// `{id, name}` rendering shared by neighborhoods, cities, states, and countries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupView {
    pub id: u64,
    pub name: String,
}

impl From<&Neighborhood> for LookupView {
    fn from(row: &Neighborhood) -> Self {
        Self {
            id: row.id.0,
            name: row.name.clone(),
        }
    }
}

impl From<&City> for LookupView {
    fn from(row: &City) -> Self {
        Self {
            id: row.id.0,
            name: row.name.clone(),
        }
    }
}

impl From<&State> for LookupView {
    fn from(row: &State) -> Self {
        Self {
            id: row.id.0,
            name: row.name.clone(),
        }
    }
}

impl From<&Country> for LookupView {
    fn from(row: &Country) -> Self {
        Self {
            id: row.id.0,
            name: row.name.clone(),
        }
    }
}

/// Fully nested location block used by detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationView {
    pub neighborhood: Option<LookupView>,
    pub city: Option<LookupView>,
    pub state: Option<LookupView>,
    pub country: Option<LookupView>,
}

impl LocationView {
    pub fn project(graph: &EntityGraph, location: &Location) -> Self {
        Self {
            neighborhood: neighborhood_view(graph, location.neighborhood),
            city: location
                .city
                .and_then(|id| graph.city(id))
                .map(LookupView::from),
            state: location
                .state
                .and_then(|id| graph.state(id))
                .map(LookupView::from),
            country: location
                .country
                .and_then(|id| graph.country(id))
                .map(LookupView::from),
        }
    }
}

pub fn neighborhood_view(graph: &EntityGraph, id: Option<NeighborhoodId>) -> Option<LookupView> {
    id.and_then(|id| graph.neighborhood(id))
        .map(LookupView::from)
}

/// Plain label used where list views flatten a neighborhood to a string.
pub fn neighborhood_label(graph: &EntityGraph, id: Option<NeighborhoodId>) -> Option<String> {
    id.and_then(|id| graph.neighborhood(id))
        .map(|row| row.name.clone())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeTypeView {
    pub id: TreeTypeId,
    pub name: String,
    pub fruit_name: String,
    pub scientific_name: Option<String>,
}

impl From<&TreeType> for TreeTypeView {
    fn from(tree: &TreeType) -> Self {
        Self {
            id: tree.id,
            name: tree.name.clone(),
            fruit_name: tree.fruit_name.clone(),
            scientific_name: tree.scientific_name.clone(),
        }
    }
}

/// Tree shape inside property lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyTreeView {
    pub name: String,
    pub fruit_name: String,
}

impl From<&TreeType> for PropertyTreeView {
    fn from(tree: &TreeType) -> Self {
        Self {
            name: tree.name.clone(),
            fruit_name: tree.fruit_name.clone(),
        }
    }
}

/// Tree shape inside harvest lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestTreeView {
    pub id: TreeTypeId,
    pub name: String,
    pub fruit_name: String,
}

impl From<&TreeType> for HarvestTreeView {
    fn from(tree: &TreeType) -> Self {
        Self {
            id: tree.id,
            name: tree.name.clone(),
            fruit_name: tree.fruit_name.clone(),
        }
    }
}

/// Resolve tree ids in order; a dangling id is an integrity fault.
pub fn resolve_trees<'g, V>(
    graph: &'g EntityGraph,
    ids: &[TreeTypeId],
) -> Result<Vec<V>, ProjectionError>
where
    V: From<&'g TreeType>,
{
    ids.iter()
        .map(|id| {
            graph
                .tree_type(*id)
                .map(V::from)
                .ok_or_else(|| ProjectionError::missing("tree type", id.0))
        })
        .collect()
}

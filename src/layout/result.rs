//! Position maps produced by the layout engines.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::graph::{Edge, ExternalId, GraphModel};

/// A point in layout space. Planar layouts keep the third component at 0.0.
pub type Position = [f64; 3];

/// Per-node output record, serialized as `{"location": [x, y, z]}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeLocation {
    pub location: Position,
}

/// Mapping from the caller's node ids to positions.
///
/// Entries keep the order in which nodes first appeared in the edge list.
/// Serializes as a JSON object keyed by the id's string form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    nodes: IndexMap<ExternalId, NodeLocation>,
}

impl LayoutResult {
    /// Collect positions for every node in `graph`, indexed by NodeId.
    pub(crate) fn from_positions(graph: &GraphModel, positions: &[Position]) -> Self {
        debug_assert_eq!(positions.len(), graph.node_count());
        let nodes = graph
            .node_ids()
            .map(|id| {
                (
                    graph.external_id(id).clone(),
                    NodeLocation {
                        location: positions[id.index()],
                    },
                )
            })
            .collect();
        Self { nodes }
    }

    /// Number of positioned nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of a node, if it was laid out.
    pub fn get(&self, id: &ExternalId) -> Option<Position> {
        self.nodes.get(id).map(|node| node.location)
    }

    /// Iterate `(id, position)` in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&ExternalId, Position)> + '_ {
        self.nodes.iter().map(|(id, node)| (id, node.location))
    }

    /// Flatten to `[x0, y0, z0, x1, y1, z1, ...]` in first-appearance order.
    pub fn to_flat(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.nodes.len() * 3);
        for node in self.nodes.values() {
            flat.extend_from_slice(&node.location);
        }
        flat
    }

    /// Axis-aligned bounding box as `(min, max)`, or None if empty.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let mut iter = self.nodes.values();
        let first = iter.next()?.location;

        let mut min = first;
        let mut max = first;
        for node in iter {
            for axis in 0..3 {
                min[axis] = min[axis].min(node.location[axis]);
                max[axis] = max[axis].max(node.location[axis]);
            }
        }

        Some((min, max))
    }
}

impl Serialize for LayoutResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for (id, node) in &self.nodes {
            map.serialize_entry(&id.key(), node)?;
        }
        map.end()
    }
}

/// The edges plus their computed node positions, as consumed by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphDocument {
    pub edges: Vec<Edge>,
    pub nodes: LayoutResult,
}

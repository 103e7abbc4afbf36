//! GraphModel - the per-call graph built from an edge list.
//!
//! The model stores the topology in petgraph's StableGraph for root and
//! reachability queries, and keeps a flat edge buffer in input order for the
//! engines' hot loops. Node handles are dense, so `NodeId(i)` also indexes
//! every per-node buffer an engine allocates.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{Dfs, Reversed};
use petgraph::{Directed, Direction};

use super::edge::Edge;
use super::node::{ExternalId, NodeId};
use crate::error::{Error, Result};

/// An edge resolved to dense node handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

/// Deduplicated node set plus typed edges for one layout invocation.
#[derive(Debug, Clone)]
pub struct GraphModel {
    /// Directed topology. Nodes store their NodeId, edges their weight.
    graph: StableGraph<NodeId, f64, Directed>,

    /// NodeId -> caller token
    external_ids: Vec<ExternalId>,

    /// Caller token -> NodeId
    lookup: HashMap<ExternalId, NodeId>,

    /// Edges in input order
    edges: Vec<ModelEdge>,
}

impl GraphModel {
    /// Build a model from an edge list.
    ///
    /// The node set is the union of all edge endpoints, numbered in order of
    /// first appearance. Nodes without an incident edge cannot be expressed.
    pub fn from_edges(edges: &[Edge]) -> Result<Self> {
        let mut model = Self {
            graph: StableGraph::with_capacity(edges.len() + 1, edges.len()),
            external_ids: Vec::new(),
            lookup: HashMap::with_capacity(edges.len() + 1),
            edges: Vec::with_capacity(edges.len()),
        };

        for (index, edge) in edges.iter().enumerate() {
            if !(edge.weight.is_finite() && edge.weight > 0.0) {
                return Err(Error::InvalidEdgeWeight {
                    index,
                    weight: edge.weight,
                });
            }

            let source = model.intern(&edge.source);
            let target = model.intern(&edge.target);
            model
                .graph
                .add_edge(Self::node_index(source), Self::node_index(target), edge.weight);
            model.edges.push(ModelEdge {
                source,
                target,
                weight: edge.weight,
            });
        }

        Ok(model)
    }

    fn intern(&mut self, external: &ExternalId) -> NodeId {
        if let Some(&id) = self.lookup.get(external) {
            return id;
        }

        let id = NodeId(self.external_ids.len() as u32);
        let index = self.graph.add_node(id);
        debug_assert_eq!(index.index(), id.index());

        self.external_ids.push(external.clone());
        self.lookup.insert(external.clone(), id);
        id
    }

    #[inline]
    fn node_index(id: NodeId) -> NodeIndex {
        NodeIndex::new(id.index())
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.external_ids.len()
    }

    /// Get the number of edges, parallel edges included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when the edge list was empty.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All node handles in first-appearance order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.external_ids.len() as u32).map(NodeId)
    }

    /// Edges in input order.
    pub fn edges(&self) -> &[ModelEdge] {
        &self.edges
    }

    /// The caller's token for a node.
    pub fn external_id(&self, id: NodeId) -> &ExternalId {
        &self.external_ids[id.index()]
    }

    /// Resolve a caller token back to its handle.
    pub fn node_id(&self, external: &ExternalId) -> Option<NodeId> {
        self.lookup.get(external).copied()
    }

    /// Nodes that appear as a target but never as a source, in first-appearance order.
    ///
    /// Every node is an edge endpoint, so "never a source" is the same as
    /// "no outgoing edge".
    pub fn roots(&self) -> Vec<NodeId> {
        self.node_ids()
            .filter(|&id| {
                self.graph
                    .neighbors_directed(Self::node_index(id), Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .collect()
    }

    /// Nodes with no chain of `source -> target` edges leading to any of `roots`.
    ///
    /// Walks the graph backwards (target to source) from every root.
    pub fn unreachable_from(&self, roots: &[NodeId]) -> Vec<NodeId> {
        let mut reached = vec![false; self.node_count()];
        let Some(&first) = roots.first() else {
            return self.node_ids().collect();
        };

        // One walk shares its discovered set across all roots.
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, Self::node_index(first));
        for &root in roots {
            if !reached[root.index()] {
                dfs.move_to(Self::node_index(root));
            }
            while let Some(index) = dfs.next(reversed) {
                reached[index.index()] = true;
            }
        }

        self.node_ids()
            .filter(|id| !reached[id.index()])
            .collect()
    }
}

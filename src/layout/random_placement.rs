//! Brute-force random placement for tree and DAG shaped graphs.
//!
//! Edges point from child to parent: a node is placed only once the target
//! of one of its outgoing edges has a position. Roots are the nodes that are
//! never a source.
//!
//! # Algorithm Overview
//!
//! 1. **Roots:** lined up on the x axis, `separation` apart. Roots are not
//!    checked against each other.
//! 2. **Reachability:** every node must lead to a root through its outgoing
//!    edges, otherwise it could never be placed and the layout fails up front.
//! 3. **Relaxation:** sweep the edge list; for each edge with a pending source
//!    and a placed target, sample positions in a cube of half-width
//!    `edge_length` around the target until one is farther than `separation`
//!    from every placed node (and inside the confinement sphere, if any).
//!    Sweeps repeat until every node is placed.
//!
//! Each node gets at most [`MAX_PLACEMENT_ATTEMPTS`] samples.

use log::{debug, trace, warn};
use rand::Rng;
use serde::Deserialize;

use super::cancel::CancelSignal;
use super::result::{LayoutResult, Position};
use super::{Dimensionality, require_non_negative, require_positive};
use crate::error::{Error, Result};
use crate::graph::{GraphModel, NodeId};
use crate::spatial::SpatialIndex;

/// Rejected samples allowed per node before placement gives up.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100_000;

/// Configuration for the random placement layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RandomPlacementConfig {
    /// Half-width of the sampling cube around a node's target.
    pub edge_length: f64,
    /// Minimum distance between any two placed nodes.
    pub separation: f64,
    /// If positive, confines nodes to a sphere of radius `edge_count / density`.
    pub density: f64,
    /// If false, children are pushed outward along x, away from their root.
    pub is_concentric: bool,
    /// Planar or spatial output.
    pub dimensionality: Dimensionality,
}

impl Default for RandomPlacementConfig {
    fn default() -> Self {
        Self {
            edge_length: 20.0,
            separation: 10.0,
            density: 0.0,
            is_concentric: false,
            dimensionality: Dimensionality::Three,
        }
    }
}

impl RandomPlacementConfig {
    /// Reject out-of-range parameters.
    pub fn validate(&self) -> Result<()> {
        require_positive("edge_length", self.edge_length)?;
        require_positive("separation", self.separation)?;
        require_non_negative("density", self.density)?;
        Ok(())
    }

    /// Radius of the confinement sphere, or None when unconfined.
    fn confinement_radius(&self, edge_count: usize) -> Option<f64> {
        (self.density > 0.0).then(|| edge_count as f64 / self.density)
    }
}

/// The random placement layout engine.
pub struct RandomPlacementLayout {
    config: RandomPlacementConfig,
}

impl RandomPlacementLayout {
    /// Create a new random placement layout with the given configuration.
    pub fn new(config: RandomPlacementConfig) -> Self {
        Self { config }
    }

    /// Create a random placement layout with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RandomPlacementConfig::default())
    }

    /// Place every node of `graph`.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` for out-of-range parameters
    /// - `UnreachableNodes` when some node has no edge chain to a root
    /// - `PlacementExhausted` when a node's sampling budget runs out; no
    ///   partial layout is returned
    /// - `Cancelled` if `cancel` fires
    pub fn compute<R, C>(&self, graph: &GraphModel, rng: &mut R, cancel: &C) -> Result<LayoutResult>
    where
        R: Rng,
        C: CancelSignal + ?Sized,
    {
        self.config.validate()?;
        if graph.is_empty() {
            return Ok(LayoutResult::default());
        }

        let roots = find_roots(graph);
        let unreachable = graph.unreachable_from(&roots);
        if !unreachable.is_empty() {
            return Err(Error::UnreachableNodes {
                nodes: unreachable
                    .iter()
                    .map(|&id| graph.external_id(id).to_string())
                    .collect(),
            });
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            roots = roots.len();
            "Running random placement layout"
        );

        let mut placer = Placer {
            config: &self.config,
            axes: self.config.dimensionality.axes(),
            confinement: self.config.confinement_radius(graph.edge_count()),
            positions: vec![None; graph.node_count()],
            index: SpatialIndex::new(),
        };

        for (i, &root) in roots.iter().enumerate() {
            placer.place(root, [self.config.separation * i as f64, 0.0, 0.0]);
        }

        let mut placed = roots.len();
        let mut pass = 0;
        while placed < graph.node_count() {
            pass += 1;
            let mut placed_this_pass = 0;

            for edge in graph.edges() {
                if placer.is_placed(edge.source) {
                    continue;
                }
                let Some(anchor) = placer.positions[edge.target.index()] else {
                    continue;
                };

                let position = placer.sample(anchor, rng, cancel).map_err(|failure| match failure {
                    SampleFailure::Cancelled => Error::Cancelled,
                    SampleFailure::Exhausted => Error::PlacementExhausted {
                        node: graph.external_id(edge.source).to_string(),
                        attempts: MAX_PLACEMENT_ATTEMPTS,
                        edge_length: self.config.edge_length,
                        separation: self.config.separation,
                    },
                })?;
                placer.place(edge.source, position);
                placed_this_pass += 1;
            }

            trace!("Placement pass {pass}: {placed_this_pass} nodes placed");
            if placed_this_pass == 0 {
                // Reachability was checked above; this only guards the loop.
                return Err(Error::UnreachableNodes {
                    nodes: graph
                        .node_ids()
                        .filter(|&id| !placer.is_placed(id))
                        .map(|id| graph.external_id(id).to_string())
                        .collect(),
                });
            }
            placed += placed_this_pass;
        }

        debug!("Random placement finished after {pass} passes");
        let positions: Vec<Position> = placer.positions.into_iter().flatten().collect();
        Ok(LayoutResult::from_positions(graph, &positions))
    }
}

/// Sinks of the edge direction, or the first edge's source when there are none.
fn find_roots(graph: &GraphModel) -> Vec<NodeId> {
    let roots = graph.roots();
    if !roots.is_empty() {
        return roots;
    }

    let fallback = graph.edges()[0].source;
    warn!(
        "No node is only a target; using `{}` as the root",
        graph.external_id(fallback)
    );
    vec![fallback]
}

enum SampleFailure {
    Exhausted,
    Cancelled,
}

struct Placer<'a> {
    config: &'a RandomPlacementConfig,
    axes: usize,
    confinement: Option<f64>,
    positions: Vec<Option<Position>>,
    index: SpatialIndex,
}

impl Placer<'_> {
    fn is_placed(&self, id: NodeId) -> bool {
        self.positions[id.index()].is_some()
    }

    fn place(&mut self, id: NodeId, position: Position) {
        self.positions[id.index()] = Some(position);
        self.index.insert(position);
    }

    /// Draw candidates around `anchor` until one is accepted.
    fn sample<R, C>(&self, anchor: Position, rng: &mut R, cancel: &C) -> std::result::Result<Position, SampleFailure>
    where
        R: Rng,
        C: CancelSignal + ?Sized,
    {
        let edge_length = self.config.edge_length;

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            if cancel.is_cancelled() {
                return Err(SampleFailure::Cancelled);
            }

            let mut candidate = [0.0; 3];
            for axis in 0..self.axes {
                candidate[axis] = anchor[axis] + edge_length * (2.0 * rng.random::<f64>() - 1.0);
            }
            if !self.config.is_concentric {
                // Strictly outward along x, root to leaf.
                candidate[0] = anchor[0] + edge_length * rng.random::<f64>();
            }

            if self.accepts(&candidate) {
                return Ok(candidate);
            }
        }

        Err(SampleFailure::Exhausted)
    }

    fn accepts(&self, candidate: &Position) -> bool {
        if let Some(radius) = self.confinement {
            let from_origin =
                (candidate[0] * candidate[0] + candidate[1] * candidate[1] + candidate[2] * candidate[2]).sqrt();
            if from_origin > radius {
                return false;
            }
        }
        !self.index.any_within(candidate, self.config.separation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, ExternalId};
    use crate::layout::NeverCancel;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::atomic::AtomicBool;

    fn run(edges: &[Edge], config: RandomPlacementConfig, seed: u64) -> Result<LayoutResult> {
        let graph = GraphModel::from_edges(edges).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        RandomPlacementLayout::new(config).compute(&graph, &mut rng, &NeverCancel)
    }

    fn distance(a: Position, b: Position) -> f64 {
        ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2) + (b[2] - a[2]).powi(2)).sqrt()
    }

    fn tree_edges() -> Vec<Edge> {
        // Children point at parents; "root" is the only sink.
        vec![
            Edge::new("a", "root"),
            Edge::new("b", "root"),
            Edge::new("c", "root"),
            Edge::new("a1", "a"),
            Edge::new("a2", "a"),
            Edge::new("b1", "b"),
            Edge::new("b1x", "b1"),
        ]
    }

    fn assert_separated(result: &LayoutResult, separation: f64) {
        let positions: Vec<_> = result.iter().collect();
        for (i, (id_a, a)) in positions.iter().enumerate() {
            for (id_b, b) in &positions[i + 1..] {
                assert!(
                    distance(*a, *b) > separation,
                    "{id_a} and {id_b} are only {} apart",
                    distance(*a, *b)
                );
            }
        }
    }

    #[test]
    fn test_single_edge() {
        let config = RandomPlacementConfig {
            edge_length: 20.0,
            separation: 10.0,
            ..Default::default()
        };
        let result = run(&[Edge::new("A", "B")], config, 7).unwrap();

        assert_eq!(result.len(), 2);
        let a = result.get(&ExternalId::from("A")).unwrap();
        let b = result.get(&ExternalId::from("B")).unwrap();

        // B is the root, pinned at the origin
        assert_eq!(b, [0.0, 0.0, 0.0]);
        // A is outside the separation radius, inside the sampling cube
        let d = distance(a, b);
        assert!(d > 10.0, "too close: {d}");
        assert!(d <= 20.0 * 3f64.sqrt(), "too far: {d}");
        // Outward bias: never behind its target on x
        assert!(a[0] >= b[0]);
    }

    #[test]
    fn test_tree_is_fully_placed_and_separated() {
        let result = run(&tree_edges(), RandomPlacementConfig::default(), 3).unwrap();
        assert_eq!(result.len(), 8);
        assert_separated(&result, 10.0);
    }

    #[test]
    fn test_children_stay_within_edge_length_of_parent() {
        let config = RandomPlacementConfig {
            is_concentric: true,
            ..Default::default()
        };
        let edges = tree_edges();
        let result = run(&edges, config.clone(), 21).unwrap();

        for edge in &edges {
            let child = result.get(&edge.source).unwrap();
            let parent = result.get(&edge.target).unwrap();
            for axis in 0..3 {
                assert!((child[axis] - parent[axis]).abs() <= config.edge_length);
            }
        }
    }

    #[test]
    fn test_multiple_roots_lined_up_on_x() {
        let edges = vec![Edge::new("x", "r1"), Edge::new("y", "r2"), Edge::new("z", "r3")];
        let result = run(&edges, RandomPlacementConfig::default(), 1).unwrap();

        assert_eq!(result.get(&ExternalId::from("r1")), Some([0.0, 0.0, 0.0]));
        assert_eq!(result.get(&ExternalId::from("r2")), Some([10.0, 0.0, 0.0]));
        assert_eq!(result.get(&ExternalId::from("r3")), Some([20.0, 0.0, 0.0]));
    }

    #[test]
    fn test_cycle_falls_back_to_first_source() {
        let edges = vec![Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("c", "a")];
        let result = run(&edges, RandomPlacementConfig::default(), 8).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.get(&ExternalId::from("a")), Some([0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_planar_layout_keeps_z_at_zero() {
        let config = RandomPlacementConfig {
            dimensionality: Dimensionality::Two,
            ..Default::default()
        };
        let result = run(&tree_edges(), config, 5).unwrap();
        for (_, position) in result.iter() {
            assert_eq!(position[2], 0.0);
        }
    }

    #[test]
    fn test_density_confines_layout() {
        // 7 edges at density 0.1 -> radius 70
        let config = RandomPlacementConfig {
            density: 0.1,
            is_concentric: true,
            ..Default::default()
        };
        let result = run(&tree_edges(), config, 13).unwrap();
        for (id, position) in result.iter() {
            let from_origin = distance(position, [0.0; 3]);
            assert!(from_origin <= 70.0, "{id} escaped to {from_origin}");
        }
    }

    #[test]
    fn test_separation_larger_than_edge_length_exhausts() {
        let config = RandomPlacementConfig {
            edge_length: 5.0,
            separation: 10.0,
            ..Default::default()
        };
        let err = run(&[Edge::new("A", "B")], config, 0).unwrap_err();
        assert_eq!(
            err,
            Error::PlacementExhausted {
                node: "A".into(),
                attempts: MAX_PLACEMENT_ATTEMPTS,
                edge_length: 5.0,
                separation: 10.0,
            }
        );
    }

    #[test]
    fn test_unreachable_nodes_reported() {
        // p <-> q never leads to "root"
        let edges = vec![Edge::new("a", "root"), Edge::new("p", "q"), Edge::new("q", "p")];
        let err = run(&edges, RandomPlacementConfig::default(), 0).unwrap_err();
        assert_eq!(
            err,
            Error::UnreachableNodes {
                nodes: vec!["p".into(), "q".into()]
            }
        );
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let first = run(&tree_edges(), RandomPlacementConfig::default(), 99).unwrap();
        let second = run(&tree_edges(), RandomPlacementConfig::default(), 99).unwrap();
        assert_eq!(first.to_flat(), second.to_flat());
    }

    #[test]
    fn test_empty_graph() {
        let result = run(&[], RandomPlacementConfig::default(), 0).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        for config in [
            RandomPlacementConfig {
                separation: 0.0,
                ..Default::default()
            },
            RandomPlacementConfig {
                edge_length: -3.0,
                ..Default::default()
            },
            RandomPlacementConfig {
                density: -1.0,
                ..Default::default()
            },
        ] {
            let err = run(&tree_edges(), config, 0).unwrap_err();
            assert!(matches!(err, Error::InvalidConfiguration { .. }), "got {err:?}");
        }
    }

    #[test]
    fn test_cancellation_stops_sampling() {
        let graph = GraphModel::from_edges(&tree_edges()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let cancel = AtomicBool::new(true);

        let err = RandomPlacementLayout::with_defaults()
            .compute(&graph, &mut rng, &cancel)
            .unwrap_err();
        assert_eq!(err, Error::Cancelled);
    }
}

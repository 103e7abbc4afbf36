//! Force-directed layout: Coulomb repulsion between every node pair plus a
//! Hooke spring along every edge, integrated for a fixed number of steps.
//!
//! # Algorithm Overview
//!
//! Every node starts at the origin. Each iteration:
//!
//! 1. **Repulsion:** for each unordered pair, push the nodes apart with
//!    magnitude `(force_strength / distance)^2`, skipped beyond `max_distance`.
//! 2. **Attraction:** for each edge, a spring with rest length
//!    `force_strength * weight` pulls (or pushes) its endpoints.
//! 3. **Integration:** the accumulated force is dampened, clamped per axis to
//!    `max_velocity`, added straight onto the node's displacement, then reset.
//!
//! Nodes closer than [`JITTER_THRESHOLD`] get a random separation vector
//! instead of their real one. That is what breaks the all-at-origin symmetry
//! on the first iteration, and it is the only source of randomness.
//!
//! Pairwise work is exhaustive, O(iterations * (V^2 + E)). The engine targets
//! small graphs for interactive viewing.

use log::debug;
use rand::Rng;
use serde::Deserialize;

use super::cancel::CancelSignal;
use super::result::{LayoutResult, Position};
use super::{Dimensionality, require_positive};
use crate::error::{Error, Result};
use crate::graph::{GraphModel, ModelEdge};

/// Below this separation two nodes are treated as coincident.
pub const JITTER_THRESHOLD: f64 = 0.1;

/// Configuration for the force-directed layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceDirectedConfig {
    /// Number of simulation steps.
    pub iterations: u32,
    /// Strength of Coulomb and Hooke forces; scales the distance between nodes.
    pub force_strength: f64,
    /// Multiplier applied to the accumulated force before it moves a node.
    pub dampening: f64,
    /// Maximum distance a node can move along one axis in one step.
    pub max_velocity: f64,
    /// Interaction cutoff for repulsion, and cap on spring stretch.
    pub max_distance: f64,
    /// Planar or spatial output.
    pub dimensionality: Dimensionality,
}

impl Default for ForceDirectedConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            force_strength: 5.0,
            dampening: 0.01,
            max_velocity: 2.0,
            max_distance: 50.0,
            dimensionality: Dimensionality::Three,
        }
    }
}

impl ForceDirectedConfig {
    /// Reject out-of-range parameters.
    pub fn validate(&self) -> Result<()> {
        require_positive("force_strength", self.force_strength)?;
        require_positive("dampening", self.dampening)?;
        require_positive("max_velocity", self.max_velocity)?;
        require_positive("max_distance", self.max_distance)?;
        Ok(())
    }
}

/// Per-node simulation state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SimNode {
    /// Cumulative displacement from the origin, i.e. the node's position.
    displacement: Position,
    /// Force accumulated during the current iteration.
    force: Position,
}

/// The force-directed layout engine.
pub struct ForceDirectedLayout {
    config: ForceDirectedConfig,
}

impl ForceDirectedLayout {
    /// Create a new force-directed layout with the given configuration.
    pub fn new(config: ForceDirectedConfig) -> Self {
        Self { config }
    }

    /// Create a force-directed layout with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ForceDirectedConfig::default())
    }

    /// Run the simulation and return one position per node in `graph`.
    ///
    /// Never fails on degenerate graphs; a single node or a disconnected
    /// graph still runs all iterations. Errors only on invalid
    /// configuration or cancellation.
    pub fn compute<R, C>(&self, graph: &GraphModel, rng: &mut R, cancel: &C) -> Result<LayoutResult>
    where
        R: Rng,
        C: CancelSignal + ?Sized,
    {
        self.config.validate()?;

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            iterations = self.config.iterations;
            "Running force-directed layout"
        );

        let mut simulation = Simulation::new(&self.config, graph.node_count());
        for _ in 0..self.config.iterations {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            simulation.step(graph.edges(), rng);
        }

        let positions: Vec<Position> = simulation.nodes.iter().map(|node| node.displacement).collect();
        debug!("Force-directed layout finished");
        Ok(LayoutResult::from_positions(graph, &positions))
    }
}

struct Simulation<'a> {
    config: &'a ForceDirectedConfig,
    /// Active axes: 2 or 3. Inactive axes are never written.
    axes: usize,
    nodes: Vec<SimNode>,
}

impl<'a> Simulation<'a> {
    fn new(config: &'a ForceDirectedConfig, node_count: usize) -> Self {
        Self {
            config,
            axes: config.dimensionality.axes(),
            nodes: vec![SimNode::default(); node_count],
        }
    }

    fn step<R: Rng>(&mut self, edges: &[ModelEdge], rng: &mut R) {
        self.apply_repulsion(rng);
        self.apply_springs(edges, rng);
        self.integrate();
    }

    /// `pos(b) - pos(a)` and its length, with jitter substituted for
    /// near-coincident nodes.
    fn separation<R: Rng>(&self, a: usize, b: usize, rng: &mut R) -> (Position, f64) {
        let mut delta = [0.0; 3];
        for axis in 0..self.axes {
            delta[axis] = self.nodes[b].displacement[axis] - self.nodes[a].displacement[axis];
        }
        let mut distance = norm(&delta);

        if distance < JITTER_THRESHOLD {
            for axis in 0..self.axes {
                delta[axis] = rng.random_range(0.1..0.2);
            }
            distance = norm(&delta);
        }

        (delta, distance)
    }

    fn apply_repulsion<R: Rng>(&mut self, rng: &mut R) {
        let n = self.nodes.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (delta, distance) = self.separation(i, j, rng);
                if distance >= self.config.max_distance {
                    continue;
                }

                let magnitude = (self.config.force_strength / distance).powi(2);
                for axis in 0..self.axes {
                    let push = magnitude * delta[axis];
                    self.nodes[i].force[axis] -= push;
                    self.nodes[j].force[axis] += push;
                }
            }
        }
    }

    fn apply_springs<R: Rng>(&mut self, edges: &[ModelEdge], rng: &mut R) {
        for edge in edges {
            let (source, target) = (edge.source.index(), edge.target.index());
            let (delta, distance) = self.separation(source, target, rng);
            let distance = distance.min(self.config.max_distance);

            let k = self.config.force_strength * edge.weight;
            let magnitude = (distance * distance - k * k) / (distance * k);
            for axis in 0..self.axes {
                let pull = magnitude * delta[axis];
                self.nodes[source].force[axis] += pull;
                self.nodes[target].force[axis] -= pull;
            }
        }
    }

    fn integrate(&mut self) {
        let limit = self.config.max_velocity;
        for node in &mut self.nodes {
            for axis in 0..self.axes {
                let step = (self.config.dampening * node.force[axis]).clamp(-limit, limit);
                node.displacement[axis] += step;
            }
            node.force = [0.0; 3];
        }
    }
}

#[inline]
fn norm(v: &Position) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

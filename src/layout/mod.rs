//! Layout algorithms for graph visualization.
//!
//! Two interchangeable engines turn a [`GraphModel`] into a position map:
//! - [`ForceDirectedLayout`]: Coulomb/Hooke physics simulation
//! - [`RandomPlacementLayout`]: collision-avoiding random placement outward from roots
//!
//! Both are synchronous, own all of their state for the duration of one call,
//! and draw randomness from a caller-supplied RNG so seeded runs repeat exactly.

pub mod cancel;
pub mod force_directed;
pub mod random_placement;
pub mod result;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

pub use cancel::{CancelSignal, NeverCancel};
pub use force_directed::{ForceDirectedConfig, ForceDirectedLayout};
pub use random_placement::{RandomPlacementConfig, RandomPlacementLayout};
pub use result::{GraphDocument, LayoutResult, NodeLocation, Position};

use crate::error::{Error, Result};
use crate::graph::{Edge, GraphModel};

/// Number of coordinates a layout varies. Output always has three; in
/// two dimensions z is exactly 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dimensionality {
    Two,
    #[default]
    Three,
}

impl Dimensionality {
    /// Number of active axes.
    #[inline]
    pub fn axes(self) -> usize {
        match self {
            Dimensionality::Two => 2,
            Dimensionality::Three => 3,
        }
    }
}

impl TryFrom<u8> for Dimensionality {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            2 => Ok(Dimensionality::Two),
            3 => Ok(Dimensionality::Three),
            other => Err(format!("dimensionality must be 2 or 3, got {other}")),
        }
    }
}

impl From<Dimensionality> for u8 {
    fn from(value: Dimensionality) -> Self {
        value.axes() as u8
    }
}

/// Which engine to run, with its configuration.
#[derive(Debug, Clone)]
pub enum LayoutAlgorithm {
    ForceDirected(ForceDirectedConfig),
    RandomPlacement(RandomPlacementConfig),
}

impl Default for LayoutAlgorithm {
    fn default() -> Self {
        LayoutAlgorithm::ForceDirected(ForceDirectedConfig::default())
    }
}

/// Headless layout entry point.
///
/// Runs `algorithm` on `graph` with a `StdRng` seeded from `seed`; the same
/// inputs and seed always produce the same coordinates.
pub fn layout(graph: &GraphModel, algorithm: &LayoutAlgorithm, seed: u64) -> Result<LayoutResult> {
    let mut rng = StdRng::seed_from_u64(seed);
    match algorithm {
        LayoutAlgorithm::ForceDirected(config) => {
            ForceDirectedLayout::new(config.clone()).compute(graph, &mut rng, &NeverCancel)
        }
        LayoutAlgorithm::RandomPlacement(config) => {
            RandomPlacementLayout::new(config.clone()).compute(graph, &mut rng, &NeverCancel)
        }
    }
}

/// Lay out `edges` and bundle them with the positions, ready for the renderer.
pub fn generate(edges: Vec<Edge>, algorithm: &LayoutAlgorithm, seed: u64) -> Result<GraphDocument> {
    let graph = GraphModel::from_edges(&edges)?;
    let nodes = layout(&graph, algorithm, seed)?;
    Ok(GraphDocument { edges, nodes })
}

pub(crate) fn require_positive(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            parameter,
            value,
            reason: "must be a positive number",
        })
    }
}

pub(crate) fn require_non_negative(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            parameter,
            value,
            reason: "must be zero or a positive number",
        })
    }
}

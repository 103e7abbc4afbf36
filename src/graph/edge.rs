//! Edge type and its accepted input shapes.
//!
//! An edge arrives in one of three shapes:
//! - Object: `{"source": a, "target": b, "size": 2.0, "color": "0xff0000"}`
//! - Pair: `[a, b]`
//! - Triple: `[a, b, size]`
//!
//! `size` is the edge weight and defaults to 1.0. `color` is carried through
//! for the renderer and never read by the layout engines.

use serde::{Deserialize, Serialize};

use super::node::ExternalId;

/// Weight given to edges that do not specify a `size`.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// A directed edge between two caller-named nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EdgeRecord")]
pub struct Edge {
    pub source: ExternalId,
    pub target: ExternalId,
    /// Scales spring stiffness in the force-directed engine.
    #[serde(rename = "size", skip_serializing_if = "is_default_weight")]
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ExternalId>,
}

impl Edge {
    /// Create an edge with the default weight.
    pub fn new(source: impl Into<ExternalId>, target: impl Into<ExternalId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: DEFAULT_EDGE_WEIGHT,
            color: None,
        }
    }

    /// Set the edge weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Attach a renderer color.
    pub fn with_color(mut self, color: impl Into<ExternalId>) -> Self {
        self.color = Some(color.into());
        self
    }
}

fn is_default_weight(weight: &f64) -> bool {
    *weight == DEFAULT_EDGE_WEIGHT
}

fn default_weight() -> f64 {
    DEFAULT_EDGE_WEIGHT
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EdgeRecord {
    Object {
        source: ExternalId,
        target: ExternalId,
        #[serde(default = "default_weight")]
        size: f64,
        #[serde(default)]
        color: Option<ExternalId>,
    },
    Triple(ExternalId, ExternalId, f64),
    Pair(ExternalId, ExternalId),
}

impl From<EdgeRecord> for Edge {
    fn from(record: EdgeRecord) -> Self {
        match record {
            EdgeRecord::Object {
                source,
                target,
                size,
                color,
            } => Edge {
                source,
                target,
                weight: size,
                color,
            },
            EdgeRecord::Triple(source, target, size) => Edge::new(source, target).with_weight(size),
            EdgeRecord::Pair(source, target) => Edge::new(source, target),
        }
    }
}

//! Graph model built from an edge list.
//!
//! This module normalizes caller-supplied edges into a deduplicated node set
//! with dense handles, backed by petgraph's StableGraph for topology queries.
//! A model lives for exactly one layout call.

mod edge;
mod model;
mod node;

pub use edge::{DEFAULT_EDGE_WEIGHT, Edge};
pub use model::{GraphModel, ModelEdge};
pub use node::{ExternalId, NodeId};

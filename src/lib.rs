//! netcoord - WASM Module
//!
//! This module computes node coordinates for graph visualization. It is
//! compiled to WebAssembly and exposes a JavaScript-friendly API via
//! wasm-bindgen; the same engines are usable directly from Rust.
//!
//! # Architecture
//!
//! - `graph`: Edge-list ingestion into a petgraph-backed model with dense node handles
//! - `layout`: Force-directed and random placement engines
//! - `spatial`: R-tree index for minimum-separation checks
//! - `error`: Error taxonomy shared by every entry point
//!
//! # Example
//!
//! ```
//! use netcoord_wasm::graph::{Edge, GraphModel};
//! use netcoord_wasm::layout::{layout, ForceDirectedConfig, LayoutAlgorithm};
//!
//! let graph = GraphModel::from_edges(&[Edge::new("a", "b"), Edge::new("b", "c")]).unwrap();
//! let positions = layout(&graph, &LayoutAlgorithm::ForceDirected(ForceDirectedConfig::default()), 7).unwrap();
//! assert_eq!(positions.len(), 3);
//! ```

use js_sys::Float64Array;
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod graph;
pub mod layout;
pub mod spatial;

pub use error::{Error, Result};

use graph::Edge;
use layout::{ForceDirectedConfig, LayoutAlgorithm, RandomPlacementConfig};

/// Initialize the WASM module: panic messages and log records go to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second init (module re-instantiated) leaves the first logger in place.
    let _ = console_log::init_with_level(log::Level::Warn);
}

// =========================================================================
// Layout Algorithms
// =========================================================================

/// Compute a force-directed layout.
///
/// # Arguments
///
/// * `edges` - Array of `{source, target, size?}` objects or `[source, target, size?]` tuples
/// * `config` - Optional `{iterations, forceStrength, dampening, maxVelocity, maxDistance, dimensionality}`
/// * `seed` - Optional seed; identical inputs and seed give identical output
///
/// Returns `{ [id]: { location: [x, y, z] } }`.
#[wasm_bindgen(js_name = forceDirectedLayout)]
pub fn force_directed_layout(edges: JsValue, config: JsValue, seed: Option<f64>) -> std::result::Result<JsValue, JsError> {
    let config: ForceDirectedConfig = decode_optional(config, "force-directed config")?;
    run_layout(edges, LayoutAlgorithm::ForceDirected(config), seed)
}

/// Compute a random placement layout.
///
/// # Arguments
///
/// * `edges` - Array of edges; each edge points from a child to its parent
/// * `config` - Optional `{edgeLength, separation, density, isConcentric, dimensionality}`
/// * `seed` - Optional seed
///
/// Throws if a node cannot be placed; the message names the parameters to adjust.
#[wasm_bindgen(js_name = randomLayout)]
pub fn random_layout(edges: JsValue, config: JsValue, seed: Option<f64>) -> std::result::Result<JsValue, JsError> {
    let config: RandomPlacementConfig = decode_optional(config, "random placement config")?;
    run_layout(edges, LayoutAlgorithm::RandomPlacement(config), seed)
}

/// Run the force-directed layout and return `{edges, nodes}` for the renderer.
#[wasm_bindgen(js_name = generateGraph)]
pub fn generate_graph(edges: JsValue, config: JsValue, seed: Option<f64>) -> std::result::Result<JsValue, JsError> {
    let edges: Vec<Edge> = decode(edges, "edge list")?;
    let config: ForceDirectedConfig = decode_optional(config, "force-directed config")?;
    let document = layout::generate(edges, &LayoutAlgorithm::ForceDirected(config), resolve_seed(seed))?;
    encode(&document)
}

/// Compute a force-directed layout as a flat Float64Array `[x0, y0, z0, x1, ...]`.
///
/// Node order matches `nodeOrder(edges)`: first appearance in the edge list.
#[wasm_bindgen(js_name = layoutPositions)]
pub fn layout_positions(edges: JsValue, config: JsValue, seed: Option<f64>) -> std::result::Result<Float64Array, JsError> {
    let edges: Vec<Edge> = decode(edges, "edge list")?;
    let config: ForceDirectedConfig = decode_optional(config, "force-directed config")?;
    let graph = graph::GraphModel::from_edges(&edges)?;
    let result = layout::layout(&graph, &LayoutAlgorithm::ForceDirected(config), resolve_seed(seed))?;
    Ok(Float64Array::from(&result.to_flat()[..]))
}

/// Distinct node ids in first-appearance order.
#[wasm_bindgen(js_name = nodeOrder)]
pub fn node_order(edges: JsValue) -> std::result::Result<JsValue, JsError> {
    let edges: Vec<Edge> = decode(edges, "edge list")?;
    let graph = graph::GraphModel::from_edges(&edges)?;
    let ids: Vec<_> = graph.node_ids().map(|id| graph.external_id(id)).collect();
    encode(&ids)
}

// =========================================================================
// JS Conversion
// =========================================================================

fn run_layout(edges: JsValue, algorithm: LayoutAlgorithm, seed: Option<f64>) -> std::result::Result<JsValue, JsError> {
    let edges: Vec<Edge> = decode(edges, "edge list")?;
    let graph = graph::GraphModel::from_edges(&edges)?;
    let result = layout::layout(&graph, &algorithm, resolve_seed(seed))?;
    encode(&result)
}

fn decode<T: DeserializeOwned>(value: JsValue, what: &'static str) -> Result<T> {
    serde_wasm_bindgen::from_value(value).map_err(|err| Error::Decode {
        what,
        message: err.to_string(),
    })
}

/// `undefined` and `null` decode to the default value.
fn decode_optional<T: DeserializeOwned + Default>(value: JsValue, what: &'static str) -> Result<T> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    decode(value, what)
}

fn encode<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|err| JsError::new(&err.to_string()))
}

fn resolve_seed(seed: Option<f64>) -> u64 {
    match seed {
        Some(seed) => seed as u64,
        // Math.random has 53 bits of mantissa to draw from.
        None => (js_sys::Math::random() * (1u64 << 53) as f64) as u64,
    }
}

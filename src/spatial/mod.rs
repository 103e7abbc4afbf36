//! Spatial indexing for collision checks.
//!
//! This module provides an R-tree based spatial index used by the random
//! placement engine to enforce minimum node separation.

mod rtree;

pub use rtree::SpatialIndex;

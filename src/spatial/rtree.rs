//! R-tree index over placed nodes using the rstar crate.
//!
//! Answers the one question rejection sampling keeps asking: is any placed
//! node within a given distance of a candidate point?

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::layout::Position;

/// A placed node in the spatial index. z is 0.0 for planar layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlacedPoint {
    position: Position,
}

impl RTreeObject for PlacedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for PlacedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Spatial index for placed nodes.
///
/// Uses an R*-tree so separation checks stay logarithmic as the layout grows.
pub struct SpatialIndex {
    tree: RTree<PlacedPoint>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Insert a placed node.
    pub fn insert(&mut self, position: Position) {
        self.tree.insert(PlacedPoint { position });
    }

    /// True if any indexed node lies at distance `<= radius` from `position`.
    pub fn any_within(&self, position: &Position, radius: f64) -> bool {
        self.tree
            .locate_within_distance(*position, radius * radius)
            .next()
            .is_some()
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

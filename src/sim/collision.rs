//! Axis-aligned bounding boxes
//!
//! Boxes are plain values built fresh for every comparison.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in canvas coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from a top-left corner and a size
    #[inline]
    pub fn from_top_left(top_left: Vec2, size: Vec2) -> Self {
        Self {
            min: top_left,
            max: top_left + size,
        }
    }

    /// Overlap test. Inclusive: boxes sharing only an edge or corner collide.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Index of the first box in `others` that overlaps `subject`
pub fn first_hit<I>(subject: &Aabb, others: I) -> Option<usize>
where
    I: IntoIterator<Item = Aabb>,
{
    others
        .into_iter()
        .position(|other| subject.intersects(&other))
}

//! Axis-aligned collision geometry
//!
//! The wheel and the stripes are both tested as axis-aligned rectangles in
//! viewport space (y grows downward). The wheel's region is the bounding
//! square of its circle at the currently displayed size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Rect {
    /// Rectangle from its top-left corner and size
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Square of side `side` centered on `center`
    pub fn centered_square(center: Vec2, side: f32) -> Self {
        let half = Vec2::splat(side / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Overlap test. Inclusive: rectangles that share only an edge or a
    /// corner intersect. Separated on either axis means no intersection.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        let separated_x = self.max.x < other.min.x || other.max.x < self.min.x;
        let separated_y = self.max.y < other.min.y || other.max.y < self.min.y;
        !(separated_x || separated_y)
    }
}

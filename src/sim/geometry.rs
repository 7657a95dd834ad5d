//! Canvas geometry
//!
//! The play surface as last reported by the host. Zero size means the host
//! hasn't laid out yet; nothing geometry-dependent happens until it does.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Size and shape of the play surface
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasGeometry {
    pub width: f32,
    pub height: f32,
    /// Round watch face (circular boundary handling)
    pub is_round: bool,
}

impl CanvasGeometry {
    /// Not yet laid out
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
        is_round: false,
    };

    /// Validated geometry; `None` for zero, negative or non-finite sizes
    pub fn new(width: f32, height: f32, is_round: bool) -> Option<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Some(Self {
                width,
                height,
                is_round,
            })
        } else {
            None
        }
    }

    /// True once a non-zero size has been set
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Ground line for runner games
    #[inline]
    pub fn ground_y(&self, ground_ratio: f32) -> f32 {
        self.height * ground_ratio
    }

    /// Boundary radius in round mode
    #[inline]
    pub fn radius(&self) -> f32 {
        self.width * 0.5
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

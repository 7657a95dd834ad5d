//! Screen-edge handling for free-flying entities
//!
//! Rectangular canvases teleport an entity to the opposite edge once it is
//! fully off-screen. Round canvases use the distance from the center instead,
//! so an entity leaving through a "corner" of the bounding square doesn't
//! linger off-screen longer than one leaving through a side.

use glam::Vec2;

use super::geometry::CanvasGeometry;

/// Wrap a center point around the rectangular canvas edges
pub fn wrap_rectangular(pos: Vec2, half_length: f32, geometry: &CanvasGeometry) -> Vec2 {
    let mut pos = pos;
    if pos.x + half_length < 0.0 {
        pos.x = geometry.width;
    } else if pos.x - half_length > geometry.width {
        pos.x = 0.0;
    }
    if pos.y + half_length < 0.0 {
        pos.y = geometry.height;
    } else if pos.y - half_length > geometry.height {
        pos.y = 0.0;
    }
    pos
}

/// Reflect a center point through the canvas center once it leaves the circle
///
/// Triggers when the distance from center exceeds `radius + half_length + 1`.
/// The reflected point keeps its distance from the center, and its velocity
/// (unchanged) now points back into the visible disc.
pub fn wrap_round(pos: Vec2, half_length: f32, geometry: &CanvasGeometry) -> Vec2 {
    let center = geometry.center();
    let distance = (pos - center).length();
    if distance > geometry.radius() + half_length + 1.0 {
        center * 2.0 - pos
    } else {
        pos
    }
}

/// Apply the boundary rule matching the canvas shape
#[inline]
pub fn keep_on_screen(pos: Vec2, half_length: f32, geometry: &CanvasGeometry) -> Vec2 {
    if geometry.is_round {
        wrap_round(pos, half_length, geometry)
    } else {
        wrap_rectangular(pos, half_length, geometry)
    }
}

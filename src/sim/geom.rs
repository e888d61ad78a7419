//! Circle geometry and bounded randomness
//!
//! Every entity is a circle in a square world `[0, world_size]²`.

use glam::Vec2;
use rand::Rng;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Whether two circles overlap. Tangent circles do not.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    distance(a, b) < ra + rb
}

/// Uniform sample in `[min, max)`; returns `min` for an empty range
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Clamp `v` into `[min, max]`
#[inline]
pub fn clamp(v: f32, min: f32, max: f32) -> f32 {
    v.max(min).min(max)
}

/// Clamp a circle centre so the circle stays inside the world
#[inline]
pub fn clamp_to_world(pos: Vec2, radius: f32, world_size: f32) -> Vec2 {
    Vec2::new(
        clamp(pos.x, radius, world_size - radius),
        clamp(pos.y, radius, world_size - radius),
    )
}

/// Whether a point lies inside the world square (edges included)
#[inline]
pub fn in_world(pos: Vec2, world_size: f32) -> bool {
    (0.0..=world_size).contains(&pos.x) && (0.0..=world_size).contains(&pos.y)
}

//! Shared spatial record for every simulated entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable identifier for shapes, enemies and the player
pub type EntityId = u32;

/// Packed `0xRRGGBB` colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const PLAYER: Color = Color(0x00B2E1);
    pub const PIERCING: Color = Color(0x00FFFF);
    pub const SHOCKWAVE: Color = Color(0xFF7700);
}

/// Position, size and deletion mark shared by every entity.
///
/// `deleted` is the only way one system removes another system's entity;
/// collections are compacted after collisions, never during iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub deleted: bool,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32, color: Color) -> Self {
        Self {
            pos,
            radius,
            color,
            deleted: false,
        }
    }

    /// Whether this body overlaps another one
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        super::geom::circles_overlap(self.pos, self.radius, other.pos, other.radius)
    }
}

/// Drop every deleted entry, keeping the survivors' relative order
pub fn compact<T>(items: &mut Vec<T>, body: impl Fn(&T) -> &Body) {
    items.retain(|item| !body(item).deleted);
}

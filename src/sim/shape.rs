//! Passive destructible shapes

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::body::{Body, Color, EntityId};

/// Shape types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Square,
    Triangle,
    Pentagon,
}

/// Fixed stats for a shape kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStats {
    pub radius: f32,
    pub color: Color,
    pub health: f32,
    pub points: u32,
    pub sides: u8,
}

/// Spawn weights out of 100
const SPAWN_WEIGHTS: [(ShapeKind, u32); 3] = [
    (ShapeKind::Square, 70),
    (ShapeKind::Triangle, 25),
    (ShapeKind::Pentagon, 5),
];

impl ShapeKind {
    pub fn stats(self) -> ShapeStats {
        match self {
            ShapeKind::Square => ShapeStats {
                radius: 20.0,
                color: Color(0xFFE869),
                health: 10.0,
                points: 10,
                sides: 4,
            },
            ShapeKind::Triangle => ShapeStats {
                radius: 15.0,
                color: Color(0xFC7676),
                health: 15.0,
                points: 25,
                sides: 3,
            },
            ShapeKind::Pentagon => ShapeStats {
                radius: 25.0,
                color: Color(0x768DFC),
                health: 30.0,
                points: 100,
                sides: 5,
            },
        }
    }

    /// Look up a kind by name; unknown names become squares
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "triangle" => ShapeKind::Triangle,
            "pentagon" => ShapeKind::Pentagon,
            _ => ShapeKind::Square,
        }
    }

    /// Weighted draw: square 70, triangle 25, pentagon 5
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        SPAWN_WEIGHTS
            .choose_weighted(rng, |&(_, weight)| weight)
            .map(|&(kind, _)| kind)
            .unwrap_or_default()
    }
}

/// A shape entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub id: EntityId,
    pub kind: ShapeKind,
    pub body: Body,
    pub health: f32,
    pub max_health: f32,
    pub points: u32,
    pub sides: u8,
}

impl Shape {
    pub fn new(id: EntityId, pos: Vec2, kind: ShapeKind) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            body: Body::new(pos, stats.radius, stats.color),
            health: stats.health,
            max_health: stats.health,
            points: stats.points,
            sides: stats.sides,
        }
    }

    /// Apply damage; returns the shape's points if this destroyed it, else 0
    pub fn apply_damage(&mut self, amount: f32) -> u32 {
        if self.body.deleted {
            return 0;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.body.deleted = true;
            return self.points;
        }
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_by_kind() {
        let s = Shape::new(1, Vec2::new(10.0, 10.0), ShapeKind::Pentagon);
        assert_eq!(s.body.radius, 25.0);
        assert_eq!(s.health, 30.0);
        assert_eq!(s.points, 100);
        assert_eq!(s.sides, 5);
    }

    #[test]
    fn test_unknown_name_falls_back_to_square() {
        assert_eq!(ShapeKind::from_name("hexagon"), ShapeKind::Square);
        assert_eq!(ShapeKind::from_name("Triangle"), ShapeKind::Triangle);
    }

    #[test]
    fn test_damage_without_kill_gives_nothing() {
        let mut s = Shape::new(1, Vec2::ZERO, ShapeKind::Triangle);
        assert_eq!(s.apply_damage(14.0), 0);
        assert!(!s.body.deleted);
        assert_eq!(s.health, 1.0);
    }

    #[test]
    fn test_kill_pays_out_once() {
        let mut s = Shape::new(1, Vec2::ZERO, ShapeKind::Square);
        assert_eq!(s.apply_damage(10.0), 10);
        assert!(s.body.deleted);
        assert_eq!(s.apply_damage(10.0), 0);
    }
}

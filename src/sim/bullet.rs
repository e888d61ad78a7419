//! Ballistic projectiles fired by the player and by enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Color, EntityId};
use crate::consts::{BULLET_MAX_AGE, BULLET_RADIUS};
use crate::heading;

/// Area effect carried by an explosive bullet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosive {
    pub radius: f32,
    pub damage: f32,
}

/// Raised when an explosive bullet reaches the end of its life
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub damage: f32,
}

/// A bullet entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub body: Body,
    /// Travel direction (radians)
    pub angle: f32,
    /// Distance travelled per tick
    pub speed: f32,
    pub damage: f32,
    /// Ticks lived so far
    pub age: u32,
    pub max_age: u32,
    /// Reached `max_age` this tick; still collides, removed once collisions are done
    pub expired: bool,
    pub from_player: bool,
    /// Piercing bullets survive hits and remember whom they hit
    pub piercing: bool,
    pub hit_ids: Vec<EntityId>,
    pub explosive: Option<Explosive>,
}

impl Bullet {
    pub fn new(pos: Vec2, angle: f32, speed: f32, damage: f32, color: Color, from_player: bool) -> Self {
        Self {
            body: Body::new(pos, BULLET_RADIUS, color),
            angle,
            speed,
            damage,
            age: 0,
            max_age: BULLET_MAX_AGE,
            expired: false,
            from_player,
            piercing: false,
            hit_ids: Vec::new(),
            explosive: None,
        }
    }

    /// Move one tick along the heading and age the bullet.
    ///
    /// Returns the explosion to resolve when an explosive bullet expires.
    pub fn advance(&mut self) -> Option<Explosion> {
        self.body.pos += heading(self.angle) * self.speed;
        self.age += 1;
        if self.age >= self.max_age && !self.expired {
            self.expired = true;
            return self.explosive.map(|e| Explosion {
                pos: self.body.pos,
                radius: e.radius,
                damage: e.damage,
            });
        }
        None
    }

    /// Mark an expired bullet for removal
    pub fn retire_if_expired(&mut self) {
        if self.expired {
            self.body.deleted = true;
        }
    }

    /// Whether this bullet already struck `id`. Only piercing bullets remember.
    pub fn has_hit(&self, id: EntityId) -> bool {
        self.piercing && self.hit_ids.contains(&id)
    }

    /// Record a hit: piercing bullets remember the target, others are spent.
    pub fn register_hit(&mut self, id: EntityId) {
        if self.piercing {
            if !self.hit_ids.contains(&id) {
                self.hit_ids.push(id);
            }
        } else {
            self.body.deleted = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullet() -> Bullet {
        Bullet::new(Vec2::new(100.0, 100.0), 0.0, 7.0, 5.0, Color::PLAYER, true)
    }

    #[test]
    fn test_advance_moves_along_heading() {
        let mut b = Bullet::new(Vec2::new(100.0, 100.0), std::f32::consts::FRAC_PI_2, 5.0, 1.0, Color::PLAYER, true);
        b.advance();
        assert!((b.body.pos - Vec2::new(100.0, 105.0)).length() < 1e-4);
        assert_eq!(b.age, 1);
        assert!(!b.body.deleted);
    }

    #[test]
    fn test_expires_at_max_age() {
        let mut b = bullet();
        for _ in 0..BULLET_MAX_AGE - 1 {
            assert!(b.advance().is_none());
        }
        assert!(!b.expired);
        assert!(b.advance().is_none());
        assert!(b.expired);
        // Expiry alone does not spend the bullet
        assert!(!b.body.deleted);
        b.retire_if_expired();
        assert!(b.body.deleted);
    }

    #[test]
    fn test_explosive_expiry_reports_explosion() {
        let mut b = bullet();
        b.max_age = 1;
        b.explosive = Some(Explosive {
            radius: 60.0,
            damage: 4.0,
        });
        let boom = b.advance().expect("explosion");
        assert_eq!(boom.radius, 60.0);
        assert_eq!(boom.pos, b.body.pos);
        // Only once
        assert!(b.advance().is_none());
    }

    #[test]
    fn test_non_piercing_hit_deletes() {
        let mut b = bullet();
        assert!(!b.has_hit(3));
        b.register_hit(3);
        assert!(b.body.deleted);
        assert!(!b.has_hit(3));
    }

    #[test]
    fn test_piercing_hit_is_remembered() {
        let mut b = bullet();
        b.piercing = true;
        b.register_hit(3);
        b.register_hit(3);
        assert!(!b.body.deleted);
        assert!(b.has_hit(3));
        assert!(!b.has_hit(4));
        assert_eq!(b.hit_ids, vec![3]);
    }
}

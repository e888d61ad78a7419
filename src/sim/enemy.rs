//! AI-controlled enemy tanks
//!
//! Behaviour is re-evaluated every tick from the distance to the player:
//! flee when hurt and close, chase when close, wander otherwise.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::body::{Body, Color, EntityId};
use super::bullet::Bullet;
use super::geom::{clamp_to_world, distance};
use crate::consts::*;
use crate::{bearing, heading};

/// Enemy strength class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyTier {
    #[default]
    One,
    Two,
    Three,
}

/// Fixed stats for a tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierStats {
    pub radius: f32,
    pub color: Color,
    pub health: f32,
    pub damage: f32,
    pub speed: f32,
    /// Ticks between shots while chasing
    pub shoot_rate: u32,
    pub points: u32,
}

impl EnemyTier {
    pub fn stats(self) -> TierStats {
        match self {
            EnemyTier::One => TierStats {
                radius: 15.0,
                color: Color(0xF14E54),
                health: 100.0,
                damage: 5.0,
                speed: 2.0,
                shoot_rate: 60,
                points: 250,
            },
            EnemyTier::Two => TierStats {
                radius: 18.0,
                color: Color(0xE67E22),
                health: 200.0,
                damage: 8.0,
                speed: 1.8,
                shoot_rate: 50,
                points: 500,
            },
            EnemyTier::Three => TierStats {
                radius: 20.0,
                color: Color(0x9B59B6),
                health: 300.0,
                damage: 12.0,
                speed: 1.5,
                shoot_rate: 40,
                points: 1000,
            },
        }
    }

    /// Tier from its number; anything unknown is tier 1
    pub fn from_number(n: u8) -> Self {
        match n {
            2 => EnemyTier::Two,
            3 => EnemyTier::Three,
            _ => EnemyTier::One,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            EnemyTier::One => 1,
            EnemyTier::Two => 2,
            EnemyTier::Three => 3,
        }
    }

    /// Level-dependent tier draw
    pub fn random_for_level<R: Rng + ?Sized>(game_level: u32, rng: &mut R) -> Self {
        let weights: &[(EnemyTier, u32)] = match game_level {
            0..=2 => &[(EnemyTier::One, 100)],
            3..=4 => &[(EnemyTier::One, 70), (EnemyTier::Two, 30)],
            _ => &[(EnemyTier::One, 50), (EnemyTier::Two, 30), (EnemyTier::Three, 20)],
        };
        weights
            .choose_weighted(rng, |&(_, weight)| weight)
            .map(|&(tier, _)| tier)
            .unwrap_or_default()
    }
}

/// What the enemy is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Behavior {
    #[default]
    Wander,
    Chase,
    Flee,
}

/// An enemy tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub tier: EnemyTier,
    pub body: Body,
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    pub points: u32,
    /// Barrel direction (radians)
    pub angle: f32,
    pub behavior: Behavior,
    pub target: Vec2,
    pub retarget_counter: u32,
    pub shoot_counter: u32,
    pub shoot_rate: u32,
}

impl Enemy {
    pub fn new(id: EntityId, pos: Vec2, tier: EnemyTier) -> Self {
        let stats = tier.stats();
        Self {
            id,
            tier,
            body: Body::new(pos, stats.radius, stats.color),
            health: stats.health,
            max_health: stats.health,
            damage: stats.damage,
            speed: stats.speed,
            points: stats.points,
            angle: 0.0,
            behavior: Behavior::Wander,
            target: pos,
            retarget_counter: 0,
            shoot_counter: 0,
            shoot_rate: stats.shoot_rate,
        }
    }

    /// Advance AI, movement and shooting by one tick
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        player_pos: Vec2,
        world_size: f32,
        rng: &mut R,
        bullets: &mut Vec<Bullet>,
    ) {
        let dist_to_player = distance(self.body.pos, player_pos);

        if dist_to_player < ENEMY_DETECTION_RADIUS {
            if self.health / self.max_health < ENEMY_FLEE_HEALTH_FRACTION {
                self.behavior = Behavior::Flee;
                let away = (self.body.pos - player_pos).normalize_or_zero();
                self.target = clamp_to_world(
                    self.body.pos + away * ENEMY_FLEE_DISTANCE,
                    self.body.radius,
                    world_size,
                );
            } else {
                self.behavior = Behavior::Chase;
                self.target = player_pos;
            }

            self.angle = bearing(self.body.pos, player_pos);

            if self.behavior == Behavior::Chase {
                self.shoot_counter += 1;
                if self.shoot_counter >= self.shoot_rate {
                    self.shoot_counter = 0;
                    bullets.push(self.shoot(rng));
                }
            }
        } else {
            self.behavior = Behavior::Wander;
            self.retarget_counter += 1;
            if self.retarget_counter >= ENEMY_RETARGET_TICKS
                || distance(self.body.pos, self.target) < ENEMY_RETARGET_DISTANCE
            {
                self.retarget_counter = 0;
                self.choose_wander_target(world_size, rng);
            }
        }

        self.move_toward_target();
        self.body.pos = clamp_to_world(self.body.pos, self.body.radius, world_size);
    }

    /// Pick a point one wander step away at a random bearing
    pub fn choose_wander_target<R: Rng + ?Sized>(&mut self, world_size: f32, rng: &mut R) {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        self.target = clamp_to_world(
            self.body.pos + heading(angle) * ENEMY_WANDER_DISTANCE,
            self.body.radius,
            world_size,
        );
    }

    fn move_toward_target(&mut self) {
        let to_target = self.target - self.body.pos;
        let dist = to_target.length();
        if dist <= ENEMY_ARRIVE_DISTANCE {
            return;
        }
        // Chasers hold position at standoff range
        if self.behavior == Behavior::Chase && dist < ENEMY_STANDOFF_DISTANCE {
            return;
        }
        let speed = if self.behavior == Behavior::Flee {
            self.speed * ENEMY_FLEE_SPEED_MULT
        } else {
            self.speed
        };
        self.body.pos += to_target / dist * speed;
    }

    /// Fire one slightly inaccurate shot from the barrel tip
    fn shoot<R: Rng + ?Sized>(&self, rng: &mut R) -> Bullet {
        let angle = self.angle + rng.random_range(-ENEMY_AIM_JITTER..ENEMY_AIM_JITTER);
        let muzzle = self.body.pos + heading(angle) * (self.body.radius + ENEMY_BARREL_LENGTH);
        Bullet::new(muzzle, angle, ENEMY_BULLET_SPEED, self.damage, self.body.color, false)
    }

    /// Apply damage; returns the enemy's points if this destroyed it, else 0
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
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const WORLD: f32 = 2000.0;

    #[test]
    fn test_tier_table() {
        let e = Enemy::new(1, Vec2::ZERO, EnemyTier::Three);
        assert_eq!(e.health, 300.0);
        assert_eq!(e.shoot_rate, 40);
        assert_eq!(e.points, 1000);
        assert_eq!(EnemyTier::from_number(9), EnemyTier::One);
        assert_eq!(EnemyTier::from_number(2).number(), 2);
    }

    #[test]
    fn test_low_levels_only_spawn_tier_one() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..500 {
            assert_eq!(EnemyTier::random_for_level(2, &mut rng), EnemyTier::One);
        }
        for _ in 0..500 {
            assert_ne!(EnemyTier::random_for_level(4, &mut rng), EnemyTier::Three);
        }
    }

    #[test]
    fn test_chase_faces_player_and_closes_in() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut bullets = Vec::new();
        let mut e = Enemy::new(1, Vec2::new(1000.0, 1000.0), EnemyTier::One);
        let player = Vec2::new(1300.0, 1000.0);

        e.update(player, WORLD, &mut rng, &mut bullets);
        assert_eq!(e.behavior, Behavior::Chase);
        assert!(e.angle.abs() < 1e-6);
        assert!((e.body.pos.x - 1002.0).abs() < 1e-4);
    }

    #[test]
    fn test_chase_holds_standoff_distance() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut bullets = Vec::new();
        let mut e = Enemy::new(1, Vec2::new(1000.0, 1000.0), EnemyTier::One);
        let player = Vec2::new(1100.0, 1000.0);

        e.update(player, WORLD, &mut rng, &mut bullets);
        assert_eq!(e.body.pos, Vec2::new(1000.0, 1000.0));
    }

    #[test]
    fn test_chase_fires_on_shoot_rate() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut bullets = Vec::new();
        let mut e = Enemy::new(1, Vec2::new(1000.0, 1000.0), EnemyTier::One);
        let player = Vec2::new(1100.0, 1000.0);

        for _ in 0..59 {
            e.update(player, WORLD, &mut rng, &mut bullets);
        }
        assert!(bullets.is_empty());
        e.update(player, WORLD, &mut rng, &mut bullets);
        assert_eq!(bullets.len(), 1);

        let b = &bullets[0];
        assert!(!b.from_player);
        assert_eq!(b.damage, 5.0);
        assert_eq!(b.speed, ENEMY_BULLET_SPEED);
        assert!(b.angle.abs() <= ENEMY_AIM_JITTER);
        assert!((distance(b.body.pos, e.body.pos) - 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_flees_when_hurt() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut bullets = Vec::new();
        let mut e = Enemy::new(1, Vec2::new(1000.0, 1000.0), EnemyTier::One);
        e.health = 20.0;
        let player = Vec2::new(1100.0, 1000.0);

        e.update(player, WORLD, &mut rng, &mut bullets);
        assert_eq!(e.behavior, Behavior::Flee);
        assert_eq!(e.target, Vec2::new(800.0, 1000.0));
        assert!((e.body.pos.x - 997.0).abs() < 1e-4);
        assert!(bullets.is_empty());
    }

    #[test]
    fn test_wander_target_within_step() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut bullets = Vec::new();
        let mut e = Enemy::new(1, Vec2::new(1000.0, 1000.0), EnemyTier::Two);

        // Target starts at the spawn point, so the first tick retargets
        e.update(Vec2::new(100.0, 100.0), WORLD, &mut rng, &mut bullets);
        assert_eq!(e.behavior, Behavior::Wander);
        let step = distance(e.target, Vec2::new(1000.0, 1000.0));
        assert!((step - ENEMY_WANDER_DISTANCE).abs() < 1e-2);
    }

    #[test]
    fn test_stays_in_bounds_when_fleeing_into_corner() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut bullets = Vec::new();
        let mut e = Enemy::new(1, Vec2::new(16.0, 16.0), EnemyTier::One);
        e.health = 1.0;
        for _ in 0..50 {
            e.update(Vec2::new(60.0, 60.0), WORLD, &mut rng, &mut bullets);
            assert!(e.body.pos.x >= e.body.radius && e.body.pos.y >= e.body.radius);
        }
    }

    #[test]
    fn test_kill_pays_out_once() {
        let mut e = Enemy::new(1, Vec2::ZERO, EnemyTier::Two);
        assert_eq!(e.apply_damage(199.0), 0);
        assert!(!e.body.deleted);
        assert_eq!(e.apply_damage(1.0), 500);
        assert!(e.body.deleted);
        assert_eq!(e.apply_damage(1.0), 0);
    }
}

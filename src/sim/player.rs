//! The player-controlled tank
//!
//! Movement and aim come from [`Controls`]; weapons depend on the chosen
//! [`TankClass`], which is picked once and never changes afterwards.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, Color, EntityId};
use super::bullet::{Bullet, Explosive};
use super::geom::clamp_to_world;
use super::timers::{TimedAction, Timers};
use crate::consts::*;
use crate::{bearing, heading};

/// Tank specialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TankClass {
    #[default]
    Basic,
    Twin,
    Sniper,
    Machine,
    Destroyer,
}

/// Classes offered by the class menu
pub const SELECTABLE_CLASSES: [TankClass; 4] = [
    TankClass::Twin,
    TankClass::Sniper,
    TankClass::Machine,
    TankClass::Destroyer,
];

impl TankClass {
    pub fn name(self) -> &'static str {
        match self {
            TankClass::Basic => "basic",
            TankClass::Twin => "twin",
            TankClass::Sniper => "sniper",
            TankClass::Machine => "machine",
            TankClass::Destroyer => "destroyer",
        }
    }

    /// Class by name; unknown names resolve to `Basic`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "twin" => TankClass::Twin,
            "sniper" => TankClass::Sniper,
            "machine" | "machine gun" => TankClass::Machine,
            "destroyer" => TankClass::Destroyer,
            _ => TankClass::Basic,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TankClass::Basic => "Single barrel",
            TankClass::Twin => "Fires two bullets at once with slightly reduced damage.",
            TankClass::Sniper => "Long-range precision with increased damage but slower fire rate.",
            TankClass::Machine => "Rapid fire with reduced accuracy and damage.",
            TankClass::Destroyer => "Slow-firing but extremely powerful bullets.",
        }
    }

    pub fn special(self) -> Option<SpecialAbility> {
        match self {
            TankClass::Basic => None,
            TankClass::Twin => Some(SpecialAbility::TwinBlast),
            TankClass::Sniper => Some(SpecialAbility::PiercingShot),
            TankClass::Machine => Some(SpecialAbility::BulletBarrage),
            TankClass::Destroyer => Some(SpecialAbility::Shockwave),
        }
    }
}

/// Class-specific special ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialAbility {
    TwinBlast,
    PiercingShot,
    BulletBarrage,
    Shockwave,
}

impl SpecialAbility {
    pub fn name(self) -> &'static str {
        match self {
            SpecialAbility::TwinBlast => "Twin Blast",
            SpecialAbility::PiercingShot => "Piercing Shot",
            SpecialAbility::BulletBarrage => "Bullet Barrage",
            SpecialAbility::Shockwave => "Shockwave",
        }
    }
}

/// Held movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Player intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub movement: Movement,
    /// Trigger held
    pub shooting: bool,
    /// Pointer in screen space; the camera offset maps it into the world
    pub pointer: Vec2,
}

/// Fire rate while the bullet barrage is active
const BARRAGE_SHOOTING_RATE: u32 = 3;
const TWIN_BARREL_OFFSET: f32 = 4.0;
const MACHINE_SPREAD: f32 = 0.15;
const DESTROYER_BULLET_RADIUS: f32 = 10.0;
const SHOCKWAVE_BULLET_RADIUS: f32 = 8.0;
const EXPLOSIVE_ROUND_RADIUS: f32 = 60.0;

/// The player's tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub body: Body,
    pub speed: f32,
    /// Barrel direction (radians)
    pub angle: f32,
    pub health: f32,
    pub max_health: f32,
    pub score: u64,
    pub level: u32,
    pub experience: u64,
    pub experience_to_next: u64,
    pub controls: Controls,

    // === Weapons ===
    /// Ticks between shots (lower is faster)
    pub shooting_rate: u32,
    pub shooting_cooldown: u32,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    pub bullet_radius_scale: f32,
    pub bullet_lifetime_scale: f32,
    pub spread_scale: f32,
    pub triple_shot: bool,
    pub explosive_rounds: bool,

    // === Class & special ===
    pub class: TankClass,
    pub special: Option<SpecialAbility>,
    pub special_cooldown: f32,
    pub special_max_cooldown: f32,
    /// Temporary fire rate that wins over `shooting_rate`
    pub rate_override: Option<u32>,
    /// Token of the timer that ends the current barrage
    pub barrage_token: Option<u64>,
}

impl Player {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            body: Body::new(pos, PLAYER_RADIUS, Color::PLAYER),
            speed: PLAYER_SPEED,
            angle: 0.0,
            health: PLAYER_HEALTH,
            max_health: PLAYER_HEALTH,
            score: 0,
            level: 1,
            experience: 0,
            experience_to_next: PLAYER_FIRST_LEVEL_XP,
            controls: Controls::default(),
            shooting_rate: PLAYER_SHOOTING_RATE,
            shooting_cooldown: 0,
            bullet_speed: PLAYER_BULLET_SPEED,
            bullet_damage: PLAYER_BULLET_DAMAGE,
            bullet_radius_scale: 1.0,
            bullet_lifetime_scale: 1.0,
            spread_scale: 1.0,
            triple_shot: false,
            explosive_rounds: false,
            class: TankClass::Basic,
            special: None,
            special_cooldown: 0.0,
            special_max_cooldown: SPECIAL_COOLDOWN_TICKS,
            rate_override: None,
            barrage_token: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.body.deleted
    }

    pub fn has_chosen_class(&self) -> bool {
        self.class != TankClass::Basic
    }

    /// Ticks between shots right now
    pub fn effective_shooting_rate(&self) -> u32 {
        self.rate_override.unwrap_or(self.shooting_rate)
    }

    /// Move, aim and cool down for one tick
    pub fn update(&mut self, camera: Vec2, world_size: f32) {
        let m = self.controls.movement;
        let mut dir = Vec2::ZERO;
        if m.up {
            dir.y -= 1.0;
        }
        if m.down {
            dir.y += 1.0;
        }
        if m.left {
            dir.x -= 1.0;
        }
        if m.right {
            dir.x += 1.0;
        }
        // Diagonals move no faster than axes
        self.body.pos += dir.normalize_or_zero() * self.speed;
        self.keep_in_world(world_size);

        let pointer_world = self.controls.pointer + camera;
        self.angle = bearing(self.body.pos, pointer_world);

        self.shooting_cooldown = self.shooting_cooldown.saturating_sub(1);
        if self.special_cooldown > 0.0 {
            self.special_cooldown = (self.special_cooldown - 1.0).max(0.0);
        }
    }

    /// Push the tank back inside the walls for its current radius
    pub fn keep_in_world(&mut self, world_size: f32) {
        self.body.pos = clamp_to_world(self.body.pos, self.body.radius, world_size);
    }

    /// Fire the class weapon if the trigger is held and the gun is ready.
    /// Returns whether anything was fired.
    pub fn try_shoot<R: Rng + ?Sized>(&mut self, rng: &mut R, bullets: &mut Vec<Bullet>) -> bool {
        if !self.controls.shooting || self.shooting_cooldown > 0 {
            return false;
        }
        match self.class {
            TankClass::Basic => self.shoot_basic(bullets),
            TankClass::Twin => self.shoot_twin(bullets),
            TankClass::Sniper => self.shoot_sniper(bullets),
            TankClass::Machine => self.shoot_machine(rng, bullets),
            TankClass::Destroyer => self.shoot_destroyer(bullets),
        }
        self.shooting_cooldown = self.effective_shooting_rate();
        true
    }

    fn muzzle(&self, angle: f32, barrel: f32) -> Vec2 {
        self.body.pos + heading(angle) * (self.body.radius + barrel)
    }

    /// A bullet carrying this player's colour, size and range upgrades
    fn bullet(&self, pos: Vec2, angle: f32, speed: f32, damage: f32) -> Bullet {
        let mut bullet = Bullet::new(pos, angle, speed, damage, self.body.color, true);
        bullet.body.radius *= self.bullet_radius_scale;
        bullet.max_age = (bullet.max_age as f32 * self.bullet_lifetime_scale) as u32;
        bullet
    }

    pub fn shoot_basic(&self, bullets: &mut Vec<Bullet>) {
        let pos = self.muzzle(self.angle, BARREL_LENGTH);
        bullets.push(self.bullet(pos, self.angle, self.bullet_speed, self.bullet_damage));
    }

    /// Two parallel barrels (three with Triple Shot)
    pub fn shoot_twin(&self, bullets: &mut Vec<Bullet>) {
        let perp = Vec2::new(self.angle.sin(), -self.angle.cos());
        let tip = self.muzzle(self.angle, BARREL_LENGTH);
        let offsets: &[f32] = if self.triple_shot {
            &[-TWIN_BARREL_OFFSET, 0.0, TWIN_BARREL_OFFSET]
        } else {
            &[-TWIN_BARREL_OFFSET, TWIN_BARREL_OFFSET]
        };
        for &offset in offsets {
            bullets.push(self.bullet(tip + perp * offset, self.angle, self.bullet_speed, self.bullet_damage));
        }
    }

    pub fn shoot_sniper(&self, bullets: &mut Vec<Bullet>) {
        let pos = self.muzzle(self.angle, SNIPER_BARREL_LENGTH);
        bullets.push(self.bullet(pos, self.angle, self.bullet_speed * 1.5, self.bullet_damage * 2.0));
    }

    pub fn shoot_machine<R: Rng + ?Sized>(&self, rng: &mut R, bullets: &mut Vec<Bullet>) {
        let half = MACHINE_SPREAD * self.spread_scale / 2.0;
        let angle = self.angle + rng.random_range(-half..=half);
        let pos = self.muzzle(angle, BARREL_LENGTH);
        bullets.push(self.bullet(pos, angle, self.bullet_speed * 0.9, self.bullet_damage * 0.7));
    }

    pub fn shoot_destroyer(&self, bullets: &mut Vec<Bullet>) {
        let pos = self.muzzle(self.angle, BARREL_LENGTH);
        let damage = self.bullet_damage * 3.0;
        let mut bullet = self.bullet(pos, self.angle, self.bullet_speed * 0.7, damage);
        bullet.body.radius = DESTROYER_BULLET_RADIUS * self.bullet_radius_scale;
        if self.explosive_rounds {
            bullet.explosive = Some(Explosive {
                radius: EXPLOSIVE_ROUND_RADIUS,
                damage: damage * 0.5,
            });
        }
        bullets.push(bullet);
    }

    /// Trigger the class special if it is ready.
    ///
    /// `now` is the wall clock in seconds; the barrage schedules its own end
    /// `barrage_secs` later on `timers`.
    pub fn activate_special(
        &mut self,
        now: f64,
        barrage_secs: f64,
        timers: &mut Timers,
        bullets: &mut Vec<Bullet>,
    ) -> Option<SpecialAbility> {
        if self.special_cooldown > 0.0 {
            return None;
        }
        let special = self.special?;
        match special {
            SpecialAbility::TwinBlast => self.ring_blast(
                16,
                self.bullet_speed * 1.2,
                self.bullet_damage,
                self.body.color,
                None,
                bullets,
            ),
            SpecialAbility::PiercingShot => {
                let pos = self.muzzle(self.angle, SNIPER_BARREL_LENGTH);
                let mut bullet = self.bullet(pos, self.angle, self.bullet_speed * 2.0, self.bullet_damage * 5.0);
                bullet.body.color = Color::PIERCING;
                bullet.piercing = true;
                bullets.push(bullet);
            }
            SpecialAbility::BulletBarrage => {
                if let Some(stale) = self.barrage_token.take() {
                    timers.cancel(stale);
                }
                self.rate_override = Some(BARRAGE_SHOOTING_RATE);
                let token = timers.schedule(now + barrage_secs, TimedAction::EndBarrage { player: self.id });
                self.barrage_token = Some(token);
            }
            SpecialAbility::Shockwave => self.ring_blast(
                24,
                self.bullet_speed * 1.2,
                self.bullet_damage * 2.0,
                Color::SHOCKWAVE,
                Some(SHOCKWAVE_BULLET_RADIUS),
                bullets,
            ),
        }
        self.special_cooldown = self.special_max_cooldown;
        Some(special)
    }

    /// Evenly spaced bullets all around the tank
    fn ring_blast(
        &self,
        count: u32,
        speed: f32,
        damage: f32,
        color: Color,
        radius: Option<f32>,
        bullets: &mut Vec<Bullet>,
    ) {
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let pos = self.muzzle(angle, BARREL_LENGTH);
            let mut bullet = self.bullet(pos, angle, speed, damage);
            bullet.body.color = color;
            if let Some(r) = radius {
                bullet.body.radius = r * self.bullet_radius_scale;
            }
            bullets.push(bullet);
        }
    }

    /// End the barrage started under `token`. Stale tokens are ignored.
    pub fn end_barrage(&mut self, token: u64) -> bool {
        if self.barrage_token != Some(token) {
            return false;
        }
        self.barrage_token = None;
        self.rate_override = None;
        true
    }

    /// Pick a class. Only the first real class choice sticks.
    pub fn set_tank_class(&mut self, class: TankClass) -> bool {
        if self.has_chosen_class() || class == TankClass::Basic {
            return false;
        }
        match class {
            TankClass::Twin => {
                self.shooting_rate = 15;
                self.bullet_damage *= 0.8;
            }
            TankClass::Sniper => {
                self.shooting_rate = 50;
                self.bullet_speed *= 1.5;
                self.bullet_damage *= 1.5;
            }
            TankClass::Machine => {
                self.shooting_rate = 7;
                self.bullet_damage *= 0.6;
                self.bullet_speed *= 0.8;
            }
            TankClass::Destroyer => {
                self.shooting_rate = 60;
                self.bullet_damage *= 2.5;
                self.bullet_speed *= 0.7;
            }
            TankClass::Basic => {}
        }
        self.class = class;
        self.special = class.special();
        true
    }

    /// Add points to score and experience. Returns whether the player leveled up.
    pub fn add_score(&mut self, points: u32) -> bool {
        self.score += u64::from(points);
        self.experience += u64::from(points);
        if self.experience >= self.experience_to_next {
            self.level_up();
            return true;
        }
        false
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.experience -= self.experience_to_next;
        self.experience_to_next = self.experience_to_next * 3 / 2;

        self.max_health += 10.0;
        self.health = self.max_health;
        self.body.radius += 1.0;
        self.bullet_damage += 1.0;
    }

    /// Apply damage; returns true if this killed the player
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.body.deleted {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.body.deleted = true;
            return true;
        }
        false
    }

    /// Special cooldown progress in `[0, 1]` (1 = ready)
    pub fn special_readiness(&self) -> f32 {
        if self.special_max_cooldown <= 0.0 {
            return 1.0;
        }
        (1.0 - self.special_cooldown / self.special_max_cooldown).clamp(0.0, 1.0)
    }
}

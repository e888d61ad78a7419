//! Tank Arena - simulation core for a 2D arena tank shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, leveling)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, menus and input devices live outside this crate. They read
//! [`sim::Snapshot`] and feed [`sim::TickInput`] plus the menu commands on
//! [`sim::GameState`].

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (all speeds are expressed per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default side length of the square world
    pub const WORLD_SIZE: f32 = 2000.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_HEALTH: f32 = 100.0;
    pub const PLAYER_SHOOTING_RATE: u32 = 20;
    pub const PLAYER_BULLET_SPEED: f32 = 7.0;
    pub const PLAYER_BULLET_DAMAGE: f32 = 5.0;
    pub const PLAYER_FIRST_LEVEL_XP: u64 = 100;
    /// Special ability cooldown (5 seconds at 60 Hz)
    pub const SPECIAL_COOLDOWN_TICKS: f32 = 300.0;
    /// Distance from tank centre to barrel tip, on top of the tank radius
    pub const BARREL_LENGTH: f32 = 15.0;
    pub const SNIPER_BARREL_LENGTH: f32 = 25.0;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const BULLET_MAX_AGE: u32 = 100;

    /// Enemy AI
    pub const ENEMY_DETECTION_RADIUS: f32 = 400.0;
    pub const ENEMY_FLEE_HEALTH_FRACTION: f32 = 0.3;
    pub const ENEMY_RETARGET_TICKS: u32 = 120;
    pub const ENEMY_WANDER_DISTANCE: f32 = 200.0;
    pub const ENEMY_FLEE_DISTANCE: f32 = 200.0;
    pub const ENEMY_FLEE_SPEED_MULT: f32 = 1.5;
    pub const ENEMY_STANDOFF_DISTANCE: f32 = 150.0;
    pub const ENEMY_ARRIVE_DISTANCE: f32 = 5.0;
    pub const ENEMY_RETARGET_DISTANCE: f32 = 10.0;
    pub const ENEMY_BULLET_SPEED: f32 = 5.0;
    pub const ENEMY_BARREL_LENGTH: f32 = 10.0;
    /// Half-width of the enemy aim jitter (radians)
    pub const ENEMY_AIM_JITTER: f32 = 0.1;
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the ray from `from` towards `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

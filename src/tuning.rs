//! Data-driven game balance
//!
//! Spawn rates, caps, level thresholds and world dimensions. Loaded from a
//! JSON file by the binary; every field falls back to its default when absent.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::WORLD_SIZE;

/// Errors raised while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

/// Balance knobs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Side length of the square world
    pub world_size: f32,
    /// Viewport size used to centre the camera on the player
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Shapes ===
    pub max_shapes: usize,
    /// Per-tick chance of a shape spawn attempt
    pub shape_spawn_rate: f64,
    /// Shapes never spawn closer than this to the player
    pub shape_spawn_clearance: f32,
    /// Spawn points keep this distance from the world edge
    pub spawn_margin: f32,

    // === Enemies ===
    pub max_enemies: usize,
    /// Per-tick chance of an enemy spawn
    pub enemy_spawn_rate: f64,
    /// Enemies never spawn closer than this to the player
    pub enemy_spawn_distance: f32,
    /// Resampling cap for enemy spawn points
    pub enemy_spawn_attempts: u32,

    // === Progression ===
    /// Cumulative score needed to enter game level `i + 1`
    pub score_thresholds: Vec<u64>,
    /// Player level at which the class menu replaces upgrades
    pub class_unlock_level: u32,
    /// Upgrades offered per level-up
    pub upgrades_offered: usize,
    /// Real-time length of the machine gun barrage
    pub barrage_duration_secs: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_size: WORLD_SIZE,
            viewport_width: 1280.0,
            viewport_height: 720.0,

            max_shapes: 100,
            shape_spawn_rate: 0.01,
            shape_spawn_clearance: 200.0,
            spawn_margin: 50.0,

            max_enemies: 10,
            enemy_spawn_rate: 0.002,
            enemy_spawn_distance: 800.0,
            enemy_spawn_attempts: 64,

            score_thresholds: vec![0, 1000, 3000, 7000, 15000],
            class_unlock_level: 10,
            upgrades_offered: 3,
            barrage_duration_secs: 3.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Highest reachable game level
    pub fn max_game_level(&self) -> u32 {
        self.score_thresholds.len() as u32
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.world_size > 0.0) {
            return Err(TuningError::Invalid("world_size must be positive"));
        }
        if self.spawn_margin < 0.0 || self.spawn_margin * 2.0 >= self.world_size {
            return Err(TuningError::Invalid("spawn_margin leaves no room to spawn"));
        }
        if !(0.0..=1.0).contains(&self.shape_spawn_rate)
            || !(0.0..=1.0).contains(&self.enemy_spawn_rate)
        {
            return Err(TuningError::Invalid("spawn rates must be between 0.0 and 1.0"));
        }
        if self.score_thresholds.is_empty() {
            return Err(TuningError::Invalid("score_thresholds must not be empty"));
        }
        if self.score_thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TuningError::Invalid("score_thresholds must be strictly ascending"));
        }
        if self.enemy_spawn_distance >= self.world_size * std::f32::consts::SQRT_2 {
            return Err(TuningError::Invalid(
                "enemy_spawn_distance must be smaller than the world diagonal",
            ));
        }
        if self.enemy_spawn_attempts == 0 {
            return Err(TuningError::Invalid("enemy_spawn_attempts must be non-zero"));
        }
        if self.barrage_duration_secs < 0.0 {
            return Err(TuningError::Invalid("barrage_duration_secs must not be negative"));
        }
        Ok(())
    }
}

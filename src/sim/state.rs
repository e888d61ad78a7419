//! Game state and core simulation types
//!
//! Owns every entity collection, the RNG, the phase machine, spawning and the
//! upgrade/class menus.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::EntityId;
use super::bullet::{Bullet, Explosion};
use super::enemy::{Enemy, EnemyTier};
use super::geom::{distance, uniform};
use super::player::{Player, SELECTABLE_CLASSES, SpecialAbility, TankClass};
use super::shape::{Shape, ShapeKind};
use super::timers::Timers;
use super::upgrade::Upgrade;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Paused by the player
    Paused,
    /// Level-up menu offering upgrades
    UpgradeSelect,
    /// Level-up menu offering the one-time class choice
    ClassSelect,
    /// Player died; waiting for restart
    GameOver,
}

/// Things that happened during a tick, for audio and effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShapeDestroyed { id: EntityId, kind: ShapeKind, pos: Vec2 },
    EnemyDestroyed { id: EntityId, tier: EnemyTier, pos: Vec2 },
    PlayerHit { damage: f32, health: f32 },
    PlayerLeveledUp { level: u32 },
    GameLeveledUp { level: u32 },
    SpecialActivated { ability: SpecialAbility },
    BarrageEnded,
    Explosion(Explosion),
    GameOver { score: u64 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter (running ticks only)
    pub time_ticks: u64,
    /// Wall clock in seconds, advanced by every `tick` call
    pub clock: f64,
    /// World-wide progress counter driven by score thresholds
    pub game_level: u32,
    /// Earned by killing enemies, spent on upgrades
    pub upgrade_points: u32,
    /// Top-left of the viewport in world space
    pub camera: Vec2,
    pub player: Player,
    pub shapes: Vec<Shape>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    /// Upgrades on offer while in `UpgradeSelect`
    pub offered_upgrades: Vec<Upgrade>,
    pub timers: Timers,
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: EntityId,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game and populate the world
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self::empty(seed, tuning);
        state.populate();
        log::info!(
            "New game (seed {}): {} shapes, {} enemies",
            seed,
            state.shapes.len(),
            state.enemies.len()
        );
        state
    }

    /// A world holding only the player at its centre
    pub fn empty(seed: u64, tuning: Tuning) -> Self {
        let center = Vec2::splat(tuning.world_size / 2.0);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Running,
            time_ticks: 0,
            clock: 0.0,
            game_level: 1,
            upgrade_points: 0,
            camera: Vec2::ZERO,
            player: Player::new(0, center),
            shapes: Vec::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            offered_upgrades: Vec::new(),
            timers: Timers::default(),
            events: Vec::new(),
            next_id: 1,
        };
        state.player.id = state.next_entity_id();
        state.update_camera();
        state
    }

    /// Initial shapes and enemies for a fresh run
    fn populate(&mut self) {
        for _ in 0..self.tuning.max_shapes / 2 {
            self.spawn_random_shape();
        }
        let enemies = (self.game_level as usize + 1).min(self.tuning.max_enemies / 2);
        for _ in 0..enemies {
            self.spawn_enemy();
        }
    }

    /// Throw everything away and start over from a fresh seed
    pub fn restart(&mut self) {
        let seed = self.rng.random();
        log::info!("Restarting (final score {})", self.player.score);
        *self = Self::with_tuning(seed, self.tuning.clone());
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Centre the viewport on the player
    pub fn update_camera(&mut self) {
        self.camera = self.player.body.pos
            - Vec2::new(self.tuning.viewport_width, self.tuning.viewport_height) / 2.0;
    }

    /// Uniform point inside the spawn margin
    fn random_spawn_point(&mut self) -> Vec2 {
        let lo = self.tuning.spawn_margin;
        let hi = self.tuning.world_size - self.tuning.spawn_margin;
        Vec2::new(uniform(&mut self.rng, lo, hi), uniform(&mut self.rng, lo, hi))
    }

    /// One shape spawn attempt at a random point. No retry on rejection.
    pub fn spawn_random_shape(&mut self) -> Option<EntityId> {
        if self.shapes.len() >= self.tuning.max_shapes {
            return None;
        }
        let pos = self.random_spawn_point();
        self.spawn_shape_at(pos)
    }

    /// Place a random shape at `pos` unless it is too close to the player
    pub fn spawn_shape_at(&mut self, pos: Vec2) -> Option<EntityId> {
        if self.shapes.len() >= self.tuning.max_shapes {
            return None;
        }
        if distance(pos, self.player.body.pos) < self.tuning.shape_spawn_clearance {
            return None;
        }
        let kind = ShapeKind::random(&mut self.rng);
        let id = self.next_entity_id();
        self.shapes.push(Shape::new(id, pos, kind));
        log::debug!("Spawned {:?} {} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
        Some(id)
    }

    /// Spawn one enemy far enough from the player, tier chosen by game level
    pub fn spawn_enemy(&mut self) -> Option<EntityId> {
        if self.enemies.len() >= self.tuning.max_enemies {
            return None;
        }
        let player_pos = self.player.body.pos;
        let mut spot = None;
        for _ in 0..self.tuning.enemy_spawn_attempts {
            let candidate = self.random_spawn_point();
            if distance(candidate, player_pos) >= self.tuning.enemy_spawn_distance {
                spot = Some(candidate);
                break;
            }
        }
        let Some(pos) = spot else {
            log::debug!("No enemy spawn point far enough from the player");
            return None;
        };

        let tier = EnemyTier::random_for_level(self.game_level, &mut self.rng);
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, pos, tier));
        log::debug!("Spawned tier {} enemy {} at ({:.0}, {:.0})", tier.number(), id, pos.x, pos.y);
        Some(id)
    }

    /// Per-tick Bernoulli spawn trials for shapes and enemies
    pub fn spawn_tick(&mut self) {
        if self.rng.random_bool(self.tuning.shape_spawn_rate.clamp(0.0, 1.0)) {
            self.spawn_random_shape();
        }
        if self.rng.random_bool(self.tuning.enemy_spawn_rate.clamp(0.0, 1.0)) {
            self.spawn_enemy();
        }
    }

    /// Enter the next game level once the score crosses its threshold
    pub fn check_level_progress(&mut self) {
        if self.game_level >= self.tuning.max_game_level() {
            return;
        }
        let threshold = self.tuning.score_thresholds[self.game_level as usize];
        if self.player.score >= threshold {
            self.game_level += 1;
            log::info!("Game level {} (score {})", self.game_level, self.player.score);
            self.events.push(GameEvent::GameLeveledUp {
                level: self.game_level,
            });
            self.open_level_menu();
        }
    }

    /// Open the class menu if a class is due, otherwise the upgrade menu
    fn open_level_menu(&mut self) {
        if !self.player.has_chosen_class() && self.player.level >= self.tuning.class_unlock_level {
            self.offered_upgrades.clear();
            self.phase = GamePhase::ClassSelect;
        } else {
            self.offered_upgrades = Upgrade::draw(self.player.class, self.tuning.upgrades_offered, &mut self.rng);
            self.phase = GamePhase::UpgradeSelect;
        }
    }

    /// Upgrades currently offered, as (name, description)
    pub fn available_upgrades(&self) -> Vec<(&'static str, &'static str)> {
        if self.phase != GamePhase::UpgradeSelect {
            return Vec::new();
        }
        self.offered_upgrades
            .iter()
            .map(|u| (u.name(), u.description()))
            .collect()
    }

    /// Classes currently offered
    pub fn available_classes(&self) -> &'static [TankClass] {
        if self.phase == GamePhase::ClassSelect {
            &SELECTABLE_CLASSES
        } else {
            &[]
        }
    }

    /// Pick an offered upgrade and close the menu.
    ///
    /// Out-of-range indices leave the menu open. With no upgrade points the
    /// menu closes without changing anything. Returns whether an upgrade was
    /// applied.
    pub fn apply_upgrade(&mut self, index: usize) -> bool {
        if self.phase != GamePhase::UpgradeSelect {
            return false;
        }
        let Some(&upgrade) = self.offered_upgrades.get(index) else {
            return false;
        };
        let applied = if self.upgrade_points > 0 {
            upgrade.apply(&mut self.player);
            self.player.keep_in_world(self.tuning.world_size);
            self.upgrade_points -= 1;
            log::info!("Applied upgrade {} ({} points left)", upgrade.name(), self.upgrade_points);
            true
        } else {
            false
        };
        self.offered_upgrades.clear();
        self.phase = GamePhase::Running;
        applied
    }

    /// Choose the tank class from the class menu. Unknown names do nothing.
    pub fn set_tank_class(&mut self, name: &str) -> bool {
        if self.phase != GamePhase::ClassSelect {
            return false;
        }
        let class = TankClass::from_name(name);
        if !self.player.set_tank_class(class) {
            return false;
        }
        log::info!("Tank class chosen: {}", class.name());
        self.phase = GamePhase::Running;
        true
    }

    /// Flip between running and paused; menus and game over ignore it
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            other => other,
        };
    }

    /// Take all events produced since the last tick started
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

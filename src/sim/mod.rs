//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod body;
pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod geom;
pub mod player;
pub mod shape;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timers;
pub mod upgrade;

pub use body::{Body, Color, EntityId};
pub use bullet::{Bullet, Explosion, Explosive};
pub use collision::{HitTally, collide_bullet, resolve_bullet_collisions};
pub use enemy::{Behavior, Enemy, EnemyTier};
pub use player::{Controls, Movement, Player, SELECTABLE_CLASSES, SpecialAbility, TankClass};
pub use shape::{Shape, ShapeKind};
pub use snapshot::{EntityKind, EntitySnapshot, MenuOption, Snapshot};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use timers::{TimedAction, Timers};
pub use upgrade::Upgrade;

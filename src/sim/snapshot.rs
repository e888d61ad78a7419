//! Render-facing view of the world
//!
//! A flat, serializable copy of everything a renderer or HUD needs for one
//! frame. Building it never mutates the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, EntityId};
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Shape,
    Enemy,
    Bullet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: Option<EntityId>,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
    /// Health fraction in `[0, 1]`; bullets are always full
    pub health_ratio: f32,
    /// Barrel or travel direction (radians)
    pub facing: f32,
    /// Polygon side count for shapes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sides: Option<u8>,
}

impl EntitySnapshot {
    fn from_body(id: Option<EntityId>, kind: EntityKind, body: &Body, health_ratio: f32, facing: f32) -> Self {
        Self {
            id,
            kind,
            pos: body.pos,
            radius: body.radius,
            color: body.color.0,
            health_ratio: health_ratio.clamp(0.0, 1.0),
            facing,
            sides: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuOption {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub camera: Vec2,
    pub world_size: f32,
    pub score: u64,
    pub player_level: u32,
    pub game_level: u32,
    pub upgrade_points: u32,
    pub tank_class: String,
    /// Special cooldown progress, 1 when ready
    pub special_readiness: f32,
    pub entities: Vec<EntitySnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub offered_upgrades: Vec<MenuOption>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub offered_classes: Vec<MenuOption>,
}

fn ratio(health: f32, max: f32) -> f32 {
    if max > 0.0 { health / max } else { 0.0 }
}

impl GameState {
    /// Capture the current frame for rendering
    pub fn snapshot(&self) -> Snapshot {
        let mut entities =
            Vec::with_capacity(1 + self.shapes.len() + self.enemies.len() + self.bullets.len());

        for shape in self.shapes.iter().filter(|s| !s.body.deleted) {
            let mut snap = EntitySnapshot::from_body(
                Some(shape.id),
                EntityKind::Shape,
                &shape.body,
                ratio(shape.health, shape.max_health),
                0.0,
            );
            snap.sides = Some(shape.sides);
            entities.push(snap);
        }
        for enemy in self.enemies.iter().filter(|e| !e.body.deleted) {
            entities.push(EntitySnapshot::from_body(
                Some(enemy.id),
                EntityKind::Enemy,
                &enemy.body,
                ratio(enemy.health, enemy.max_health),
                enemy.angle,
            ));
        }
        for bullet in self.bullets.iter().filter(|b| !b.body.deleted) {
            entities.push(EntitySnapshot::from_body(None, EntityKind::Bullet, &bullet.body, 1.0, bullet.angle));
        }
        // Player last so it draws on top
        entities.push(EntitySnapshot::from_body(
            Some(self.player.id),
            EntityKind::Player,
            &self.player.body,
            ratio(self.player.health, self.player.max_health),
            self.player.angle,
        ));

        Snapshot {
            tick: self.time_ticks,
            phase: self.phase,
            camera: self.camera,
            world_size: self.tuning.world_size,
            score: self.player.score,
            player_level: self.player.level,
            game_level: self.game_level,
            upgrade_points: self.upgrade_points,
            tank_class: self.player.class.name().to_string(),
            special_readiness: self.player.special_readiness(),
            entities,
            offered_upgrades: self
                .available_upgrades()
                .into_iter()
                .map(|(name, description)| MenuOption {
                    name: name.to_string(),
                    description: description.to_string(),
                })
                .collect(),
            offered_classes: self
                .available_classes()
                .iter()
                .map(|class| MenuOption {
                    name: class.name().to_string(),
                    description: class.description().to_string(),
                })
                .collect(),
        }
    }
}

//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation one step.

use super::body::compact;
use super::collision::resolve_bullet_collisions;
use super::player::Controls;
use super::state::{GameEvent, GamePhase, GameState};
use super::timers::TimedAction;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys, trigger and pointer position
    pub controls: Controls,
    /// Activate the class special (edge-triggered)
    pub special: bool,
    /// Pause toggle (edge-triggered)
    pub pause: bool,
}

/// Advance the game by one step.
///
/// `dt` is the real time (seconds) this step stands for; it drives the wall
/// clock for deferred actions even when the game is not running.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.clock += f64::from(dt);
    run_due_timers(state);

    // Handle pause toggle
    if input.pause {
        state.toggle_pause();
    }

    // Menus, pause and game over freeze the world
    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;

    // Camera follows the player's position from the previous tick
    state.update_camera();

    state.player.controls = input.controls;
    let world_size = state.tuning.world_size;
    state.player.update(state.camera, world_size);
    state.player.try_shoot(&mut state.rng, &mut state.bullets);

    if input.special {
        let now = state.clock;
        let barrage_secs = state.tuning.barrage_duration_secs;
        if let Some(ability) =
            state
                .player
                .activate_special(now, barrage_secs, &mut state.timers, &mut state.bullets)
        {
            log::debug!("Special activated: {}", ability.name());
            state.events.push(GameEvent::SpecialActivated { ability });
        }
    }

    let player_pos = state.player.body.pos;
    for enemy in &mut state.enemies {
        enemy.update(player_pos, world_size, &mut state.rng, &mut state.bullets);
    }

    state.spawn_tick();

    for bullet in &mut state.bullets {
        if bullet.body.deleted {
            continue;
        }
        if let Some(explosion) = bullet.advance() {
            // Area damage is not applied; the event is for effects only
            state.events.push(GameEvent::Explosion(explosion));
        }
    }

    // Bullets still hit on their last tick of life
    resolve_bullet_collisions(state);
    for bullet in &mut state.bullets {
        bullet.retire_if_expired();
    }

    // Level-ups grow the tank after movement was clamped
    state.player.keep_in_world(world_size);

    compact(&mut state.shapes, |s| &s.body);
    compact(&mut state.enemies, |e| &e.body);
    compact(&mut state.bullets, |b| &b.body);

    if state.phase == GamePhase::Running {
        state.check_level_progress();
    }
}

/// Fire every deferred action whose deadline has passed
fn run_due_timers(state: &mut GameState) {
    for task in state.timers.take_due(state.clock) {
        match task.action {
            TimedAction::EndBarrage { player } => {
                if player == state.player.id && state.player.end_barrage(task.token) {
                    log::debug!("Barrage ended at {:.2}s", state.clock);
                    state.events.push(GameEvent::BarrageEnded);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::body::Color;
    use crate::sim::bullet::{Bullet, Explosion};
    use crate::sim::player::TankClass;
    use crate::sim::shape::{Shape, ShapeKind};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn quiet() -> Tuning {
        Tuning {
            shape_spawn_rate: 0.0,
            enemy_spawn_rate: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::empty(12345, quiet());
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        // Nothing moves while paused
        let mut held = TickInput::default();
        held.controls.movement.right = true;
        let before = state.player.body.pos;
        tick(&mut state, &held, SIM_DT);
        assert_eq!(state.player.body.pos, before);
        assert_eq!(state.time_ticks, 0);

        // Unpause
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
        tick(&mut state, &held, SIM_DT);
        assert!(state.player.body.pos.x > before.x);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let mut input = TickInput::default();
        input.controls.shooting = true;
        input.controls.movement.up = true;
        input.controls.pointer = glam::Vec2::new(900.0, 100.0);

        for _ in 0..600 {
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.bullets.len(), state2.bullets.len());
        assert_eq!(state1.shapes.len(), state2.shapes.len());
        assert_eq!(state1.player.score, state2.player.score);
        assert_eq!(state1.player.body.pos, state2.player.body.pos);
    }

    #[test]
    fn test_deleted_bullets_are_compacted() {
        let mut state = GameState::empty(1, quiet());
        let mut input = TickInput::default();
        input.controls.shooting = true;
        for _ in 0..200 {
            tick(&mut state, &input, SIM_DT);
        }
        // One shot every 20 ticks, each living 100 ticks
        assert!(state.bullets.len() <= 6);
        assert!(state.bullets.iter().all(|b| !b.body.deleted));
    }

    #[test]
    fn test_barrage_ends_on_wall_clock_even_when_paused() {
        let mut state = GameState::empty(1, quiet());
        state.player.set_tank_class(TankClass::Machine);

        let special = TickInput {
            special: true,
            ..Default::default()
        };
        tick(&mut state, &special, SIM_DT);
        assert_eq!(state.player.effective_shooting_rate(), 3);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        // Three seconds of paused frames
        for _ in 0..180 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.player.effective_shooting_rate(), 7);
        assert!(state.player.barrage_token.is_none());
    }

    #[test]
    fn test_special_ignored_while_paused() {
        let mut state = GameState::empty(1, quiet());
        state.player.set_tank_class(TankClass::Twin);
        state.phase = GamePhase::Paused;
        let special = TickInput {
            special: true,
            ..Default::default()
        };
        tick(&mut state, &special, SIM_DT);
        assert!(state.bullets.is_empty());
        assert_eq!(state.player.special_cooldown, 0.0);
    }

    /// Square at `pos` with a motionless player bullet sitting on it
    fn square_under_fire(state: &mut GameState, pos: Vec2, max_age: u32) {
        let id = state.next_entity_id();
        state.shapes.push(Shape::new(id, pos, ShapeKind::Square));
        let mut bullet = Bullet::new(pos, 0.0, 0.0, 50.0, Color::PLAYER, true);
        bullet.max_age = max_age;
        state.bullets.push(bullet);
    }

    #[test]
    fn test_bullet_hits_on_its_last_tick() {
        let mut state = GameState::empty(1, quiet());
        square_under_fire(&mut state, Vec2::new(300.0, 300.0), 1);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.shapes.is_empty());
        assert_eq!(state.player.score, 10);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_level_up_at_wall_stays_in_bounds() {
        let mut state = GameState::empty(1, quiet());
        state.player.body.pos = Vec2::splat(15.0);
        state.player.experience = 95;
        square_under_fire(&mut state, Vec2::new(300.0, 300.0), 100);

        let mut input = TickInput::default();
        input.controls.movement.up = true;
        input.controls.movement.left = true;
        tick(&mut state, &input, SIM_DT);

        let body = &state.player.body;
        assert_eq!(state.player.level, 2);
        assert_eq!(body.radius, 16.0);
        assert_eq!(body.pos, Vec2::splat(16.0));
    }

    #[test]
    fn test_explosive_round_reports_explosion_on_expiry() {
        let mut state = GameState::empty(1, quiet());
        state.player.set_tank_class(TankClass::Destroyer);
        state.player.explosive_rounds = true;

        let mut fire = TickInput::default();
        fire.controls.shooting = true;
        tick(&mut state, &fire, SIM_DT);
        assert_eq!(state.bullets.len(), 1);
        let shot_damage = state.bullets[0].damage;

        let mut explosions: Vec<Explosion> = Vec::new();
        for _ in 0..150 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            explosions.extend(state.events.iter().filter_map(|e| match e {
                GameEvent::Explosion(boom) => Some(*boom),
                _ => None,
            }));
        }
        assert_eq!(explosions.len(), 1);
        assert_eq!(explosions[0].radius, 60.0);
        assert_eq!(explosions[0].damage, shot_damage * 0.5);
        assert!(state.bullets.is_empty());
    }
}

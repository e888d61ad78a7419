//! Tank Arena headless driver
//!
//! Runs the simulation with a scripted autopilot at a fixed timestep and
//! prints the final frame as JSON.
//!
//! Usage: `tank-arena [tuning.json] [seconds] [seed]`

use glam::Vec2;

use tank_arena::Tuning;
use tank_arena::consts::*;
use tank_arena::sim::{GamePhase, GameState, TickInput, tick};

/// Simulated display refresh; deliberately off the sim rate
const FRAME_DT: f32 = 1.0 / 50.0;
const DEFAULT_SECONDS: f32 = 120.0;

/// Driver holding the state and the fixed-step accumulator
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
}

impl Game {
    fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::with_tuning(seed, tuning),
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    /// Advance by one rendered frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.steer();
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.special = false;
            self.input.pause = false;

            for event in self.state.drain_events() {
                log::trace!("{:?}", event);
            }
            self.handle_menus();
        }
    }

    /// Aim at the nearest target and keep a comfortable distance
    fn steer(&mut self) {
        let state = &self.state;
        let me = state.player.body.pos;
        let target = state
            .enemies
            .iter()
            .map(|e| e.body.pos)
            .chain(state.shapes.iter().map(|s| s.body.pos))
            .min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)));

        let controls = &mut self.input.controls;
        controls.movement = Default::default();
        let Some(target) = target else {
            controls.shooting = false;
            return;
        };

        controls.pointer = target - state.camera;
        controls.shooting = true;

        let gap = target - me;
        let dist = gap.length();
        let dir = if dist > 250.0 {
            gap
        } else if dist < 120.0 {
            -gap
        } else {
            Vec2::ZERO
        };
        controls.movement.right = dir.x > 1.0;
        controls.movement.left = dir.x < -1.0;
        controls.movement.down = dir.y > 1.0;
        controls.movement.up = dir.y < -1.0;

        self.input.special = state.player.special.is_some() && state.player.special_readiness() >= 1.0;
    }

    /// Always take the first upgrade; go sniper when the class menu opens
    fn handle_menus(&mut self) {
        match self.state.phase {
            GamePhase::UpgradeSelect => {
                self.state.apply_upgrade(0);
            }
            GamePhase::ClassSelect => {
                self.state.set_tank_class("sniper");
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Tank Arena (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load(&path).unwrap_or_else(|e| {
            log::warn!("Failed to load tuning from {}: {}; using defaults", path, e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SECONDS);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random);

    let mut game = Game::new(seed, tuning);
    let frames = (seconds / FRAME_DT) as u32;
    for _ in 0..frames {
        game.update(FRAME_DT);
        if game.state.phase == GamePhase::GameOver {
            break;
        }
    }

    let state = &game.state;
    log::info!(
        "Finished after {} ticks: score {}, level {}, class {}",
        state.time_ticks,
        state.player.score,
        state.player.level,
        state.player.class.name()
    );

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

//! Bullet collision resolution
//!
//! Brute force: every live bullet against every shape, enemy and the player.
//! Nothing is removed here; hits only set `deleted` marks, and the tick
//! compacts collections afterwards.

use super::bullet::Bullet;
use super::enemy::Enemy;
use super::geom::in_world;
use super::player::Player;
use super::shape::Shape;
use super::state::{GameEvent, GamePhase, GameState};

/// What a single bullet did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitTally {
    /// Points credited to the player (already added to the score)
    pub points: u32,
    /// Enemies killed (one upgrade point each)
    pub kills: u32,
    /// Whether the player died
    pub player_died: bool,
}

/// Resolve every bullet against the world and apply the consequences
pub fn resolve_bullet_collisions(state: &mut GameState) {
    let GameState {
        bullets,
        shapes,
        enemies,
        player,
        tuning,
        events,
        ..
    } = state;

    let mut total = HitTally::default();
    for bullet in bullets.iter_mut() {
        if bullet.body.deleted {
            continue;
        }
        if !in_world(bullet.body.pos, tuning.world_size) {
            bullet.body.deleted = true;
            continue;
        }
        let tally = collide_bullet(bullet, shapes, enemies, player, events);
        total.points += tally.points;
        total.kills += tally.kills;
        total.player_died |= tally.player_died;
    }

    state.upgrade_points += total.kills;
    if total.player_died {
        log::info!("Game over (score {})", state.player.score);
        state.events.push(GameEvent::GameOver {
            score: state.player.score,
        });
        state.phase = GamePhase::GameOver;
    }
}

/// Credit points to the player as they are earned
fn credit(player: &mut Player, points: u32, events: &mut Vec<GameEvent>) {
    if player.add_score(points) {
        log::info!("Player reached level {}", player.level);
        events.push(GameEvent::PlayerLeveledUp {
            level: player.level,
        });
    }
}

/// Shapes first, then enemies for player bullets, then the player for enemy
/// bullets. A spent bullet stops checking.
pub fn collide_bullet(
    bullet: &mut Bullet,
    shapes: &mut [Shape],
    enemies: &mut [Enemy],
    player: &mut Player,
    events: &mut Vec<GameEvent>,
) -> HitTally {
    let mut tally = HitTally::default();

    for shape in shapes.iter_mut() {
        if bullet.body.deleted {
            return tally;
        }
        if shape.body.deleted || bullet.has_hit(shape.id) || !bullet.body.overlaps(&shape.body) {
            continue;
        }
        let points = shape.apply_damage(bullet.damage);
        if points > 0 {
            events.push(GameEvent::ShapeDestroyed {
                id: shape.id,
                kind: shape.kind,
                pos: shape.body.pos,
            });
            if bullet.from_player {
                credit(player, points, events);
                tally.points += points;
            }
        }
        bullet.register_hit(shape.id);
    }

    if bullet.from_player {
        for enemy in enemies.iter_mut() {
            if bullet.body.deleted {
                return tally;
            }
            if enemy.body.deleted || bullet.has_hit(enemy.id) || !bullet.body.overlaps(&enemy.body) {
                continue;
            }
            let points = enemy.apply_damage(bullet.damage);
            if points > 0 {
                events.push(GameEvent::EnemyDestroyed {
                    id: enemy.id,
                    tier: enemy.tier,
                    pos: enemy.body.pos,
                });
                credit(player, points, events);
                tally.points += points;
                tally.kills += 1;
            }
            bullet.register_hit(enemy.id);
        }
    } else if !bullet.body.deleted && player.is_alive() && bullet.body.overlaps(&player.body) {
        tally.player_died = player.apply_damage(bullet.damage);
        events.push(GameEvent::PlayerHit {
            damage: bullet.damage,
            health: player.health,
        });
        // Enemy bullets never pierce the player
        bullet.body.deleted = true;
    }

    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Color;
    use crate::sim::enemy::EnemyTier;
    use crate::sim::shape::ShapeKind;
    use glam::Vec2;

    fn player_bullet(pos: Vec2, damage: f32) -> Bullet {
        Bullet::new(pos, 0.0, 0.0, damage, Color::PLAYER, true)
    }

    #[test]
    fn test_non_piercing_stops_after_first_shape() {
        let mut shapes = vec![
            Shape::new(1, Vec2::new(100.0, 100.0), ShapeKind::Square),
            Shape::new(2, Vec2::new(105.0, 100.0), ShapeKind::Square),
        ];
        let mut player = Player::new(9, Vec2::new(1000.0, 1000.0));
        let mut events = Vec::new();
        let mut bullet = player_bullet(Vec2::new(102.0, 100.0), 3.0);

        collide_bullet(&mut bullet, &mut shapes, &mut [], &mut player, &mut events);
        assert!(bullet.body.deleted);
        assert_eq!(shapes[0].health, 7.0);
        assert_eq!(shapes[1].health, 10.0);
    }

    #[test]
    fn test_piercing_hits_each_target_once() {
        let mut shapes = vec![
            Shape::new(1, Vec2::new(100.0, 100.0), ShapeKind::Pentagon),
            Shape::new(2, Vec2::new(105.0, 100.0), ShapeKind::Pentagon),
        ];
        let mut player = Player::new(9, Vec2::new(1000.0, 1000.0));
        let mut events = Vec::new();
        let mut bullet = player_bullet(Vec2::new(102.0, 100.0), 3.0);
        bullet.piercing = true;

        collide_bullet(&mut bullet, &mut shapes, &mut [], &mut player, &mut events);
        collide_bullet(&mut bullet, &mut shapes, &mut [], &mut player, &mut events);
        assert!(!bullet.body.deleted);
        assert_eq!(shapes[0].health, 27.0);
        assert_eq!(shapes[1].health, 27.0);
    }

    #[test]
    fn test_enemy_kill_counts_points_and_kill() {
        let mut enemies = vec![Enemy::new(4, Vec2::new(300.0, 300.0), EnemyTier::One)];
        let mut player = Player::new(9, Vec2::new(1000.0, 1000.0));
        let mut events = Vec::new();
        let mut bullet = player_bullet(Vec2::new(300.0, 300.0), 150.0);

        let tally = collide_bullet(&mut bullet, &mut [], &mut enemies, &mut player, &mut events);
        assert_eq!(tally.points, 250);
        assert_eq!(tally.kills, 1);
        assert!(enemies[0].body.deleted);
        assert!(matches!(events[0], GameEvent::EnemyDestroyed { id: 4, .. }));
    }

    #[test]
    fn test_enemy_bullets_pass_through_enemies() {
        let mut enemies = vec![Enemy::new(4, Vec2::new(300.0, 300.0), EnemyTier::One)];
        let mut player = Player::new(9, Vec2::new(1000.0, 1000.0));
        let mut events = Vec::new();
        let mut bullet = Bullet::new(Vec2::new(300.0, 300.0), 0.0, 0.0, 50.0, Color(0xF14E54), false);

        collide_bullet(&mut bullet, &mut [], &mut enemies, &mut player, &mut events);
        assert_eq!(enemies[0].health, 100.0);
        assert!(!bullet.body.deleted);
    }

    #[test]
    fn test_enemy_bullet_shapes_give_no_points() {
        let mut shapes = vec![Shape::new(1, Vec2::new(100.0, 100.0), ShapeKind::Square)];
        let mut player = Player::new(9, Vec2::new(1000.0, 1000.0));
        let mut events = Vec::new();
        let mut bullet = Bullet::new(Vec2::new(100.0, 100.0), 0.0, 0.0, 50.0, Color(0xF14E54), false);

        let tally = collide_bullet(&mut bullet, &mut shapes, &mut [], &mut player, &mut events);
        assert!(shapes[0].body.deleted);
        assert_eq!(tally.points, 0);
    }

    #[test]
    fn test_out_of_bounds_bullet_is_culled() {
        let mut state = GameState::empty(1, crate::Tuning::default());
        state.bullets.push(player_bullet(Vec2::new(-1.0, 500.0), 1.0));
        resolve_bullet_collisions(&mut state);
        assert!(state.bullets[0].body.deleted);
    }

    #[test]
    fn test_kill_grants_upgrade_point_and_score() {
        let mut state = GameState::empty(1, crate::Tuning::default());
        state.enemies.push(Enemy::new(50, Vec2::new(300.0, 300.0), EnemyTier::One));
        state.bullets.push(player_bullet(Vec2::new(300.0, 300.0), 500.0));
        resolve_bullet_collisions(&mut state);
        assert_eq!(state.upgrade_points, 1);
        assert_eq!(state.player.score, 250);
        assert_eq!(state.player.level, 2);
        assert!(state.events.contains(&GameEvent::PlayerLeveledUp { level: 2 }));
    }
}

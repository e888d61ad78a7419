//! Upgrade pool offered on game level-ups

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::player::{Player, TankClass};

/// One purchasable stat change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Upgrade {
    IncreasedHealth,
    FasterMovement,
    HigherDamage,
    RapidFire,
    BulletSpeed,
    TankSize,
    BulletSize,
    SpecialCooldown,
    // Class extras
    TripleShot,
    ExtendedRange,
    Spreadshot,
    ExplosiveRounds,
}

/// Upgrades available to every tank
pub const GENERIC_UPGRADES: [Upgrade; 8] = [
    Upgrade::IncreasedHealth,
    Upgrade::FasterMovement,
    Upgrade::HigherDamage,
    Upgrade::RapidFire,
    Upgrade::BulletSpeed,
    Upgrade::TankSize,
    Upgrade::BulletSize,
    Upgrade::SpecialCooldown,
];

impl Upgrade {
    pub fn name(self) -> &'static str {
        match self {
            Upgrade::IncreasedHealth => "Increased Health",
            Upgrade::FasterMovement => "Faster Movement",
            Upgrade::HigherDamage => "Higher Damage",
            Upgrade::RapidFire => "Rapid Fire",
            Upgrade::BulletSpeed => "Bullet Speed",
            Upgrade::TankSize => "Tank Size",
            Upgrade::BulletSize => "Bullet Size",
            Upgrade::SpecialCooldown => "Special Cooldown",
            Upgrade::TripleShot => "Triple Shot",
            Upgrade::ExtendedRange => "Extended Range",
            Upgrade::Spreadshot => "Spreadshot",
            Upgrade::ExplosiveRounds => "Explosive Rounds",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Upgrade::IncreasedHealth => "Increase max health by 25",
            Upgrade::FasterMovement => "Increase movement speed by 15%",
            Upgrade::HigherDamage => "Increase bullet damage by 3",
            Upgrade::RapidFire => "Decrease shooting cooldown by 15%",
            Upgrade::BulletSpeed => "Increase bullet speed by 20%",
            Upgrade::TankSize => "Increase tank size by 10%",
            Upgrade::BulletSize => "Increase bullet size by 20%",
            Upgrade::SpecialCooldown => "Reduce special ability cooldown by 20%",
            Upgrade::TripleShot => "Add a third barrel to your twin tank",
            Upgrade::ExtendedRange => "Increase bullet lifetime by 50%",
            Upgrade::Spreadshot => "Increase bullet spread for wider coverage",
            Upgrade::ExplosiveRounds => "Bullets explode when they expire",
        }
    }

    /// Extra upgrade unlocked by a class, if any
    pub fn class_extra(class: TankClass) -> Option<Upgrade> {
        match class {
            TankClass::Basic => None,
            TankClass::Twin => Some(Upgrade::TripleShot),
            TankClass::Sniper => Some(Upgrade::ExtendedRange),
            TankClass::Machine => Some(Upgrade::Spreadshot),
            TankClass::Destroyer => Some(Upgrade::ExplosiveRounds),
        }
    }

    /// Everything a tank of `class` may be offered
    pub fn pool_for(class: TankClass) -> Vec<Upgrade> {
        let mut pool = GENERIC_UPGRADES.to_vec();
        pool.extend(Self::class_extra(class));
        pool
    }

    /// Draw up to `count` distinct upgrades for `class`
    pub fn draw<R: Rng + ?Sized>(class: TankClass, count: usize, rng: &mut R) -> Vec<Upgrade> {
        Self::pool_for(class)
            .choose_multiple(rng, count)
            .copied()
            .collect()
    }

    /// Apply this upgrade's stat change to the player
    pub fn apply(self, player: &mut Player) {
        match self {
            Upgrade::IncreasedHealth => {
                player.max_health += 25.0;
                player.health += 25.0;
            }
            Upgrade::FasterMovement => player.speed *= 1.15,
            Upgrade::HigherDamage => player.bullet_damage += 3.0,
            Upgrade::RapidFire => {
                player.shooting_rate = ((player.shooting_rate as f32 * 0.85) as u32).max(5);
            }
            Upgrade::BulletSpeed => player.bullet_speed *= 1.2,
            Upgrade::TankSize => player.body.radius *= 1.1,
            Upgrade::BulletSize => player.bullet_radius_scale *= 1.2,
            Upgrade::SpecialCooldown => player.special_max_cooldown *= 0.8,
            Upgrade::TripleShot => player.triple_shot = true,
            Upgrade::ExtendedRange => player.bullet_lifetime_scale *= 1.5,
            Upgrade::Spreadshot => player.spread_scale *= 2.0,
            Upgrade::ExplosiveRounds => player.explosive_rounds = true,
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Fish Survivor.
//!
//! The world owns the player, enemies, pickups, progression counters, and
//! the upgrade ledger. All mutation flows through [`apply`], which executes a
//! single [`Command`] and reports what happened as [`Event`] values.

mod animation;
mod enemy;
mod pickup;
mod player;

use fish_survivor_core::{
    Command, EnemyId, EnemyKind, Event, HudSnapshot, PickupKind, Tuning, UpgradeId,
    UpgradeLedger,
};
use glam::Vec2;

pub use enemy::Enemy;
pub use pickup::{Pickup, PICKUP_SIZE};
pub use player::{Player, PLAYER_SIZE};

#[derive(Clone, Debug)]
struct Progression {
    level: u32,
    experience: u32,
    experience_to_next_level: u32,
    game_time: f32,
    enemies_defeated: u32,
}

impl Progression {
    const fn new(tuning: &Tuning) -> Self {
        Self {
            level: 1,
            experience: 0,
            experience_to_next_level: tuning.initial_experience_threshold,
            game_time: 0.0,
            enemies_defeated: 0,
        }
    }
}

/// Represents the authoritative Fish Survivor world state.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    player: Player,
    enemies: Vec<Enemy>,
    pickups: Vec<Pickup>,
    progression: Progression,
    upgrades: UpgradeLedger,
    next_enemy_id: u32,
}

impl World {
    /// Creates a world with the player centred in the configured viewport.
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        let player = Player::new(tuning.viewport() / 2.0);
        let progression = Progression::new(&tuning);
        Self {
            tuning,
            player,
            enemies: Vec::new(),
            pickups: Vec::new(),
            progression,
            upgrades: UpgradeLedger::default(),
            next_enemy_id: 0,
        }
    }

    fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id() == id)
    }

    fn pickup_scale(&self) -> f32 {
        self.tuning
            .pickup_radius_scale(self.upgrades.level(UpgradeId::Pickup))
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, position: Vec2) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        self.enemies
            .push(Enemy::new(id, kind, position, self.progression.level));
        id
    }

    fn defeat_enemy(&mut self, id: EnemyId, drop: Option<PickupKind>, out: &mut Vec<Event>) {
        let Some(index) = self
            .enemies
            .iter()
            .position(|enemy| enemy.id() == id && enemy.is_defeated())
        else {
            return;
        };
        let enemy = self.enemies.remove(index);
        let position = enemy.position();

        if let Some(kind) = drop {
            self.pickups.push(Pickup::new(kind, position));
            out.push(Event::PickupDropped { kind, position });
        }

        self.progression.enemies_defeated = self.progression.enemies_defeated.saturating_add(1);
        out.push(Event::EnemyDefeated {
            enemy: id,
            kind: enemy.kind(),
            position,
        });
    }

    fn advance_pickups(&mut self, dt: f32, out: &mut Vec<Event>) {
        let scale = self.pickup_scale();
        let attraction = self.tuning.attraction_radius * scale;
        let collection = self.tuning.collection_radius * scale;
        let target = self.player.position();

        for index in (0..self.pickups.len()).rev() {
            let _ = self.pickups[index].update(dt, target, attraction);
            if !self.pickups[index].is_collected_by(target, collection) {
                continue;
            }

            let pickup = self.pickups.remove(index);
            out.push(Event::PickupCollected {
                kind: pickup.kind(),
                position: pickup.position(),
            });
            match pickup.kind() {
                PickupKind::Experience => {
                    self.grant_experience(self.tuning.experience_per_pickup, out);
                }
                PickupKind::Health => self.player.heal(self.tuning.heal_per_pickup),
            }
        }
    }

    fn grant_experience(&mut self, amount: u32, out: &mut Vec<Event>) {
        let progression = &mut self.progression;
        progression.experience = progression.experience.saturating_add(amount);
        if progression.experience < progression.experience_to_next_level {
            return;
        }

        progression.level = progression.level.saturating_add(1);
        progression.experience -= progression.experience_to_next_level;
        progression.experience_to_next_level = self
            .tuning
            .next_threshold(progression.experience_to_next_level);
        out.push(Event::LeveledUp {
            level: progression.level,
            experience_to_next_level: progression.experience_to_next_level,
        });
    }

    fn reset(&mut self) {
        *self = Self::new(self.tuning.clone());
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.progression.game_time += dt.as_secs_f32();
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SetDirectionAxis { key, pressed } => {
            world.player.handle_directional_input(key, pressed);
        }
        Command::SetDirection { direction } => world.player.set_direction(direction),
        Command::AdvancePlayer { dt } => {
            let bounds = world.tuning.viewport();
            world
                .player
                .update(dt.as_secs_f32(), bounds, &world.enemies, out_events);
        }
        Command::SpawnEnemy { kind, position } => {
            let enemy = world.spawn_enemy(kind, position);
            out_events.push(Event::EnemySpawned {
                enemy,
                kind,
                position,
            });
        }
        Command::DamageEnemy { enemy, amount } => {
            if let Some(enemy) = world.enemy_mut(enemy) {
                enemy.take_damage(amount, out_events);
            }
        }
        Command::StunEnemy { enemy, duration } => {
            if let Some(enemy) = world.enemy_mut(enemy) {
                enemy.apply_stun(duration);
            }
        }
        Command::SlowEnemy {
            enemy,
            duration,
            factor,
        } => {
            if let Some(enemy) = world.enemy_mut(enemy) {
                enemy.apply_slow(duration, factor);
            }
        }
        Command::KnockBackEnemy { enemy, offset } => {
            if let Some(enemy) = world.enemy_mut(enemy) {
                enemy.knock_back(offset);
            }
        }
        Command::AdvanceEnemies { dt } => {
            let target = world.player.position();
            let dt = dt.as_secs_f32();
            for enemy in &mut world.enemies {
                enemy.update(dt, target);
            }
        }
        Command::DefeatEnemy { enemy, drop } => world.defeat_enemy(enemy, drop, out_events),
        Command::AdvancePickups { dt } => world.advance_pickups(dt.as_secs_f32(), out_events),
        Command::ScalePlayerSpeed { factor } => world.player.scale_speed(factor),
        Command::GrowMaxHealth { fraction } => world.player.grow_max_health(fraction),
        Command::RecordUpgrade { upgrade } => {
            let level = world.upgrades.record(upgrade);
            out_events.push(Event::UpgradeRecorded { upgrade, level });
        }
        Command::Reset => {
            world.reset();
            out_events.push(Event::WorldReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use fish_survivor_core::{
        EnemyId, EnemyView, HudSnapshot, PickupSnapshot, PlayerSnapshot, Tuning, UpgradeId,
        UpgradeLedger,
    };
    use glam::Vec2;

    use super::{Player, World};

    /// Provides read-only access to the player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Captures an immutable snapshot of the player.
    #[must_use]
    pub fn player_snapshot(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Centre of the player sprite.
    #[must_use]
    pub fn player_position(world: &World) -> Vec2 {
        world.player.position()
    }

    /// Captures a read-only view of the enemies in list order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Identifiers of enemies whose health dropped to zero, last-spawned first.
    #[must_use]
    pub fn defeated_enemies(world: &World) -> Vec<EnemyId> {
        world
            .enemies
            .iter()
            .rev()
            .filter(|enemy| enemy.is_defeated())
            .map(|enemy| enemy.id())
            .collect()
    }

    /// Captures the pickups in list order.
    #[must_use]
    pub fn pickups(world: &World) -> Vec<PickupSnapshot> {
        world.pickups.iter().map(|pickup| pickup.snapshot()).collect()
    }

    /// Captures the values displayed by the heads-up display.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        world.hud()
    }

    /// Current player level, which also scales newly spawned enemies.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.progression.level
    }

    /// Seconds of game time elapsed since the last reset.
    #[must_use]
    pub fn game_time(world: &World) -> f32 {
        world.progression.game_time
    }

    /// Number of enemies removed after being defeated.
    #[must_use]
    pub fn enemies_defeated(world: &World) -> u32 {
        world.progression.enemies_defeated
    }

    /// Provides read-only access to the upgrade ledger.
    #[must_use]
    pub fn upgrades(world: &World) -> &UpgradeLedger {
        &world.upgrades
    }

    /// Current level of a single upgrade.
    #[must_use]
    pub fn upgrade_level(world: &World, upgrade: UpgradeId) -> u8 {
        world.upgrades.level(upgrade)
    }

    /// Tuning the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Radius within which pickups drift toward the player.
    #[must_use]
    pub fn attraction_radius(world: &World) -> f32 {
        world.tuning.attraction_radius * world.pickup_scale()
    }

    /// Radius within which pickups are collected.
    #[must_use]
    pub fn collection_radius(world: &World) -> f32 {
        world.tuning.collection_radius * world.pickup_scale()
    }
}

impl World {
    fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            health: self.player.health(),
            max_health: self.player.max_health(),
            level: self.progression.level,
            experience: self.progression.experience,
            experience_to_next_level: self.progression.experience_to_next_level,
            game_time: self.progression.game_time,
            enemies_defeated: self.progression.enemies_defeated,
        }
    }
}

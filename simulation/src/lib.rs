#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestrator that wires the world to the spawning, weapon, and
//! progression systems.
//!
//! [`Game::step`] runs one frame in a fixed order: clock, player, spawning,
//! weapons, enemies, cleanup, pickups, then the game-over and level-up checks.
//! Adapters feed input through [`Game::handle_key`] and the touch methods and
//! read everything they draw from [`Game::frame_snapshot`].

use std::time::Duration;

use fish_survivor_core::{
    Command, DirectionalKey, Event, FrameSnapshot, HudSnapshot, Phase, PickupKind, Tuning,
    TuningError, UpgradeId, UpgradeOffer,
};
use fish_survivor_system_progression::{draw_offers, effect_of, validate_choice, UpgradeEffect};
use fish_survivor_system_spawning::{Config as SpawningConfig, Spawning};
use fish_survivor_system_weapons::Arsenal;
use fish_survivor_world::{self as world, query, World};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

pub use fish_survivor_system_progression::UpgradeError;

/// Drag distance below which a touch stops the player instead of steering.
pub const TOUCH_DEAD_ZONE: f32 = 20.0;

/// Most presentation events kept between drains; older ones are dropped first.
pub const VISUAL_EVENT_CAPACITY: usize = 1_024;

/// Owns one run of the game and advances it frame by frame.
#[derive(Debug)]
pub struct Game {
    tuning: Tuning,
    world: World,
    spawning: Spawning,
    arsenal: Arsenal,
    rng: ChaCha8Rng,
    phase: Phase,
    offers: Vec<UpgradeOffer>,
    pending_level_ups: u32,
    visual_events: Vec<Event>,
}

impl Game {
    /// Creates a running game after validating `tuning`.
    pub fn new(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        info!(seed = tuning.seed, "starting new run");
        Ok(Self {
            world: World::new(tuning.clone()),
            spawning: Spawning::new(SpawningConfig::from_tuning(&tuning)),
            arsenal: Arsenal::new(),
            rng: ChaCha8Rng::seed_from_u64(tuning.seed),
            phase: Phase::Running,
            offers: Vec::new(),
            pending_level_ups: 0,
            visual_events: Vec::new(),
            tuning,
        })
    }

    /// Advances the simulation by `dt`; does nothing unless running.
    ///
    /// Presentation events are buffered for [`Game::drain_visual_events`].
    /// Hosts that never drain keep at most [`VISUAL_EVENT_CAPACITY`] of them.
    pub fn step(&mut self, dt: Duration) {
        if self.phase != Phase::Running {
            return;
        }
        let seconds = dt.as_secs_f32();

        let mut events = Vec::new();
        self.apply(Command::Tick { dt }, &mut events);
        let tick_events = events.clone();

        self.apply(Command::AdvancePlayer { dt }, &mut events);
        self.run_spawning(&tick_events, &mut events);
        self.run_weapons(seconds, &mut events);
        self.apply(Command::AdvanceEnemies { dt }, &mut events);
        self.remove_defeated(&mut events);

        let before_pickups = events.len();
        self.apply(Command::AdvancePickups { dt }, &mut events);
        let level_ups = events[before_pickups..]
            .iter()
            .filter(|event| matches!(event, Event::LeveledUp { .. }))
            .count();

        if query::player(&self.world).health() <= 0.0 {
            let hud = query::hud(&self.world);
            info!(
                survival_time = hud.game_time,
                enemies_defeated = hud.enemies_defeated,
                "game over"
            );
            self.phase = Phase::GameOver;
            events.push(Event::GameOver {
                survival_time: hud.game_time,
                enemies_defeated: hud.enemies_defeated,
            });
        } else if level_ups > 0 {
            let level = query::level(&self.world);
            info!(level, "leveled up");
            self.pending_level_ups = self
                .pending_level_ups
                .saturating_add(u32::try_from(level_ups).unwrap_or(u32::MAX));
            self.open_offers();
        }

        self.publish(events);
    }

    fn publish(&mut self, events: Vec<Event>) {
        self.visual_events
            .extend(events.into_iter().filter(is_presentational));
        let overflow = self
            .visual_events
            .len()
            .saturating_sub(VISUAL_EVENT_CAPACITY);
        if overflow > 0 {
            let _ = self.visual_events.drain(..overflow);
        }
    }

    fn apply(&mut self, command: Command, events: &mut Vec<Event>) {
        world::apply(&mut self.world, command, events);
    }

    fn run_spawning(&mut self, tick_events: &[Event], events: &mut Vec<Event>) {
        let mut commands = Vec::new();
        let grew = self.spawning.handle(
            tick_events,
            query::level(&self.world),
            self.tuning.viewport(),
            &mut self.rng,
            &mut commands,
        );
        if grew {
            debug!(spawn_rate = self.spawning.spawn_rate(), "difficulty increased");
        }
        for command in commands {
            if let Command::SpawnEnemy { kind, position } = &command {
                trace!(?kind, x = position.x, y = position.y, "spawning enemy");
            }
            self.apply(command, events);
        }
    }

    fn run_weapons(&mut self, dt: f32, events: &mut Vec<Event>) {
        let mut commands = Vec::new();
        for index in 0..self.arsenal.len() {
            let enemies = query::enemy_view(&self.world);
            let player = query::player_position(&self.world);
            let Some(weapon) = self.arsenal.weapon_mut(index) else {
                continue;
            };
            if let Some(position) = weapon.update(dt, player, &enemies, &mut self.rng, &mut commands)
            {
                events.push(Event::WeaponFired {
                    weapon: weapon.kind(),
                    position,
                });
            }
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, events);
            }
        }
    }

    fn remove_defeated(&mut self, events: &mut Vec<Event>) {
        for enemy in query::defeated_enemies(&self.world) {
            let drop = self.roll_drop();
            self.apply(Command::DefeatEnemy { enemy, drop }, events);
        }
    }

    fn roll_drop(&mut self) -> Option<PickupKind> {
        if self.rng.gen::<f32>() < self.tuning.experience_drop_chance {
            return Some(PickupKind::Experience);
        }
        if self.rng.gen::<f32>() < self.tuning.health_drop_chance {
            return Some(PickupKind::Health);
        }
        None
    }

    fn open_offers(&mut self) {
        self.offers = draw_offers(
            query::upgrades(&self.world),
            self.tuning.offers_per_level,
            &mut self.rng,
        );
        if self.offers.is_empty() {
            debug!("every upgrade is maxed; resuming without a choice");
            self.pending_level_ups = 0;
            self.phase = Phase::Running;
        } else {
            self.phase = Phase::ChoosingUpgrade;
        }
    }

    /// Applies one of the offered upgrades and resumes once no level-up is pending.
    ///
    /// Rejected choices leave the game untouched.
    pub fn apply_upgrade(&mut self, upgrade: UpgradeId) -> Result<(), UpgradeError> {
        if self.phase != Phase::ChoosingUpgrade {
            return Err(UpgradeError::NotChoosing);
        }
        validate_choice(query::upgrades(&self.world), &self.offers, upgrade)?;

        let mut events = Vec::new();
        self.apply(Command::RecordUpgrade { upgrade }, &mut events);
        let level = query::upgrade_level(&self.world, upgrade);
        info!(?upgrade, level, "upgrade applied");

        match effect_of(upgrade, level) {
            UpgradeEffect::ScalePlayerSpeed(factor) => {
                self.apply(Command::ScalePlayerSpeed { factor }, &mut events);
            }
            UpgradeEffect::ScaleWeaponDamage(factor) => self.arsenal.scale_damage(factor),
            UpgradeEffect::GrowMaxHealth(fraction) => {
                self.apply(Command::GrowMaxHealth { fraction }, &mut events);
            }
            UpgradeEffect::ScaleWeaponCooldown(factor) => self.arsenal.scale_cooldown(factor),
            UpgradeEffect::UnlockWeapon(weapon) => {
                if self.arsenal.push(weapon) {
                    info!(?weapon, "weapon unlocked");
                }
            }
            UpgradeEffect::LedgerOnly => {}
        }
        self.publish(events);

        self.offers.clear();
        self.pending_level_ups = self.pending_level_ups.saturating_sub(1);
        if self.pending_level_ups > 0 {
            self.open_offers();
        } else {
            self.phase = Phase::Running;
        }
        Ok(())
    }

    /// Presses or releases a directional key.
    pub fn handle_key(&mut self, key: DirectionalKey, pressed: bool) {
        let mut events = Vec::new();
        self.apply(Command::SetDirectionAxis { key, pressed }, &mut events);
    }

    /// Steers the player along a touch drag measured from the touch origin.
    pub fn touch_drag(&mut self, delta: Vec2) {
        let direction = if delta.length() > TOUCH_DEAD_ZONE {
            delta
        } else {
            Vec2::ZERO
        };
        let mut events = Vec::new();
        self.apply(Command::SetDirection { direction }, &mut events);
    }

    /// Stops the player when the touch ends.
    pub fn touch_end(&mut self) {
        let mut events = Vec::new();
        self.apply(
            Command::SetDirection {
                direction: Vec2::ZERO,
            },
            &mut events,
        );
    }

    /// Restores the initial state of the run, including the random stream.
    pub fn reset(&mut self) {
        let mut events = Vec::new();
        self.apply(Command::Reset, &mut events);
        self.spawning.reset();
        self.arsenal = Arsenal::new();
        self.rng = ChaCha8Rng::seed_from_u64(self.tuning.seed);
        self.phase = Phase::Running;
        self.offers.clear();
        self.pending_level_ups = 0;
        self.visual_events.clear();
        self.publish(events);
        info!("run reset");
    }

    /// Values displayed by the heads-up display.
    #[must_use]
    pub fn hud(&self) -> HudSnapshot {
        query::hud(&self.world)
    }

    /// Current simulation phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Upgrades on offer while choosing; empty otherwise.
    #[must_use]
    pub fn offers(&self) -> &[UpgradeOffer] {
        &self.offers
    }

    /// Number of level-ups still waiting for an upgrade choice.
    #[must_use]
    pub const fn pending_level_ups(&self) -> u32 {
        self.pending_level_ups
    }

    /// Takes the events produced since the previous drain, for effects and sounds.
    pub fn drain_visual_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.visual_events)
    }

    /// Captures everything a presentation layer needs to draw the frame.
    #[must_use]
    pub fn frame_snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            viewport: self.tuning.viewport(),
            player: query::player_snapshot(&self.world),
            enemies: query::enemy_view(&self.world),
            pickups: query::pickups(&self.world),
            effects: self.arsenal.effects(),
            hud: self.hud(),
            phase: self.phase,
            offers: self.offers.clone(),
        }
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the player's weapons.
    #[must_use]
    pub const fn arsenal(&self) -> &Arsenal {
        &self.arsenal
    }

    /// Tuning the game was created with.
    #[must_use]
    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

fn is_presentational(event: &Event) -> bool {
    !matches!(
        event,
        Event::TimeAdvanced { .. }
            | Event::EnemySpawned { .. }
            | Event::PickupDropped { .. }
            | Event::UpgradeRecorded { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_tuning_is_rejected() {
        let tuning = Tuning {
            viewport_width: 0.0,
            ..Tuning::default()
        };
        assert!(matches!(
            Game::new(tuning),
            Err(TuningError::EmptyViewport { .. })
        ));
    }

    #[test]
    fn small_touch_drags_stop_the_player() {
        let mut game = Game::new(Tuning::default()).expect("valid tuning");
        game.touch_drag(Vec2::new(30.0, 40.0));
        let direction = query::player(game.world()).direction();
        assert!((direction - Vec2::new(0.6, 0.8)).length() < 1e-6);

        game.touch_drag(Vec2::new(10.0, 10.0));
        assert_eq!(query::player(game.world()).direction(), Vec2::ZERO);

        game.touch_drag(Vec2::new(0.0, -50.0));
        game.touch_end();
        assert_eq!(query::player(game.world()).direction(), Vec2::ZERO);
    }

    #[test]
    fn bookkeeping_events_are_not_buffered() {
        let mut game = Game::new(Tuning {
            initial_spawn_rate: 30.0,
            ..Tuning::default()
        })
        .expect("valid tuning");
        game.step(Duration::from_millis(100));

        let events = game.drain_visual_events();
        assert!(!events.iter().any(|event| matches!(
            event,
            Event::TimeAdvanced { .. } | Event::EnemySpawned { .. }
        )));
        assert!(!query::enemy_view(game.world()).is_empty());
    }

    #[test]
    fn buffered_events_drop_the_oldest_past_capacity() {
        let mut game = Game::new(Tuning::default()).expect("valid tuning");
        let events = (0..VISUAL_EVENT_CAPACITY + 10)
            .map(|index| Event::LeveledUp {
                level: u32::try_from(index).expect("small index"),
                experience_to_next_level: 100,
            })
            .collect();
        game.publish(events);

        let kept = game.drain_visual_events();
        assert_eq!(kept.len(), VISUAL_EVENT_CAPACITY);
        assert_eq!(
            kept.first(),
            Some(&Event::LeveledUp {
                level: 10,
                experience_to_next_level: 100,
            })
        );
    }

    #[test]
    fn upgrades_are_rejected_while_running() {
        let mut game = Game::new(Tuning::default()).expect("valid tuning");
        assert_eq!(
            game.apply_upgrade(UpgradeId::Speed),
            Err(UpgradeError::NotChoosing)
        );
    }
}

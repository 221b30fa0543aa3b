#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Fish Survivor engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The orchestrator submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values that systems
//! and presentation layers react to. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

mod tuning;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use tuning::{Tuning, TuningError};

/// Number of frames composing every looping sprite animation.
pub const ANIMATION_FRAMES: u8 = 4;

/// Coarse state of the simulation that gates whether updates run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Simulation advances every step.
    #[default]
    Running,
    /// Simulation is paused until one of the offered upgrades is applied.
    ChoosingUpgrade,
    /// Player health reached zero; only a reset resumes the simulation.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the game clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Presses or releases one directional key.
    SetDirectionAxis {
        /// Key whose state changed.
        key: DirectionalKey,
        /// Whether the key is now held.
        pressed: bool,
    },
    /// Replaces the raw movement vector, as produced by touch dragging.
    SetDirection {
        /// Raw direction; the world normalises it before use.
        direction: Vec2,
    },
    /// Moves the player and resolves contact damage.
    AdvancePlayer {
        /// Duration of simulated time to integrate.
        dt: Duration,
    },
    /// Creates a new enemy scaled to the current level.
    SpawnEnemy {
        /// Variant of enemy to create.
        kind: EnemyKind,
        /// Initial world-space position.
        position: Vec2,
    },
    /// Subtracts health from an enemy.
    DamageEnemy {
        /// Enemy receiving the damage.
        enemy: EnemyId,
        /// Amount of health removed.
        amount: f32,
    },
    /// Halts an enemy for the provided duration, replacing any active stun.
    StunEnemy {
        /// Enemy being stunned.
        enemy: EnemyId,
        /// Stun length in seconds.
        duration: f32,
    },
    /// Slows an enemy, replacing any active slow.
    SlowEnemy {
        /// Enemy being slowed.
        enemy: EnemyId,
        /// Slow length in seconds.
        duration: f32,
        /// Multiplier applied to the enemy's speed while slowed.
        factor: f32,
    },
    /// Displaces an enemy by a fixed offset.
    KnockBackEnemy {
        /// Enemy being displaced.
        enemy: EnemyId,
        /// Offset added to the enemy position.
        offset: Vec2,
    },
    /// Moves every enemy toward the player and advances status timers.
    AdvanceEnemies {
        /// Duration of simulated time to integrate.
        dt: Duration,
    },
    /// Removes a defeated enemy, optionally leaving a pickup behind.
    DefeatEnemy {
        /// Enemy to remove.
        enemy: EnemyId,
        /// Pickup dropped at the enemy's position, if any.
        drop: Option<PickupKind>,
    },
    /// Attracts pickups toward the player and resolves collection.
    AdvancePickups {
        /// Duration of simulated time to integrate.
        dt: Duration,
    },
    /// Multiplies the player's movement speed.
    ScalePlayerSpeed {
        /// Multiplier applied to the current speed.
        factor: f32,
    },
    /// Raises maximum health by a fraction and heals by the same amount.
    GrowMaxHealth {
        /// Fraction of the current maximum added to it.
        fraction: f32,
    },
    /// Increments the ledger entry for an upgrade.
    RecordUpgrade {
        /// Upgrade whose level increases.
        upgrade: UpgradeId,
    },
    /// Restores the initial player, progression, and entity collections.
    Reset,
}

/// Events broadcast by the world and the orchestrator after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the game clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that an enemy touched the player outside the invulnerability window.
    PlayerDamaged {
        /// Health removed by the hit.
        amount: f32,
        /// Player health after the hit.
        health: f32,
    },
    /// Confirms that an enemy entered the world.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// Variant of the new enemy.
        kind: EnemyKind,
        /// Spawn position.
        position: Vec2,
    },
    /// Reports damage dealt to an enemy; renderers show a floating number.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Enemy position at the time of the hit.
        position: Vec2,
        /// Damage dealt.
        amount: f32,
    },
    /// Confirms that a defeated enemy was removed.
    EnemyDefeated {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
        /// Variant of the removed enemy.
        kind: EnemyKind,
        /// Position where the enemy fell.
        position: Vec2,
    },
    /// Confirms that a pickup was dropped into the world.
    PickupDropped {
        /// Variant of the dropped pickup.
        kind: PickupKind,
        /// Position of the new pickup.
        position: Vec2,
    },
    /// Confirms that the player collected a pickup.
    PickupCollected {
        /// Variant of the collected pickup.
        kind: PickupKind,
        /// Position of the pickup when it was collected.
        position: Vec2,
    },
    /// Announces that accumulated experience crossed the level threshold.
    LeveledUp {
        /// Level reached.
        level: u32,
        /// Experience required to reach the following level.
        experience_to_next_level: u32,
    },
    /// Confirms that an upgrade level was recorded in the ledger.
    UpgradeRecorded {
        /// Upgrade that was applied.
        upgrade: UpgradeId,
        /// Ledger level after the increment.
        level: u8,
    },
    /// Reports that a weapon emitted a projectile or effect.
    WeaponFired {
        /// Weapon that fired.
        weapon: WeaponKind,
        /// Position of the emitted effect.
        position: Vec2,
    },
    /// Announces that the player was defeated.
    GameOver {
        /// Seconds of game time survived.
        survival_time: f32,
        /// Number of enemies defeated during the run.
        enemies_defeated: u32,
    },
    /// Confirms that the world returned to its initial state.
    WorldReset,
}

/// Directional keys that feed the player's movement vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionalKey {
    /// Movement toward decreasing y.
    Up,
    /// Movement toward increasing y.
    Down,
    /// Movement toward decreasing x.
    Left,
    /// Movement toward increasing x.
    Right,
}

impl DirectionalKey {
    /// Maps a browser-style key name (arrows or WASD) onto a directional key.
    #[must_use]
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" | "w" | "W" => Some(Self::Up),
            "ArrowDown" | "s" | "S" => Some(Self::Down),
            "ArrowLeft" | "a" | "A" => Some(Self::Left),
            "ArrowRight" | "d" | "D" => Some(Self::Right),
            _ => None,
        }
    }

    /// Unit vector pointing in the key's direction.
    #[must_use]
    pub const fn axis(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Enemy variants, ordered from weakest to strongest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast, fragile swarmer.
    Fish,
    /// Slow and sturdy.
    Crab,
    /// Quick with a painful sting.
    Jellyfish,
    /// Heavy and slow.
    Octopus,
    /// Fast, tough, and hard-hitting.
    Shark,
}

/// Stats of an enemy at a specific level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Sprite width and height in pixels.
    pub size: f32,
    /// Movement speed in pixels per second.
    pub speed: f32,
    /// Starting and maximum health.
    pub health: f32,
    /// Contact damage dealt to the player.
    pub damage: f32,
}

#[derive(Clone, Copy, Debug)]
struct Linear {
    base: f32,
    slope: f32,
}

impl Linear {
    const fn new(base: f32, slope: f32) -> Self {
        Self { base, slope }
    }

    fn at(self, level: u32) -> f32 {
        self.base + self.slope * level as f32
    }
}

#[derive(Clone, Copy, Debug)]
struct EnemyBlueprint {
    size: f32,
    speed: Linear,
    health: Linear,
    damage: Linear,
}

const ENEMY_BLUEPRINTS: [EnemyBlueprint; EnemyKind::COUNT] = [
    EnemyBlueprint {
        size: 48.0,
        speed: Linear::new(60.0, 1.5),
        health: Linear::new(20.0, 3.0),
        damage: Linear::new(3.0, 0.7),
    },
    EnemyBlueprint {
        size: 56.0,
        speed: Linear::new(45.0, 1.2),
        health: Linear::new(35.0, 5.0),
        damage: Linear::new(5.0, 1.0),
    },
    EnemyBlueprint {
        size: 52.0,
        speed: Linear::new(55.0, 2.0),
        health: Linear::new(30.0, 4.0),
        damage: Linear::new(8.0, 1.3),
    },
    EnemyBlueprint {
        size: 64.0,
        speed: Linear::new(40.0, 0.8),
        health: Linear::new(50.0, 7.0),
        damage: Linear::new(7.0, 1.5),
    },
    EnemyBlueprint {
        size: 80.0,
        speed: Linear::new(70.0, 2.0),
        health: Linear::new(70.0, 10.0),
        damage: Linear::new(10.0, 1.8),
    },
];

impl EnemyKind {
    /// Number of enemy variants.
    pub const COUNT: usize = 5;

    /// Every enemy variant in weakest-to-strongest order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Fish,
        Self::Crab,
        Self::Jellyfish,
        Self::Octopus,
        Self::Shark,
    ];

    /// Position of the variant within [`EnemyKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Sprite width and height, which do not scale with level.
    #[must_use]
    pub const fn base_size(self) -> f32 {
        ENEMY_BLUEPRINTS[self.index()].size
    }

    /// Computes the variant's stats for an enemy spawned at `level`.
    #[must_use]
    pub fn stats(self, level: u32) -> EnemyStats {
        let blueprint = ENEMY_BLUEPRINTS[self.index()];
        EnemyStats {
            size: blueprint.size,
            speed: blueprint.speed.at(level),
            health: blueprint.health.at(level),
            damage: blueprint.damage.at(level),
        }
    }
}

/// Kinds of collectible pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Grants experience toward the next level.
    Experience,
    /// Restores player health.
    Health,
}

/// Attack behaviours available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Fires a bubble at the nearest enemy.
    Bubble,
    /// Drops a trap that stuns the first enemy to enter it.
    BubbleTrap,
    /// Emits a burst that damages and knocks back nearby enemies.
    WaterWave,
    /// Throws a net over the densest enemy cluster, damaging and slowing it.
    FishingNet,
}

/// Per-kind geometry and timing parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WeaponBehavior {
    /// Straight-line projectile aimed at the nearest enemy when fired.
    Projectile {
        /// Travel speed in pixels per second.
        speed: f32,
        /// Seconds before an unspent projectile disappears.
        lifetime: f32,
        /// Projectile diameter.
        size: f32,
    },
    /// Static zone placed in an annulus around the player.
    Trap {
        /// Trigger radius.
        radius: f32,
        /// Seconds the trap remains in the world.
        lifetime: f32,
        /// Minimum placement distance from the player.
        inner_distance: f32,
        /// Maximum placement distance from the player.
        outer_distance: f32,
        /// Stun applied to the triggering enemy.
        stun_duration: f32,
    },
    /// Instant area damage around the player with an expanding ring.
    Burst {
        /// Damage radius and final ring radius.
        radius: f32,
        /// Seconds the cosmetic ring animates for.
        duration: f32,
        /// Distance enemies are pushed away from the player.
        knockback: f32,
    },
    /// Area slow thrown at the densest nearby cluster.
    Net {
        /// Effect radius around the chosen point.
        radius: f32,
        /// Slow duration and visual lifetime.
        duration: f32,
        /// Speed multiplier applied to caught enemies.
        slow_factor: f32,
        /// Half extent of the square searched around the player.
        search_radius: f32,
        /// Spacing between candidate points in the search grid.
        search_step: f32,
    },
}

/// Baseline configuration of a weapon before upgrades.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponParams {
    /// Damage dealt per hit.
    pub damage: f32,
    /// Seconds between activations.
    pub cooldown: f32,
    /// Kind-specific geometry.
    pub behavior: WeaponBehavior,
}

impl WeaponKind {
    /// Returns the baseline parameters for the weapon kind.
    #[must_use]
    pub const fn params(self) -> WeaponParams {
        match self {
            Self::Bubble => WeaponParams {
                damage: 20.0,
                cooldown: 0.4,
                behavior: WeaponBehavior::Projectile {
                    speed: 350.0,
                    lifetime: 2.0,
                    size: 20.0,
                },
            },
            Self::BubbleTrap => WeaponParams {
                damage: 5.0,
                cooldown: 3.0,
                behavior: WeaponBehavior::Trap {
                    radius: 80.0,
                    lifetime: 5.0,
                    inner_distance: 100.0,
                    outer_distance: 150.0,
                    stun_duration: 2.0,
                },
            },
            Self::WaterWave => WeaponParams {
                damage: 20.0,
                cooldown: 5.0,
                behavior: WeaponBehavior::Burst {
                    radius: 150.0,
                    duration: 0.5,
                    knockback: 50.0,
                },
            },
            Self::FishingNet => WeaponParams {
                damage: 10.0,
                cooldown: 4.0,
                behavior: WeaponBehavior::Net {
                    radius: 100.0,
                    duration: 3.0,
                    slow_factor: 0.5,
                    search_radius: 200.0,
                    search_step: 50.0,
                },
            },
        }
    }
}

/// Identifiers of every upgrade offered on level-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UpgradeId {
    /// Player movement speed.
    Speed,
    /// Damage of every weapon.
    Damage,
    /// Maximum player health.
    Health,
    /// Cooldown of every weapon.
    AttackSpeed,
    /// Pickup attraction and collection radius.
    Pickup,
    /// Unlocks the bubble trap.
    BubbleTrap,
    /// Unlocks the water wave.
    WaterWave,
    /// Unlocks the fishing net.
    FishingNet,
}

impl UpgradeId {
    /// Number of upgrades in the catalogue.
    pub const COUNT: usize = 8;

    /// Every upgrade in catalogue order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Speed,
        Self::Damage,
        Self::Health,
        Self::AttackSpeed,
        Self::Pickup,
        Self::BubbleTrap,
        Self::WaterWave,
        Self::FishingNet,
    ];

    /// Position of the upgrade within [`UpgradeId::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Highest level the upgrade can reach.
    #[must_use]
    pub const fn max_level(self) -> u8 {
        match self {
            Self::BubbleTrap | Self::WaterWave | Self::FishingNet => 3,
            _ => 5,
        }
    }

    /// Display name shown in the level-up overlay.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Speed => "Swift Fins",
            Self::Damage => "Sharper Bubbles",
            Self::Health => "Thick Scales",
            Self::AttackSpeed => "Rapid Fire",
            Self::Pickup => "Wide Current",
            Self::BubbleTrap => "Bubble Trap",
            Self::WaterWave => "Water Wave",
            Self::FishingNet => "Fishing Net",
        }
    }

    /// One-line description shown in the level-up overlay.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Speed => "Movement speed +10%",
            Self::Damage => "Weapon damage +15%",
            Self::Health => "Maximum health +20%",
            Self::AttackSpeed => "Weapon cooldowns -10%",
            Self::Pickup => "Pickup range +15%",
            Self::BubbleTrap => "Places bubble traps that stun enemies",
            Self::WaterWave => "Emits a wave that damages nearby enemies",
            Self::FishingNet => "Throws a net that slows enemies",
        }
    }

    /// Weapon added the first time this upgrade reaches level one.
    #[must_use]
    pub const fn unlocks(self) -> Option<WeaponKind> {
        match self {
            Self::BubbleTrap => Some(WeaponKind::BubbleTrap),
            Self::WaterWave => Some(WeaponKind::WaterWave),
            Self::FishingNet => Some(WeaponKind::FishingNet),
            _ => None,
        }
    }
}

/// Current level of every upgrade, capped per upgrade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLedger {
    levels: [u8; UpgradeId::COUNT],
}

impl UpgradeLedger {
    /// Current level of the upgrade.
    #[must_use]
    pub const fn level(&self, upgrade: UpgradeId) -> u8 {
        self.levels[upgrade.index()]
    }

    /// Reports whether the upgrade reached its cap.
    #[must_use]
    pub const fn is_maxed(&self, upgrade: UpgradeId) -> bool {
        self.level(upgrade) >= upgrade.max_level()
    }

    /// Increments the upgrade's level without exceeding its cap and returns the new level.
    pub fn record(&mut self, upgrade: UpgradeId) -> u8 {
        let slot = &mut self.levels[upgrade.index()];
        *slot = slot.saturating_add(1).min(upgrade.max_level());
        *slot
    }

    /// Iterator over upgrades that have not reached their cap, in catalogue order.
    pub fn eligible(&self) -> impl Iterator<Item = UpgradeId> + '_ {
        UpgradeId::ALL
            .into_iter()
            .filter(move |upgrade| !self.is_maxed(*upgrade))
    }
}

/// Upgrade presented to the player during a level-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UpgradeOffer {
    /// Upgrade on offer.
    pub upgrade: UpgradeId,
    /// Ledger level before the upgrade is applied.
    pub current_level: u8,
}

impl UpgradeOffer {
    /// Ledger level after the upgrade is applied.
    #[must_use]
    pub const fn next_level(&self) -> u8 {
        self.current_level + 1
    }
}

/// Read-only HUD values refreshed once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HudSnapshot {
    /// Current player health.
    pub health: f32,
    /// Maximum player health.
    pub max_health: f32,
    /// Current level.
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub experience: u32,
    /// Experience required to reach the next level.
    pub experience_to_next_level: u32,
    /// Seconds of game time elapsed.
    pub game_time: f32,
    /// Number of enemies defeated.
    pub enemies_defeated: u32,
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerSnapshot {
    /// Centre of the player sprite.
    pub position: Vec2,
    /// Sprite width and height.
    pub size: Vec2,
    /// Horizontal facing, `1.0` for right and `-1.0` for left.
    pub facing: f32,
    /// Current animation frame in `0..ANIMATION_FRAMES`.
    pub animation_frame: u8,
    /// Current player health.
    pub health: f32,
    /// Maximum player health.
    pub max_health: f32,
    /// Seconds elapsed in the active invulnerability window, if any.
    pub invulnerable_elapsed: Option<f32>,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Centre of the enemy sprite.
    pub position: Vec2,
    /// Sprite width and height.
    pub size: f32,
    /// Current health; may be negative until the cleanup pass removes the enemy.
    pub health: f32,
    /// Health at spawn time.
    pub max_health: f32,
    /// Horizontal facing, `1.0` for right and `-1.0` for left.
    pub facing: f32,
    /// Current animation frame in `0..ANIMATION_FRAMES`.
    pub animation_frame: u8,
    /// Whether a stun is active.
    pub stunned: bool,
    /// Whether a slow is active.
    pub slowed: bool,
}

/// Read-only snapshot describing all enemies, in world list order.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view, preserving the order of the provided snapshots.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Slice over the captured snapshots.
    #[must_use]
    pub fn as_slice(&self) -> &[EnemySnapshot] {
        &self.snapshots
    }
}

/// Immutable representation of a pickup used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Variant of the pickup.
    pub kind: PickupKind,
    /// Centre of the pickup sprite.
    pub position: Vec2,
    /// Unscaled sprite size.
    pub size: f32,
    /// Phase of the cosmetic pulse, in radians.
    pub pulse_phase: f32,
}

/// Immutable representation of a live weapon projectile or effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSnapshot {
    /// Weapon that owns the effect.
    pub weapon: WeaponKind,
    /// Centre of the effect.
    pub position: Vec2,
    /// Current drawn radius.
    pub radius: f32,
    /// Opacity in `0.0..=1.0`.
    pub opacity: f32,
    /// Whether a trap already fired.
    pub triggered: bool,
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Clone, Debug, Default)]
pub struct FrameSnapshot {
    /// Viewport width and height.
    pub viewport: Vec2,
    /// Player state.
    pub player: PlayerSnapshot,
    /// Enemy states in list order.
    pub enemies: EnemyView,
    /// Pickup states in list order.
    pub pickups: Vec<PickupSnapshot>,
    /// Live weapon effects in weapon order.
    pub effects: Vec<EffectSnapshot>,
    /// HUD values.
    pub hud: HudSnapshot,
    /// Current simulation phase.
    pub phase: Phase,
    /// Upgrades on offer while choosing.
    pub offers: Vec<UpgradeOffer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemy_stats_scale_linearly_with_level() {
        let first = EnemyKind::Fish.stats(1);
        assert!((first.speed - 61.5).abs() < 1e-4);
        assert!((first.health - 23.0).abs() < 1e-4);
        assert!((first.damage - 3.7).abs() < 1e-4);

        let shark = EnemyKind::Shark.stats(10);
        assert!((shark.health - 170.0).abs() < 1e-4);
        assert!((shark.size - 80.0).abs() < f32::EPSILON);
    }

    #[test]
    fn stronger_kinds_gain_health_faster() {
        let gains: Vec<f32> = EnemyKind::ALL
            .iter()
            .map(|kind| kind.stats(2).health - kind.stats(1).health)
            .collect();
        assert!(gains[0] < gains[4]);
        assert!(gains[1] < gains[3]);
    }

    #[test]
    fn key_names_cover_arrows_and_wasd() {
        assert_eq!(DirectionalKey::from_key_name("ArrowUp"), Some(DirectionalKey::Up));
        assert_eq!(DirectionalKey::from_key_name("a"), Some(DirectionalKey::Left));
        assert_eq!(DirectionalKey::from_key_name("D"), Some(DirectionalKey::Right));
        assert_eq!(DirectionalKey::from_key_name("Space"), None);
    }

    #[test]
    fn ledger_caps_each_upgrade() {
        let mut ledger = UpgradeLedger::default();
        for _ in 0..10 {
            let _ = ledger.record(UpgradeId::WaterWave);
        }
        assert_eq!(ledger.level(UpgradeId::WaterWave), 3);
        assert!(ledger.is_maxed(UpgradeId::WaterWave));
        assert!(!ledger.eligible().any(|upgrade| upgrade == UpgradeId::WaterWave));
        assert_eq!(ledger.eligible().count(), UpgradeId::COUNT - 1);
    }

    #[test]
    fn only_weapon_upgrades_unlock_weapons() {
        let unlocking: Vec<UpgradeId> = UpgradeId::ALL
            .into_iter()
            .filter(|upgrade| upgrade.unlocks().is_some())
            .collect();
        assert_eq!(
            unlocking,
            vec![UpgradeId::BubbleTrap, UpgradeId::WaterWave, UpgradeId::FishingNet]
        );
    }

    #[test]
    fn upgrade_ledger_round_trips_through_bincode() {
        let mut ledger = UpgradeLedger::default();
        let _ = ledger.record(UpgradeId::Pickup);
        let bytes = bincode::serialize(&ledger).expect("serialize");
        let restored: UpgradeLedger = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, ledger);
    }
}

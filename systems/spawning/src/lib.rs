#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for emitting enemy spawn commands.
//!
//! The system accumulates simulated time from [`Event::TimeAdvanced`], grows
//! the spawn rate on a fixed difficulty cadence, and places each new enemy
//! just outside a randomly chosen viewport edge.

use fish_survivor_core::{Command, EnemyKind, Event, Tuning};
use glam::Vec2;
use rand::Rng;

const EARLY_WEIGHTS: [f32; EnemyKind::COUNT] = [0.50, 0.30, 0.15, 0.04, 0.01];
const MIDDLE_WEIGHTS: [f32; EnemyKind::COUNT] = [0.35, 0.35, 0.20, 0.07, 0.03];
const LATE_WEIGHTS: [f32; EnemyKind::COUNT] = [0.20, 0.25, 0.25, 0.20, 0.10];

/// Most spawns a single call may release; time beyond that is discarded.
pub const MAX_SPAWN_BURST: u32 = 5;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_rate: f32,
    difficulty_interval: f32,
    difficulty_growth: f32,
    edge_offset: f32,
}

impl Config {
    /// Creates a new configuration from an explicit cadence.
    #[must_use]
    pub const fn new(
        spawn_rate: f32,
        difficulty_interval: f32,
        difficulty_growth: f32,
        edge_offset: f32,
    ) -> Self {
        Self {
            spawn_rate,
            difficulty_interval,
            difficulty_growth,
            edge_offset,
        }
    }

    /// Extracts the spawning parameters from the run tuning.
    #[must_use]
    pub const fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            tuning.initial_spawn_rate,
            tuning.difficulty_interval,
            tuning.difficulty_growth,
            tuning.spawn_edge_offset,
        )
    }
}

/// Viewport edge an enemy enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnSide {
    /// Above the viewport.
    Top,
    /// Right of the viewport.
    Right,
    /// Below the viewport.
    Bottom,
    /// Left of the viewport.
    Left,
}

impl SpawnSide {
    /// Every side, each equally likely to be drawn.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];
}

/// Pure system that emits spawn commands as simulated time passes.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    spawn_rate: f32,
    accumulator: f32,
    difficulty_timer: f32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            spawn_rate: config.spawn_rate,
            accumulator: 0.0,
            difficulty_timer: 0.0,
        }
    }

    /// Consumes time events and emits spawn commands for enemies at `level`.
    ///
    /// Long frames may spawn several enemies, at most [`MAX_SPAWN_BURST`] per
    /// call; elapsed time beyond that is discarded.
    ///
    /// Returns `true` when the spawn rate grew during this call.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        events: &[Event],
        level: u32,
        viewport: Vec2,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) -> bool {
        let elapsed: f32 = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(dt.as_secs_f32()),
                _ => None,
            })
            .sum();

        if elapsed <= 0.0 {
            return false;
        }

        let grew = self.advance_difficulty(elapsed);

        let interval = self.spawn_interval();
        if !interval.is_finite() {
            return grew;
        }

        self.accumulator += elapsed;
        let mut spawned = 0;
        while self.accumulator >= interval && spawned < MAX_SPAWN_BURST {
            self.accumulator -= interval;
            spawned += 1;
            let side = SpawnSide::ALL[rng.gen_range(0..SpawnSide::ALL.len())];
            let along = rng.gen::<f32>();
            let kind = choose_kind(level, rng.gen::<f32>());
            out.push(Command::SpawnEnemy {
                kind,
                position: edge_position(side, along, viewport, self.config.edge_offset),
            });
        }
        if self.accumulator >= interval {
            self.accumulator = 0.0;
        }
        grew
    }

    fn advance_difficulty(&mut self, elapsed: f32) -> bool {
        self.difficulty_timer += elapsed;
        if self.difficulty_timer < self.config.difficulty_interval {
            return false;
        }
        self.difficulty_timer = 0.0;
        self.spawn_rate *= self.config.difficulty_growth;
        true
    }

    fn spawn_interval(&self) -> f32 {
        1.0 / self.spawn_rate
    }

    /// Enemies spawned per second at the current difficulty.
    #[must_use]
    pub const fn spawn_rate(&self) -> f32 {
        self.spawn_rate
    }

    /// Restores the initial spawn rate and clears both timers.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }
}

/// Relative likelihood of each enemy kind, in [`EnemyKind::ALL`] order, at `level`.
#[must_use]
pub const fn spawn_weights(level: u32) -> [f32; EnemyKind::COUNT] {
    match level {
        0..=3 => EARLY_WEIGHTS,
        4..=6 => MIDDLE_WEIGHTS,
        _ => LATE_WEIGHTS,
    }
}

/// Picks an enemy kind by comparing `sample` in `[0, 1)` to cumulative weights.
///
/// Falls back to the strongest kind when rounding leaves the cumulative sum
/// short of the sample.
#[must_use]
pub fn choose_kind(level: u32, sample: f32) -> EnemyKind {
    let mut cumulative = 0.0;
    for (kind, weight) in EnemyKind::ALL.into_iter().zip(spawn_weights(level)) {
        cumulative += weight;
        if sample < cumulative {
            return kind;
        }
    }
    EnemyKind::Shark
}

/// Position `offset` pixels outside `side`, `along` in `[0, 1)` of the way across it.
#[must_use]
pub fn edge_position(side: SpawnSide, along: f32, viewport: Vec2, offset: f32) -> Vec2 {
    match side {
        SpawnSide::Top => Vec2::new(along * viewport.x, -offset),
        SpawnSide::Right => Vec2::new(viewport.x + offset, along * viewport.y),
        SpawnSide::Bottom => Vec2::new(along * viewport.x, viewport.y + offset),
        SpawnSide::Left => Vec2::new(-offset, along * viewport.y),
    }
}

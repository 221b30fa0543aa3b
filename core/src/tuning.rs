//! Designer-adjustable constants that shape a run.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SEED: u64 = 0x5eed_f154_0c3a_2d71;

/// Aggregated tuning knobs controlling spawning, progression, and pickups.
///
/// Every field has a default so partial TOML files only need to name the
/// values they override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Seed for the simulation's random number generator.
    pub seed: u64,
    /// Width of the playable viewport in pixels.
    pub viewport_width: f32,
    /// Height of the playable viewport in pixels.
    pub viewport_height: f32,
    /// Enemies spawned per second at the start of a run.
    pub initial_spawn_rate: f32,
    /// Seconds of game time between difficulty increases.
    pub difficulty_interval: f32,
    /// Multiplier applied to the spawn rate at each difficulty increase.
    pub difficulty_growth: f32,
    /// Distance outside the viewport edge at which enemies appear.
    pub spawn_edge_offset: f32,
    /// Probability that a defeated enemy drops experience.
    pub experience_drop_chance: f32,
    /// Probability that a defeated enemy without an experience drop leaves health.
    pub health_drop_chance: f32,
    /// Experience granted by an experience pickup.
    pub experience_per_pickup: u32,
    /// Health restored by a health pickup.
    pub heal_per_pickup: f32,
    /// Experience required to leave level one.
    pub initial_experience_threshold: u32,
    /// Growth of the threshold per level, in percent of the previous threshold.
    pub threshold_growth_percent: u32,
    /// Radius within which pickups drift toward the player, before upgrades.
    pub attraction_radius: f32,
    /// Radius within which pickups are collected, before upgrades.
    pub collection_radius: f32,
    /// Fractional radius bonus per level of the pickup upgrade.
    pub pickup_radius_bonus: f32,
    /// Number of upgrades offered on level-up.
    pub offers_per_level: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            initial_spawn_rate: 0.8,
            difficulty_interval: 45.0,
            difficulty_growth: 1.1,
            spawn_edge_offset: 50.0,
            experience_drop_chance: 0.5,
            health_drop_chance: 0.04,
            experience_per_pickup: 15,
            heal_per_pickup: 25.0,
            initial_experience_threshold: 100,
            threshold_growth_percent: 115,
            attraction_radius: 100.0,
            collection_radius: 50.0,
            pickup_radius_bonus: 0.15,
            offers_per_level: 3,
        }
    }
}

impl Tuning {
    /// Viewport dimensions as a vector.
    #[must_use]
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    /// Computes the threshold following `threshold` using integer arithmetic.
    #[must_use]
    pub fn next_threshold(&self, threshold: u32) -> u32 {
        let grown = u64::from(threshold) * u64::from(self.threshold_growth_percent) / 100;
        u32::try_from(grown).unwrap_or(u32::MAX).max(1)
    }

    /// Multiplier applied to pickup radii for the given pickup upgrade level.
    #[must_use]
    pub fn pickup_radius_scale(&self, pickup_level: u8) -> f32 {
        1.0 + f32::from(pickup_level) * self.pickup_radius_bonus
    }

    /// Checks that every value lies in its meaningful range.
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(TuningError::EmptyViewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        if !(self.initial_spawn_rate.is_finite() && self.initial_spawn_rate > 0.0) {
            return Err(TuningError::NonPositiveSpawnRate(self.initial_spawn_rate));
        }
        if !(self.difficulty_interval > 0.0 && self.difficulty_growth > 0.0) {
            return Err(TuningError::InvalidDifficulty {
                interval: self.difficulty_interval,
                growth: self.difficulty_growth,
            });
        }
        for (name, value) in [
            ("experience_drop_chance", self.experience_drop_chance),
            ("health_drop_chance", self.health_drop_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::InvalidProbability { name, value });
            }
        }
        if self.initial_experience_threshold == 0 {
            return Err(TuningError::ZeroThreshold);
        }
        if self.threshold_growth_percent < 100 {
            return Err(TuningError::ShrinkingThreshold(
                self.threshold_growth_percent,
            ));
        }
        if self.offers_per_level == 0 {
            return Err(TuningError::NoOffers);
        }
        Ok(())
    }
}

/// Reasons a [`Tuning`] value is rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TuningError {
    /// The viewport has no area.
    #[error("viewport must have positive extent (received {width}x{height})")]
    EmptyViewport {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// The spawn rate is zero, negative, or not finite.
    #[error("initial spawn rate must be positive (received {0})")]
    NonPositiveSpawnRate(f32),
    /// The difficulty interval or growth is not positive.
    #[error("difficulty interval and growth must be positive (received {interval}, {growth})")]
    InvalidDifficulty {
        /// Configured interval.
        interval: f32,
        /// Configured growth.
        growth: f32,
    },
    /// A probability lies outside `0.0..=1.0`.
    #[error("{name} must lie in 0..=1 (received {value})")]
    InvalidProbability {
        /// Name of the offending field.
        name: &'static str,
        /// Configured value.
        value: f32,
    },
    /// The first level threshold is zero.
    #[error("initial experience threshold must be positive")]
    ZeroThreshold,
    /// Thresholds would shrink between levels.
    #[error("threshold growth must be at least 100 percent (received {0})")]
    ShrinkingThreshold(u32),
    /// Level-ups would never offer an upgrade.
    #[error("at least one upgrade must be offered per level")]
    NoOffers,
}

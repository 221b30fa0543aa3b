use std::f32::consts::TAU;

use fish_survivor_core::{PickupKind, PickupSnapshot};
use glam::Vec2;

/// Unscaled width and height of a pickup sprite.
pub const PICKUP_SIZE: f32 = 24.0;

const PULSE_RATE: f32 = 2.0;
const MIN_ATTRACTION_SPEED: f32 = 100.0;
const MAX_ATTRACTION_SPEED: f32 = 500.0;

/// Collectible left behind by a defeated enemy.
#[derive(Clone, Debug)]
pub struct Pickup {
    kind: PickupKind,
    position: Vec2,
    pulse_phase: f32,
}

impl Pickup {
    /// Creates a resting pickup.
    #[must_use]
    pub const fn new(kind: PickupKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            pulse_phase: 0.0,
        }
    }

    /// Advances the pulse and drifts toward `player` when within `attraction_radius`.
    ///
    /// Pickups closer to the player move faster and never overshoot it.
    /// Returns whether the pickup is currently attracted.
    pub fn update(&mut self, dt: f32, player: Vec2, attraction_radius: f32) -> bool {
        self.pulse_phase = (self.pulse_phase + dt * PULSE_RATE) % TAU;

        let delta = player - self.position;
        let distance = delta.length();
        if distance > attraction_radius || distance == 0.0 {
            return false;
        }

        let speed = (MAX_ATTRACTION_SPEED * (1.0 - distance / attraction_radius))
            .max(MIN_ATTRACTION_SPEED);
        let step = (speed * dt).min(distance);
        self.position += delta / distance * step;
        true
    }

    /// Whether the player at `player` collects the pickup.
    #[must_use]
    pub fn is_collected_by(&self, player: Vec2, collection_radius: f32) -> bool {
        self.position.distance(player) < collection_radius
    }

    /// Variant of the pickup.
    #[must_use]
    pub const fn kind(&self) -> PickupKind {
        self.kind
    }

    /// Centre of the pickup sprite.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Captures an immutable view of the pickup.
    #[must_use]
    pub const fn snapshot(&self) -> PickupSnapshot {
        PickupSnapshot {
            kind: self.kind,
            position: self.position,
            size: PICKUP_SIZE,
            pulse_phase: self.pulse_phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attraction_boundary_is_inclusive() {
        let mut inside = Pickup::new(PickupKind::Experience, Vec2::new(100.0, 0.0));
        assert!(inside.update(0.1, Vec2::ZERO, 100.0));
        assert!(inside.position().x < 100.0);

        let mut outside = Pickup::new(PickupKind::Experience, Vec2::new(101.0, 0.0));
        assert!(!outside.update(0.1, Vec2::ZERO, 100.0));
        assert_eq!(outside.position(), Vec2::new(101.0, 0.0));
    }

    #[test]
    fn edge_of_radius_moves_at_minimum_speed() {
        let mut pickup = Pickup::new(PickupKind::Health, Vec2::new(100.0, 0.0));
        let _ = pickup.update(0.1, Vec2::ZERO, 100.0);
        assert!((pickup.position().x - 90.0).abs() < 1e-3);
    }

    #[test]
    fn attraction_never_overshoots_player() {
        let mut pickup = Pickup::new(PickupKind::Experience, Vec2::new(5.0, 0.0));
        let _ = pickup.update(1.0, Vec2::ZERO, 100.0);
        assert!(pickup.position().length() < 1e-4);
    }

    #[test]
    fn collection_boundary_is_exclusive() {
        let pickup = Pickup::new(PickupKind::Experience, Vec2::new(50.0, 0.0));
        assert!(!pickup.is_collected_by(Vec2::ZERO, 50.0));
        assert!(pickup.is_collected_by(Vec2::ZERO, 50.5));
    }
}

use fish_survivor_core::{DirectionalKey, Event, PlayerSnapshot};
use glam::Vec2;

use crate::{animation::Animation, enemy::Enemy};

/// Width and height of the player sprite.
pub const PLAYER_SIZE: f32 = 64.0;

const PLAYER_SPEED: f32 = 220.0;
const PLAYER_HEALTH: f32 = 120.0;
const INVULNERABLE_DURATION: f32 = 0.8;
const ANIMATION_STEP: f32 = 0.1;

/// Player-controlled fish.
#[derive(Clone, Debug)]
pub struct Player {
    position: Vec2,
    size: Vec2,
    speed: f32,
    health: f32,
    max_health: f32,
    raw_direction: Vec2,
    direction: Vec2,
    facing: f32,
    animation: Animation,
    invulnerable_elapsed: Option<f32>,
    invulnerable_duration: f32,
}

impl Player {
    /// Creates a player at full health centred on `position`.
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            size: Vec2::splat(PLAYER_SIZE),
            speed: PLAYER_SPEED,
            health: PLAYER_HEALTH,
            max_health: PLAYER_HEALTH,
            raw_direction: Vec2::ZERO,
            direction: Vec2::ZERO,
            facing: 1.0,
            animation: Animation::new(ANIMATION_STEP),
            invulnerable_elapsed: None,
            invulnerable_duration: INVULNERABLE_DURATION,
        }
    }

    /// Presses or releases one axis of the raw movement direction.
    ///
    /// Releasing a key only clears its axis when that axis still points the
    /// released way, so releasing Left while Right is held keeps moving right.
    pub fn handle_directional_input(&mut self, key: DirectionalKey, pressed: bool) {
        let axis = key.axis();
        if pressed {
            if axis.x != 0.0 {
                self.raw_direction.x = axis.x;
                self.facing = axis.x;
            }
            if axis.y != 0.0 {
                self.raw_direction.y = axis.y;
            }
        } else {
            if axis.x != 0.0 && self.raw_direction.x * axis.x > 0.0 {
                self.raw_direction.x = 0.0;
            }
            if axis.y != 0.0 && self.raw_direction.y * axis.y > 0.0 {
                self.raw_direction.y = 0.0;
            }
        }
        self.direction = self.raw_direction.normalize_or_zero();
    }

    /// Replaces the raw movement vector.
    pub fn set_direction(&mut self, direction: Vec2) {
        self.raw_direction = direction.normalize_or_zero();
        self.direction = self.raw_direction;
    }

    /// Integrates movement, animation, invulnerability, and enemy contact.
    pub fn update(&mut self, dt: f32, bounds: Vec2, enemies: &[Enemy], out: &mut Vec<Event>) {
        self.position += self.direction * self.speed * dt;
        let half = self.size / 2.0;
        self.position = self.position.clamp(half, (bounds - half).max(half));

        if self.is_moving() {
            self.animation.advance(dt);
        } else {
            self.animation.rewind();
        }

        if let Some(elapsed) = self.invulnerable_elapsed.as_mut() {
            *elapsed += dt;
            if *elapsed >= self.invulnerable_duration {
                self.invulnerable_elapsed = None;
            }
        }

        if self.is_invulnerable() {
            return;
        }

        let reach = self.size.x / 3.0;
        let hit = enemies.iter().find(|enemy| {
            self.position.distance(enemy.position()) < reach + enemy.size() / 3.0
        });
        if let Some(enemy) = hit {
            let _ = self.take_damage(enemy.damage(), out);
        }
    }

    /// Applies contact damage unless invulnerable; returns whether it landed.
    ///
    /// Health bottoms out at zero, which the orchestrator treats as game over.
    pub fn take_damage(&mut self, amount: f32, out: &mut Vec<Event>) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        self.invulnerable_elapsed = Some(0.0);
        out.push(Event::PlayerDamaged {
            amount,
            health: self.health,
        });
        true
    }

    /// Restores health without exceeding the maximum.
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Raises maximum health by `fraction` and heals by the same amount.
    pub fn grow_max_health(&mut self, fraction: f32) {
        let increase = self.max_health * fraction;
        self.max_health += increase;
        self.health += increase;
    }

    /// Multiplies the movement speed.
    pub fn scale_speed(&mut self, factor: f32) {
        self.speed *= factor;
    }

    /// Centre of the player sprite.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Movement speed in pixels per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Normalised movement direction.
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Whether incoming damage is currently ignored.
    #[must_use]
    pub const fn is_invulnerable(&self) -> bool {
        self.invulnerable_elapsed.is_some()
    }

    fn is_moving(&self) -> bool {
        self.direction != Vec2::ZERO
    }

    /// Captures an immutable view of the player.
    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            size: self.size,
            facing: self.facing,
            animation_frame: self.animation.frame(),
            health: self.health,
            max_health: self.max_health,
            invulnerable_elapsed: self.invulnerable_elapsed,
        }
    }
}

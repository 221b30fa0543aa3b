use fish_survivor_core::{EnemyId, EnemyKind, EnemySnapshot, Event};
use glam::Vec2;

use crate::animation::Animation;

const ANIMATION_STEP: f32 = 0.15;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Slow {
    remaining: f32,
    factor: f32,
}

/// Hostile creature that chases the player.
#[derive(Clone, Debug)]
pub struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    position: Vec2,
    size: f32,
    speed: f32,
    health: f32,
    max_health: f32,
    damage: f32,
    facing: f32,
    animation: Animation,
    stun: Option<f32>,
    slow: Option<Slow>,
}

impl Enemy {
    /// Creates an enemy with the kind's stats scaled to `level`.
    #[must_use]
    pub fn new(id: EnemyId, kind: EnemyKind, position: Vec2, level: u32) -> Self {
        let stats = kind.stats(level);
        Self {
            id,
            kind,
            position,
            size: stats.size,
            speed: stats.speed,
            health: stats.health,
            max_health: stats.health,
            damage: stats.damage,
            facing: 1.0,
            animation: Animation::new(ANIMATION_STEP),
            stun: None,
            slow: None,
        }
    }

    /// Advances status timers and steps toward `target`.
    ///
    /// A stunned enemy only counts down its stun and neither moves nor animates.
    pub fn update(&mut self, dt: f32, target: Vec2) {
        if let Some(remaining) = self.stun.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.stun = None;
            }
            return;
        }

        if let Some(slow) = self.slow.as_mut() {
            slow.remaining -= dt;
            if slow.remaining <= 0.0 {
                self.slow = None;
            }
        }

        let delta = target - self.position;
        self.facing = if delta.x > 0.0 { 1.0 } else { -1.0 };

        let distance = delta.length();
        if distance > 0.0 {
            self.position += delta / distance * self.speed * self.slow_factor() * dt;
        }

        self.animation.advance(dt);
    }

    /// Removes health and reports the hit.
    pub fn take_damage(&mut self, amount: f32, out: &mut Vec<Event>) {
        self.health -= amount;
        out.push(Event::EnemyDamaged {
            enemy: self.id,
            position: self.position,
            amount,
        });
    }

    /// Replaces any active stun.
    pub fn apply_stun(&mut self, duration: f32) {
        self.stun = Some(duration);
    }

    /// Replaces any active slow.
    pub fn apply_slow(&mut self, duration: f32, factor: f32) {
        self.slow = Some(Slow {
            remaining: duration,
            factor,
        });
    }

    /// Displaces the enemy by `offset`.
    pub fn knock_back(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// Speed multiplier currently in effect.
    #[must_use]
    pub fn slow_factor(&self) -> f32 {
        self.slow.map_or(1.0, |slow| slow.factor)
    }

    /// Identifier of the enemy.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Variant of the enemy.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Centre of the enemy sprite.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Sprite width and height.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Remaining health, negative once overkilled.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Contact damage dealt to the player.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Whether health dropped to zero or below.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.health <= 0.0
    }

    /// Whether a stun is active.
    #[must_use]
    pub const fn is_stunned(&self) -> bool {
        self.stun.is_some()
    }

    /// Captures an immutable view of the enemy.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            size: self.size,
            health: self.health,
            max_health: self.max_health,
            facing: self.facing,
            animation_frame: self.animation.frame(),
            stunned: self.stun.is_some(),
            slowed: self.slow.is_some(),
        }
    }
}

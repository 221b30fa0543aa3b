use fish_survivor_core::Event;
use glam::Vec2;

use crate::{sound_cue, SoundKey};

const DAMAGE_NUMBER_LIFETIME: f32 = 50.0 / 60.0;
const DAMAGE_NUMBER_RISE_SPEED: f32 = 60.0;
const DAMAGE_NUMBER_OFFSET: f32 = 20.0;
const FLASH_DURATION: f32 = 0.1;

/// Floating number shown where an enemy took damage.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageNumber {
    /// Current screen position of the text.
    pub position: Vec2,
    /// Damage dealt by the hit.
    pub amount: f32,
    /// Seconds since the hit.
    pub age: f32,
}

impl DamageNumber {
    /// Opacity, fading linearly to zero over the number's lifetime.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        (1.0 - self.age / DAMAGE_NUMBER_LIFETIME).clamp(0.0, 1.0)
    }

    /// Text to display, rounded to whole points.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:.0}", self.amount)
    }
}

/// Transient presentation state derived from simulation events.
///
/// Call [`VisualEffects::advance`] once per frame before absorbing that
/// frame's events, so sound cues only live for the frame that produced them.
#[derive(Clone, Debug, Default)]
pub struct VisualEffects {
    damage_numbers: Vec<DamageNumber>,
    flash_remaining: f32,
    cues: Vec<SoundKey>,
}

impl VisualEffects {
    /// Creates an empty effect set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the presentation consequences of `events`.
    pub fn absorb(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemyDamaged {
                    position, amount, ..
                } => self.damage_numbers.push(DamageNumber {
                    position: *position - Vec2::new(0.0, DAMAGE_NUMBER_OFFSET),
                    amount: *amount,
                    age: 0.0,
                }),
                Event::PlayerDamaged { .. } => self.flash_remaining = FLASH_DURATION,
                Event::WorldReset => {
                    self.damage_numbers.clear();
                    self.flash_remaining = 0.0;
                }
                _ => {}
            }

            if let Some(cue) = sound_cue(event) {
                self.cues.push(cue);
            }
        }
    }

    /// Ages every effect by `dt` seconds and drops expired ones.
    pub fn advance(&mut self, dt: f32) {
        self.cues.clear();
        self.flash_remaining = (self.flash_remaining - dt).max(0.0);
        for number in &mut self.damage_numbers {
            number.age += dt;
            number.position.y -= DAMAGE_NUMBER_RISE_SPEED * dt;
        }
        self.damage_numbers
            .retain(|number| number.age < DAMAGE_NUMBER_LIFETIME);
    }

    /// Damage numbers still on screen.
    #[must_use]
    pub fn damage_numbers(&self) -> &[DamageNumber] {
        &self.damage_numbers
    }

    /// Strength of the damage flash, from 1 right after a hit down to 0.
    #[must_use]
    pub fn flash_intensity(&self) -> f32 {
        self.flash_remaining / FLASH_DURATION
    }

    /// Sounds triggered by the most recently absorbed events.
    #[must_use]
    pub fn cues(&self) -> &[SoundKey] {
        &self.cues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fish_survivor_core::EnemyId;

    fn hit(amount: f32) -> Event {
        Event::EnemyDamaged {
            enemy: EnemyId::new(7),
            position: Vec2::new(100.0, 100.0),
            amount,
        }
    }

    #[test]
    fn damage_numbers_rise_and_fade() {
        let mut effects = VisualEffects::new();
        effects.absorb(&[hit(11.6)]);
        let number = &effects.damage_numbers()[0];
        assert_eq!(number.position, Vec2::new(100.0, 80.0));
        assert_eq!(number.label(), "12");
        assert_eq!(number.opacity(), 1.0);

        effects.advance(0.5);
        let number = &effects.damage_numbers()[0];
        assert!((number.position.y - 50.0).abs() < 1e-4);
        assert!((number.opacity() - 0.4).abs() < 1e-4);

        effects.advance(0.5);
        assert!(effects.damage_numbers().is_empty());
    }

    #[test]
    fn player_hits_flash_briefly() {
        let mut effects = VisualEffects::new();
        effects.absorb(&[Event::PlayerDamaged {
            amount: 10.0,
            health: 110.0,
        }]);
        assert_eq!(effects.flash_intensity(), 1.0);
        assert_eq!(effects.cues(), &[SoundKey::Damage]);

        effects.advance(0.05);
        assert!((effects.flash_intensity() - 0.5).abs() < 1e-4);
        assert!(effects.cues().is_empty());

        effects.advance(0.2);
        assert_eq!(effects.flash_intensity(), 0.0);
    }

    #[test]
    fn reset_clears_pending_effects() {
        let mut effects = VisualEffects::new();
        effects.absorb(&[hit(5.0), hit(6.0)]);
        effects.absorb(&[Event::WorldReset]);
        assert!(effects.damage_numbers().is_empty());
        assert_eq!(effects.flash_intensity(), 0.0);
    }
}

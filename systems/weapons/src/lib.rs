#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weapon system that turns cooldowns and enemy snapshots into combat commands.
//!
//! Each [`Weapon`] owns its live projectiles and area effects. Updating a
//! weapon never mutates enemies directly; it emits `DamageEnemy`, `StunEnemy`,
//! `SlowEnemy`, and `KnockBackEnemy` commands for the world to apply.

mod targeting;

use std::f32::consts::TAU;

use fish_survivor_core::{Command, EffectSnapshot, EnemyView, WeaponBehavior, WeaponKind};
use glam::Vec2;
use rand::Rng;

pub use targeting::{count_within, densest_point, nearest_enemy};

const PROJECTILE_OPACITY: f32 = 0.7;
const TRAP_OPACITY: f32 = 0.3;
const NET_OPACITY: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
enum EffectKind {
    Projectile { velocity: Vec2, size: f32 },
    Trap { radius: f32, triggered: bool },
    Ring { max_radius: f32, duration: f32 },
    Net { radius: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Effect {
    position: Vec2,
    lifetime: f32,
    kind: EffectKind,
}

/// Cooldown-gated attack owned by the player.
#[derive(Clone, Debug)]
pub struct Weapon {
    kind: WeaponKind,
    damage: f32,
    cooldown: f32,
    cooldown_timer: f32,
    behavior: WeaponBehavior,
    effects: Vec<Effect>,
}

impl Weapon {
    /// Creates a weapon with its baseline parameters, ready to fire.
    #[must_use]
    pub fn new(kind: WeaponKind) -> Self {
        let params = kind.params();
        Self {
            kind,
            damage: params.damage,
            cooldown: params.cooldown,
            cooldown_timer: 0.0,
            behavior: params.behavior,
            effects: Vec::new(),
        }
    }

    /// Counts down the cooldown, fires when ready, and advances live effects.
    ///
    /// Returns the position of the emitted effect when the weapon fired.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        player: Vec2,
        enemies: &EnemyView,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) -> Option<Vec2> {
        self.cooldown_timer -= dt;

        let fired = if self.cooldown_timer <= 0.0 {
            let fired = self.fire(player, enemies, rng, out);
            if fired.is_some() {
                self.cooldown_timer = self.cooldown;
            }
            fired
        } else {
            None
        };

        self.advance_effects(dt, enemies, out);
        fired
    }

    fn fire<R: Rng + ?Sized>(
        &mut self,
        player: Vec2,
        enemies: &EnemyView,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) -> Option<Vec2> {
        match self.behavior {
            WeaponBehavior::Projectile {
                speed,
                lifetime,
                size,
            } => {
                let target = nearest_enemy(player, enemies)?;
                let velocity = (target.position - player).normalize_or_zero() * speed;
                self.effects.push(Effect {
                    position: player,
                    lifetime,
                    kind: EffectKind::Projectile { velocity, size },
                });
                Some(player)
            }
            WeaponBehavior::Trap {
                radius,
                lifetime,
                inner_distance,
                outer_distance,
                ..
            } => {
                let angle = rng.gen::<f32>() * TAU;
                let spread = outer_distance - inner_distance;
                let distance = inner_distance + rng.gen::<f32>() * spread;
                let position = player + Vec2::from_angle(angle) * distance;
                self.effects.push(Effect {
                    position,
                    lifetime,
                    kind: EffectKind::Trap {
                        radius,
                        triggered: false,
                    },
                });
                Some(position)
            }
            WeaponBehavior::Burst {
                radius,
                duration,
                knockback,
            } => {
                self.effects.push(Effect {
                    position: player,
                    lifetime: duration,
                    kind: EffectKind::Ring {
                        max_radius: radius,
                        duration,
                    },
                });
                for enemy in enemies.iter() {
                    let offset = enemy.position - player;
                    if offset.length() >= radius {
                        continue;
                    }
                    out.push(Command::DamageEnemy {
                        enemy: enemy.id,
                        amount: self.damage,
                    });
                    let push = offset.normalize_or_zero() * knockback;
                    if push != Vec2::ZERO {
                        out.push(Command::KnockBackEnemy {
                            enemy: enemy.id,
                            offset: push,
                        });
                    }
                }
                Some(player)
            }
            WeaponBehavior::Net {
                radius,
                duration,
                slow_factor,
                search_radius,
                search_step,
            } => {
                let (position, _) =
                    densest_point(player, enemies, radius, search_radius, search_step)?;
                self.effects.push(Effect {
                    position,
                    lifetime: duration,
                    kind: EffectKind::Net { radius },
                });
                for enemy in enemies.iter() {
                    if position.distance(enemy.position) >= radius {
                        continue;
                    }
                    out.push(Command::DamageEnemy {
                        enemy: enemy.id,
                        amount: self.damage,
                    });
                    out.push(Command::SlowEnemy {
                        enemy: enemy.id,
                        duration,
                        factor: slow_factor,
                    });
                }
                Some(position)
            }
        }
    }

    fn advance_effects(&mut self, dt: f32, enemies: &EnemyView, out: &mut Vec<Command>) {
        let stun_duration = match self.behavior {
            WeaponBehavior::Trap { stun_duration, .. } => stun_duration,
            _ => 0.0,
        };

        for index in (0..self.effects.len()).rev() {
            let damage = self.damage;
            let effect = &mut self.effects[index];
            effect.lifetime -= dt;
            if effect.lifetime <= 0.0 {
                let _ = self.effects.remove(index);
                continue;
            }

            let spent = match effect.kind {
                EffectKind::Projectile { velocity, size } => {
                    effect.position += velocity * dt;
                    let position = effect.position;
                    let hit = enemies.iter().find(|enemy| {
                        position.distance(enemy.position) < size / 2.0 + enemy.size / 3.0
                    });
                    if let Some(enemy) = hit {
                        out.push(Command::DamageEnemy {
                            enemy: enemy.id,
                            amount: damage,
                        });
                    }
                    hit.is_some()
                }
                EffectKind::Trap {
                    radius,
                    triggered: false,
                } => {
                    let position = effect.position;
                    let caught = enemies
                        .iter()
                        .find(|enemy| position.distance(enemy.position) < radius);
                    if let Some(enemy) = caught {
                        effect.kind = EffectKind::Trap {
                            radius,
                            triggered: true,
                        };
                        out.push(Command::StunEnemy {
                            enemy: enemy.id,
                            duration: stun_duration,
                        });
                    }
                    false
                }
                EffectKind::Trap { .. } | EffectKind::Ring { .. } | EffectKind::Net { .. } => false,
            };

            if spent {
                let _ = self.effects.remove(index);
            }
        }
    }

    /// Multiplies the damage dealt per hit.
    pub fn scale_damage(&mut self, factor: f32) {
        self.damage *= factor;
    }

    /// Multiplies the time between activations.
    pub fn scale_cooldown(&mut self, factor: f32) {
        self.cooldown *= factor;
    }

    /// Kind of the weapon.
    #[must_use]
    pub const fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Damage dealt per hit.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Seconds between activations.
    #[must_use]
    pub const fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Seconds until the weapon may fire again; zero or negative when ready.
    #[must_use]
    pub const fn cooldown_timer(&self) -> f32 {
        self.cooldown_timer
    }

    /// Captures the weapon's live projectiles and effects for rendering.
    #[must_use]
    pub fn effects(&self) -> Vec<EffectSnapshot> {
        self.effects
            .iter()
            .map(|effect| self.effect_snapshot(effect))
            .collect()
    }

    fn effect_snapshot(&self, effect: &Effect) -> EffectSnapshot {
        let (radius, opacity, triggered) = match effect.kind {
            EffectKind::Projectile { size, .. } => (size / 2.0, PROJECTILE_OPACITY, false),
            EffectKind::Trap { radius, triggered } => (radius, TRAP_OPACITY, triggered),
            EffectKind::Ring {
                max_radius,
                duration,
            } => {
                let progress = (1.0 - effect.lifetime / duration).clamp(0.0, 1.0);
                (max_radius * progress, 1.0 - progress, false)
            }
            EffectKind::Net { radius } => (radius, NET_OPACITY, false),
        };
        EffectSnapshot {
            weapon: self.kind,
            position: effect.position,
            radius,
            opacity,
            triggered,
        }
    }
}

/// Ordered collection of the player's weapons.
#[derive(Clone, Debug)]
pub struct Arsenal {
    weapons: Vec<Weapon>,
}

impl Default for Arsenal {
    fn default() -> Self {
        Self::new()
    }
}

impl Arsenal {
    /// Creates the starting arsenal holding only the bubble gun.
    #[must_use]
    pub fn new() -> Self {
        Self {
            weapons: vec![Weapon::new(WeaponKind::Bubble)],
        }
    }

    /// Appends a fresh weapon of `kind`; returns `false` if one is already held.
    pub fn push(&mut self, kind: WeaponKind) -> bool {
        if self.has(kind) {
            return false;
        }
        self.weapons.push(Weapon::new(kind));
        true
    }

    /// Reports whether a weapon of `kind` is held.
    #[must_use]
    pub fn has(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|weapon| weapon.kind() == kind)
    }

    /// Number of weapons held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    /// Reports whether no weapon is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    /// Mutable access to the weapon at `index` in firing order.
    pub fn weapon_mut(&mut self, index: usize) -> Option<&mut Weapon> {
        self.weapons.get_mut(index)
    }

    /// Iterator over the weapons in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &Weapon> {
        self.weapons.iter()
    }

    /// Multiplies the damage of every held weapon.
    pub fn scale_damage(&mut self, factor: f32) {
        for weapon in &mut self.weapons {
            weapon.scale_damage(factor);
        }
    }

    /// Multiplies the cooldown of every held weapon.
    pub fn scale_cooldown(&mut self, factor: f32) {
        for weapon in &mut self.weapons {
            weapon.scale_cooldown(factor);
        }
    }

    /// Captures the live effects of every weapon in firing order.
    #[must_use]
    pub fn effects(&self) -> Vec<EffectSnapshot> {
        self.weapons.iter().flat_map(Weapon::effects).collect()
    }
}

use fish_survivor_core::{
    EffectSnapshot, EnemyKind, EnemySnapshot, FrameSnapshot, PickupKind, PickupSnapshot,
    PlayerSnapshot, WeaponKind,
};
use glam::Vec2;

use crate::{
    health_color, AssetSource, Color, HudPresentation, Overlay, SoundHandle, SpriteHandle,
    SpriteKey, VisualEffects,
};

/// Distance between background grid lines.
pub const GRID_SPACING: f32 = 50.0;

const BACKDROP: Color = Color::from_hex(0x0a1a2a);
const GRID_LINE: Color = Color::new(1.0, 1.0, 1.0, 0.1);
const WATER: Color = Color::from_rgb_u8(100, 200, 255);
const NET: Color = Color::from_rgb_u8(200, 200, 200);
const PLAYER: Color = Color::from_hex(0x4a90e2);
const STUNNED: Color = Color::from_hex(0x888888);
const BAR_BACKGROUND: Color = Color::new(0.0, 0.0, 0.0, 0.5);
const STUN_TINT: Color = Color::new(0.55, 0.65, 1.0, 1.0);
const SLOW_TINT: Color = Color::new(0.8, 0.65, 1.0, 1.0);
const FLASH: Color = Color::new(1.0, 0.0, 0.0, 0.3);

const PLAYER_BAR: Vec2 = Vec2::new(60.0, 8.0);
const PLAYER_BAR_GAP: f32 = 15.0;
const ENEMY_BAR_HEIGHT: f32 = 6.0;
const ENEMY_BAR_GAP: f32 = 10.0;
const DAMAGE_TEXT_SIZE: f32 = 16.0;
const PULSE_AMPLITUDE: f32 = 0.2;

/// Outline drawn around a circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Outline color.
    pub color: Color,
    /// Line thickness in pixels.
    pub thickness: f32,
    /// Whether the outline is dashed.
    pub dashed: bool,
}

impl Stroke {
    const fn solid(color: Color, thickness: f32) -> Self {
        Self {
            color,
            thickness,
            dashed: false,
        }
    }
}

/// Drawing primitive emitted by scene construction, in screen coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Fills the whole viewport.
    Clear(Color),
    /// Straight line segment.
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Line thickness.
        thickness: f32,
        /// Line color.
        color: Color,
    },
    /// One frame of a sprite sheet.
    Sprite {
        /// Texture holding the sheet.
        sprite: SpriteHandle,
        /// Frame index within the sheet.
        frame: u8,
        /// Centre of the drawn sprite.
        center: Vec2,
        /// Drawn size.
        size: Vec2,
        /// Mirror horizontally.
        flip_x: bool,
        /// Multiplicative tint, including opacity.
        tint: Color,
    },
    /// Filled and/or outlined circle.
    Circle {
        /// Circle centre.
        center: Vec2,
        /// Circle radius.
        radius: f32,
        /// Fill color.
        fill: Option<Color>,
        /// Outline.
        stroke: Option<Stroke>,
    },
    /// Horizontal bar partially filled from the left.
    Bar {
        /// Top-left corner.
        origin: Vec2,
        /// Full bar size.
        size: Vec2,
        /// Filled share in `0.0..=1.0`.
        fraction: f32,
        /// Fill color.
        fill: Color,
        /// Color behind the fill.
        background: Color,
        /// Optional border.
        outline: Option<Color>,
    },
    /// Centred text.
    Text {
        /// Text content.
        text: String,
        /// Centre of the text baseline.
        position: Vec2,
        /// Font size in pixels.
        size: f32,
        /// Text color.
        color: Color,
    },
    /// Translucent color over the entire viewport.
    ScreenTint(Color),
}

/// Everything a backend presents for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Viewport the commands were laid out for.
    pub viewport: Vec2,
    /// Play field drawing, back to front.
    pub commands: Vec<DrawCommand>,
    /// Heads-up display drawn above the play field.
    pub hud: HudPresentation,
    /// Modal screen drawn above everything else.
    pub overlay: Option<Overlay>,
    /// Sounds to start this frame.
    pub sounds: Vec<SoundHandle>,
}

impl Scene {
    /// Lays out a frame: grid, pickups, weapon effects, enemies, player,
    /// damage numbers and the damage flash, in that order.
    ///
    /// Anything `assets` cannot supply is drawn with primitive shapes.
    #[must_use]
    pub fn build(
        snapshot: &FrameSnapshot,
        effects: &VisualEffects,
        assets: &dyn AssetSource,
    ) -> Self {
        let mut commands = Vec::new();

        push_backdrop(&mut commands, snapshot, assets);
        for pickup in &snapshot.pickups {
            push_pickup(&mut commands, pickup, assets);
        }
        for effect in &snapshot.effects {
            push_effect(&mut commands, effect, assets);
        }
        for enemy in snapshot.enemies.iter() {
            push_enemy(&mut commands, enemy, assets);
        }
        push_player(&mut commands, &snapshot.player, assets);

        for number in effects.damage_numbers() {
            commands.push(DrawCommand::Text {
                text: number.label(),
                position: number.position,
                size: DAMAGE_TEXT_SIZE,
                color: Color::WHITE.with_alpha(number.opacity()),
            });
        }

        let flash = effects.flash_intensity();
        if flash > 0.0 {
            commands.push(DrawCommand::ScreenTint(
                FLASH.with_alpha(FLASH.alpha * flash),
            ));
        }

        Self {
            viewport: snapshot.viewport,
            commands,
            hud: HudPresentation::from_snapshot(&snapshot.hud),
            overlay: Overlay::for_snapshot(snapshot),
            sounds: effects
                .cues()
                .iter()
                .filter_map(|cue| assets.sound(*cue))
                .collect(),
        }
    }
}

fn push_backdrop(
    commands: &mut Vec<DrawCommand>,
    snapshot: &FrameSnapshot,
    assets: &dyn AssetSource,
) {
    let viewport = snapshot.viewport;
    commands.push(DrawCommand::Clear(BACKDROP));
    if let Some(sheet) = assets.image(SpriteKey::Background) {
        commands.push(DrawCommand::Sprite {
            sprite: sheet.handle(),
            frame: 0,
            center: viewport / 2.0,
            size: viewport,
            flip_x: false,
            tint: Color::WHITE,
        });
    }

    // Offset by the player position so the grid scrolls under it.
    let offset = Vec2::new(
        snapshot.player.position.x.rem_euclid(GRID_SPACING),
        snapshot.player.position.y.rem_euclid(GRID_SPACING),
    );
    let mut x = -offset.x;
    while x < viewport.x {
        commands.push(DrawCommand::Line {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, viewport.y),
            thickness: 1.0,
            color: GRID_LINE,
        });
        x += GRID_SPACING;
    }
    let mut y = -offset.y;
    while y < viewport.y {
        commands.push(DrawCommand::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(viewport.x, y),
            thickness: 1.0,
            color: GRID_LINE,
        });
        y += GRID_SPACING;
    }
}

fn push_pickup(commands: &mut Vec<DrawCommand>, pickup: &PickupSnapshot, assets: &dyn AssetSource) {
    let size = pickup.size * (pickup.pulse_phase.sin() * PULSE_AMPLITUDE + 1.0);
    if let Some(sheet) = assets.image(SpriteKey::Pickup(pickup.kind)) {
        commands.push(DrawCommand::Sprite {
            sprite: sheet.handle(),
            frame: 0,
            center: pickup.position,
            size: Vec2::splat(size),
            flip_x: false,
            tint: Color::WHITE,
        });
        return;
    }

    commands.push(DrawCommand::Circle {
        center: pickup.position,
        radius: size / 2.0,
        fill: Some(pickup_color(pickup.kind)),
        stroke: Some(Stroke::solid(Color::WHITE, 1.0)),
    });
}

fn push_effect(commands: &mut Vec<DrawCommand>, effect: &EffectSnapshot, assets: &dyn AssetSource) {
    if let Some(sheet) = assets.image(SpriteKey::Weapon(effect.weapon)) {
        let opacity = match effect.weapon {
            WeaponKind::WaterWave => effect.opacity,
            _ => 1.0,
        };
        commands.push(DrawCommand::Sprite {
            sprite: sheet.handle(),
            frame: 0,
            center: effect.position,
            size: Vec2::splat(effect.radius * 2.0),
            flip_x: false,
            tint: Color::WHITE.with_alpha(opacity),
        });
        return;
    }

    let (fill, stroke) = match effect.weapon {
        WeaponKind::Bubble => (WATER.with_alpha(effect.opacity), None),
        WeaponKind::BubbleTrap => {
            let fade = if effect.triggered { 0.5 } else { 1.0 };
            (
                WATER.with_alpha(effect.opacity * fade),
                Some(Stroke::solid(WATER.with_alpha(0.7 * fade), 2.0)),
            )
        }
        WeaponKind::WaterWave => (
            WATER.with_alpha(effect.opacity * 0.3),
            Some(Stroke::solid(WATER.with_alpha(effect.opacity * 0.7), 3.0)),
        ),
        WeaponKind::FishingNet => (
            NET.with_alpha(effect.opacity),
            Some(Stroke {
                color: NET.with_alpha(0.7),
                thickness: 2.0,
                dashed: true,
            }),
        ),
    };
    commands.push(DrawCommand::Circle {
        center: effect.position,
        radius: effect.radius,
        fill: Some(fill),
        stroke,
    });
}

fn push_enemy(commands: &mut Vec<DrawCommand>, enemy: &EnemySnapshot, assets: &dyn AssetSource) {
    if let Some(sheet) = assets.image(SpriteKey::Enemy(enemy.kind)) {
        let tint = if enemy.stunned {
            STUN_TINT
        } else if enemy.slowed {
            SLOW_TINT
        } else {
            Color::WHITE
        };
        commands.push(DrawCommand::Sprite {
            sprite: sheet.handle(),
            frame: sheet.frame_for(enemy.animation_frame),
            center: enemy.position,
            size: Vec2::splat(enemy.size),
            flip_x: enemy.facing < 0.0,
            tint,
        });
    } else {
        let fill = if enemy.stunned {
            STUNNED
        } else {
            enemy_color(enemy.kind)
        };
        commands.push(DrawCommand::Circle {
            center: enemy.position,
            radius: enemy.size / 3.0,
            fill: Some(fill),
            stroke: None,
        });
    }

    let fraction = health_fraction(enemy.health, enemy.max_health);
    let half = enemy.size / 2.0;
    commands.push(DrawCommand::Bar {
        origin: enemy.position - Vec2::new(half, half + ENEMY_BAR_GAP),
        size: Vec2::new(enemy.size, ENEMY_BAR_HEIGHT),
        fraction,
        fill: health_color(fraction),
        background: BAR_BACKGROUND,
        outline: None,
    });
}

fn push_player(commands: &mut Vec<DrawCommand>, player: &PlayerSnapshot, assets: &dyn AssetSource) {
    let alpha = if is_blinking(player) { 0.5 } else { 1.0 };
    if let Some(sheet) = assets.image(SpriteKey::Player) {
        commands.push(DrawCommand::Sprite {
            sprite: sheet.handle(),
            frame: sheet.frame_for(player.animation_frame),
            center: player.position,
            size: player.size,
            flip_x: player.facing < 0.0,
            tint: Color::WHITE.with_alpha(alpha),
        });
    } else {
        commands.push(DrawCommand::Circle {
            center: player.position,
            radius: player.size.x / 3.0,
            fill: Some(PLAYER.with_alpha(alpha)),
            stroke: None,
        });
    }

    let fraction = health_fraction(player.health, player.max_health);
    commands.push(DrawCommand::Bar {
        origin: player.position
            - Vec2::new(PLAYER_BAR.x / 2.0, player.size.y / 2.0 + PLAYER_BAR_GAP),
        size: PLAYER_BAR,
        fraction,
        fill: health_color(fraction),
        background: BAR_BACKGROUND,
        outline: Some(Color::WHITE),
    });
}

/// Invulnerable players blink at 5 Hz, dimmed on even tenths of a second.
fn is_blinking(player: &PlayerSnapshot) -> bool {
    player
        .invulnerable_elapsed
        .is_some_and(|elapsed| (elapsed * 10.0).floor() as i64 % 2 == 0)
}

fn health_fraction(health: f32, max_health: f32) -> f32 {
    if max_health > 0.0 {
        (health / max_health).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

const fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Fish => Color::from_hex(0xff6b6b),
        EnemyKind::Crab => Color::from_hex(0xff9e64),
        EnemyKind::Octopus => Color::from_hex(0x9775fa),
        EnemyKind::Jellyfish => Color::from_hex(0x5fb3ff),
        EnemyKind::Shark => Color::from_hex(0x495057),
    }
}

const fn pickup_color(kind: PickupKind) -> Color {
    match kind {
        PickupKind::Experience => Color::from_hex(0x4caf50),
        PickupKind::Health => Color::from_hex(0xf44336),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NullAssets, SoundKey, SpriteSheet};
    use fish_survivor_core::{EnemyId, EnemyView, Event, Phase};

    struct PlayerOnly;

    impl AssetSource for PlayerOnly {
        fn image(&self, key: SpriteKey) -> Option<SpriteSheet> {
            match key {
                SpriteKey::Player => SpriteSheet::new(key, SpriteHandle::new(1), 4).ok(),
                _ => None,
            }
        }

        fn sound(&self, key: SoundKey) -> Option<SoundHandle> {
            match key {
                SoundKey::Damage => Some(SoundHandle::new(9)),
                _ => None,
            }
        }
    }

    fn snapshot() -> FrameSnapshot {
        FrameSnapshot {
            viewport: Vec2::new(200.0, 100.0),
            player: PlayerSnapshot {
                position: Vec2::new(100.0, 50.0),
                size: Vec2::splat(64.0),
                facing: -1.0,
                animation_frame: 2,
                health: 60.0,
                max_health: 120.0,
                invulnerable_elapsed: None,
            },
            enemies: EnemyView::from_snapshots(vec![EnemySnapshot {
                id: EnemyId::new(0),
                kind: EnemyKind::Crab,
                position: Vec2::new(20.0, 20.0),
                size: 48.0,
                health: 10.0,
                max_health: 40.0,
                facing: 1.0,
                animation_frame: 1,
                stunned: true,
                slowed: false,
            }]),
            pickups: vec![PickupSnapshot {
                kind: PickupKind::Experience,
                position: Vec2::new(150.0, 80.0),
                size: 24.0,
                pulse_phase: 0.0,
            }],
            effects: vec![EffectSnapshot {
                weapon: WeaponKind::FishingNet,
                position: Vec2::new(50.0, 50.0),
                radius: 80.0,
                opacity: 0.2,
                triggered: false,
            }],
            phase: Phase::Running,
            ..FrameSnapshot::default()
        }
    }

    fn kinds(scene: &Scene) -> Vec<&'static str> {
        scene
            .commands
            .iter()
            .map(|command| match command {
                DrawCommand::Clear(_) => "clear",
                DrawCommand::Line { .. } => "line",
                DrawCommand::Sprite { .. } => "sprite",
                DrawCommand::Circle { .. } => "circle",
                DrawCommand::Bar { .. } => "bar",
                DrawCommand::Text { .. } => "text",
                DrawCommand::ScreenTint(_) => "tint",
            })
            .filter(|kind| *kind != "line")
            .collect()
    }

    #[test]
    fn layers_are_drawn_back_to_front() {
        let scene = Scene::build(&snapshot(), &VisualEffects::new(), &NullAssets);
        assert_eq!(
            kinds(&scene),
            vec!["clear", "circle", "circle", "circle", "bar", "circle", "bar"]
        );
        assert!(scene.overlay.is_none());
        assert!(scene.sounds.is_empty());
    }

    #[test]
    fn grid_scrolls_with_the_player() {
        let scene = Scene::build(&snapshot(), &VisualEffects::new(), &NullAssets);
        let verticals: Vec<f32> = scene
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Line { from, to, .. } if from.x == to.x => Some(from.x),
                _ => None,
            })
            .collect();
        assert_eq!(verticals, vec![0.0, 50.0, 100.0, 150.0]);
    }

    #[test]
    fn missing_sprites_fall_back_to_palette_circles() {
        let scene = Scene::build(&snapshot(), &VisualEffects::new(), &NullAssets);
        let enemy = scene
            .commands
            .iter()
            .find(|command| {
                matches!(
                    command,
                    DrawCommand::Circle { center, .. } if *center == Vec2::new(20.0, 20.0)
                )
            })
            .expect("enemy fallback");
        assert_eq!(
            enemy,
            &DrawCommand::Circle {
                center: Vec2::new(20.0, 20.0),
                radius: 16.0,
                fill: Some(STUNNED),
                stroke: None,
            }
        );
    }

    #[test]
    fn loaded_sprites_replace_fallback_art() {
        let mut effects = VisualEffects::new();
        effects.absorb(&[Event::PlayerDamaged {
            amount: 10.0,
            health: 50.0,
        }]);
        let scene = Scene::build(&snapshot(), &effects, &PlayerOnly);

        assert!(scene.commands.contains(&DrawCommand::Sprite {
            sprite: SpriteHandle::new(1),
            frame: 2,
            center: Vec2::new(100.0, 50.0),
            size: Vec2::splat(64.0),
            flip_x: true,
            tint: Color::WHITE,
        }));
        assert_eq!(scene.commands.last(), Some(&DrawCommand::ScreenTint(FLASH)));
        assert_eq!(scene.sounds, vec![SoundHandle::new(9)]);
    }

    #[test]
    fn invulnerable_player_blinks() {
        let mut frame = snapshot();
        frame.player.invulnerable_elapsed = Some(0.05);
        assert!(is_blinking(&frame.player));
        frame.player.invulnerable_elapsed = Some(0.15);
        assert!(!is_blinking(&frame.player));
        frame.player.invulnerable_elapsed = None;
        assert!(!is_blinking(&frame.player));
    }
}

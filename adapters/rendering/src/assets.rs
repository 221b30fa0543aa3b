use fish_survivor_core::{EnemyKind, Event, PickupKind, WeaponKind};

use crate::RenderingError;

/// Identifies an image an [`AssetSource`] may supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// The player's sprite sheet.
    Player,
    /// An enemy's sprite sheet.
    Enemy(EnemyKind),
    /// Artwork for a weapon effect.
    Weapon(WeaponKind),
    /// Artwork for a pickup.
    Pickup(PickupKind),
    /// Backdrop stretched across the viewport.
    Background,
}

impl SpriteKey {
    /// Every sprite key, in manifest order.
    pub const ALL: [Self; 13] = [
        Self::Player,
        Self::Enemy(EnemyKind::Fish),
        Self::Enemy(EnemyKind::Crab),
        Self::Enemy(EnemyKind::Octopus),
        Self::Enemy(EnemyKind::Jellyfish),
        Self::Enemy(EnemyKind::Shark),
        Self::Weapon(WeaponKind::Bubble),
        Self::Weapon(WeaponKind::BubbleTrap),
        Self::Weapon(WeaponKind::WaterWave),
        Self::Weapon(WeaponKind::FishingNet),
        Self::Pickup(PickupKind::Experience),
        Self::Pickup(PickupKind::Health),
        Self::Background,
    ];

    /// Name used to look the sprite up in asset manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Enemy(EnemyKind::Fish) => "fish",
            Self::Enemy(EnemyKind::Crab) => "crab",
            Self::Enemy(EnemyKind::Octopus) => "octopus",
            Self::Enemy(EnemyKind::Jellyfish) => "jellyfish",
            Self::Enemy(EnemyKind::Shark) => "shark",
            Self::Weapon(WeaponKind::Bubble) => "bubble",
            Self::Weapon(WeaponKind::BubbleTrap) => "bubble_trap",
            Self::Weapon(WeaponKind::WaterWave) => "water_wave",
            Self::Weapon(WeaponKind::FishingNet) => "fishing_net",
            Self::Pickup(PickupKind::Experience) => "exp",
            Self::Pickup(PickupKind::Health) => "health",
            Self::Background => "background",
        }
    }

    /// Resolves a manifest name back to its key.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

/// Identifies a sound an [`AssetSource`] may supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundKey {
    /// A bubble was fired.
    Bubble,
    /// The player was hurt.
    Damage,
    /// The player reached a new level.
    LevelUp,
    /// A pickup was collected.
    Pickup,
    /// The run ended.
    GameOver,
}

impl SoundKey {
    /// Name used to look the sound up in asset manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Damage => "damage",
            Self::LevelUp => "level_up",
            Self::Pickup => "pickup",
            Self::GameOver => "game_over",
        }
    }
}

/// Maps a simulation event onto the sound it should trigger.
#[must_use]
pub fn sound_cue(event: &Event) -> Option<SoundKey> {
    match event {
        Event::PlayerDamaged { .. } => Some(SoundKey::Damage),
        Event::LeveledUp { .. } => Some(SoundKey::LevelUp),
        Event::PickupCollected { .. } => Some(SoundKey::Pickup),
        Event::GameOver { .. } => Some(SoundKey::GameOver),
        Event::WeaponFired {
            weapon: WeaponKind::Bubble,
            ..
        } => Some(SoundKey::Bubble),
        _ => None,
    }
}

/// Opaque backend-assigned handle to a loaded texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteHandle(u32);

impl SpriteHandle {
    /// Wraps a backend texture index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Backend texture index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Opaque backend-assigned handle to a loaded sound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SoundHandle(u32);

impl SoundHandle {
    /// Wraps a backend sound index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Backend sound index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// A loaded image laid out as a horizontal strip of equally sized frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteSheet {
    handle: SpriteHandle,
    frames: u8,
}

impl SpriteSheet {
    /// Describes a texture holding `frames` animation frames side by side.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::EmptySpriteSheet`] when `frames` is zero.
    pub fn new(key: SpriteKey, handle: SpriteHandle, frames: u8) -> Result<Self, RenderingError> {
        if frames == 0 {
            return Err(RenderingError::EmptySpriteSheet { key });
        }
        Ok(Self { handle, frames })
    }

    /// Texture backing the sheet.
    #[must_use]
    pub const fn handle(&self) -> SpriteHandle {
        self.handle
    }

    /// Number of frames in the strip.
    #[must_use]
    pub const fn frames(&self) -> u8 {
        self.frames
    }

    /// Frame to draw for an entity on animation frame `frame`.
    ///
    /// Single-frame sheets always show their only frame.
    #[must_use]
    pub const fn frame_for(&self, frame: u8) -> u8 {
        frame % self.frames
    }
}

/// Supplies images and sounds to scene construction.
///
/// Every lookup may miss; scenes fall back to primitive art and silence.
pub trait AssetSource {
    /// Sprite sheet registered for `key`, if one was loaded.
    fn image(&self, key: SpriteKey) -> Option<SpriteSheet>;

    /// Sound registered for `key`, if one was loaded.
    fn sound(&self, key: SoundKey) -> Option<SoundHandle>;
}

/// Asset source with nothing loaded.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAssets;

impl AssetSource for NullAssets {
    fn image(&self, _key: SpriteKey) -> Option<SpriteSheet> {
        None
    }

    fn sound(&self, _key: SoundKey) -> Option<SoundHandle> {
        None
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Fish Survivor adapters.
//!
//! Backends never look at the simulation directly. Each frame they hand the
//! update closure a [`FrameInput`] and an [`AssetSource`], and receive a
//! [`Scene`]: a back-to-front list of [`DrawCommand`] values plus the HUD,
//! the optional modal [`Overlay`] and the sounds to play.

mod assets;
mod effects;
mod hud;
mod scene;

use anyhow::Result as AnyResult;
use fish_survivor_core::DirectionalKey;
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

pub use assets::{
    sound_cue, AssetSource, NullAssets, SoundHandle, SoundKey, SpriteHandle, SpriteKey,
    SpriteSheet,
};
pub use effects::{DamageNumber, VisualEffects};
pub use hud::{format_clock, health_color, HudPresentation, OfferCard, Overlay};
pub use scene::{DrawCommand, Scene, Stroke, GRID_SPACING};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Touch gesture reported by an adapter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchInput {
    /// The finger moved; the delta is measured from where the touch began.
    Drag(Vec2),
    /// The finger was lifted.
    End,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Directional key transitions observed this frame, in arrival order.
    pub directional: Vec<(DirectionalKey, bool)>,
    /// Touch gesture observed this frame, if any.
    pub touch: Option<TouchInput>,
    /// Zero-based index of the upgrade card chosen this frame.
    pub upgrade_choice: Option<usize>,
    /// Whether a restart was requested this frame.
    pub restart: bool,
}

/// Describes the window a backend should open.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Logical size of the play field in pixels.
    pub viewport: Vec2,
    /// Solid color used to clear each frame before the scene is drawn.
    pub clear_color: Color,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidViewport`] when either extent is not
    /// strictly positive.
    pub fn new<T>(
        window_title: T,
        viewport: Vec2,
        clear_color: Color,
    ) -> std::result::Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if !(viewport.x > 0.0 && viewport.y > 0.0) {
            return Err(RenderingError::InvalidViewport {
                width: viewport.x,
                height: viewport.y,
            });
        }

        Ok(Self {
            window_title: window_title.into(),
            viewport,
            clear_color,
        })
    }
}

/// Trait implemented by rendering backends capable of presenting scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta, the input
    /// captured by the adapter and the backend's loaded assets, and returns
    /// the scene to present for that frame.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &dyn AssetSource) -> Scene + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The viewport must have positive extents.
    InvalidViewport {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
    /// A sprite sheet needs at least one frame.
    EmptySpriteSheet {
        /// Sprite whose sheet was rejected.
        key: SpriteKey,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(f, "viewport must be positive (received {width}x{height})")
            }
            Self::EmptySpriteSheet { key } => {
                write!(f, "sprite sheet for `{}` has no frames", key.name())
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_unpack_channels() {
        let color = Color::from_hex(0xff9e64);
        assert_eq!(color, Color::from_rgb_u8(0xff, 0x9e, 0x64));
        assert_eq!(color.alpha, 1.0);
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::new(0.0, 0.5, 1.0, 0.25).lighten(0.5);
        assert_eq!(color, Color::new(0.5, 0.75, 1.0, 0.25));
        assert_eq!(Color::new(0.2, 0.2, 0.2, 1.0).lighten(4.0), Color::WHITE);
    }

    #[test]
    fn presentation_rejects_degenerate_viewports() {
        let error = Presentation::new("fish", Vec2::new(800.0, 0.0), Color::WHITE)
            .expect_err("zero height must be rejected");
        assert_eq!(
            error,
            RenderingError::InvalidViewport {
                width: 800.0,
                height: 0.0
            }
        );

        let presentation = Presentation::new("fish", Vec2::new(800.0, 600.0), Color::WHITE)
            .expect("positive viewport");
        assert_eq!(presentation.window_title, "fish");
    }

    #[test]
    fn errors_render_readable_messages() {
        let error = RenderingError::EmptySpriteSheet {
            key: SpriteKey::Player,
        };
        assert_eq!(error.to_string(), "sprite sheet for `player` has no frames");
    }
}

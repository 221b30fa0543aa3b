#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Fish Survivor.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! macroquad is built without its default `audio` feature and every sound
//! lookup misses. Sprites come from an optional TOML manifest; anything the
//! manifest does not list is drawn with the scene's primitive fallback art.

mod sprites;
mod ui;

use std::{f32::consts::TAU, path::PathBuf, sync::mpsc, time::Duration};

use anyhow::{Context, Result};
use fish_survivor_core::DirectionalKey;
use fish_survivor_rendering::{
    AssetSource, DrawCommand, FrameInput, NullAssets, Presentation, RenderingBackend, Scene,
    Stroke, TouchInput,
};
use glam::Vec2;
use macroquad::input::{is_key_pressed, is_key_released, touches, KeyCode, TouchPhase};
use tracing::warn;

use self::{
    sprites::{DrawParams, SpriteAtlas},
    ui::{draw_hud, draw_overlay, OverlayActions},
};

const DIRECTIONAL_KEYS: [(KeyCode, DirectionalKey); 8] = [
    (KeyCode::Up, DirectionalKey::Up),
    (KeyCode::W, DirectionalKey::Up),
    (KeyCode::Down, DirectionalKey::Down),
    (KeyCode::S, DirectionalKey::Down),
    (KeyCode::Left, DirectionalKey::Left),
    (KeyCode::A, DirectionalKey::Left),
    (KeyCode::Right, DirectionalKey::Right),
    (KeyCode::D, DirectionalKey::Right),
];

const CHOICE_KEYS: [KeyCode; 3] = [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3];

/// Tracks overlay interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct OverlayInputState {
    choice_latched: Option<usize>,
    restart_latched: bool,
}

impl OverlayInputState {
    /// Returns the latched upgrade choice and clears it so it applies once.
    pub fn take_choice(&mut self) -> Option<usize> {
        self.choice_latched.take()
    }

    /// Records that an upgrade card was clicked this frame.
    pub fn register_choice(&mut self, index: usize) {
        self.choice_latched = Some(index);
    }

    /// Returns whether a restart was latched and clears the latch.
    pub fn take_restart(&mut self) -> bool {
        let latched = self.restart_latched;
        self.restart_latched = false;
        latched
    }

    /// Records that the restart button was clicked this frame.
    pub fn register_restart(&mut self) {
        self.restart_latched = true;
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` quits the game loop.
    quit_requested: bool,
    /// `R` restarts the run.
    restart: bool,
    /// `1`-`3` pick an upgrade card.
    choice: Option<usize>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            restart: is_key_pressed(KeyCode::R),
            choice: CHOICE_KEYS.iter().position(|key| is_key_pressed(*key)),
        }
    }
}

/// Converts touch phases into drag gestures relative to where the touch began.
#[derive(Clone, Copy, Debug, Default)]
struct TouchTracker {
    origin: Option<Vec2>,
}

impl TouchTracker {
    fn observe(&mut self, phase: TouchPhase, position: Vec2, scale: f32) -> Option<TouchInput> {
        match phase {
            TouchPhase::Started => {
                self.origin = Some(position);
                None
            }
            TouchPhase::Moved | TouchPhase::Stationary => {
                let origin = self.origin?;
                Some(TouchInput::Drag((position - origin) / scale))
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.origin = None;
                Some(TouchInput::End)
            }
        }
    }
}

/// Maps the logical viewport onto the window, preserving aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Projection {
    scale: f32,
    offset: Vec2,
}

impl Projection {
    fn fit(viewport: Vec2, screen: Vec2) -> Self {
        let scale = (screen.x / viewport.x).min(screen.y / viewport.y).max(f32::EPSILON);
        Self {
            scale,
            offset: (screen - viewport * scale) / 2.0,
        }
    }

    fn point(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }

    fn length(&self, length: f32) -> f32 {
        length * self.scale
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    load_sprites: bool,
    manifest_path: PathBuf,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            load_sprites: true,
            manifest_path: PathBuf::from("assets/manifest.toml"),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.swap_interval = if enabled { Some(1) } else { Some(0) };
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }

    /// Overrides where the sprite manifest is read from.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &dyn AssetSource) -> Scene + 'static,
    {
        let Self {
            swap_interval,
            load_sprites,
            manifest_path,
        } = self;

        let Presentation {
            window_title,
            viewport,
            clear_color,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: viewport.x.round() as i32,
            window_height: viewport.y.round() as i32,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (atlas_init_sender, atlas_init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let sprite_atlas = if load_sprites {
                match SpriteAtlas::load(&manifest_path).context("failed to initialise sprite atlas")
                {
                    Ok(atlas) => atlas,
                    Err(error) => {
                        let _ = atlas_init_sender.send(Err(error));
                        return;
                    }
                }
            } else {
                None
            };
            let _ = atlas_init_sender.send(Ok(()));

            let assets: &dyn AssetSource = match &sprite_atlas {
                Some(atlas) => atlas,
                None => &NullAssets,
            };
            let background = to_macroquad_color(clear_color);
            let mut overlay_input = OverlayInputState::default();
            let mut touch = TouchTracker::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let projection = Projection::fit(viewport, screen);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input =
                    gather_frame_input(keyboard, &mut overlay_input, &mut touch, projection.scale);

                let scene = update_scene(frame_dt, frame_input, assets);

                macroquad::window::clear_background(background);
                for command in &scene.commands {
                    draw_command(command, &projection, viewport, sprite_atlas.as_ref());
                }
                draw_hud(&scene.hud);
                if let Some(overlay) = &scene.overlay {
                    let mut root = macroquad::ui::root_ui();
                    let OverlayActions { choice, restart } = draw_overlay(
                        &mut root,
                        overlay,
                        macroquad::math::Vec2::new(screen.x, screen.y),
                    );
                    if let Some(index) = choice {
                        overlay_input.register_choice(index);
                    }
                    if restart {
                        overlay_input.register_restart();
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        if let Err(error) = atlas_init_receiver.recv().unwrap_or_else(|_| Ok(())) {
            warn!(%error, "sprite atlas failed to load");
            return Err(error);
        }

        Ok(())
    }
}

fn gather_frame_input(
    keyboard: KeyboardShortcuts,
    overlay_input: &mut OverlayInputState,
    touch: &mut TouchTracker,
    scale: f32,
) -> FrameInput {
    let mut directional = Vec::new();
    for (code, key) in DIRECTIONAL_KEYS {
        if is_key_pressed(code) {
            directional.push((key, true));
        }
        if is_key_released(code) {
            directional.push((key, false));
        }
    }

    let touch_input = touches().into_iter().fold(None, |latest, observed| {
        let position = Vec2::new(observed.position.x, observed.position.y);
        touch.observe(observed.phase, position, scale).or(latest)
    });

    FrameInput {
        directional,
        touch: touch_input,
        upgrade_choice: overlay_input.take_choice().or(keyboard.choice),
        restart: overlay_input.take_restart() || keyboard.restart,
    }
}

fn draw_command(
    command: &DrawCommand,
    projection: &Projection,
    viewport: Vec2,
    sprite_atlas: Option<&SpriteAtlas>,
) {
    match command {
        DrawCommand::Clear(color) | DrawCommand::ScreenTint(color) => {
            let origin = projection.point(Vec2::ZERO);
            let size = viewport * projection.scale;
            macroquad::shapes::draw_rectangle(
                origin.x,
                origin.y,
                size.x,
                size.y,
                to_macroquad_color(*color),
            );
        }
        DrawCommand::Line {
            from,
            to,
            thickness,
            color,
        } => {
            let from = projection.point(*from);
            let to = projection.point(*to);
            macroquad::shapes::draw_line(
                from.x,
                from.y,
                to.x,
                to.y,
                *thickness,
                to_macroquad_color(*color),
            );
        }
        DrawCommand::Sprite {
            sprite,
            frame,
            center,
            size,
            flip_x,
            tint,
        } => {
            let Some(atlas) = sprite_atlas else {
                return;
            };
            let params = DrawParams::new(projection.point(*center), *size * projection.scale)
                .with_flip(*flip_x)
                .with_tint(*tint);
            atlas.draw(*sprite, *frame, params);
        }
        DrawCommand::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            let center = projection.point(*center);
            let radius = projection.length(*radius);
            if let Some(fill) = fill {
                macroquad::shapes::draw_circle(
                    center.x,
                    center.y,
                    radius,
                    to_macroquad_color(*fill),
                );
            }
            if let Some(stroke) = stroke {
                draw_circle_outline(center, radius, *stroke);
            }
        }
        DrawCommand::Bar {
            origin,
            size,
            fraction,
            fill,
            background,
            outline,
        } => {
            let origin = projection.point(*origin);
            let size = *size * projection.scale;
            macroquad::shapes::draw_rectangle(
                origin.x,
                origin.y,
                size.x,
                size.y,
                to_macroquad_color(*background),
            );
            macroquad::shapes::draw_rectangle(
                origin.x,
                origin.y,
                size.x * fraction.clamp(0.0, 1.0),
                size.y,
                to_macroquad_color(*fill),
            );
            if let Some(outline) = outline {
                macroquad::shapes::draw_rectangle_lines(
                    origin.x,
                    origin.y,
                    size.x,
                    size.y,
                    1.0,
                    to_macroquad_color(*outline),
                );
            }
        }
        DrawCommand::Text {
            text,
            position,
            size,
            color,
        } => {
            let position = projection.point(*position);
            let font_size = projection.length(*size);
            let dimensions =
                macroquad::text::measure_text(text, None, font_size.round() as u16, 1.0);
            let _ = macroquad::text::draw_text(
                text,
                position.x - dimensions.width / 2.0,
                position.y,
                font_size,
                to_macroquad_color(*color),
            );
        }
    }
}

fn draw_circle_outline(center: Vec2, radius: f32, stroke: Stroke) {
    let color = to_macroquad_color(stroke.color);
    if !stroke.dashed {
        macroquad::shapes::draw_circle_lines(center.x, center.y, radius, stroke.thickness, color);
        return;
    }

    for (start, end) in dash_segments(center, radius) {
        macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, stroke.thickness, color);
    }
}

/// Alternating 5 px dashes and gaps around a circle.
fn dash_segments(center: Vec2, radius: f32) -> Vec<(Vec2, Vec2)> {
    const DASH: f32 = 5.0;
    let dashes = ((TAU * radius) / (2.0 * DASH)).floor().max(4.0) as usize;
    let step = TAU / dashes as f32;
    (0..dashes)
        .map(|index| {
            let start = step * index as f32;
            let end = start + step / 2.0;
            (
                center + Vec2::from_angle(start) * radius,
                center + Vec2::from_angle(end) * radius,
            )
        })
        .collect()
}

fn to_macroquad_color(color: fish_survivor_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use fish_survivor_rendering::{
    AssetSource, Color, SoundHandle, SoundKey, SpriteHandle, SpriteKey, SpriteSheet,
};
use glam::Vec2;
use macroquad::{
    math::{Rect, Vec2 as MacroquadVec2},
    texture::{self, DrawTextureParams, Texture2D},
};
use tracing::{debug, info};

use crate::to_macroquad_color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Parameters describing how a sprite should be drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawParams {
    /// Screen-space centre of the sprite.
    pub(crate) center: Vec2,
    /// Screen-space size of one frame.
    pub(crate) size: Vec2,
    /// Mirror the frame horizontally.
    pub(crate) flip_x: bool,
    /// Tint applied to the sprite.
    pub(crate) tint: Color,
}

impl DrawParams {
    pub(crate) fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size,
            flip_x: false,
            tint: Color::WHITE,
        }
    }

    pub(crate) fn with_flip(mut self, flip_x: bool) -> Self {
        self.flip_x = flip_x;
        self
    }

    pub(crate) fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

/// Textures loaded from the sprite manifest.
///
/// Sprites the manifest leaves out are simply absent; scenes draw their
/// primitive fallback instead.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: Vec<Texture2D>,
    sheets: HashMap<SpriteKey, SpriteSheet>,
}

impl SpriteAtlas {
    /// Loads the manifest at `path`, or returns `None` when the file does not exist.
    pub(crate) fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            info!(manifest = %path.display(), "no sprite manifest, using fallback art");
            return Ok(None);
        }
        let atlas = Self::from_manifest_with_loader(path, default_loader)?;
        info!(
            manifest = %path.display(),
            sprites = atlas.len(),
            "loaded sprite manifest"
        );
        Ok(Some(atlas))
    }

    /// Draws one frame of the sprite identified by `sprite`.
    pub(crate) fn draw(&self, sprite: SpriteHandle, frame: u8, params: DrawParams) {
        let Some(texture) = self.textures.get(sprite.get() as usize).copied() else {
            return;
        };
        let frames = self
            .sheets
            .values()
            .find(|sheet| sheet.handle() == sprite)
            .map_or(1, SpriteSheet::frames);
        let source = frame_source(texture.width(), texture.height(), frames, frame);

        texture::draw_texture_ex(
            texture,
            params.center.x - params.size.x / 2.0,
            params.center.y - params.size.y / 2.0,
            to_macroquad_color(params.tint),
            DrawTextureParams {
                dest_size: Some(MacroquadVec2::new(params.size.x, params.size.y)),
                source: Some(source),
                flip_x: params.flip_x,
                ..DrawTextureParams::default()
            },
        );
    }

    /// Number of loaded sprites.
    pub(crate) fn len(&self) -> usize {
        self.textures.len()
    }

    fn from_manifest_with_loader(
        manifest_path: &Path,
        mut loader: impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Self::from_entries(entries, &mut loader)
    }

    fn from_entries(
        entries: Vec<ManifestEntry>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = Vec::with_capacity(entries.len());
        let mut sheets = HashMap::with_capacity(entries.len());
        for entry in entries {
            let texture = loader(entry.key, &entry.path).with_context(|| {
                format!(
                    "failed to load sprite `{}` from {}",
                    entry.key.name(),
                    entry.path.display()
                )
            })?;
            let handle = SpriteHandle::new(textures.len() as u32);
            let sheet = SpriteSheet::new(entry.key, handle, entry.frames)?;
            textures.push(texture);
            let _ = sheets.insert(entry.key, sheet);
            debug!(sprite = entry.key.name(), frames = entry.frames, "sprite loaded");
        }
        Ok(Self { textures, sheets })
    }
}

impl AssetSource for SpriteAtlas {
    fn image(&self, key: SpriteKey) -> Option<SpriteSheet> {
        self.sheets.get(&key).copied()
    }

    // Built without macroquad's audio feature, so there is nothing to play.
    fn sound(&self, _key: SoundKey) -> Option<SoundHandle> {
        None
    }
}

fn frame_source(width: f32, height: f32, frames: u8, frame: u8) -> Rect {
    let frame_width = width / f32::from(frames.max(1));
    Rect::new(f32::from(frame) * frame_width, 0.0, frame_width, height)
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    sprites: HashMap<String, SpriteEntry>,
}

#[derive(Debug, serde::Deserialize)]
struct SpriteEntry {
    path: String,
    #[serde(default = "single_frame")]
    frames: u8,
}

const fn single_frame() -> u8 {
    1
}

#[derive(Clone, Debug, PartialEq)]
struct ManifestEntry {
    key: SpriteKey,
    path: PathBuf,
    frames: u8,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<ManifestEntry>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, entry) in manifest.sprites {
        let Some(key) = SpriteKey::from_name(&name) else {
            bail!("unknown sprite key `{name}` in manifest");
        };
        let _ = resolved.insert(key, entry);
    }

    Ok(SpriteKey::ALL
        .into_iter()
        .filter_map(|key| {
            resolved.remove(&key).map(|entry| ManifestEntry {
                key,
                path: base_path.join(entry.path),
                frames: entry.frames,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fish_survivor_core::EnemyKind;
    use std::cell::RefCell;

    #[test]
    fn manifest_rejects_unknown_keys() {
        let manifest = r#"
            version = 1

            [sprites]
            player = { path = "player.png", frames = 4 }
            kraken = { path = "kraken.png" }
        "#;

        let result = parse_manifest(manifest, Path::new("assets"));
        assert!(result.is_err(), "unknown keys must be rejected");
    }

    #[test]
    fn manifest_rejects_other_versions() {
        let manifest = r#"
            version = 2

            [sprites]
            player = { path = "player.png" }
        "#;

        assert!(parse_manifest(manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_entries_are_optional_and_ordered() {
        let manifest = r#"
            version = 1

            [sprites]
            shark = { path = "enemies/shark.png", frames = 4 }
            background = { path = "background.png" }
            player = { path = "player.png", frames = 4 }
        "#;

        let parsed = parse_manifest(manifest, Path::new("root")).expect("manifest should parse");
        assert_eq!(
            parsed,
            vec![
                ManifestEntry {
                    key: SpriteKey::Player,
                    path: PathBuf::from("root/player.png"),
                    frames: 4,
                },
                ManifestEntry {
                    key: SpriteKey::Enemy(EnemyKind::Shark),
                    path: PathBuf::from("root/enemies/shark.png"),
                    frames: 4,
                },
                ManifestEntry {
                    key: SpriteKey::Background,
                    path: PathBuf::from("root/background.png"),
                    frames: 1,
                },
            ]
        );
    }

    #[test]
    fn atlas_assigns_handles_in_load_order() {
        let entries = vec![
            ManifestEntry {
                key: SpriteKey::Player,
                path: PathBuf::from("player.png"),
                frames: 4,
            },
            ManifestEntry {
                key: SpriteKey::Background,
                path: PathBuf::from("background.png"),
                frames: 1,
            },
        ];
        let load_order = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_entries(entries, &mut |key, _| {
            load_order.borrow_mut().push(key);
            Ok(Texture2D::empty())
        })
        .expect("atlas should load using provided loader");

        assert_eq!(
            load_order.into_inner(),
            vec![SpriteKey::Player, SpriteKey::Background]
        );
        assert_eq!(atlas.len(), 2);
        let background = atlas.image(SpriteKey::Background).expect("background");
        assert_eq!(background.handle(), SpriteHandle::new(1));
        assert_eq!(atlas.image(SpriteKey::Enemy(EnemyKind::Fish)), None);
        assert_eq!(atlas.sound(SoundKey::Damage), None);
    }

    #[test]
    fn atlas_rejects_empty_sheets() {
        let entries = vec![ManifestEntry {
            key: SpriteKey::Player,
            path: PathBuf::from("player.png"),
            frames: 0,
        }];
        let result = SpriteAtlas::from_entries(entries, &mut |_, _| Ok(Texture2D::empty()));
        assert!(result.is_err());
    }

    #[test]
    fn frame_source_slices_horizontal_strips() {
        let source = frame_source(256.0, 64.0, 4, 2);
        assert_eq!(source, Rect::new(128.0, 0.0, 64.0, 64.0));
        let single = frame_source(32.0, 32.0, 1, 0);
        assert_eq!(single, Rect::new(0.0, 0.0, 32.0, 32.0));
    }
}

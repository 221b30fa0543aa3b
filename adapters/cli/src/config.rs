//! Loads [`Tuning`] from TOML and applies command-line overrides.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use fish_survivor_core::Tuning;

/// Values given on the command line that take precedence over the file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) width: Option<f32>,
    pub(crate) height: Option<f32>,
}

impl Overrides {
    fn apply(self, tuning: &mut Tuning) {
        if let Some(seed) = self.seed {
            tuning.seed = seed;
        }
        if let Some(width) = self.width {
            tuning.viewport_width = width;
        }
        if let Some(height) = self.height {
            tuning.viewport_height = height;
        }
    }
}

/// Reads the tuning file at `path` (defaults when absent), applies
/// `overrides` and validates the result.
pub(crate) fn load_tuning(path: Option<&Path>, overrides: Overrides) -> Result<Tuning> {
    let mut tuning = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            parse_tuning(&contents)
                .with_context(|| format!("invalid config at {}", path.display()))?
        }
        None => Tuning::default(),
    };
    overrides.apply(&mut tuning);
    tuning.validate().context("tuning out of range")?;
    Ok(tuning)
}

fn parse_tuning(contents: &str) -> Result<Tuning> {
    toml::from_str(contents).context("failed to parse tuning toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let tuning = parse_tuning(
            r#"
                initial_spawn_rate = 2.5
                offers_per_level = 2
            "#,
        )
        .expect("partial config parses");

        assert_eq!(tuning.initial_spawn_rate, 2.5);
        assert_eq!(tuning.offers_per_level, 2);
        assert_eq!(tuning.attraction_radius, Tuning::default().attraction_radius);
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(parse_tuning("seed = \"abc\"").is_err());
    }

    #[test]
    fn overrides_win_over_defaults() {
        let tuning = load_tuning(
            None,
            Overrides {
                seed: Some(7),
                width: Some(640.0),
                height: None,
            },
        )
        .expect("valid overrides");

        assert_eq!(tuning.seed, 7);
        assert_eq!(tuning.viewport_width, 640.0);
        assert_eq!(tuning.viewport_height, Tuning::default().viewport_height);
    }

    #[test]
    fn invalid_overrides_fail_validation() {
        let result = load_tuning(
            None,
            Overrides {
                height: Some(0.0),
                ..Overrides::default()
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_files_are_reported() {
        let result = load_tuning(
            Some(Path::new("does/not/exist.toml")),
            Overrides::default(),
        );
        let message = format!("{:#}", result.expect_err("missing file"));
        assert!(message.contains("failed to read config"), "{message}");
    }
}

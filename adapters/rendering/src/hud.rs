use fish_survivor_core::{FrameSnapshot, HudSnapshot, Phase};

use crate::Color;

const HEALTHY: Color = Color::from_hex(0x4caf50);
const WOUNDED: Color = Color::from_hex(0xff9800);
const CRITICAL: Color = Color::from_hex(0xf44336);

/// Color of a health bar filled to `fraction`.
#[must_use]
pub fn health_color(fraction: f32) -> Color {
    if fraction > 0.5 {
        HEALTHY
    } else if fraction > 0.25 {
        WOUNDED
    } else {
        CRITICAL
    }
}

/// Formats elapsed seconds as `MM:SS`.
#[must_use]
pub fn format_clock(seconds: f32) -> String {
    let whole = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

/// Text and bar values for the heads-up display.
#[derive(Clone, Debug, PartialEq)]
pub struct HudPresentation {
    /// Health bar fill in `0.0..=1.0`.
    pub health_fraction: f32,
    /// Health bar color.
    pub health_color: Color,
    /// Current and maximum health.
    pub health_label: String,
    /// Current level.
    pub level_label: String,
    /// Experience bar fill in `0.0..=1.0`.
    pub experience_fraction: f32,
    /// Current and required experience.
    pub experience_label: String,
    /// Survival time as `MM:SS`.
    pub clock: String,
    /// Number of enemies defeated.
    pub defeated_label: String,
}

impl HudPresentation {
    /// Lays out the HUD for `hud`.
    #[must_use]
    pub fn from_snapshot(hud: &HudSnapshot) -> Self {
        let health_fraction = fraction(hud.health, hud.max_health);
        Self {
            health_fraction,
            health_color: health_color(health_fraction),
            health_label: format!("HP {:.0} / {:.0}", hud.health.ceil(), hud.max_health),
            level_label: format!("Level {}", hud.level),
            experience_fraction: fraction(
                hud.experience as f32,
                hud.experience_to_next_level as f32,
            ),
            experience_label: format!(
                "XP {} / {}",
                hud.experience, hud.experience_to_next_level
            ),
            clock: format_clock(hud.game_time),
            defeated_label: format!("Defeated {}", hud.enemies_defeated),
        }
    }
}

fn fraction(value: f32, max: f32) -> f32 {
    if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// One selectable upgrade on the level-up screen.
#[derive(Clone, Debug, PartialEq)]
pub struct OfferCard {
    /// Upgrade display name.
    pub title: &'static str,
    /// What the upgrade does.
    pub description: &'static str,
    /// Level transition, e.g. `Level 1 → 2`.
    pub level_label: String,
}

/// Modal screen drawn over the paused play field.
#[derive(Clone, Debug, PartialEq)]
pub enum Overlay {
    /// The player levelled up and must choose an upgrade.
    LevelUp {
        /// Headline naming the new level.
        title: String,
        /// Offered upgrades, in the order they may be chosen.
        cards: Vec<OfferCard>,
    },
    /// The run ended.
    GameOver {
        /// Whole seconds survived.
        survival_label: String,
        /// Enemies defeated during the run.
        defeated_label: String,
    },
}

impl Overlay {
    /// Overlay required by the snapshot's phase, if any.
    #[must_use]
    pub fn for_snapshot(snapshot: &FrameSnapshot) -> Option<Self> {
        match snapshot.phase {
            Phase::Running => None,
            Phase::ChoosingUpgrade => Some(Self::LevelUp {
                title: format!("Level {}!", snapshot.hud.level),
                cards: snapshot
                    .offers
                    .iter()
                    .map(|offer| OfferCard {
                        title: offer.upgrade.name(),
                        description: offer.upgrade.description(),
                        level_label: format!(
                            "Level {} → {}",
                            offer.current_level,
                            offer.next_level()
                        ),
                    })
                    .collect(),
            }),
            Phase::GameOver => Some(Self::GameOver {
                survival_label: format!("Survived {} s", snapshot.hud.game_time.floor() as u64),
                defeated_label: format!("Enemies defeated: {}", snapshot.hud.enemies_defeated),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fish_survivor_core::{UpgradeId, UpgradeOffer};

    #[test]
    fn health_color_follows_thresholds() {
        assert_eq!(health_color(0.51), HEALTHY);
        assert_eq!(health_color(0.5), WOUNDED);
        assert_eq!(health_color(0.26), WOUNDED);
        assert_eq!(health_color(0.25), CRITICAL);
        assert_eq!(health_color(0.0), CRITICAL);
    }

    #[test]
    fn clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(59.99), "00:59");
        assert_eq!(format_clock(754.2), "12:34");
    }

    #[test]
    fn hud_reports_rounded_health_and_experience() {
        let hud = HudSnapshot {
            health: 29.2,
            max_health: 120.0,
            level: 3,
            experience: 45,
            experience_to_next_level: 132,
            game_time: 75.0,
            enemies_defeated: 12,
        };
        let presentation = HudPresentation::from_snapshot(&hud);
        assert_eq!(presentation.health_label, "HP 30 / 120");
        assert_eq!(presentation.health_color, CRITICAL);
        assert_eq!(presentation.experience_label, "XP 45 / 132");
        assert_eq!(presentation.clock, "01:15");
        assert_eq!(presentation.defeated_label, "Defeated 12");
    }

    #[test]
    fn overlays_follow_phase() {
        let mut snapshot = FrameSnapshot {
            phase: Phase::ChoosingUpgrade,
            offers: vec![UpgradeOffer {
                upgrade: UpgradeId::Speed,
                current_level: 2,
            }],
            ..FrameSnapshot::default()
        };
        snapshot.hud.level = 4;

        match Overlay::for_snapshot(&snapshot) {
            Some(Overlay::LevelUp { title, cards }) => {
                assert_eq!(title, "Level 4!");
                assert_eq!(cards.len(), 1);
                assert_eq!(cards[0].title, UpgradeId::Speed.name());
                assert_eq!(cards[0].level_label, "Level 2 → 3");
            }
            other => panic!("expected level-up overlay, got {other:?}"),
        }

        snapshot.phase = Phase::Running;
        assert_eq!(Overlay::for_snapshot(&snapshot), None);
    }
}

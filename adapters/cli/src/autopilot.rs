//! Headless fixed-step sessions driven by a simple autopilot.
//!
//! The autopilot flees the nearest enemy and always takes the first offered
//! upgrade, which is enough to exercise every system without a window.

use std::{fmt, time::Duration};

use anyhow::{ensure, Context, Result};
use fish_survivor_core::{Event, Phase, UpgradeId};
use fish_survivor_simulation::Game;
use fish_survivor_system_weapons::nearest_enemy;
use fish_survivor_world::query;
use tracing::debug;

/// Length of the synthetic drag used to steer; comfortably past the dead zone.
const STEERING_REACH: f32 = 100.0;

/// Outcome of a headless session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Summary {
    pub(crate) frames: u64,
    pub(crate) survival_time: f32,
    pub(crate) level: u32,
    pub(crate) enemies_defeated: u32,
    pub(crate) damage_taken: f32,
    pub(crate) game_over: bool,
    pub(crate) upgrades: Vec<(UpgradeId, u8)>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.game_over {
            "defeated"
        } else {
            "survived"
        };
        writeln!(
            f,
            "{outcome} after {:.1} s ({} frames)",
            self.survival_time, self.frames
        )?;
        writeln!(
            f,
            "level {}, {} enemies defeated, {:.0} damage taken",
            self.level, self.enemies_defeated, self.damage_taken
        )?;
        if self.upgrades.is_empty() {
            write!(f, "upgrades: none")
        } else {
            let upgrades = self
                .upgrades
                .iter()
                .map(|(upgrade, level)| format!("{} {level}", upgrade.name()))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "upgrades: {upgrades}")
        }
    }
}

/// Runs `game` for up to `seconds` of simulated time in steps of `dt`,
/// stopping early on game over.
pub(crate) fn run(game: &mut Game, seconds: f32, dt: f32) -> Result<Summary> {
    ensure!(dt > 0.0, "time step must be positive (received {dt})");
    ensure!(
        seconds.is_finite() && seconds >= 0.0,
        "duration must be finite and not negative (received {seconds})"
    );

    let step = Duration::try_from_secs_f32(dt)
        .with_context(|| format!("time step {dt} is not a representable duration"))?;
    let total_frames = (seconds / dt).ceil() as u64;
    let mut frames = 0;
    let mut damage_taken = 0.0;

    while frames < total_frames && game.phase() != Phase::GameOver {
        while game.phase() == Phase::ChoosingUpgrade {
            let Some(offer) = game.offers().first().copied() else {
                break;
            };
            debug!(upgrade = offer.upgrade.name(), "autopilot picks upgrade");
            game.apply_upgrade(offer.upgrade)?;
        }

        steer(game);
        game.step(step);
        frames += 1;

        for event in game.drain_visual_events() {
            if let Event::PlayerDamaged { amount, .. } = event {
                damage_taken += amount;
            }
        }
    }

    let hud = game.hud();
    Ok(Summary {
        frames,
        survival_time: hud.game_time,
        level: hud.level,
        enemies_defeated: hud.enemies_defeated,
        damage_taken,
        game_over: game.phase() == Phase::GameOver,
        upgrades: UpgradeId::ALL
            .into_iter()
            .map(|upgrade| (upgrade, query::upgrade_level(game.world(), upgrade)))
            .filter(|(_, level)| *level > 0)
            .collect(),
    })
}

fn steer(game: &mut Game) {
    let world = game.world();
    let player = query::player_position(world);
    let enemies = query::enemy_view(world);
    match nearest_enemy(player, &enemies) {
        Some(enemy) => {
            let away = (player - enemy.position).normalize_or_zero();
            game.touch_drag(away * STEERING_REACH);
        }
        None => game.touch_end(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fish_survivor_core::Tuning;

    fn tuning() -> Tuning {
        Tuning {
            viewport_width: 640.0,
            viewport_height: 480.0,
            ..Tuning::default()
        }
    }

    #[test]
    fn sessions_run_for_the_requested_time() {
        let mut game = Game::new(tuning()).expect("valid tuning");
        let summary = run(&mut game, 2.0, 0.05).expect("session runs");

        assert_eq!(summary.frames, 40);
        assert!((summary.survival_time - 2.0).abs() < 1e-3);
        assert!(!summary.game_over);
    }

    #[test]
    fn identical_seeds_produce_identical_summaries() {
        let mut first = Game::new(tuning()).expect("valid tuning");
        let mut second = Game::new(tuning()).expect("valid tuning");

        assert_eq!(
            run(&mut first, 30.0, 1.0 / 60.0).expect("first run"),
            run(&mut second, 30.0, 1.0 / 60.0).expect("second run")
        );
    }

    #[test]
    fn non_positive_steps_are_rejected() {
        let mut game = Game::new(tuning()).expect("valid tuning");
        assert!(run(&mut game, 1.0, 0.0).is_err());
    }

    #[test]
    fn non_finite_arguments_are_rejected() {
        let mut game = Game::new(tuning()).expect("valid tuning");
        assert!(run(&mut game, 1.0, f32::INFINITY).is_err());
        assert!(run(&mut game, 1.0, f32::NAN).is_err());
        assert!(run(&mut game, f32::INFINITY, 0.1).is_err());
        assert_eq!(game.hud().game_time, 0.0);
    }

    #[test]
    fn summaries_list_upgrades_by_name() {
        let summary = Summary {
            frames: 600,
            survival_time: 10.0,
            level: 3,
            enemies_defeated: 12,
            damage_taken: 40.0,
            game_over: true,
            upgrades: vec![(UpgradeId::Speed, 2)],
        };
        let text = summary.to_string();

        assert!(text.starts_with("defeated after 10.0 s (600 frames)"));
        assert!(text.contains("level 3, 12 enemies defeated, 40 damage taken"));
        assert!(text.ends_with(&format!("upgrades: {} 2", UpgradeId::Speed.name())));
    }
}

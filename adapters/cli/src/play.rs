//! Interactive sessions rendered through Macroquad.

use std::path::PathBuf;

use anyhow::Result;
use fish_survivor_core::{Phase, Tuning};
use fish_survivor_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, Scene, TouchInput, VisualEffects,
};
use fish_survivor_rendering_macroquad::MacroquadBackend;
use fish_survivor_simulation::Game;
use tracing::{info, warn};

const WINDOW_TITLE: &str = "Fish Survivor";
const BACKDROP: Color = Color::from_hex(0x0a1a2a);

/// Window options chosen on the command line.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlayOptions {
    pub(crate) vsync: bool,
    pub(crate) sprites: bool,
    pub(crate) manifest: PathBuf,
}

/// Opens the game window and runs until it is closed.
pub(crate) fn run(tuning: Tuning, options: PlayOptions) -> Result<()> {
    let viewport = tuning.viewport();
    let mut game = Game::new(tuning)?;
    let presentation = Presentation::new(WINDOW_TITLE, viewport, BACKDROP)?;
    let backend = MacroquadBackend::new()
        .with_vsync(options.vsync)
        .with_sprite_loading(options.sprites)
        .with_manifest_path(options.manifest);
    let mut effects = VisualEffects::new();

    info!(width = viewport.x, height = viewport.y, "opening game window");
    backend.run(presentation, move |dt, input, assets| {
        apply_input(&mut game, input);
        game.step(dt);
        effects.advance(dt.as_secs_f32());
        effects.absorb(&game.drain_visual_events());
        Scene::build(&game.frame_snapshot(), &effects, assets)
    })
}

fn apply_input(game: &mut Game, input: FrameInput) {
    for (key, pressed) in input.directional {
        game.handle_key(key, pressed);
    }
    match input.touch {
        Some(TouchInput::Drag(delta)) => game.touch_drag(delta),
        Some(TouchInput::End) => game.touch_end(),
        None => {}
    }
    if let Some(index) = input.upgrade_choice {
        if let Some(offer) = game.offers().get(index).copied() {
            if let Err(error) = game.apply_upgrade(offer.upgrade) {
                warn!(%error, "upgrade choice rejected");
            }
        }
    }
    if input.restart && game.phase() == Phase::GameOver {
        game.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fish_survivor_core::DirectionalKey;
    use fish_survivor_world::query;
    use glam::Vec2;
    use std::time::Duration;

    fn game() -> Game {
        Game::new(Tuning {
            viewport_width: 640.0,
            viewport_height: 480.0,
            ..Tuning::default()
        })
        .expect("valid tuning")
    }

    #[test]
    fn held_keys_move_the_player() {
        let mut game = game();
        let start = query::player_position(game.world());

        apply_input(
            &mut game,
            FrameInput {
                directional: vec![(DirectionalKey::Right, true)],
                ..FrameInput::default()
            },
        );
        game.step(Duration::from_millis(100));

        assert!(query::player_position(game.world()).x > start.x);
    }

    #[test]
    fn drags_inside_the_dead_zone_leave_the_player_still() {
        let mut game = game();
        let start = query::player_position(game.world());

        apply_input(
            &mut game,
            FrameInput {
                touch: Some(TouchInput::Drag(Vec2::new(5.0, 0.0))),
                ..FrameInput::default()
            },
        );
        game.step(Duration::from_millis(100));

        assert_eq!(query::player_position(game.world()), start);
    }

    #[test]
    fn out_of_range_choices_are_ignored() {
        let mut game = game();
        apply_input(
            &mut game,
            FrameInput {
                upgrade_choice: Some(7),
                ..FrameInput::default()
            },
        );
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn restart_only_applies_after_game_over() {
        let mut game = game();
        game.step(Duration::from_secs(1));
        let elapsed = game.hud().game_time;

        apply_input(
            &mut game,
            FrameInput {
                restart: true,
                ..FrameInput::default()
            },
        );

        assert_eq!(game.hud().game_time, elapsed);
    }
}

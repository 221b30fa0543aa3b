use std::time::Duration;

use fish_survivor_core::{Command, EnemyKind, Event, Tuning};
use fish_survivor_system_spawning::{
    choose_kind, spawn_weights, Config, Spawning, MAX_SPAWN_BURST,
};
use fish_survivor_world::{self as world, query, World};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

fn advanced(millis: u64) -> [Event; 1] {
    [Event::TimeAdvanced {
        dt: Duration::from_millis(millis),
    }]
}

#[test]
fn emits_multiple_spawn_commands_for_large_dt() {
    let mut spawning = Spawning::new(Config::new(2.0, 45.0, 1.1, 50.0));
    let mut rng = ChaCha8Rng::seed_from_u64(0x1234_5678);
    let mut commands = Vec::new();

    let _ = spawning.handle(&advanced(2_000), 1, VIEWPORT, &mut rng, &mut commands);

    assert_eq!(commands.len(), 4, "expected one spawn per interval");
}

#[test]
fn long_stalls_release_a_bounded_burst() {
    let mut spawning = Spawning::new(Config::new(2.0, 45.0, 1.1, 50.0));
    let mut rng = ChaCha8Rng::seed_from_u64(0xfeed);
    let mut commands = Vec::new();

    let _ = spawning.handle(&advanced(60_000), 1, VIEWPORT, &mut rng, &mut commands);
    assert_eq!(commands.len(), MAX_SPAWN_BURST as usize);

    let _ = spawning.handle(&advanced(100), 1, VIEWPORT, &mut rng, &mut commands);
    assert_eq!(
        commands.len(),
        MAX_SPAWN_BURST as usize,
        "time past the burst cap is not carried over"
    );
}

#[test]
fn spawns_only_after_full_interval() {
    let mut spawning = Spawning::new(Config::new(0.8, 45.0, 1.1, 50.0));
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut commands = Vec::new();

    let _ = spawning.handle(&advanced(1_200), 1, VIEWPORT, &mut rng, &mut commands);
    assert!(commands.is_empty(), "no spawn before 1.25 seconds");

    let _ = spawning.handle(&advanced(100), 1, VIEWPORT, &mut rng, &mut commands);
    assert_eq!(commands.len(), 1);

    let _ = spawning.handle(&[Event::WorldReset], 1, VIEWPORT, &mut rng, &mut commands);
    assert_eq!(commands.len(), 1, "non-time events never spawn");
}

#[test]
fn spawned_enemies_start_outside_viewport() {
    let mut spawning = Spawning::new(Config::from_tuning(&Tuning::default()));
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut commands = Vec::new();
    let _ = spawning.handle(&advanced(60_000), 1, VIEWPORT, &mut rng, &mut commands);
    assert!(!commands.is_empty());

    for command in &commands {
        let Command::SpawnEnemy { position, .. } = command else {
            panic!("unexpected command emitted: {command:?}");
        };
        let outside_x = position.x <= -50.0 || position.x >= VIEWPORT.x + 50.0;
        let outside_y = position.y <= -50.0 || position.y >= VIEWPORT.y + 50.0;
        assert!(outside_x || outside_y, "{position:?} lies inside the viewport");
    }
}

#[test]
fn spawn_rate_grows_every_difficulty_interval() {
    let mut spawning = Spawning::new(Config::from_tuning(&Tuning::default()));
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut commands = Vec::new();

    let mut growths = 0;
    for _ in 0..90 {
        if spawning.handle(&advanced(1_000), 1, VIEWPORT, &mut rng, &mut commands) {
            growths += 1;
        }
    }

    assert_eq!(growths, 2);
    assert!((spawning.spawn_rate() - 0.8 * 1.1 * 1.1).abs() < 1e-5);

    spawning.reset();
    assert!((spawning.spawn_rate() - 0.8).abs() < f32::EPSILON);
}

#[test]
fn weighted_draw_converges_to_bracket_weights() {
    const DRAWS: usize = 10_000;
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

    for level in [1, 5, 8] {
        let mut counts = [0_usize; EnemyKind::COUNT];
        for _ in 0..DRAWS {
            counts[choose_kind(level, rng.gen::<f32>()).index()] += 1;
        }

        for (count, weight) in counts.iter().zip(spawn_weights(level)) {
            let frequency = *count as f32 / DRAWS as f32;
            assert!(
                (frequency - weight).abs() < 0.02,
                "level {level}: frequency {frequency} strays from weight {weight}"
            );
        }
    }
}

#[test]
fn spawned_enemies_scale_with_world_level() {
    let mut world = World::new(Tuning::default());
    let mut spawning = Spawning::new(Config::from_tuning(&Tuning::default()));
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(3),
        },
        &mut events,
    );

    let mut commands = Vec::new();
    let _ = spawning.handle(&events, query::level(&world), VIEWPORT, &mut rng, &mut commands);
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let view = query::enemy_view(&world);
    assert_eq!(view.len(), 2);
    for enemy in view.iter() {
        let expected = enemy.kind.stats(1).health;
        assert!((enemy.max_health - expected).abs() < f32::EPSILON);
    }
}

#[test]
fn identical_seeds_replay_identical_spawns() {
    let run = |seed: u64| {
        let mut spawning = Spawning::new(Config::from_tuning(&Tuning::default()));
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut commands = Vec::new();
        for _ in 0..120 {
            let _ = spawning.handle(&advanced(500), 4, VIEWPORT, &mut rng, &mut commands);
        }
        commands
    };

    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

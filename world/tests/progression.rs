use std::time::Duration;

use fish_survivor_core::{Command, EnemyId, EnemyKind, Event, PickupKind, Tuning, UpgradeId};
use fish_survivor_world::{self as world, query, World};
use glam::Vec2;

const FRAME: Duration = Duration::from_millis(16);

fn spawn(world: &mut World, kind: EnemyKind, position: Vec2, events: &mut Vec<Event>) -> EnemyId {
    world::apply(world, Command::SpawnEnemy { kind, position }, events);
    match events.last() {
        Some(Event::EnemySpawned { enemy, .. }) => *enemy,
        other => panic!("expected spawn event, got {other:?}"),
    }
}

fn defeat_with_drop(world: &mut World, position: Vec2, drop: PickupKind) {
    let mut events = Vec::new();
    let enemy = spawn(world, EnemyKind::Fish, position, &mut events);
    world::apply(
        world,
        Command::DamageEnemy {
            enemy,
            amount: 1_000.0,
        },
        &mut events,
    );
    world::apply(
        world,
        Command::DefeatEnemy {
            enemy,
            drop: Some(drop),
        },
        &mut events,
    );
}

#[test]
fn collecting_enough_experience_levels_up_once() {
    let tuning = Tuning {
        experience_per_pickup: 100,
        ..Tuning::default()
    };
    let mut world = World::new(tuning);
    let centre = query::player_position(&world);
    defeat_with_drop(&mut world, centre, PickupKind::Experience);

    let mut events = Vec::new();
    world::apply(&mut world, Command::AdvancePickups { dt: FRAME }, &mut events);

    let hud = query::hud(&world);
    assert_eq!(hud.level, 2);
    assert_eq!(hud.experience, 0);
    assert_eq!(hud.experience_to_next_level, 115);
    assert!(events.contains(&Event::LeveledUp {
        level: 2,
        experience_to_next_level: 115,
    }));
}

#[test]
fn experience_below_threshold_accumulates() {
    let mut world = World::new(Tuning::default());
    let centre = query::player_position(&world);
    defeat_with_drop(&mut world, centre, PickupKind::Experience);

    let mut events = Vec::new();
    world::apply(&mut world, Command::AdvancePickups { dt: FRAME }, &mut events);

    let hud = query::hud(&world);
    assert_eq!(hud.level, 1);
    assert_eq!(hud.experience, 15);
    assert!(query::pickups(&world).is_empty());
}

#[test]
fn pickup_beyond_attraction_radius_stays_put() {
    let mut world = World::new(Tuning::default());
    let centre = query::player_position(&world);
    let far = centre + Vec2::new(101.0, 0.0);
    defeat_with_drop(&mut world, far, PickupKind::Experience);

    let mut events = Vec::new();
    world::apply(&mut world, Command::AdvancePickups { dt: FRAME }, &mut events);

    let pickups = query::pickups(&world);
    assert_eq!(pickups.len(), 1);
    assert_eq!(pickups[0].position, far);
}

#[test]
fn pickup_upgrade_widens_both_radii() {
    let mut world = World::new(Tuning::default());
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::RecordUpgrade {
            upgrade: UpgradeId::Pickup,
        },
        &mut events,
    );
    assert!((query::attraction_radius(&world) - 115.0).abs() < 1e-4);
    assert!((query::collection_radius(&world) - 57.5).abs() < 1e-4);

    let centre = query::player_position(&world);
    let far = centre + Vec2::new(110.0, 0.0);
    defeat_with_drop(&mut world, far, PickupKind::Experience);
    world::apply(&mut world, Command::AdvancePickups { dt: FRAME }, &mut events);
    assert!(query::pickups(&world)[0].position.x < far.x);
}

#[test]
fn health_pickup_heals_up_to_maximum() {
    let mut world = World::new(Tuning::default());
    let centre = query::player_position(&world);
    let mut events = Vec::new();
    let _ = spawn(&mut world, EnemyKind::Shark, centre, &mut events);
    world::apply(&mut world, Command::AdvancePlayer { dt: FRAME }, &mut events);
    let wounded = query::hud(&world).health;
    assert!(wounded < 120.0);

    defeat_with_drop(&mut world, centre, PickupKind::Health);
    world::apply(&mut world, Command::AdvancePickups { dt: FRAME }, &mut events);
    assert!((query::hud(&world).health - 120.0).abs() < f32::EPSILON);
}

#[test]
fn defeated_enemy_is_removed_with_its_drop() {
    let mut world = World::new(Tuning::default());
    let mut events = Vec::new();
    let enemy = spawn(&mut world, EnemyKind::Crab, Vec2::new(10.0, 10.0), &mut events);
    world::apply(
        &mut world,
        Command::DamageEnemy {
            enemy,
            amount: 500.0,
        },
        &mut events,
    );
    assert_eq!(query::defeated_enemies(&world), vec![enemy]);

    events.clear();
    world::apply(
        &mut world,
        Command::DefeatEnemy {
            enemy,
            drop: Some(PickupKind::Experience),
        },
        &mut events,
    );

    assert!(query::enemy_view(&world).is_empty());
    assert_eq!(query::enemies_defeated(&world), 1);
    assert_eq!(query::pickups(&world).len(), 1);
    assert_eq!(
        events,
        vec![
            Event::PickupDropped {
                kind: PickupKind::Experience,
                position: Vec2::new(10.0, 10.0),
            },
            Event::EnemyDefeated {
                enemy,
                kind: EnemyKind::Crab,
                position: Vec2::new(10.0, 10.0),
            },
        ]
    );
}

#[test]
fn invulnerability_spaces_out_contact_hits() {
    let mut world = World::new(Tuning::default());
    let centre = query::player_position(&world);
    let mut events = Vec::new();
    let _ = spawn(&mut world, EnemyKind::Octopus, centre, &mut events);
    events.clear();

    for _ in 0..50 {
        world::apply(&mut world, Command::AdvancePlayer { dt: FRAME }, &mut events);
    }
    let hits = events
        .iter()
        .filter(|event| matches!(event, Event::PlayerDamaged { .. }))
        .count();
    assert_eq!(hits, 1);

    for _ in 0..10 {
        world::apply(&mut world, Command::AdvancePlayer { dt: FRAME }, &mut events);
    }
    let hits = events
        .iter()
        .filter(|event| matches!(event, Event::PlayerDamaged { .. }))
        .count();
    assert_eq!(hits, 2);
}

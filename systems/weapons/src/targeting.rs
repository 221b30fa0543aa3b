//! Target selection heuristics shared by the weapons.

use fish_survivor_core::{EnemySnapshot, EnemyView};
use glam::Vec2;

/// Finds the enemy closest to `origin`; earlier enemies win ties.
#[must_use]
pub fn nearest_enemy(origin: Vec2, enemies: &EnemyView) -> Option<&EnemySnapshot> {
    let mut best: Option<(&EnemySnapshot, f32)> = None;
    for enemy in enemies.iter() {
        let distance = origin.distance(enemy.position);
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((enemy, distance)),
        }
    }
    best.map(|(enemy, _)| enemy)
}

/// Number of enemies strictly within `radius` of `point`.
#[must_use]
pub fn count_within(point: Vec2, radius: f32, enemies: &EnemyView) -> usize {
    enemies
        .iter()
        .filter(|enemy| point.distance(enemy.position) < radius)
        .count()
}

/// Grid point around `origin` covering the most enemies within `radius`.
///
/// Candidates lie on a square lattice with spacing `step` spanning
/// `search_radius` in every direction, scanned column by column. The first
/// candidate reaching the maximum count wins. Returns `None` when no candidate
/// covers a single enemy.
#[must_use]
pub fn densest_point(
    origin: Vec2,
    enemies: &EnemyView,
    radius: f32,
    search_radius: f32,
    step: f32,
) -> Option<(Vec2, usize)> {
    if enemies.is_empty() || step <= 0.0 {
        return None;
    }

    let reach = (search_radius / step).floor() as i32;
    let mut best: Option<(Vec2, usize)> = None;
    for column in -reach..=reach {
        for row in -reach..=reach {
            let point = origin + Vec2::new(column as f32, row as f32) * step;
            let count = count_within(point, radius, enemies);
            let best_count = best.map_or(0, |(_, count)| count);
            if count > best_count {
                best = Some((point, count));
            }
        }
    }
    best
}

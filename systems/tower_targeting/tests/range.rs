use lane_defence_core::{EnemyId, WorldPoint};
use lane_defence_system_tower_targeting::{select_target, TargetCandidate};

fn at_distance(id: u64, origin: WorldPoint, distance: f32) -> TargetCandidate {
    TargetCandidate {
        id: EnemyId::new(id),
        position: WorldPoint::new(origin.x() + distance, origin.y()),
        targetable: true,
    }
}

#[test]
fn enemy_beyond_range_is_never_selected() {
    let origin = WorldPoint::new(208.0, 112.0);

    assert_eq!(
        select_target(origin, 120.0, vec![at_distance(1, origin, 130.0)]),
        None,
        "an enemy 130 units away lies outside a 120 unit range",
    );
}

#[test]
fn enemy_inside_range_is_selected() {
    let origin = WorldPoint::new(208.0, 112.0);

    assert_eq!(
        select_target(origin, 120.0, vec![at_distance(1, origin, 100.0)]),
        Some(EnemyId::new(1)),
        "an enemy 100 units away lies inside a 120 unit range",
    );
}

#[test]
fn selection_is_independent_of_candidate_order() {
    let origin = WorldPoint::new(0.0, 0.0);
    let forward = vec![
        at_distance(4, origin, 60.0),
        at_distance(2, origin, 60.0),
        at_distance(9, origin, 80.0),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    assert_eq!(select_target(origin, 120.0, forward), Some(EnemyId::new(2)));
    assert_eq!(select_target(origin, 120.0, reversed), Some(EnemyId::new(2)));
}

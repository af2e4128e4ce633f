#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects tower targets from enemy positions.

use lane_defence_core::{EnemyId, WorldPoint};

/// Enemy considered by a tower during target selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetCandidate {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Current position of the enemy in world units.
    pub position: WorldPoint,
    /// Whether the enemy is still alive and on the path.
    pub targetable: bool,
}

/// Selects the nearest targetable candidate within `range` of `origin`.
///
/// Distances are compared squared. A candidate exactly on the range boundary
/// is in range. Equal distances prefer the smaller identifier, which matches
/// spawn order, so the result does not depend on iteration order.
pub fn select_target<I>(origin: WorldPoint, range: f32, candidates: I) -> Option<EnemyId>
where
    I: IntoIterator<Item = TargetCandidate>,
{
    let max_distance = range * range;
    let mut best: Option<BestCandidate> = None;

    for candidate in candidates {
        if !candidate.targetable {
            continue;
        }

        let distance_sq = origin.distance_squared(candidate.position);
        if distance_sq > max_distance {
            continue;
        }

        let current = BestCandidate {
            distance_sq,
            enemy: candidate.id,
        };

        match &mut best {
            Some(existing) => {
                if current.precedes(existing) {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }

    best.map(|candidate| candidate.enemy)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance_sq: f32,
    enemy: EnemyId,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }

        self.enemy < other.enemy
    }
}

//! Enemy entities walking the route.

use std::time::Duration;

use lane_defence_core::{EnemyId, EnemyKind, EnemySnapshot, Stride, WorldPoint};

/// Live enemy owned by the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: WorldPoint,
    waypoint_index: usize,
    speed: f32,
    hp: u32,
    max_hp: u32,
    pub(crate) payout: u32,
    leaked: bool,
}

impl Enemy {
    /// Creates an enemy standing on the first waypoint.
    pub(crate) fn spawn(
        id: EnemyId,
        kind: EnemyKind,
        position: WorldPoint,
        speed: f32,
        max_hp: u32,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            waypoint_index: 0,
            speed,
            hp: max_hp,
            max_hp,
            payout: kind.payout(),
            leaked: false,
        }
    }

    /// Walks toward the following waypoints for `dt`.
    ///
    /// Travel budget left after reaching a waypoint carries over to the next
    /// segment. Running out of waypoints marks the enemy as leaked.
    pub(crate) fn update(&mut self, dt: Duration, waypoints: &[WorldPoint]) {
        if self.is_terminal() {
            return;
        }

        let mut budget = self.speed * dt.as_secs_f32();
        loop {
            let Some(next) = waypoints.get(self.waypoint_index + 1).copied() else {
                self.leaked = true;
                return;
            };

            match self.position.stride_towards(next, budget) {
                Stride::Reached { remaining } => {
                    self.position = next;
                    self.waypoint_index += 1;
                    budget = remaining;
                }
                Stride::Partial(position) => {
                    self.position = position;
                    return;
                }
            }
        }
    }

    /// Subtracts `damage`, saturating at zero, and returns the remaining hit points.
    pub(crate) fn apply_damage(&mut self, damage: u32) -> u32 {
        self.hp = self.hp.saturating_sub(damage);
        self.hp
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.hp == 0
    }

    pub(crate) fn has_leaked(&self) -> bool {
        self.leaked
    }

    /// Dead or past the end of the route; awaiting removal.
    pub(crate) fn is_terminal(&self) -> bool {
        self.is_dead() || self.leaked
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            hp: self.hp,
            max_hp: self.max_hp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Vec<WorldPoint> {
        vec![
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(100.0, 0.0),
            WorldPoint::new(100.0, 50.0),
        ]
    }

    fn walker(speed: f32) -> Enemy {
        Enemy::spawn(
            EnemyId::new(0),
            EnemyKind::Basic,
            WorldPoint::new(0.0, 0.0),
            speed,
            80,
        )
    }

    #[test]
    fn moves_linearly_toward_next_waypoint() {
        let mut enemy = walker(70.0);
        enemy.update(Duration::from_millis(100), &route());

        assert!((enemy.position.x() - 7.0).abs() < 1e-4);
        assert_eq!(enemy.position.y(), 0.0);
        assert!(!enemy.is_terminal());
    }

    #[test]
    fn leftover_budget_turns_the_corner() {
        let mut enemy = walker(100.0);
        enemy.update(Duration::from_millis(1200), &route());

        assert_eq!(enemy.waypoint_index, 1);
        assert!((enemy.position.x() - 100.0).abs() < 1e-4);
        assert!((enemy.position.y() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn reaching_the_end_marks_leak() {
        let mut enemy = walker(1000.0);
        enemy.update(Duration::from_secs(1), &route());

        assert!(enemy.has_leaked());
        assert!(enemy.is_terminal());
        assert!(!enemy.is_dead());
    }

    #[test]
    fn damage_saturates_at_zero() {
        let mut enemy = walker(70.0);

        assert_eq!(enemy.apply_damage(30), 50);
        assert_eq!(enemy.apply_damage(200), 0);
        assert!(enemy.is_dead());

        let before = enemy.position;
        enemy.update(Duration::from_secs(1), &route());
        assert_eq!(enemy.position, before, "terminal enemies do not move");
    }
}

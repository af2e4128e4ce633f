//! Homing projectiles launched by towers.

use std::time::Duration;

use lane_defence_core::{EnemyId, ProjectileId, ProjectileSnapshot, Stride, WorldPoint};
use lane_defence_system_collision::ProjectileBody;

/// Projectile in flight, holding its target by identifier only.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    id: ProjectileId,
    position: WorldPoint,
    target: EnemyId,
    damage: u32,
    speed: f32,
    dead: bool,
}

impl Projectile {
    pub(crate) fn launch(
        id: ProjectileId,
        position: WorldPoint,
        target: EnemyId,
        damage: u32,
        speed: f32,
    ) -> Self {
        Self {
            id,
            position,
            target,
            damage,
            speed,
            dead: false,
        }
    }

    /// Homes toward the target's current position for `dt`.
    ///
    /// `target_position` is `None` when the target was removed or died, in
    /// which case the projectile terminates without effect. Reaching the
    /// target only snaps onto it; damage is left to the collision pass.
    pub(crate) fn update(&mut self, dt: Duration, target_position: Option<WorldPoint>) {
        if self.dead {
            return;
        }

        let Some(target_position) = target_position else {
            self.dead = true;
            return;
        };

        let budget = self.speed * dt.as_secs_f32();
        self.position = match self.position.stride_towards(target_position, budget) {
            Stride::Reached { .. } => target_position,
            Stride::Partial(position) => position,
        };
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            target: self.target,
        }
    }
}

impl ProjectileBody for Projectile {
    fn id(&self) -> ProjectileId {
        self.id
    }

    fn position(&self) -> WorldPoint {
        self.position
    }

    fn target(&self) -> EnemyId {
        self.target
    }

    fn damage(&self) -> u32 {
        self.damage
    }

    fn is_dead(&self) -> bool {
        self.dead
    }

    fn mark_dead(&mut self) {
        self.dead = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot() -> Projectile {
        Projectile::launch(
            ProjectileId::new(0),
            WorldPoint::new(0.0, 0.0),
            EnemyId::new(0),
            28,
            240.0,
        )
    }

    #[test]
    fn homes_toward_current_target_position() {
        let mut projectile = shot();
        projectile.update(Duration::from_millis(100), Some(WorldPoint::new(0.0, 100.0)));

        assert!((projectile.position.y() - 24.0).abs() < 1e-4);
        assert!(!projectile.dead);
    }

    #[test]
    fn snaps_when_step_covers_the_gap() {
        let mut projectile = shot();
        let target = WorldPoint::new(10.0, 10.0);
        projectile.update(Duration::from_millis(100), Some(target));

        assert_eq!(projectile.position, target);
        assert!(!projectile.dead, "arrival alone does not finish the projectile");
    }

    #[test]
    fn lost_target_terminates_projectile() {
        let mut projectile = shot();
        projectile.update(Duration::from_millis(100), None);

        assert!(projectile.is_dead());
        assert_eq!(projectile.snapshot().position, WorldPoint::new(0.0, 0.0));
    }
}

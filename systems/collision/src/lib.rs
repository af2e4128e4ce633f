#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collision pass that pairs projectiles with their targets and applies damage.
//!
//! Motion and damage are separate phases: projectiles only move during their
//! own update, and this pass runs afterwards to decide which of them struck
//! their target. Damage is applied here and nowhere else, exactly once per
//! projectile.

use lane_defence_core::{EnemyId, ProjectileId, WorldPoint};

/// Squared distance below which a projectile counts as touching its target.
pub const HIT_RADIUS_SQUARED: f32 = 16.0;

/// Projectile state the resolver needs to read and finalize.
pub trait ProjectileBody {
    /// Identifier of the projectile.
    fn id(&self) -> ProjectileId;
    /// Current position in world units.
    fn position(&self) -> WorldPoint;
    /// Enemy the projectile pursues.
    fn target(&self) -> EnemyId;
    /// Damage delivered on impact.
    fn damage(&self) -> u32;
    /// Whether the projectile already finished.
    fn is_dead(&self) -> bool;
    /// Marks the projectile as finished so the world removes it.
    fn mark_dead(&mut self);
}

/// Lookup of live enemies that projectiles can damage.
pub trait DamageTargets {
    /// Position of `enemy` while it is present and alive, `None` otherwise.
    fn locate(&self, enemy: EnemyId) -> Option<WorldPoint>;
    /// Applies `damage` to `enemy` and returns its remaining hit points.
    fn apply_damage(&mut self, enemy: EnemyId, damage: u32) -> u32;
}

/// Damage delivered by a single projectile during a collision pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Impact {
    /// Projectile that connected.
    pub projectile: ProjectileId,
    /// Enemy that received the damage.
    pub enemy: EnemyId,
    /// Damage applied.
    pub damage: u32,
    /// Hit points left on the enemy afterwards.
    pub remaining_hp: u32,
}

/// Resolves projectile impacts once all entities have moved for the tick.
#[derive(Clone, Copy, Debug)]
pub struct CollisionResolver {
    hit_radius_squared: f32,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self {
            hit_radius_squared: HIT_RADIUS_SQUARED,
        }
    }
}

impl CollisionResolver {
    /// Creates a resolver using the standard hit radius.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs every live projectile with its target and records impacts in `out`.
    ///
    /// Projectiles whose target is gone or dead are marked dead without
    /// effect. Projectiles are visited in slice order, so when several strike
    /// the same enemy in one pass the later ones find it dead once its hit
    /// points are exhausted and fizzle.
    pub fn resolve<P, T>(&self, projectiles: &mut [P], targets: &mut T, out: &mut Vec<Impact>)
    where
        P: ProjectileBody,
        T: DamageTargets,
    {
        for projectile in projectiles.iter_mut() {
            if projectile.is_dead() {
                continue;
            }

            let enemy = projectile.target();
            let Some(target_position) = targets.locate(enemy) else {
                projectile.mark_dead();
                continue;
            };

            if projectile.position().distance_squared(target_position) >= self.hit_radius_squared {
                continue;
            }

            let damage = projectile.damage();
            let remaining_hp = targets.apply_damage(enemy, damage);
            projectile.mark_dead();
            out.push(Impact {
                projectile: projectile.id(),
                enemy,
                damage,
                remaining_hp,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shot {
        id: u64,
        position: WorldPoint,
        target: u64,
        dead: bool,
    }

    impl ProjectileBody for Shot {
        fn id(&self) -> ProjectileId {
            ProjectileId::new(self.id)
        }
        fn position(&self) -> WorldPoint {
            self.position
        }
        fn target(&self) -> EnemyId {
            EnemyId::new(self.target)
        }
        fn damage(&self) -> u32 {
            30
        }
        fn is_dead(&self) -> bool {
            self.dead
        }
        fn mark_dead(&mut self) {
            self.dead = true;
        }
    }

    struct Dummy {
        position: WorldPoint,
        hp: u32,
    }

    impl DamageTargets for Dummy {
        fn locate(&self, enemy: EnemyId) -> Option<WorldPoint> {
            (enemy == EnemyId::new(1) && self.hp > 0).then_some(self.position)
        }
        fn apply_damage(&mut self, _enemy: EnemyId, damage: u32) -> u32 {
            self.hp = self.hp.saturating_sub(damage);
            self.hp
        }
    }

    fn shot(id: u64, x: f32, target: u64) -> Shot {
        Shot {
            id,
            position: WorldPoint::new(x, 0.0),
            target,
            dead: false,
        }
    }

    #[test]
    fn touching_projectile_damages_once() {
        let resolver = CollisionResolver::new();
        let mut shots = vec![shot(0, 1.0, 1)];
        let mut dummy = Dummy {
            position: WorldPoint::new(0.0, 0.0),
            hp: 80,
        };
        let mut out = Vec::new();

        resolver.resolve(&mut shots, &mut dummy, &mut out);
        resolver.resolve(&mut shots, &mut dummy, &mut out);

        assert_eq!(
            out,
            vec![Impact {
                projectile: ProjectileId::new(0),
                enemy: EnemyId::new(1),
                damage: 30,
                remaining_hp: 50,
            }]
        );
        assert!(shots[0].dead);
    }

    #[test]
    fn distant_projectile_keeps_flying() {
        let resolver = CollisionResolver::new();
        let mut shots = vec![shot(0, 4.0, 1)];
        let mut dummy = Dummy {
            position: WorldPoint::new(0.0, 0.0),
            hp: 80,
        };
        let mut out = Vec::new();

        resolver.resolve(&mut shots, &mut dummy, &mut out);

        assert!(out.is_empty(), "squared distance 16 is not below the threshold");
        assert!(!shots[0].dead);
        assert_eq!(dummy.hp, 80);
    }

    #[test]
    fn overkill_projectiles_fizzle_after_target_dies() {
        let resolver = CollisionResolver::new();
        let mut shots = vec![shot(0, 0.0, 1), shot(1, 0.5, 1), shot(2, 0.0, 7)];
        let mut dummy = Dummy {
            position: WorldPoint::new(0.0, 0.0),
            hp: 20,
        };
        let mut out = Vec::new();

        resolver.resolve(&mut shots, &mut dummy, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].remaining_hp, 0);
        assert!(shots.iter().all(|shot| shot.dead));
    }
}

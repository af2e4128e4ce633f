//! Authoritative tower state management utilities.

use std::time::Duration;

use lane_defence_core::{
    EnemyId, TileGrid, TilePosition, TowerId, TowerKind, TowerSnapshot, TowerStats, WorldPoint,
};
use lane_defence_system_placement::Placement;
use lane_defence_system_tower_targeting::{select_target, TargetCandidate};

/// Projectile launch requested by a tower that found a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FireOrder {
    pub(crate) tower: TowerId,
    pub(crate) origin: WorldPoint,
    pub(crate) target: EnemyId,
    pub(crate) damage: u32,
    pub(crate) speed: f32,
}

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    id: TowerId,
    tile: TilePosition,
    position: WorldPoint,
    stats: TowerStats,
    cooldown: Duration,
}

impl Tower {
    /// Counts the cooldown down and fires at the best candidate when ready.
    ///
    /// A tower fires at most once per call. Without a target the cooldown
    /// stays at zero and selection is retried on the next call.
    pub(crate) fn update<I>(&mut self, dt: Duration, candidates: I) -> Option<FireOrder>
    where
        I: IntoIterator<Item = TargetCandidate>,
    {
        self.cooldown = self.cooldown.saturating_sub(dt);
        if !self.cooldown.is_zero() {
            return None;
        }

        let target = select_target(self.position, self.stats.range, candidates)?;
        self.cooldown = self.stats.fire_period();
        Some(FireOrder {
            tower: self.id,
            origin: self.position,
            target,
            damage: self.stats.damage,
            speed: self.stats.projectile_speed,
        })
    }

    pub(crate) fn kind(&self) -> TowerKind {
        self.stats.kind
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.stats.kind,
            tile: self.tile,
            position: self.position,
            range: self.stats.range,
            cooldown: self.cooldown,
        }
    }
}

/// Registry that stores towers, tracks tile occupancy and allocates identifiers.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    towers: Vec<Tower>,
    occupancy: Vec<Option<TowerId>>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty registry sized for `grid`.
    pub(crate) fn new(grid: &TileGrid) -> Self {
        Self {
            towers: Vec::new(),
            occupancy: vec![None; grid.tile_count()],
            next_tower_id: TowerId::new(0),
        }
    }

    /// Builds the tower described by an approved placement.
    pub(crate) fn insert(&mut self, grid: &TileGrid, placement: Placement) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get() + 1);

        if let Some(slot) = grid
            .index(placement.tile)
            .and_then(|index| self.occupancy.get_mut(index))
        {
            *slot = Some(id);
        }

        self.towers.push(Tower {
            id,
            tile: placement.tile,
            position: placement.position,
            stats: placement.stats,
            cooldown: Duration::ZERO,
        });
        id
    }

    /// Tower standing on the tile at dense `index`, if any.
    pub(crate) fn occupant(&self, index: usize) -> Option<TowerId> {
        self.occupancy.get(index).copied().flatten()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.towers.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.towers.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::TowerCatalog;

    fn basic_placement(grid: &TileGrid, tile: TilePosition) -> Placement {
        let stats = *TowerCatalog::default()
            .get(TowerKind::Basic)
            .expect("basic tower");
        Placement {
            tile,
            position: grid.tile_center(tile),
            stats,
        }
    }

    fn candidate(id: u64, x: f32, y: f32) -> TargetCandidate {
        TargetCandidate {
            id: EnemyId::new(id),
            position: WorldPoint::new(x, y),
            targetable: true,
        }
    }

    #[test]
    fn registry_marks_occupied_tiles() {
        let grid = TileGrid::new(4, 4, 32.0);
        let mut registry = TowerRegistry::new(&grid);
        let tile = TilePosition::new(2, 1);

        let id = registry.insert(&grid, basic_placement(&grid, tile));

        assert_eq!(id, TowerId::new(0));
        assert_eq!(registry.occupant(6), Some(id));
        assert_eq!(registry.occupant(5), None);
        assert_eq!(registry.iter().count(), 1);
    }

    #[test]
    fn cooldown_gates_consecutive_shots() {
        let grid = TileGrid::new(4, 4, 32.0);
        let mut registry = TowerRegistry::new(&grid);
        let _ = registry.insert(&grid, basic_placement(&grid, TilePosition::new(0, 0)));
        let tower = registry.iter_mut().next().expect("tower");

        let first = tower.update(Duration::from_millis(16), vec![candidate(1, 40.0, 16.0)]);
        assert!(first.is_some(), "fresh towers fire immediately");
        assert_eq!(tower.snapshot().cooldown, Duration::from_millis(500));

        let blocked = tower.update(Duration::from_millis(400), vec![candidate(1, 40.0, 16.0)]);
        assert!(blocked.is_none());

        let second = tower.update(Duration::from_millis(100), vec![candidate(1, 40.0, 16.0)]);
        assert_eq!(second.map(|order| order.target), Some(EnemyId::new(1)));
    }

    #[test]
    fn idle_tower_stays_ready_without_targets() {
        let grid = TileGrid::new(4, 4, 32.0);
        let mut registry = TowerRegistry::new(&grid);
        let _ = registry.insert(&grid, basic_placement(&grid, TilePosition::new(0, 0)));
        let tower = registry.iter_mut().next().expect("tower");

        assert!(tower.update(Duration::from_millis(16), Vec::new()).is_none());
        assert!(tower.snapshot().cooldown.is_zero());
        assert!(tower
            .update(Duration::ZERO, vec![candidate(4, 16.0, 100.0)])
            .is_some());
    }
}

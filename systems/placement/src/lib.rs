#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement rules deciding whether a tower purchase may proceed.

use lane_defence_core::{
    PlacementError, TileGrid, TilePosition, TowerCatalog, TowerKind, TowerStats, WorldPoint,
};

/// Tile classification consulted by the placement rules.
pub trait TileLayout {
    /// Whether `tile` belongs to the enemy path.
    fn is_path(&self, tile: TilePosition) -> bool;
    /// Whether `tile` already hosts a tower.
    fn is_occupied(&self, tile: TilePosition) -> bool;
}

/// Tower purchase requested by the input layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementRequest {
    /// Kind of tower to build.
    pub kind: TowerKind,
    /// Requested location in world units.
    pub point: WorldPoint,
}

/// Approved placement ready to be applied by the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Tile the tower will occupy.
    pub tile: TilePosition,
    /// Centre of the tile in world units.
    pub position: WorldPoint,
    /// Catalog entry of the tower, including its cost.
    pub stats: TowerStats,
}

/// Validates placement requests against the grid and the tower catalog.
#[derive(Clone, Copy, Debug)]
pub struct PlacementRules<'a> {
    grid: &'a TileGrid,
    catalog: &'a TowerCatalog,
}

impl<'a> PlacementRules<'a> {
    /// Creates rules bound to the provided grid and catalog.
    #[must_use]
    pub const fn new(grid: &'a TileGrid, catalog: &'a TowerCatalog) -> Self {
        Self { grid, catalog }
    }

    /// Checks `request` against tile legality and the available `gold`.
    ///
    /// Checks run in a fixed order: catalog entry, grid bounds, path tiles,
    /// occupancy, then funds. The first failing check determines the error.
    pub fn evaluate<L>(
        &self,
        request: PlacementRequest,
        layout: &L,
        gold: u32,
    ) -> Result<Placement, PlacementError>
    where
        L: TileLayout + ?Sized,
    {
        let stats = *self
            .catalog
            .get(request.kind)
            .ok_or(PlacementError::UnknownTower)?;
        let tile = self
            .grid
            .tile_at(request.point)
            .ok_or(PlacementError::OutOfBounds)?;

        if layout.is_path(tile) {
            return Err(PlacementError::PathTile);
        }

        if layout.is_occupied(tile) {
            return Err(PlacementError::Occupied);
        }

        if gold < stats.cost {
            return Err(PlacementError::InsufficientGold);
        }

        Ok(Placement {
            tile,
            position: self.grid.tile_center(tile),
            stats,
        })
    }
}

//! Static enemy route and the tiles it covers.

use lane_defence_core::{TileGrid, TilePosition, WorldPoint};

/// Fixed polyline walked by every enemy together with its dense tile mask.
///
/// Waypoints sit at tile centres: the level lists path corners at tile
/// origins and the route shifts each corner by half a tile.
#[derive(Clone, Debug, Default)]
pub(crate) struct Route {
    waypoints: Vec<WorldPoint>,
    tiles: Vec<bool>,
}

impl Route {
    /// Builds the route for `corners` laid over `grid`.
    pub(crate) fn build<I>(grid: &TileGrid, corners: I) -> Self
    where
        I: IntoIterator<Item = WorldPoint>,
    {
        let half = grid.tile_length() / 2.0;
        let corners: Vec<WorldPoint> = corners.into_iter().collect();
        let waypoints = corners
            .iter()
            .map(|corner| WorldPoint::new(corner.x() + half, corner.y() + half))
            .collect();

        let mut tiles = vec![false; grid.tile_count()];
        let mut mark = |column: i64, row: i64| {
            let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) else {
                return;
            };
            if let Some(index) = grid.index(TilePosition::new(column, row)) {
                tiles[index] = true;
            }
        };

        let tile_of = |point: &WorldPoint| {
            (
                (point.x() / grid.tile_length()).floor() as i64,
                (point.y() / grid.tile_length()).floor() as i64,
            )
        };

        if let [single] = corners.as_slice() {
            let (column, row) = tile_of(single);
            mark(column, row);
        }

        for segment in corners.windows(2) {
            let (mut column, mut row) = tile_of(&segment[0]);
            let (end_column, end_row) = tile_of(&segment[1]);
            let step_column = (end_column - column).signum();
            let step_row = (end_row - row).signum();

            mark(column, row);
            while column != end_column || row != end_row {
                if column != end_column {
                    column += step_column;
                }
                if row != end_row {
                    row += step_row;
                }
                mark(column, row);
            }
        }

        Self { waypoints, tiles }
    }

    /// Waypoints in walking order.
    pub(crate) fn waypoints(&self) -> &[WorldPoint] {
        &self.waypoints
    }

    /// Point where enemies enter the playfield.
    pub(crate) fn spawn_point(&self) -> WorldPoint {
        self.waypoints.first().copied().unwrap_or_default()
    }

    /// Whether the tile at dense `index` belongs to the route.
    pub(crate) fn covers_index(&self, index: usize) -> bool {
        self.tiles.get(index).copied().unwrap_or(false)
    }

    /// Dense mask of route tiles in row-major order.
    pub(crate) fn tile_mask(&self) -> &[bool] {
        &self.tiles
    }
}

use lane_defence_core::{
    PlacementError, TileGrid, TilePosition, TowerCatalog, TowerKind, WorldPoint,
};
use lane_defence_system_placement::{PlacementRequest, PlacementRules, TileLayout};

struct PathRow {
    row: u32,
}

impl TileLayout for PathRow {
    fn is_path(&self, tile: TilePosition) -> bool {
        tile.row() == self.row
    }

    fn is_occupied(&self, _tile: TilePosition) -> bool {
        false
    }
}

fn basic_at(x: f32, y: f32) -> PlacementRequest {
    PlacementRequest {
        kind: TowerKind::Basic,
        point: WorldPoint::new(x, y),
    }
}

#[test]
fn path_tile_is_rejected_regardless_of_gold() {
    let grid = TileGrid::new(20, 15, 32.0);
    let catalog = TowerCatalog::default();
    let rules = PlacementRules::new(&grid, &catalog);
    let layout = PathRow { row: 2 };

    for gold in [0, 80, u32::MAX] {
        assert_eq!(
            rules.evaluate(basic_at(40.0, 70.0), &layout, gold),
            Err(PlacementError::PathTile),
            "path tiles must stay free with {gold} gold",
        );
    }
}

#[test]
fn exact_cost_is_affordable() {
    let grid = TileGrid::new(20, 15, 32.0);
    let catalog = TowerCatalog::default();
    let rules = PlacementRules::new(&grid, &catalog);
    let layout = PathRow { row: 2 };

    assert!(rules.evaluate(basic_at(40.0, 10.0), &layout, 80).is_ok());
    assert_eq!(
        rules.evaluate(basic_at(40.0, 10.0), &layout, 79),
        Err(PlacementError::InsufficientGold)
    );
}

#[test]
fn points_outside_the_grid_are_rejected() {
    let grid = TileGrid::new(20, 15, 32.0);
    let catalog = TowerCatalog::default();
    let rules = PlacementRules::new(&grid, &catalog);
    let layout = PathRow { row: 2 };

    for (x, y) in [(-1.0, 10.0), (640.0, 10.0), (10.0, 480.0)] {
        assert_eq!(
            rules.evaluate(basic_at(x, y), &layout, 1000),
            Err(PlacementError::OutOfBounds)
        );
    }
}

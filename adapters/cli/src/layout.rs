//! Parsing of tower placements supplied on the command line.

use std::str::FromStr;

use lane_defence_core::{ParseKindError, TilePosition, TowerKind};
use thiserror::Error;

const KIND_DELIMITER: char = '@';
const COORDINATE_DELIMITER: char = ',';

/// Tower to buy before the first wave, written as `kind@column,row`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TowerPlan {
    /// Catalog entry to build.
    pub(crate) kind: TowerKind,
    /// Tile receiving the tower.
    pub(crate) tile: TilePosition,
}

/// Errors produced while parsing a [`TowerPlan`].
#[derive(Debug, Error)]
pub(crate) enum TowerPlanError {
    /// The value did not contain the `@` separator.
    #[error("expected `kind@column,row`, got `{0}`")]
    MissingKind(String),
    /// The tower kind was not recognised.
    #[error(transparent)]
    UnknownKind(#[from] ParseKindError),
    /// The tile coordinates could not be parsed.
    #[error("could not parse tile coordinates `{0}`")]
    InvalidTile(String),
}

impl FromStr for TowerPlan {
    type Err = TowerPlanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (kind, tile) = trimmed
            .split_once(KIND_DELIMITER)
            .ok_or_else(|| TowerPlanError::MissingKind(trimmed.to_owned()))?;

        Ok(Self {
            kind: kind.trim().to_ascii_lowercase().parse()?,
            tile: parse_tile(tile)?,
        })
    }
}

fn parse_tile(tile: &str) -> Result<TilePosition, TowerPlanError> {
    let invalid = || TowerPlanError::InvalidTile(tile.to_owned());
    let (column, row) = tile.split_once(COORDINATE_DELIMITER).ok_or_else(invalid)?;

    let column = column.trim().parse::<u32>().map_err(|_| invalid())?;
    let row = row.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok(TilePosition::new(column, row))
}

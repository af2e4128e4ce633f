#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values that drivers forward
//! through an [`EventBus`]. Renderers consume the read-only snapshot views
//! defined here and never feed back into the simulation.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod bus;
pub mod config;

pub use bus::{EventBus, ListenerId};
pub use config::{
    ConfigError, DifficultyProfile, DifficultyTable, GameConfig, LevelDefinition, SpawnEvent,
    TowerCatalog, TowerStats, WaveDefinition,
};

/// Upper bound applied to a single tick so frame hitches cannot produce huge physics steps.
pub const MAX_TICK: Duration = Duration::from_millis(100);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of wall time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Requests that the next wave of the level begins spawning.
    StartNextWave,
    /// Selects the tower kind used by subsequent placement attempts.
    SelectTowerKind {
        /// Kind to place next, or `None` to fall back to the default kind.
        kind: Option<TowerKind>,
    },
    /// Records the latest pointer position reported by the input layer.
    MovePointer {
        /// Pointer location expressed in world units.
        position: WorldPoint,
    },
    /// Moves the pointer to the provided location and attempts a placement there.
    PlaceTowerAt {
        /// Location of the click expressed in world units.
        position: WorldPoint,
    },
    /// Attempts a placement at the last known pointer position.
    PlaceTowerAtPointer,
    /// Toggles the debug overlay flag exposed to renderers.
    SetDebug {
        /// Whether debug presentation should be enabled.
        enabled: bool,
    },
    /// Requests a difficulty change before the first wave begins.
    SetDifficulty {
        /// Difficulty that should become active.
        difficulty: DifficultyLevel,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Clamped duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a wave began consuming its spawn schedule.
    WaveStarted {
        /// Zero-based index of the wave that started.
        wave: u32,
        /// Number of spawn events queued for the wave.
        spawn_events: usize,
    },
    /// Reports that a start request was refused.
    WaveStartRejected {
        /// Specific reason the wave could not start.
        reason: WaveStartError,
    },
    /// Confirms that the wave director created an enemy.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Kind of enemy created.
        kind: EnemyKind,
        /// Hit points the enemy starts with.
        max_hp: u32,
    },
    /// Reports that an enemy was destroyed and removed from the world.
    EnemyKilled {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Gold awarded for the kill.
        payout: u32,
    },
    /// Reports that an enemy reached the end of the path and was removed.
    EnemyLeaked {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile pursues.
        target: EnemyId,
    },
    /// Confirms that a projectile struck its target.
    ProjectileHit {
        /// Projectile that connected.
        projectile: ProjectileId,
        /// Enemy that received the damage.
        enemy: EnemyId,
        /// Damage applied by the impact.
        damage: u32,
        /// Hit points the enemy retains after the impact.
        remaining_hp: u32,
    },
    /// Announces that every spawn of a wave was issued and no enemy remains alive.
    WaveCleared {
        /// Zero-based index of the cleared wave.
        wave: u32,
    },
    /// Announces that the final wave was cleared without losing the game.
    Victory,
    /// Announces that the player ran out of lives.
    GameOver,
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Tile occupied by the tower.
        tile: TilePosition,
        /// Gold debited for the purchase.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a new difficulty profile is active.
    DifficultyChanged {
        /// Difficulty that became active.
        difficulty: DifficultyLevel,
    },
    /// Reports that a difficulty change request was rejected.
    DifficultyChangeRejected {
        /// Difficulty that was requested.
        difficulty: DifficultyLevel,
        /// Specific reason the change failed.
        reason: DifficultyError,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u64);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u64);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u64);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Continuous position expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the point.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate of the point.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Squared euclidean distance to `other`, avoiding the square root.
    #[must_use]
    pub fn distance_squared(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Moves toward `target` spending at most `budget` world units.
    ///
    /// When the budget covers the remaining gap the point snaps onto the
    /// target and the unspent budget is reported so callers can continue
    /// along a polyline.
    #[must_use]
    pub fn stride_towards(self, target: WorldPoint, budget: f32) -> Stride {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let distance = (dx * dx + dy * dy).sqrt();

        if budget >= distance {
            return Stride::Reached {
                remaining: budget - distance,
            };
        }

        Stride::Partial(WorldPoint::new(
            self.x + dx / distance * budget,
            self.y + dy / distance * budget,
        ))
    }
}

/// Outcome of moving a point toward a destination with a limited budget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stride {
    /// The destination was reached; the point should snap onto it.
    Reached {
        /// Travel budget left over after arriving.
        remaining: f32,
    },
    /// The budget ran out before arrival; the point moved to the contained position.
    Partial(WorldPoint),
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePosition {
    column: u32,
    row: u32,
}

impl TilePosition {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Describes the discrete tile layout of the playfield.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_length: f32,
}

impl TileGrid {
    /// Creates a new tile grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_length: f32) -> Self {
        Self {
            columns,
            rows,
            tile_length,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Resolves the tile containing `point`, or `None` when it lies outside the grid.
    #[must_use]
    pub fn tile_at(&self, point: WorldPoint) -> Option<TilePosition> {
        if !(self.tile_length > 0.0) {
            return None;
        }

        let column = (point.x() / self.tile_length).floor();
        let row = (point.y() / self.tile_length).floor();
        // Written negated so NaN coordinates fall outside the grid.
        if !(column >= 0.0 && row >= 0.0) {
            return None;
        }
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }

        Some(TilePosition::new(column as u32, row as u32))
    }

    /// Upper-left corner of `tile` in world units.
    #[must_use]
    pub fn tile_origin(&self, tile: TilePosition) -> WorldPoint {
        WorldPoint::new(
            tile.column() as f32 * self.tile_length,
            tile.row() as f32 * self.tile_length,
        )
    }

    /// Centre of `tile` in world units.
    #[must_use]
    pub fn tile_center(&self, tile: TilePosition) -> WorldPoint {
        let half = self.tile_length / 2.0;
        let origin = self.tile_origin(tile);
        WorldPoint::new(origin.x() + half, origin.y() + half)
    }

    /// Dense row-major index of `tile`, or `None` when it lies outside the grid.
    #[must_use]
    pub fn index(&self, tile: TilePosition) -> Option<usize> {
        if tile.column() < self.columns && tile.row() < self.rows {
            let row = usize::try_from(tile.row()).ok()?;
            let column = usize::try_from(tile.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    /// Total number of tiles contained in the grid.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(0)
    }
}

/// Types of enemies that waves can spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Sturdy, slow walker.
    Basic,
    /// Fragile runner.
    Fast,
}

impl EnemyKind {
    /// Movement speed in world units per second before difficulty scaling.
    #[must_use]
    pub const fn base_speed(self) -> f32 {
        match self {
            Self::Basic => 70.0,
            Self::Fast => 120.0,
        }
    }

    /// Hit points on the first wave before difficulty scaling.
    #[must_use]
    pub const fn base_hp(self) -> f32 {
        match self {
            Self::Basic => 80.0,
            Self::Fast => 50.0,
        }
    }

    /// Additional hit points gained per wave index before difficulty scaling.
    #[must_use]
    pub const fn hp_per_wave(self) -> f32 {
        match self {
            Self::Basic => 25.0,
            Self::Fast => 10.0,
        }
    }

    /// Gold awarded when an enemy of this kind is killed.
    #[must_use]
    pub const fn payout(self) -> u32 {
        match self {
            Self::Basic => 15,
            Self::Fast => 10,
        }
    }
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerKind {
    /// Cheap, fast-firing tower with a short range.
    #[default]
    Basic,
    /// Expensive, slow-firing tower with a long range and heavy hits.
    Sniper,
}

impl TowerKind {
    /// Canonical lowercase identifier used by configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Sniper => "sniper",
        }
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TowerKind {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "basic" => Ok(Self::Basic),
            "sniper" => Ok(Self::Sniper),
            other => Err(ParseKindError::new(other)),
        }
    }
}

/// Difficulty presets selectable before the first wave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    /// Weaker enemies, more gold and lives.
    Easy,
    /// Baseline tuning.
    #[default]
    Normal,
    /// Tougher, faster enemies with fewer resources.
    Hard,
}

impl DifficultyLevel {
    /// Canonical lowercase identifier used by configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            other => Err(ParseKindError::new(other)),
        }
    }
}

/// Error returned when a textual identifier does not name a known kind.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown identifier `{identifier}`")]
pub struct ParseKindError {
    identifier: String,
}

impl ParseKindError {
    fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_owned(),
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The tower catalog holds no entry for the requested kind.
    #[error("no catalog entry for the requested tower")]
    UnknownTower,
    /// The requested point does not resolve to a tile inside the grid.
    #[error("point lies outside the tile grid")]
    OutOfBounds,
    /// The requested tile is part of the enemy path.
    #[error("tile belongs to the enemy path")]
    PathTile,
    /// The requested tile already hosts a tower.
    #[error("tile already hosts a tower")]
    Occupied,
    /// The player cannot afford the tower.
    #[error("insufficient gold")]
    InsufficientGold,
}

/// Reasons a wave start request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum WaveStartError {
    /// A wave is still spawning or has enemies alive.
    #[error("a wave is already in progress")]
    WaveInProgress,
    /// Every wave of the level has already been started.
    #[error("all waves have been started")]
    NoWavesRemaining,
    /// The game ended; no further waves may start.
    #[error("the game is over")]
    GameOver,
}

/// Reasons a difficulty change may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum DifficultyError {
    /// Difficulty is locked once the first wave begins.
    #[error("difficulty is locked once waves have started")]
    WavesStarted,
    /// The difficulty table holds no profile for the requested level.
    #[error("no profile configured for the requested difficulty")]
    UnknownDifficulty,
}

/// Macro state of a running game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// No wave has been started yet.
    NotStarted,
    /// A wave is spawning or has live enemies.
    WaveInProgress,
    /// The last started wave was cleared and further waves remain.
    WaveCleared,
    /// Every wave was cleared before lives ran out.
    Victory,
    /// Lives reached zero.
    GameOver,
}

impl GamePhase {
    /// Reports whether the phase ends the game.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::GameOver)
    }
}

/// Progress through the level's wave list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveProgress {
    /// Number of waves that have been started.
    pub started: u32,
    /// Number of waves defined by the level.
    pub total: u32,
    /// Whether a wave is currently in progress.
    pub in_progress: bool,
}

/// Tile under the pointer, as consumed by hover highlighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoverTile {
    /// Tile containing the pointer.
    pub tile: TilePosition,
    /// Whether the tile belongs to the enemy path.
    pub is_path: bool,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Current position in world units.
    pub position: WorldPoint,
    /// Remaining hit points.
    pub hp: u32,
    /// Hit points the enemy spawned with.
    pub max_hp: u32,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Tile occupied by the tower.
    pub tile: TilePosition,
    /// Centre of the tower in world units.
    pub position: WorldPoint,
    /// Targeting radius in world units.
    pub range: f32,
    /// Time remaining before the tower may fire again.
    pub cooldown: Duration,
}

/// Read-only snapshot describing all towers placed in the world.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no tower was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Current position in world units.
    pub position: WorldPoint,
    /// Enemy the projectile pursues.
    pub target: EnemyId,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured projectiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectile was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DifficultyLevel, PlacementError, Stride, TileGrid, TilePosition, TowerId, TowerKind,
        WorldPoint,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tower_id_round_trips_through_bincode() {
        assert_round_trip(&TowerId::new(42));
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::PathTile);
    }

    #[test]
    fn stride_reports_leftover_budget_on_arrival() {
        let start = WorldPoint::new(0.0, 0.0);
        let target = WorldPoint::new(3.0, 4.0);

        match start.stride_towards(target, 7.0) {
            Stride::Reached { remaining } => assert!((remaining - 2.0).abs() < 1e-5),
            other => panic!("expected arrival, got {other:?}"),
        }
    }

    #[test]
    fn stride_moves_partially_along_the_segment() {
        let start = WorldPoint::new(0.0, 0.0);
        let target = WorldPoint::new(10.0, 0.0);

        assert_eq!(
            start.stride_towards(target, 4.0),
            Stride::Partial(WorldPoint::new(4.0, 0.0))
        );
    }

    #[test]
    fn stride_onto_current_position_arrives_immediately() {
        let point = WorldPoint::new(5.0, 5.0);
        assert_eq!(
            point.stride_towards(point, 0.0),
            Stride::Reached { remaining: 0.0 }
        );
    }

    #[test]
    fn tile_lookup_respects_grid_bounds() {
        let grid = TileGrid::new(20, 15, 32.0);

        assert_eq!(
            grid.tile_at(WorldPoint::new(70.0, 40.0)),
            Some(TilePosition::new(2, 1))
        );
        assert_eq!(grid.tile_at(WorldPoint::new(-1.0, 40.0)), None);
        assert_eq!(grid.tile_at(WorldPoint::new(640.0, 40.0)), None);
        assert_eq!(grid.tile_at(WorldPoint::new(10.0, 480.0)), None);
    }

    #[test]
    fn non_finite_points_resolve_to_no_tile() {
        let grid = TileGrid::new(20, 15, 32.0);

        assert_eq!(grid.tile_at(WorldPoint::new(f32::NAN, f32::NAN)), None);
        assert_eq!(grid.tile_at(WorldPoint::new(40.0, f32::NAN)), None);
        assert_eq!(grid.tile_at(WorldPoint::new(f32::INFINITY, 40.0)), None);
        assert_eq!(grid.tile_at(WorldPoint::new(f32::NEG_INFINITY, 40.0)), None);
        assert_eq!(TileGrid::new(20, 15, f32::NAN).tile_at(WorldPoint::new(40.0, 40.0)), None);
    }

    #[test]
    fn tile_center_sits_half_a_tile_from_origin() {
        let grid = TileGrid::new(20, 15, 32.0);
        assert_eq!(
            grid.tile_center(TilePosition::new(3, 2)),
            WorldPoint::new(112.0, 80.0)
        );
    }

    #[test]
    fn kinds_parse_from_configuration_identifiers() {
        assert_eq!("sniper".parse::<TowerKind>(), Ok(TowerKind::Sniper));
        assert_eq!("hard".parse::<DifficultyLevel>(), Ok(DifficultyLevel::Hard));
        assert!("laser".parse::<TowerKind>().is_err());
    }
}

//! Static content consumed by the world: level layout, wave schedules, tower
//! catalog and difficulty table.
//!
//! Configuration is plain data. It can be assembled in code, parsed from TOML
//! or JSON, and must pass [`GameConfig::validate`] before a world accepts it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DifficultyLevel, EnemyKind, TileGrid, TowerKind, WorldPoint};

const DEFAULT_COLUMNS: u32 = 20;
const DEFAULT_ROWS: u32 = 15;
const DEFAULT_TILE_LENGTH: f32 = 32.0;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed into a configuration.
    #[error("failed to parse TOML configuration")]
    Toml(#[from] toml::de::Error),
    /// The JSON document could not be parsed into a configuration.
    #[error("failed to parse JSON configuration")]
    Json(#[from] serde_json::Error),
    /// The grid has no tiles or a non-positive tile length.
    #[error("tile grid must have at least one tile and a positive tile length")]
    EmptyGrid,
    /// The level path needs at least one waypoint.
    #[error("level path must contain at least one waypoint")]
    EmptyPath,
    /// A path corner has a NaN or infinite coordinate.
    #[error("path waypoint {index} has a non-finite coordinate")]
    NonFiniteWaypoint {
        /// Zero-based index of the offending corner.
        index: usize,
    },
    /// The level defines no waves.
    #[error("level must define at least one wave")]
    NoWaves,
    /// A wave lists a spawn event earlier than the one preceding it.
    #[error("wave {wave} spawn event {index} starts before the event preceding it")]
    UnsortedSpawnOffsets {
        /// Zero-based index of the offending wave.
        wave: usize,
        /// Zero-based index of the first out-of-order spawn event.
        index: usize,
    },
    /// A tower entry has a range or projectile speed that is not a positive finite number.
    #[error("tower `{kind}` has invalid {field}: must be positive and finite")]
    InvalidTowerStats {
        /// Kind of the offending entry.
        kind: TowerKind,
        /// Name of the rejected field.
        field: &'static str,
    },
    /// A difficulty profile has a multiplier outside its accepted range.
    #[error("difficulty `{level}` has invalid {field}")]
    InvalidDifficultyProfile {
        /// Level of the offending profile.
        level: DifficultyLevel,
        /// Name of the rejected field.
        field: &'static str,
    },
    /// The tower catalog lists the same kind twice.
    #[error("tower `{0}` is defined more than once")]
    DuplicateTower(TowerKind),
    /// The difficulty table lists the same level twice.
    #[error("difficulty `{0}` is defined more than once")]
    DuplicateDifficulty(DifficultyLevel),
    /// The configured starting difficulty has no profile.
    #[error("starting difficulty `{0}` has no profile")]
    MissingDifficulty(DifficultyLevel),
}

/// Combat parameters of a tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Kind the entry describes.
    pub kind: TowerKind,
    /// Gold required to build the tower.
    pub cost: u32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Damage dealt by each projectile.
    pub damage: u32,
    /// Minimum time between shots, in milliseconds.
    pub fire_period_ms: u64,
    /// Projectile speed in world units per second.
    pub projectile_speed: f32,
}

impl TowerStats {
    /// Minimum time between shots.
    #[must_use]
    pub const fn fire_period(&self) -> Duration {
        Duration::from_millis(self.fire_period_ms)
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

impl TowerStats {
    fn check(&self) -> Result<(), ConfigError> {
        let field = if !is_positive(self.range) {
            "range"
        } else if !is_positive(self.projectile_speed) {
            "projectile_speed"
        } else {
            return Ok(());
        };
        Err(ConfigError::InvalidTowerStats {
            kind: self.kind,
            field,
        })
    }
}

/// Registry of purchasable towers keyed by kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TowerCatalog {
    entries: Vec<TowerStats>,
}

impl TowerCatalog {
    /// Creates a catalog from the provided entries.
    #[must_use]
    pub fn new(entries: Vec<TowerStats>) -> Self {
        Self { entries }
    }

    /// Registers or replaces the entry for `stats.kind`.
    pub fn register(&mut self, stats: TowerStats) {
        match self.entries.iter_mut().find(|entry| entry.kind == stats.kind) {
            Some(entry) => *entry = stats,
            None => self.entries.push(stats),
        }
    }

    /// Looks up the stats registered for `kind`.
    #[must_use]
    pub fn get(&self, kind: TowerKind) -> Option<&TowerStats> {
        self.entries.iter().find(|entry| entry.kind == kind)
    }

    /// Iterator over the registered entries.
    pub fn iter(&self) -> impl Iterator<Item = &TowerStats> {
        self.entries.iter()
    }
}

impl Default for TowerCatalog {
    fn default() -> Self {
        Self::new(vec![
            TowerStats {
                kind: TowerKind::Basic,
                cost: 80,
                range: 120.0,
                damage: 28,
                fire_period_ms: 500,
                projectile_speed: 240.0,
            },
            TowerStats {
                kind: TowerKind::Sniper,
                cost: 140,
                range: 260.0,
                damage: 120,
                fire_period_ms: 1800,
                projectile_speed: 520.0,
            },
        ])
    }
}

/// Tuning applied to enemies and starting resources for a difficulty level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Level the profile applies to.
    pub level: DifficultyLevel,
    /// Multiplier applied to every enemy's base hit points.
    pub hp_base_multiplier: f32,
    /// Multiplier applied to the per-wave hit point increment.
    pub hp_wave_increment_multiplier: f32,
    /// Multiplier applied to enemy movement speed.
    pub speed_multiplier: f32,
    /// Gold available before the first wave.
    pub start_gold: u32,
    /// Lives available before the first wave.
    pub start_lives: u32,
}

impl DifficultyProfile {
    /// Hit points for an enemy of `kind` spawned during `wave_index`.
    ///
    /// Never returns zero so a freshly spawned enemy is always alive.
    #[must_use]
    pub fn scaled_max_hp(&self, kind: EnemyKind, wave_index: u32) -> u32 {
        let base = kind.base_hp() * self.hp_base_multiplier;
        let increment = wave_index as f32 * kind.hp_per_wave() * self.hp_wave_increment_multiplier;
        let hp = (base + increment).round();
        if hp < 1.0 {
            1
        } else {
            hp as u32
        }
    }

    /// Movement speed for an enemy of `kind`, in world units per second.
    #[must_use]
    pub fn scaled_speed(&self, kind: EnemyKind) -> f32 {
        kind.base_speed() * self.speed_multiplier
    }
}

impl DifficultyProfile {
    /// Enemies must move forward, and hit point multipliers may not be negative.
    fn check(&self) -> Result<(), ConfigError> {
        let non_negative = |value: f32| value.is_finite() && value >= 0.0;
        let field = if !is_positive(self.speed_multiplier) {
            "speed_multiplier"
        } else if !non_negative(self.hp_base_multiplier) {
            "hp_base_multiplier"
        } else if !non_negative(self.hp_wave_increment_multiplier) {
            "hp_wave_increment_multiplier"
        } else {
            return Ok(());
        };
        Err(ConfigError::InvalidDifficultyProfile {
            level: self.level,
            field,
        })
    }
}

/// Table of difficulty profiles keyed by level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifficultyTable {
    profiles: Vec<DifficultyProfile>,
}

impl DifficultyTable {
    /// Creates a table from the provided profiles.
    #[must_use]
    pub fn new(profiles: Vec<DifficultyProfile>) -> Self {
        Self { profiles }
    }

    /// Looks up the profile configured for `level`.
    #[must_use]
    pub fn get(&self, level: DifficultyLevel) -> Option<&DifficultyProfile> {
        self.profiles.iter().find(|profile| profile.level == level)
    }

    /// Iterator over the configured profiles.
    pub fn iter(&self) -> impl Iterator<Item = &DifficultyProfile> {
        self.profiles.iter()
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self::new(vec![
            DifficultyProfile {
                level: DifficultyLevel::Easy,
                hp_base_multiplier: 0.8,
                hp_wave_increment_multiplier: 0.8,
                speed_multiplier: 0.95,
                start_gold: 260,
                start_lives: 26,
            },
            DifficultyProfile {
                level: DifficultyLevel::Normal,
                hp_base_multiplier: 1.0,
                hp_wave_increment_multiplier: 1.0,
                speed_multiplier: 1.0,
                start_gold: 200,
                start_lives: 20,
            },
            DifficultyProfile {
                level: DifficultyLevel::Hard,
                hp_base_multiplier: 1.2,
                hp_wave_increment_multiplier: 1.2,
                speed_multiplier: 1.05,
                start_gold: 160,
                start_lives: 15,
            },
        ])
    }
}

/// Timed batch of identical enemies inside a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnEvent {
    /// Delay after the wave start, in milliseconds.
    pub offset_ms: u64,
    /// Kind of enemy to spawn.
    pub enemy: EnemyKind,
    /// Number of enemies spawned at once.
    pub count: u32,
}

impl SpawnEvent {
    /// Creates a new spawn event.
    #[must_use]
    pub const fn new(offset_ms: u64, enemy: EnemyKind, count: u32) -> Self {
        Self {
            offset_ms,
            enemy,
            count,
        }
    }

    /// Delay after the wave start.
    #[must_use]
    pub const fn offset(&self) -> Duration {
        Duration::from_millis(self.offset_ms)
    }
}

/// Ordered spawn schedule making up one stage of a level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveDefinition {
    /// Spawn events in consumption order.
    pub spawns: Vec<SpawnEvent>,
}

impl WaveDefinition {
    /// Creates a wave from its spawn events.
    #[must_use]
    pub fn new(spawns: Vec<SpawnEvent>) -> Self {
        Self { spawns }
    }

    /// Total number of enemies the wave spawns.
    #[must_use]
    pub fn enemy_count(&self) -> u64 {
        self.spawns
            .iter()
            .map(|spawn| u64::from(spawn.count))
            .sum()
    }

    fn first_unsorted_offset(&self) -> Option<usize> {
        self.spawns
            .windows(2)
            .position(|pair| pair[1].offset_ms < pair[0].offset_ms)
            .map(|index| index + 1)
    }
}

/// Enemy path and wave schedule of a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Path corners in world units, measured at tile origins.
    pub path: Vec<[f32; 2]>,
    /// Waves in play order.
    pub waves: Vec<WaveDefinition>,
}

impl LevelDefinition {
    /// Path corners as world points.
    pub fn waypoints(&self) -> impl Iterator<Item = WorldPoint> + '_ {
        self.path.iter().map(|[x, y]| WorldPoint::new(*x, *y))
    }
}

impl Default for LevelDefinition {
    fn default() -> Self {
        let tile = DEFAULT_TILE_LENGTH;
        let corner = |column: f32, row: f32| [column * tile, row * tile];
        let wave = |spawns: &[(u64, EnemyKind, u32)]| {
            WaveDefinition::new(
                spawns
                    .iter()
                    .map(|(offset, enemy, count)| SpawnEvent::new(*offset, *enemy, *count))
                    .collect(),
            )
        };

        Self {
            path: vec![
                corner(0.0, 2.0),
                corner(6.0, 2.0),
                corner(6.0, 8.0),
                corner(16.0, 8.0),
                corner(16.0, 13.0),
                corner(19.0, 13.0),
            ],
            waves: vec![
                wave(&[(0, EnemyKind::Basic, 4)]),
                wave(&[(0, EnemyKind::Basic, 6), (2500, EnemyKind::Fast, 4)]),
                wave(&[(0, EnemyKind::Basic, 8), (3000, EnemyKind::Fast, 6)]),
                wave(&[(0, EnemyKind::Fast, 10), (3500, EnemyKind::Basic, 8)]),
                wave(&[(0, EnemyKind::Basic, 12), (4000, EnemyKind::Fast, 12)]),
            ],
        }
    }
}

/// Complete configuration required to construct a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tile layout of the playfield.
    pub grid: TileGrid,
    /// Enemy path and waves.
    pub level: LevelDefinition,
    /// Purchasable towers.
    pub towers: TowerCatalog,
    /// Difficulty presets.
    pub difficulties: DifficultyTable,
    /// Difficulty active when the world is created.
    pub difficulty: DifficultyLevel,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: TileGrid::new(DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_TILE_LENGTH),
            level: LevelDefinition::default(),
            towers: TowerCatalog::default(),
            difficulties: DifficultyTable::default(),
            difficulty: DifficultyLevel::default(),
        }
    }
}

impl GameConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the structural requirements the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.tile_count() == 0 || !is_positive(self.grid.tile_length()) {
            return Err(ConfigError::EmptyGrid);
        }

        if self.level.path.is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        if let Some(index) = self
            .level
            .path
            .iter()
            .position(|corner| corner.iter().any(|coordinate| !coordinate.is_finite()))
        {
            return Err(ConfigError::NonFiniteWaypoint { index });
        }

        if self.level.waves.is_empty() {
            return Err(ConfigError::NoWaves);
        }

        for (wave, definition) in self.level.waves.iter().enumerate() {
            if let Some(index) = definition.first_unsorted_offset() {
                return Err(ConfigError::UnsortedSpawnOffsets { wave, index });
            }
        }

        for (index, stats) in self.towers.iter().enumerate() {
            stats.check()?;
            if self.towers.iter().skip(index + 1).any(|other| other.kind == stats.kind) {
                return Err(ConfigError::DuplicateTower(stats.kind));
            }
        }

        for (index, profile) in self.difficulties.iter().enumerate() {
            profile.check()?;
            if self
                .difficulties
                .iter()
                .skip(index + 1)
                .any(|other| other.level == profile.level)
            {
                return Err(ConfigError::DuplicateDifficulty(profile.level));
            }
        }

        if self.difficulties.get(self.difficulty).is_none() {
            return Err(ConfigError::MissingDifficulty(self.difficulty));
        }

        Ok(())
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Defence.
//!
//! The [`World`] is the single owner of every mutable piece of game state.
//! It is only changed through [`apply`], either by a [`Command::Tick`] that
//! runs one simulation step or by the discrete commands issued by the input
//! layer. Renderers read it through the [`query`] module.
//!
//! The economy ledger is the world's own built-in subscriber: every event is
//! handed to it as it is emitted, before any listener on a
//! [`Simulation`]'s event bus observes it.

mod enemies;
mod path;
mod projectiles;
mod simulation;
mod towers;

use std::time::Duration;

use lane_defence_core::{
    Command, ConfigError, DifficultyError, DifficultyLevel, DifficultyProfile, EnemyId, Event,
    GameConfig, PlacementError, ProjectileId, TileGrid, TilePosition, TowerKind, WaveStartError,
    WorldPoint, MAX_TICK,
};
use lane_defence_system_collision::{CollisionResolver, DamageTargets, Impact, ProjectileBody};
use lane_defence_system_economy::Economy;
use lane_defence_system_placement::{PlacementRequest, PlacementRules, TileLayout};
use lane_defence_system_tower_targeting::TargetCandidate;
use lane_defence_system_wave_director::{SpawnOrder, WaveDirector};
use tracing::{debug, info, trace};

use crate::{enemies::Enemy, path::Route, projectiles::Projectile, towers::TowerRegistry};

pub use simulation::Simulation;

/// Represents the authoritative Lane Defence world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    difficulty: DifficultyProfile,
    route: Route,
    economy: Economy,
    director: WaveDirector,
    collision: CollisionResolver,
    enemies: Vec<Enemy>,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    time: Duration,
    tick_index: u64,
    next_enemy_id: u64,
    next_projectile_id: u64,
    pending_tower: Option<TowerKind>,
    pointer: WorldPoint,
    debug: bool,
    victory: bool,
    spawn_orders: Vec<SpawnOrder>,
    impacts: Vec<Impact>,
}

impl World {
    /// Creates a world from validated configuration.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let difficulty = *config
            .difficulties
            .get(config.difficulty)
            .ok_or(ConfigError::MissingDifficulty(config.difficulty))?;
        let route = Route::build(&config.grid, config.level.waypoints());
        let towers = TowerRegistry::new(&config.grid);

        Ok(Self {
            economy: Economy::new(difficulty.start_gold, difficulty.start_lives),
            difficulty,
            route,
            director: WaveDirector::new(),
            collision: CollisionResolver::new(),
            enemies: Vec::new(),
            towers,
            projectiles: Vec::new(),
            time: Duration::ZERO,
            tick_index: 0,
            next_enemy_id: 0,
            next_projectile_id: 0,
            pending_tower: None,
            pointer: WorldPoint::default(),
            debug: false,
            victory: false,
            spawn_orders: Vec::new(),
            impacts: Vec::new(),
            config,
        })
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies
            .binary_search_by_key(&enemy, |candidate| candidate.id)
            .ok()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Every event produced by the command is appended to `out_events` in the
/// order it happened. Kill and leak events are settled by the economy as
/// they are recorded, so a [`Event::GameOver`] directly follows the leak that
/// exhausted the last life.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => tick(world, dt, out_events),
        Command::StartNextWave => start_next_wave(world, out_events),
        Command::SelectTowerKind { kind } => {
            world.pending_tower = kind;
        }
        Command::MovePointer { position } => {
            world.pointer = position;
        }
        Command::PlaceTowerAt { position } => {
            world.pointer = position;
            place_tower(world, out_events);
        }
        Command::PlaceTowerAtPointer => place_tower(world, out_events),
        Command::SetDebug { enabled } => {
            world.debug = enabled;
            debug!(enabled, "debug overlay toggled");
        }
        Command::SetDifficulty { difficulty } => set_difficulty(world, difficulty, out_events),
    }
}

fn record(economy: &mut Economy, out: &mut Vec<Event>, event: Event) {
    let follow_up = economy.handle(&event);
    out.push(event);
    if let Some(follow_up) = follow_up {
        out.push(follow_up);
    }
}

fn tick(world: &mut World, dt: Duration, out: &mut Vec<Event>) {
    if world.economy.is_game_over() {
        return;
    }

    let dt = dt.min(MAX_TICK);
    world.time = world.time.saturating_add(dt);
    world.tick_index = world.tick_index.saturating_add(1);
    record(&mut world.economy, out, Event::TimeAdvanced { dt });

    if world.director.in_progress() {
        spawn_due_enemies(world, out);
    }

    for enemy in &mut world.enemies {
        enemy.update(dt, world.route.waypoints());
    }

    cull_enemies(&mut world.enemies, &mut world.economy, out);

    fire_towers(world, dt, out);

    for projectile in &mut world.projectiles {
        let target_position = live_position(&world.enemies, projectile.target());
        projectile.update(dt, target_position);
    }

    resolve_collisions(world, out);
    cull_enemies(&mut world.enemies, &mut world.economy, out);

    if let Some(wave) = world.director.check_cleared(world.enemies.len()) {
        info!(wave, "wave cleared");
        record(&mut world.economy, out, Event::WaveCleared { wave });

        let last_wave = world.config.level.waves.len().saturating_sub(1);
        let cleared_last = usize::try_from(wave).map_or(false, |wave| wave == last_wave);
        if cleared_last && !world.economy.is_game_over() {
            world.victory = true;
            info!("all waves cleared");
            record(&mut world.economy, out, Event::Victory);
        }
    }
}

fn spawn_due_enemies(world: &mut World, out: &mut Vec<Event>) {
    world.spawn_orders.clear();
    world.director.handle(world.time, &mut world.spawn_orders);

    let spawn_point = world.route.spawn_point();
    for order in &world.spawn_orders {
        let max_hp = world.difficulty.scaled_max_hp(order.kind, order.wave);
        let speed = world.difficulty.scaled_speed(order.kind);

        for _ in 0..order.count {
            let id = EnemyId::new(world.next_enemy_id);
            world.next_enemy_id += 1;
            world
                .enemies
                .push(Enemy::spawn(id, order.kind, spawn_point, speed, max_hp));
            trace!(enemy = id.get(), kind = ?order.kind, max_hp, wave = order.wave, "enemy spawned");
            record(
                &mut world.economy,
                out,
                Event::EnemySpawned {
                    enemy: id,
                    kind: order.kind,
                    max_hp,
                },
            );
        }
    }
}

/// Removes terminal enemies, reporting exactly one kill or leak for each.
fn cull_enemies(enemies: &mut Vec<Enemy>, economy: &mut Economy, out: &mut Vec<Event>) {
    enemies.retain(|enemy| {
        if enemy.is_dead() {
            record(
                economy,
                out,
                Event::EnemyKilled {
                    enemy: enemy.id,
                    payout: enemy.payout,
                },
            );
            false
        } else if enemy.has_leaked() {
            record(economy, out, Event::EnemyLeaked { enemy: enemy.id });
            false
        } else {
            true
        }
    });
}

fn fire_towers(world: &mut World, dt: Duration, out: &mut Vec<Event>) {
    for tower in world.towers.iter_mut() {
        let candidates = world.enemies.iter().map(|enemy| TargetCandidate {
            id: enemy.id,
            position: enemy.position,
            targetable: !enemy.is_terminal(),
        });

        let Some(order) = tower.update(dt, candidates) else {
            continue;
        };

        let projectile = ProjectileId::new(world.next_projectile_id);
        world.next_projectile_id += 1;
        world.projectiles.push(Projectile::launch(
            projectile,
            order.origin,
            order.target,
            order.damage,
            order.speed,
        ));
        trace!(
            tower = order.tower.get(),
            kind = %tower.kind(),
            target = order.target.get(),
            damage = order.damage,
            "tower fired"
        );
        record(
            &mut world.economy,
            out,
            Event::ProjectileFired {
                projectile,
                tower: order.tower,
                target: order.target,
            },
        );
    }
}

fn resolve_collisions(world: &mut World, out: &mut Vec<Event>) {
    world.impacts.clear();
    let mut roster = Roster {
        enemies: &mut world.enemies,
    };
    world
        .collision
        .resolve(&mut world.projectiles, &mut roster, &mut world.impacts);

    for impact in &world.impacts {
        trace!(
            enemy = impact.enemy.get(),
            damage = impact.damage,
            remaining_hp = impact.remaining_hp,
            "projectile hit"
        );
        record(
            &mut world.economy,
            out,
            Event::ProjectileHit {
                projectile: impact.projectile,
                enemy: impact.enemy,
                damage: impact.damage,
                remaining_hp: impact.remaining_hp,
            },
        );
    }

    world.projectiles.retain(|projectile| !projectile.is_dead());
}

fn live_position(enemies: &[Enemy], enemy: EnemyId) -> Option<WorldPoint> {
    let index = enemies
        .binary_search_by_key(&enemy, |candidate| candidate.id)
        .ok()?;
    let enemy = &enemies[index];
    (!enemy.is_dead()).then_some(enemy.position)
}

/// Enemy collection exposed to the collision pass.
struct Roster<'a> {
    enemies: &'a mut [Enemy],
}

impl DamageTargets for Roster<'_> {
    fn locate(&self, enemy: EnemyId) -> Option<WorldPoint> {
        live_position(&*self.enemies, enemy)
    }

    fn apply_damage(&mut self, enemy: EnemyId, damage: u32) -> u32 {
        match self
            .enemies
            .binary_search_by_key(&enemy, |candidate| candidate.id)
        {
            Ok(index) => self.enemies[index].apply_damage(damage),
            Err(_) => 0,
        }
    }
}

fn start_next_wave(world: &mut World, out: &mut Vec<Event>) {
    let started = if world.economy.is_game_over() {
        Err(WaveStartError::GameOver)
    } else {
        world.director.start_next(&world.config.level.waves, world.time)
    };

    match started {
        Ok(wave) => {
            info!(wave, difficulty = %world.config.difficulty, "wave started");
            record(
                &mut world.economy,
                out,
                Event::WaveStarted {
                    wave,
                    spawn_events: world.director.pending_spawns(),
                },
            );
        }
        Err(reason) => {
            debug!(%reason, "wave start rejected");
            record(
                &mut world.economy,
                out,
                Event::WaveStartRejected { reason },
            );
        }
    }
}

/// Tile classification backed by the route mask and the tower registry.
struct TileOccupancy<'a> {
    grid: &'a TileGrid,
    route: &'a Route,
    towers: &'a TowerRegistry,
}

impl TileLayout for TileOccupancy<'_> {
    fn is_path(&self, tile: TilePosition) -> bool {
        self.grid
            .index(tile)
            .map_or(false, |index| self.route.covers_index(index))
    }

    fn is_occupied(&self, tile: TilePosition) -> bool {
        self.grid
            .index(tile)
            .and_then(|index| self.towers.occupant(index))
            .is_some()
    }
}

fn place_tower(world: &mut World, out: &mut Vec<Event>) {
    let kind = world.pending_tower.unwrap_or_default();
    let request = PlacementRequest {
        kind,
        point: world.pointer,
    };
    let layout = TileOccupancy {
        grid: &world.config.grid,
        route: &world.route,
        towers: &world.towers,
    };
    let evaluated = PlacementRules::new(&world.config.grid, &world.config.towers).evaluate(
        request,
        &layout,
        world.economy.gold(),
    );

    let placement = match evaluated {
        Ok(placement) if world.economy.spend(placement.stats.cost) => placement,
        Ok(_) => {
            record(
                &mut world.economy,
                out,
                Event::TowerPlacementRejected {
                    kind,
                    reason: PlacementError::InsufficientGold,
                },
            );
            return;
        }
        Err(reason) => {
            debug!(%kind, %reason, x = request.point.x(), y = request.point.y(), "placement rejected");
            record(
                &mut world.economy,
                out,
                Event::TowerPlacementRejected { kind, reason },
            );
            return;
        }
    };

    let tower = world.towers.insert(&world.config.grid, placement);
    world.pending_tower = None;
    debug!(
        tower = tower.get(),
        %kind,
        column = placement.tile.column(),
        row = placement.tile.row(),
        gold = world.economy.gold(),
        "tower placed"
    );
    record(
        &mut world.economy,
        out,
        Event::TowerPlaced {
            tower,
            kind,
            tile: placement.tile,
            cost: placement.stats.cost,
        },
    );
}

fn set_difficulty(world: &mut World, difficulty: DifficultyLevel, out: &mut Vec<Event>) {
    if world.director.waves_started() > 0 || world.director.in_progress() {
        debug!(%difficulty, "difficulty locked");
        record(
            &mut world.economy,
            out,
            Event::DifficultyChangeRejected {
                difficulty,
                reason: DifficultyError::WavesStarted,
            },
        );
        return;
    }

    let Some(profile) = world.config.difficulties.get(difficulty).copied() else {
        record(
            &mut world.economy,
            out,
            Event::DifficultyChangeRejected {
                difficulty,
                reason: DifficultyError::UnknownDifficulty,
            },
        );
        return;
    };

    world.config.difficulty = difficulty;
    world.difficulty = profile;
    world.economy.reset(profile.start_gold, profile.start_lives);
    info!(%difficulty, gold = profile.start_gold, lives = profile.start_lives, "difficulty applied");
    record(
        &mut world.economy,
        out,
        Event::DifficultyChanged { difficulty },
    );
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use lane_defence_core::{
        DifficultyLevel, EnemyId, EnemySnapshot, EnemyView, GamePhase, HoverTile, ProjectileView,
        TileGrid, TilePosition, TowerKind, TowerView, WaveProgress, WorldPoint,
    };

    /// Provides read-only access to the world's tile grid definition.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.config.grid
    }

    /// Tiles covered by the enemy path in row-major order.
    #[must_use]
    pub fn path_tiles(world: &World) -> Vec<TilePosition> {
        let columns = world.config.grid.columns();
        world
            .route
            .tile_mask()
            .iter()
            .enumerate()
            .filter(|(_, covered)| **covered)
            .filter_map(|(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(TilePosition::new(index % columns, index / columns))
            })
            .collect()
    }

    /// Waypoints walked by enemies, at tile centres.
    #[must_use]
    pub fn waypoints(world: &World) -> &[WorldPoint] {
        world.route.waypoints()
    }

    /// Tile under the pointer, if the pointer lies inside the grid.
    #[must_use]
    pub fn hover_tile(world: &World) -> Option<HoverTile> {
        let grid = &world.config.grid;
        let tile = grid.tile_at(world.pointer)?;
        let is_path = grid
            .index(tile)
            .map_or(false, |index| world.route.covers_index(index));
        Some(HoverTile { tile, is_path })
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Snapshot of a single live enemy.
    #[must_use]
    pub fn enemy(world: &World, enemy: EnemyId) -> Option<EnemySnapshot> {
        world
            .enemy_index(enemy)
            .map(|index| world.enemies[index].snapshot())
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Gold currently available.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.economy.gold()
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.economy.lives()
    }

    /// Progress through the level's waves.
    #[must_use]
    pub fn wave_progress(world: &World) -> WaveProgress {
        WaveProgress {
            started: world.director.waves_started(),
            total: u32::try_from(world.config.level.waves.len()).unwrap_or(u32::MAX),
            in_progress: world.director.in_progress(),
        }
    }

    /// Number of spawn events still queued for the active wave.
    #[must_use]
    pub fn pending_spawns(world: &World) -> usize {
        world.director.pending_spawns()
    }

    /// Macro state of the game.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        if world.economy.is_game_over() {
            GamePhase::GameOver
        } else if world.victory {
            GamePhase::Victory
        } else if world.director.in_progress() {
            GamePhase::WaveInProgress
        } else if world.director.waves_started() == 0 {
            GamePhase::NotStarted
        } else {
            GamePhase::WaveCleared
        }
    }

    /// Whether lives ran out.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.economy.is_game_over()
    }

    /// Whether the debug overlay is enabled.
    #[must_use]
    pub fn is_debug(world: &World) -> bool {
        world.debug
    }

    /// Last pointer position reported by the input layer.
    #[must_use]
    pub fn pointer(world: &World) -> WorldPoint {
        world.pointer
    }

    /// Tower kind selected for the next placement, if any.
    #[must_use]
    pub fn pending_tower_kind(world: &World) -> Option<TowerKind> {
        world.pending_tower
    }

    /// Difficulty currently in effect.
    #[must_use]
    pub fn difficulty(world: &World) -> DifficultyLevel {
        world.config.difficulty
    }

    /// Total simulated time.
    #[must_use]
    pub fn simulated_time(world: &World) -> Duration {
        world.time
    }

    /// Number of ticks processed.
    #[must_use]
    pub fn tick_count(world: &World) -> u64 {
        world.tick_index
    }
}

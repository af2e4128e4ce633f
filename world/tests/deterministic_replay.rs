use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use lane_defence_core::{
    Command, DifficultyLevel, EnemyId, EnemyKind, Event, GameConfig, LevelDefinition, SpawnEvent,
    TilePosition, TowerKind, WaveDefinition, WorldPoint,
};
use lane_defence_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_runs() {
    let script = scripted_commands();
    let first = replay(script.clone());
    let second = replay(script);

    assert_eq!(first, second, "replay diverged between runs");
    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, Event::ProjectileFired { .. })),
        "scripted towers must engage enemies"
    );
    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, Event::WaveCleared { wave: 0 })),
        "the first wave must finish within the script"
    );
}

#[test]
fn equidistant_enemies_resolve_to_lowest_identifier() {
    let config = GameConfig {
        level: LevelDefinition {
            path: vec![[0.0, 64.0], [608.0, 64.0]],
            waves: vec![WaveDefinition::new(vec![SpawnEvent::new(
                0,
                EnemyKind::Basic,
                2,
            )])],
        },
        ..GameConfig::default()
    };
    let mut world = World::new(config).expect("world");
    let mut events = Vec::new();

    let center = query::tile_grid(&world).tile_center(TilePosition::new(1, 1));
    world::apply(&mut world, Command::PlaceTowerAt { position: center }, &mut events);
    world::apply(&mut world, Command::StartNextWave, &mut events);
    events.clear();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(16),
        },
        &mut events,
    );

    let targets: Vec<EnemyId> = events
        .iter()
        .filter_map(|event| match event {
            Event::ProjectileFired { target, .. } => Some(*target),
            _ => None,
        })
        .collect();
    assert_eq!(targets, vec![EnemyId::new(0)]);
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    fingerprints: Vec<u64>,
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new(GameConfig::default()).expect("world");
    let mut events = Vec::new();
    let mut fingerprints = Vec::new();

    for command in commands {
        world::apply(&mut world, command, &mut events);
        fingerprints.push(fingerprint(&world));
    }

    ReplayOutcome {
        events,
        fingerprints,
    }
}

fn fingerprint(world: &World) -> u64 {
    let mut hasher = DefaultHasher::new();
    for enemy in query::enemy_view(world).iter() {
        enemy.id.hash(&mut hasher);
        enemy.hp.hash(&mut hasher);
        enemy.position.x().to_bits().hash(&mut hasher);
        enemy.position.y().to_bits().hash(&mut hasher);
    }
    for projectile in query::projectile_view(world).iter() {
        projectile.target.hash(&mut hasher);
        projectile.position.x().to_bits().hash(&mut hasher);
        projectile.position.y().to_bits().hash(&mut hasher);
    }
    for tower in query::tower_view(world).iter() {
        tower.id.hash(&mut hasher);
        tower.cooldown.hash(&mut hasher);
    }
    query::gold(world).hash(&mut hasher);
    query::lives(world).hash(&mut hasher);
    hasher.finish()
}

fn scripted_commands() -> Vec<Command> {
    let tile = |column: u32, row: u32| {
        WorldPoint::new(column as f32 * 32.0 + 16.0, row as f32 * 32.0 + 16.0)
    };

    let mut script = vec![
        Command::SetDifficulty {
            difficulty: DifficultyLevel::Hard,
        },
        Command::SelectTowerKind {
            kind: Some(TowerKind::Basic),
        },
        Command::PlaceTowerAt {
            position: tile(5, 3),
        },
        Command::MovePointer {
            position: tile(7, 6),
        },
        Command::PlaceTowerAtPointer,
        Command::SetDebug { enabled: true },
        Command::StartNextWave,
    ];

    for step in 0..1_200_u64 {
        script.push(Command::Tick {
            dt: Duration::from_millis(10 + (step * 7) % 40),
        });
        if step % 300 == 299 {
            script.push(Command::StartNextWave);
        }
    }

    script
}

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use pop_defence_content::{default_map, stock};
use pop_defence_core::{
    Command, Difficulty, GameMode, SessionSettings, TowerId, TowerKind, UpgradePath, Vec2,
};
use pop_defence_world::{self as world, query, SimulationState, VisualKind, World};

#[test]
fn deterministic_replay_of_a_defended_wave() {
    let script = scripted_commands();
    let first = replay(&script);
    let second = replay(&script);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint, fingerprint(&second.state));
    assert!(first.pops > 0, "towers never popped a balloon");
    assert_eq!(first.state.towers.len(), 2);
    assert!(first.state.wave_number >= 1);
}

#[test]
fn restored_state_continues_identically() {
    let script = scripted_commands();
    let (prefix, suffix) = script.split_at(script.len() / 2);

    let mut original = new_world();
    for command in prefix {
        world::apply(&mut original, command.clone()).expect("command applies");
    }

    let bytes = bincode::serialize(query::state(&original)).expect("state serialises");
    let decoded: SimulationState = bincode::deserialize(&bytes).expect("state deserialises");
    assert_eq!(&decoded, query::state(&original));
    let mut restored =
        World::restore(stock(), settings(), decoded).expect("captured state restores");

    for command in suffix {
        world::apply(&mut original, command.clone()).expect("command applies");
        world::apply(&mut restored, command.clone()).expect("command applies");
    }

    assert_eq!(query::state(&original), query::state(&restored));
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    state: SimulationState,
    fingerprint: u64,
    pops: usize,
}

fn settings() -> SessionSettings {
    SessionSettings::new(Difficulty::Medium, GameMode::Fixed, default_map())
}

fn new_world() -> World {
    World::new(stock(), settings()).expect("stock content builds a world")
}

fn replay(commands: &[Command]) -> ReplayOutcome {
    let mut world = new_world();
    let mut pops = 0;

    for command in commands {
        world::apply(&mut world, command.clone()).expect("command applies");
        if !matches!(command, Command::Tick { .. }) {
            continue;
        }
        let clock = query::clock(&world);
        pops += query::visuals(&world)
            .iter()
            .filter(|marker| marker.kind == VisualKind::Pop && marker.created_at == clock)
            .count();
    }

    let state = query::state(&world).clone();
    ReplayOutcome {
        fingerprint: fingerprint(&state),
        state,
        pops,
    }
}

fn fingerprint(state: &SimulationState) -> u64 {
    let bytes = bincode::serialize(state).expect("state serialises");
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

fn tick() -> Command {
    Command::Tick {
        dt: Duration::from_millis(50),
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::PlaceTower {
            kind: TowerKind::new("dart_monkey"),
            position: Vec2::new(550.0, 300.0),
        },
        Command::PlaceTower {
            kind: TowerKind::new("tack_shooter"),
            position: Vec2::new(275.0, 330.0),
        },
        Command::SelectTower {
            tower: Some(TowerId::new(0)),
        },
        Command::StartWave,
    ];
    commands.extend(std::iter::repeat_with(tick).take(400));
    commands.push(Command::UpgradeTower {
        path: UpgradePath::Primary,
        tier: 0,
    });
    commands.push(Command::StartWave);
    commands.extend(std::iter::repeat_with(tick).take(400));
    commands.push(Command::UpgradeTower {
        path: UpgradePath::Secondary,
        tier: 0,
    });
    commands.extend(std::iter::repeat_with(tick).take(200));
    commands
}

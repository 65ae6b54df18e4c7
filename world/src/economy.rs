//! Player commands that spend or earn money.

use std::time::Duration;

use pop_defence_core::{ConfigError, TowerKind, UpgradePath, Vec2};
use pop_defence_system_placement as placement;
use pop_defence_system_stats::{scaled_cost, upgrade_cost};
use tracing::debug;

use crate::{
    tick,
    towers::{index_of, Tower},
    World,
};

pub(crate) fn place_tower(
    world: &mut World,
    kind: TowerKind,
    position: Vec2,
) -> Result<(), ConfigError> {
    let definition = world.content.catalog.tower(&kind)?;
    let cost = scaled_cost(definition.cost, world.difficulty.cost_multiplier);
    if world.state.money < cost {
        debug!(%kind, cost, money = world.state.money, "placement rejected: insufficient money");
        return Ok(());
    }

    if let Err(reason) = placement::validate(
        &world.path,
        &world.map.exclusion_zones,
        world.state.towers.iter().map(Tower::footprint),
        position,
        definition.size,
    ) {
        debug!(%kind, ?position, %reason, "placement rejected");
        return Ok(());
    }

    let tower = Tower {
        id: world.state.ids.tower(),
        kind,
        position,
        radius: definition.size,
        last_shot: Duration::ZERO,
        angle: 0.0,
        levels: Default::default(),
    };
    world.state.money -= cost;
    world.state.towers.push(tower);
    Ok(())
}

pub(crate) fn upgrade_tower(
    world: &mut World,
    path: UpgradePath,
    tier: u8,
) -> Result<(), ConfigError> {
    let Some(index) = selected_index(world) else {
        debug!(?path, tier, "upgrade rejected: no tower selected");
        return Ok(());
    };

    let tower = &world.state.towers[index];
    let level = tower.levels.level(path);
    if tier != level {
        debug!(tower = tower.id.get(), ?path, tier, level, "upgrade rejected: out of order");
        return Ok(());
    }

    let Some(cost) = upgrade_cost(
        &world.content.catalog,
        &tower.kind,
        tower.levels,
        path,
        world.difficulty.cost_multiplier,
    )?
    else {
        debug!(tower = tower.id.get(), ?path, "upgrade rejected: path complete");
        return Ok(());
    };

    if world.state.money < cost {
        debug!(tower = tower.id.get(), cost, money = world.state.money, "upgrade rejected: insufficient money");
        return Ok(());
    }

    world.state.money -= cost;
    let tower = &mut world.state.towers[index];
    tower.levels = tower.levels.incremented(path);
    Ok(())
}

pub(crate) fn sell_tower(world: &mut World) -> Result<(), ConfigError> {
    let Some(index) = selected_index(world) else {
        debug!("sell rejected: no tower selected");
        return Ok(());
    };

    let tower = &world.state.towers[index];
    let refund = world
        .stats
        .get(&world.content.catalog, &tower.kind, tower.levels)?
        .sell_value();

    let _ = world.state.towers.remove(index);
    world.state.money = world.state.money.saturating_add(refund);
    world.state.selected_tower = None;
    Ok(())
}

pub(crate) fn start_wave(world: &mut World) -> Result<(), ConfigError> {
    let state = &world.state;
    if state.wave_spawning || !state.pending_spawns.is_empty() || !state.balloons.is_empty() {
        debug!(wave = state.wave_number, "start wave rejected: current wave not cleared");
        return Ok(());
    }

    if !tick::begin_next_wave(world)? {
        debug!(wave = world.state.wave_number, "start wave rejected: no further waves");
    }
    Ok(())
}

fn selected_index(world: &World) -> Option<usize> {
    let id = world.state.selected_tower?;
    index_of(&world.state.towers, id)
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Expands wave descriptions into time-ordered spawn queues.
//!
//! Authored waves come straight from the content pack. Past the authored set
//! an `Infinity` session keeps going with waves synthesised from the pack's
//! [`ProceduralRecipe`], whose heavy units carry a health override instead of
//! a new balloon type.

use std::time::Duration;

use pop_defence_core::{
    BalloonKind, ConfigError, Content, GameMode, ProceduralRecipe, Wave, WaveGroup,
};
use serde::{Deserialize, Serialize};

/// Delay between a wave starting and its first spawn.
pub const WAVE_LEAD_IN: Duration = Duration::from_millis(500);

/// Balloon scheduled to enter the path at an absolute simulation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    /// Balloon type to spawn.
    pub balloon: BalloonKind,
    /// Simulation time at which the balloon enters.
    pub at: Duration,
    /// Replacement for the definition's health, used by scaled heavy units.
    pub health_override: Option<u32>,
}

/// Reports whether wave `wave_number` exists under the provided mode.
#[must_use]
pub fn wave_available(content: &Content, wave_number: u32, mode: GameMode) -> bool {
    wave_number >= 1 && (wave_number <= content.authored_wave_count() || mode == GameMode::Infinity)
}

/// Expands wave `wave_number` into spawns starting at `start`.
///
/// Returns `Ok(None)` when the wave does not exist under `mode`. The queue is
/// sorted by spawn time; spawns sharing a time keep their group order.
pub fn schedule_wave(
    content: &Content,
    wave_number: u32,
    mode: GameMode,
    start: Duration,
) -> Result<Option<Vec<SpawnEntry>>, ConfigError> {
    if !wave_available(content, wave_number, mode) {
        return Ok(None);
    }

    let authored = content.authored_wave_count();
    let groups = if wave_number <= authored {
        let index = usize::try_from(wave_number - 1).unwrap_or(usize::MAX);
        match content.waves.get(index) {
            Some(wave) => expand_authored(wave),
            None => return Ok(None),
        }
    } else {
        expand_procedural(content, &content.procedural, wave_number, wave_number - authored)?
    };

    let mut entries = Vec::new();
    let mut cursor = start + WAVE_LEAD_IN;
    for group in groups {
        let _ = content.catalog.balloon(&group.balloon)?;
        let delay = Duration::from_millis(group.spawn_delay_ms);
        for index in 0..group.count {
            entries.push(SpawnEntry {
                balloon: group.balloon.clone(),
                at: cursor + delay * index,
                health_override: group.health_override,
            });
        }
        cursor += delay * group.count;
    }

    entries.sort_by_key(|entry| entry.at);
    Ok(Some(entries))
}

#[derive(Clone, Debug, PartialEq)]
struct ScheduledGroup {
    balloon: BalloonKind,
    count: u32,
    spawn_delay_ms: u64,
    health_override: Option<u32>,
}

impl From<&WaveGroup> for ScheduledGroup {
    fn from(group: &WaveGroup) -> Self {
        Self {
            balloon: group.balloon.clone(),
            count: group.count,
            spawn_delay_ms: group.spawn_delay_ms,
            health_override: None,
        }
    }
}

fn expand_authored(wave: &Wave) -> Vec<ScheduledGroup> {
    wave.groups.iter().map(ScheduledGroup::from).collect()
}

fn expand_procedural(
    content: &Content,
    recipe: &ProceduralRecipe,
    wave_number: u32,
    over: u32,
) -> Result<Vec<ScheduledGroup>, ConfigError> {
    let over = f64::from(over);
    let health_multiplier = 1.0 + over * recipe.health_step;
    let count_multiplier = 1.0 + over * recipe.count_step;
    let mut groups = Vec::with_capacity(recipe.groups.len() + 1);

    if recipe.heavy_interval > 0 && wave_number % recipe.heavy_interval == 0 {
        let heavy = content.catalog.balloon(&recipe.heavy)?;
        let divisor = f64::from(recipe.heavy_count_divisor.max(1));
        groups.push(ScheduledGroup {
            balloon: recipe.heavy.clone(),
            count: floor_to_u32(1.0 + over / divisor),
            spawn_delay_ms: recipe.heavy_spawn_delay_ms,
            health_override: Some(floor_to_u32(f64::from(heavy.health) * health_multiplier)),
        });
    }

    groups.extend(recipe.groups.iter().map(|group| ScheduledGroup {
        balloon: group.balloon.clone(),
        count: floor_to_u32(f64::from(group.base_count) * count_multiplier),
        spawn_delay_ms: group.spawn_delay_ms,
        health_override: None,
    }));

    Ok(groups)
}

fn floor_to_u32(value: f64) -> u32 {
    let floored = value.floor();
    if floored <= 0.0 {
        0
    } else if floored >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        floored as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_saturates_at_both_ends() {
        assert_eq!(floor_to_u32(-3.5), 0);
        assert_eq!(floor_to_u32(15.75), 15);
        assert_eq!(floor_to_u32(1e20), u32::MAX);
    }
}

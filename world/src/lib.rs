#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Pop Defence.
//!
//! A [`World`] owns the [`SimulationState`] of one session together with the
//! content and settings it was created from. All mutation flows through
//! [`apply`]; collaborators read through the [`query`] module.

use std::time::Duration;

use pop_defence_core::{
    Command, ConfigError, Content, DifficultySettings, MapData, SessionSettings,
};
use pop_defence_system_path::PathGeometry;
use pop_defence_system_stats::{resolve_stats, StatCache};
use pop_defence_system_tower_combat::{Launch, TowerCombat, Volley};
use pop_defence_system_tower_targeting::{ReadyTower, TargetCandidate, TowerTarget, TowerTargeting};

mod economy;
mod state;
mod tick;
mod towers;

pub use state::{
    Balloon, BalloonStats, IdAllocator, Projectile, SimulationState, Slow, StatusEffects,
    VisualKind, VisualMarker,
};
pub use towers::Tower;

/// Longest simulated step a single tick may advance.
pub const MAX_TICK: Duration = Duration::from_millis(50);

/// Pause between a cleared wave and the next one starting on its own.
pub const WAVE_COOLDOWN: Duration = Duration::from_millis(5000);

/// Authoritative session state plus the read-only data it was built from.
#[derive(Debug)]
pub struct World {
    content: Content,
    settings: SessionSettings,
    difficulty: DifficultySettings,
    map: MapData,
    path: PathGeometry,
    state: SimulationState,
    stats: StatCache,
    systems: Systems,
}

#[derive(Debug, Default)]
struct Systems {
    targeting: TowerTargeting,
    combat: TowerCombat,
    ready: Vec<ReadyTower>,
    candidates: Vec<TargetCandidate>,
    targets: Vec<TowerTarget>,
    volleys: Vec<Volley>,
    launches: Vec<Launch>,
}

impl World {
    /// Creates a fresh session for the provided content and settings.
    pub fn new(content: Content, settings: SessionSettings) -> Result<Self, ConfigError> {
        content.validate()?;
        let map = content.map(&settings.map)?.clone();
        if map.path.len() < 2 {
            return Err(ConfigError::DegeneratePath(map.id));
        }

        let difficulty = *content.difficulties.get(settings.difficulty);
        let path = PathGeometry::new(map.path.clone());
        let state = SimulationState::new(difficulty.initial_money, difficulty.initial_health);

        Ok(Self {
            stats: StatCache::new(difficulty.cost_multiplier),
            content,
            settings,
            difficulty,
            map,
            path,
            state,
            systems: Systems::default(),
        })
    }

    /// Rebuilds a session from a previously captured state.
    ///
    /// Every tower and balloon in the state must resolve against `content`.
    pub fn restore(
        content: Content,
        settings: SessionSettings,
        state: SimulationState,
    ) -> Result<Self, ConfigError> {
        let mut world = Self::new(content, settings)?;
        for tower in &state.towers {
            let _ = resolve_stats(
                &world.content.catalog,
                &tower.kind,
                tower.levels,
                world.difficulty.cost_multiplier,
            )?;
        }
        for balloon in &state.balloons {
            let _ = world.content.catalog.balloon(&balloon.kind)?;
        }
        for spawn in &state.pending_spawns {
            let _ = world.content.catalog.balloon(&spawn.balloon)?;
        }

        world.state = state;
        Ok(world)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that are not legal in the current state leave it untouched and
/// return `Ok`. Once the session has ended every command is ignored. An error
/// signals broken content and is never produced by player input alone.
pub fn apply(world: &mut World, command: Command) -> Result<(), ConfigError> {
    if world.state.outcome.is_terminal() {
        tracing::debug!(?command, "session over; command ignored");
        return Ok(());
    }

    match command {
        Command::Tick { dt } => tick::advance(world, dt),
        Command::PlaceTower { kind, position } => economy::place_tower(world, kind, position),
        Command::UpgradeTower { path, tier } => economy::upgrade_tower(world, path, tier),
        Command::SellTower => economy::sell_tower(world),
        Command::SelectTower { tower } => {
            world.state.selected_tower = tower;
            Ok(())
        }
        Command::StartWave => economy::start_wave(world),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use pop_defence_core::{
        ConfigError, Content, GameOutcome, MapData, SessionSettings, TowerId, TowerKind,
        UpgradePath, Vec2,
    };
    use pop_defence_system_path::PathGeometry;
    use pop_defence_system_placement::{self as placement, PlacementError};
    use pop_defence_system_stats::{self as stats, scaled_cost, EffectiveStats};

    use super::{Balloon, Projectile, SimulationState, Tower, VisualMarker, World};
    use crate::towers::index_of;

    /// Complete simulation state, suitable for serialisation.
    #[must_use]
    pub fn state(world: &World) -> &SimulationState {
        &world.state
    }

    /// Content pack the world was built from.
    #[must_use]
    pub fn content(world: &World) -> &Content {
        &world.content
    }

    /// Settings the session was started with.
    #[must_use]
    pub fn settings(world: &World) -> &SessionSettings {
        &world.settings
    }

    /// Map the session is played on.
    #[must_use]
    pub fn map(world: &World) -> &MapData {
        &world.map
    }

    /// Geometry of the balloon path.
    #[must_use]
    pub fn path(world: &World) -> &PathGeometry {
        &world.path
    }

    /// Towers in placement order.
    #[must_use]
    pub fn towers(world: &World) -> &[Tower] {
        &world.state.towers
    }

    /// Live balloons.
    #[must_use]
    pub fn balloons(world: &World) -> &[Balloon] {
        &world.state.balloons
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> &[Projectile] {
        &world.state.projectiles
    }

    /// Visual markers that have not yet expired.
    #[must_use]
    pub fn visuals(world: &World) -> &[VisualMarker] {
        &world.state.visuals
    }

    /// Spendable currency.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.state.money
    }

    /// Remaining health.
    #[must_use]
    pub fn health(world: &World) -> i32 {
        world.state.health
    }

    /// Most recently started wave.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.state.wave_number
    }

    /// Whether the current wave still has balloons waiting to spawn.
    #[must_use]
    pub fn wave_spawning(world: &World) -> bool {
        world.state.wave_spawning
    }

    /// Time left before the next wave starts on its own.
    #[must_use]
    pub fn time_to_next_wave(world: &World) -> Duration {
        world.state.time_to_next_wave
    }

    /// Simulation time.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.state.clock
    }

    /// Session result so far.
    #[must_use]
    pub fn outcome(world: &World) -> GameOutcome {
        world.state.outcome
    }

    /// Selected tower, if the selection still refers to a live tower.
    #[must_use]
    pub fn selected_tower(world: &World) -> Option<&Tower> {
        let id = world.state.selected_tower?;
        tower(world, id)
    }

    /// Looks up a live tower by id.
    #[must_use]
    pub fn tower(world: &World, id: TowerId) -> Option<&Tower> {
        index_of(&world.state.towers, id).map(|index| &world.state.towers[index])
    }

    /// Effective stats of a live tower.
    pub fn tower_stats(world: &World, id: TowerId) -> Result<Option<EffectiveStats>, ConfigError> {
        let Some(tower) = tower(world, id) else {
            return Ok(None);
        };
        stats::resolve_stats(
            &world.content.catalog,
            &tower.kind,
            tower.levels,
            world.difficulty.cost_multiplier,
        )
        .map(Some)
    }

    /// Refund the tower would yield if sold now.
    pub fn sell_value(world: &World, id: TowerId) -> Result<Option<u32>, ConfigError> {
        Ok(tower_stats(world, id)?.map(|stats| stats.sell_value()))
    }

    /// Price of the next tier on `path`, or `None` if the tower is gone or the path complete.
    pub fn upgrade_cost(
        world: &World,
        id: TowerId,
        path: UpgradePath,
    ) -> Result<Option<u32>, ConfigError> {
        let Some(tower) = tower(world, id) else {
            return Ok(None);
        };
        stats::upgrade_cost(
            &world.content.catalog,
            &tower.kind,
            tower.levels,
            path,
            world.difficulty.cost_multiplier,
        )
    }

    /// Outcome a placement request would have right now.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlacementPreview {
        /// Price after the difficulty multiplier.
        pub cost: u32,
        /// Whether the current money covers the price.
        pub affordable: bool,
        /// Geometric verdict for the requested position.
        pub placement: Result<(), PlacementError>,
    }

    impl PlacementPreview {
        /// Reports whether the placement would be accepted.
        #[must_use]
        pub fn accepted(&self) -> bool {
            self.affordable && self.placement.is_ok()
        }
    }

    /// Evaluates a placement without performing it.
    pub fn placement_preview(
        world: &World,
        kind: &TowerKind,
        position: Vec2,
    ) -> Result<PlacementPreview, ConfigError> {
        let definition = world.content.catalog.tower(kind)?;
        let cost = scaled_cost(definition.cost, world.difficulty.cost_multiplier);
        let placement = placement::validate(
            &world.path,
            &world.map.exclusion_zones,
            world.state.towers.iter().map(Tower::footprint),
            position,
            definition.size,
        );

        Ok(PlacementPreview {
            cost,
            affordable: world.state.money >= cost,
            placement,
        })
    }
}

//! Serialisable simulation state.

use std::{
    collections::{BTreeSet, VecDeque},
    time::Duration,
};

use pop_defence_core::{
    BalloonDefinition, BalloonId, BalloonKind, GameOutcome, ProjectileId, ProjectileProfile,
    TowerId, Vec2,
};
use pop_defence_system_wave_scheduler::SpawnEntry;
use serde::{Deserialize, Serialize};

use crate::towers::Tower;

/// Every mutable datum of a running session.
///
/// Restoring a serialised state into a world built from the same content and
/// settings reproduces identical subsequent ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Towers in placement order.
    pub towers: Vec<Tower>,
    /// Live balloons.
    pub balloons: Vec<Balloon>,
    /// Projectiles in flight.
    pub projectiles: Vec<Projectile>,
    /// Short-lived markers for presentation layers.
    pub visuals: Vec<VisualMarker>,
    /// Spendable currency.
    pub money: u32,
    /// Remaining health; the session is lost at zero or below.
    pub health: i32,
    /// Most recently started wave, zero before the first.
    pub wave_number: u32,
    /// Whether the current wave still has unspawned balloons.
    pub wave_spawning: bool,
    /// Spawns waiting for their time, ordered by time.
    pub pending_spawns: VecDeque<SpawnEntry>,
    /// Simulation time.
    pub clock: Duration,
    /// Tower highlighted for upgrade and sell commands.
    pub selected_tower: Option<TowerId>,
    /// Countdown until the next wave starts on its own, zero when idle.
    pub time_to_next_wave: Duration,
    /// Session result.
    pub outcome: GameOutcome,
    /// Identifier counters.
    pub ids: IdAllocator,
}

impl SimulationState {
    pub(crate) fn new(money: u32, health: i32) -> Self {
        Self {
            towers: Vec::new(),
            balloons: Vec::new(),
            projectiles: Vec::new(),
            visuals: Vec::new(),
            money,
            health,
            wave_number: 0,
            wave_spawning: false,
            pending_spawns: VecDeque::new(),
            clock: Duration::ZERO,
            selected_tower: None,
            time_to_next_wave: Duration::ZERO,
            outcome: GameOutcome::InProgress,
            ids: IdAllocator::default(),
        }
    }
}

/// Monotonic counters for entity identifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next_tower: u32,
    next_balloon: u32,
    next_projectile: u32,
}

impl IdAllocator {
    pub(crate) fn tower(&mut self) -> TowerId {
        let id = TowerId::new(self.next_tower);
        self.next_tower = self.next_tower.wrapping_add(1);
        id
    }

    pub(crate) fn balloon(&mut self) -> BalloonId {
        let id = BalloonId::new(self.next_balloon);
        self.next_balloon = self.next_balloon.wrapping_add(1);
        id
    }

    pub(crate) fn projectile(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.wrapping_add(1);
        id
    }
}

/// Stats captured when a balloon enters play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalloonStats {
    /// Health at spawn, including any wave scaling.
    pub max_health: u32,
    /// Base travel speed.
    pub speed: f32,
    /// Money credited when popped.
    pub money: u32,
    /// Collision radius.
    pub radius: f32,
    /// Health lost when the balloon leaks.
    pub leak_damage: u32,
    /// Ignores area-of-effect damage.
    pub immune_to_explosions: bool,
    /// Ignores slows.
    pub immune_to_freeze: bool,
    /// Requires lead-popping projectiles.
    pub lead: bool,
}

impl BalloonStats {
    /// Captures stats from a definition, optionally replacing its health.
    #[must_use]
    pub fn capture(definition: &BalloonDefinition, health_override: Option<u32>) -> Self {
        let max_health = health_override.unwrap_or(definition.health);
        Self {
            max_health,
            speed: definition.speed,
            money: definition.money,
            radius: definition.size,
            leak_damage: definition.leak_damage(max_health),
            immune_to_explosions: definition.immune_to_explosions,
            immune_to_freeze: definition.immune_to_freeze,
            lead: definition.lead,
        }
    }
}

/// Slow currently affecting a balloon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slow {
    /// Speed multiplier.
    pub factor: f32,
    /// Simulation time at which the slow wears off.
    pub until: Duration,
}

/// Status effects carried by a balloon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    /// Active slow, if any.
    pub slow: Option<Slow>,
}

/// Balloon travelling along the path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Balloon {
    /// Identifier allocated by the world.
    pub id: BalloonId,
    /// Definition the balloon was spawned from.
    pub kind: BalloonKind,
    /// Stats captured at spawn.
    pub stats: BalloonStats,
    /// Remaining health.
    pub health: u32,
    /// Normalised progress along the path.
    pub progress: f32,
    /// Current world position.
    pub position: Vec2,
    /// Active status effects.
    pub status: StatusEffects,
}

impl Balloon {
    pub(crate) fn spawn(
        id: BalloonId,
        definition: &BalloonDefinition,
        health_override: Option<u32>,
        progress: f32,
        position: Vec2,
    ) -> Self {
        let stats = BalloonStats::capture(definition, health_override);
        Self {
            id,
            kind: definition.id.clone(),
            health: stats.max_health,
            stats,
            progress,
            position,
            status: StatusEffects::default(),
        }
    }

    /// Speed after applying any slow still active at `clock`.
    #[must_use]
    pub fn effective_speed(&self, clock: Duration) -> f32 {
        match self.status.slow {
            Some(slow) if slow.until > clock => self.stats.speed * slow.factor,
            _ => self.stats.speed,
        }
    }
}

/// Projectile in flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Identifier allocated by the world.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Profile resolved from the tower's upgrades when fired.
    pub profile: ProjectileProfile,
    /// Current world position.
    pub position: Vec2,
    /// Heading in radians.
    pub angle: f32,
    /// Distance covered since launch.
    pub distance_travelled: f32,
    /// Simulation time of launch.
    pub created_at: Duration,
    /// Balloons the projectile may still damage.
    pub pierce_left: u32,
    /// Balloons already damaged by this projectile.
    pub hit: BTreeSet<BalloonId>,
}

/// Informational marker describing a recent event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum VisualKind {
    /// A balloon popped.
    Pop,
    /// Money was earned from a pop.
    CashPop {
        /// Amount credited.
        amount: u32,
    },
    /// An area-of-effect projectile detonated.
    Explosion {
        /// Radius of the blast.
        radius: f32,
    },
    /// A tower fired.
    MuzzleFlash {
        /// Facing of the tower when it fired.
        angle: f32,
    },
}

impl VisualKind {
    /// How long the marker stays visible.
    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        match self {
            Self::Pop => Duration::from_millis(400),
            Self::CashPop { .. } => Duration::from_millis(700),
            Self::Explosion { .. } => Duration::from_millis(300),
            Self::MuzzleFlash { .. } => Duration::from_millis(100),
        }
    }
}

/// Visual marker with its position and creation time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualMarker {
    /// What the marker represents.
    pub kind: VisualKind,
    /// Where it happened.
    pub position: Vec2,
    /// When it happened.
    pub created_at: Duration,
}

impl VisualMarker {
    pub(crate) const fn new(kind: VisualKind, position: Vec2, created_at: Duration) -> Self {
        Self {
            kind,
            position,
            created_at,
        }
    }

    /// Reports whether the marker is still visible at `clock`.
    #[must_use]
    pub fn is_live(&self, clock: Duration) -> bool {
        clock.saturating_sub(self.created_at) < self.kind.lifetime()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_expire_exactly_at_their_lifetime() {
        let created_at = Duration::from_secs(1);
        let pop = VisualMarker::new(VisualKind::Pop, Vec2::ZERO, created_at);

        assert!(pop.is_live(created_at));
        assert!(pop.is_live(created_at + Duration::from_millis(399)));
        assert!(!pop.is_live(created_at + Duration::from_millis(400)));

        let flash = VisualMarker::new(
            VisualKind::MuzzleFlash { angle: 0.0 },
            Vec2::ZERO,
            created_at,
        );
        assert!(flash.is_live(created_at + Duration::from_millis(99)));
        assert!(!flash.is_live(created_at + Duration::from_millis(100)));
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pop Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations and the world executes those commands via its
//! `apply` entry point. Systems are pure functions over the content tables
//! described in [`content`] and over read-only snapshots of the world.

use std::{fmt, time::Duration};

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod content;

pub use content::{
    BalloonDefinition, Catalog, Content, DifficultySettings, DifficultyTable, FiringPattern,
    MapData, PlayfieldBounds, ProceduralGroup, ProceduralRecipe, ProjectilePatch,
    ProjectileProfile, Rect, SlowEffect, TowerDefinition, UpgradeEffect, UpgradeTier, Wave,
    WaveGroup,
};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided wall-clock delta.
    ///
    /// The world clamps the delta to its maximum step before simulating.
    Tick {
        /// Duration of wall time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests placement of a tower centred on the provided position.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// World-space centre of the tower footprint.
        position: Vec2,
    },
    /// Requests purchase of the next tier on one upgrade path of the selected tower.
    UpgradeTower {
        /// Upgrade path the tier belongs to.
        path: UpgradePath,
        /// Zero-based tier being purchased; must equal the path's current level.
        tier: u8,
    },
    /// Requests that the selected tower be sold for a partial refund.
    SellTower,
    /// Changes the tower highlighted for upgrade and sell requests.
    SelectTower {
        /// Tower to select, or `None` to clear the selection.
        tower: Option<TowerId>,
    },
    /// Requests that the next wave begins spawning immediately.
    StartWave,
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a balloon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BalloonId(u32);

impl BalloonId {
    /// Creates a new balloon identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

macro_rules! content_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a key referencing the content entry with the provided id.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// String form of the key as it appears in content tables.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

content_key!(
    /// Key referencing a tower definition in the [`Catalog`].
    TowerKind
);
content_key!(
    /// Key referencing a balloon definition in the [`Catalog`].
    BalloonKind
);
content_key!(
    /// Key referencing a projectile profile in the [`Catalog`].
    ProjectileKind
);
content_key!(
    /// Key referencing a map in the [`Content`] pack.
    MapId
);

/// One of the two independent upgrade paths every tower offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradePath {
    /// First upgrade path.
    Primary,
    /// Second upgrade path.
    Secondary,
}

impl UpgradePath {
    /// Both paths in resolution order.
    pub const ALL: [UpgradePath; 2] = [UpgradePath::Primary, UpgradePath::Secondary];
}

/// Purchased tier counts on both upgrade paths of a tower.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UpgradeLevels {
    primary: u8,
    secondary: u8,
}

impl UpgradeLevels {
    /// Creates a level pair with explicit tier counts.
    #[must_use]
    pub const fn new(primary: u8, secondary: u8) -> Self {
        Self { primary, secondary }
    }

    /// Number of tiers purchased on the provided path.
    #[must_use]
    pub const fn level(&self, path: UpgradePath) -> u8 {
        match path {
            UpgradePath::Primary => self.primary,
            UpgradePath::Secondary => self.secondary,
        }
    }

    /// Returns the levels with one more tier purchased on `path`.
    #[must_use]
    pub const fn incremented(self, path: UpgradePath) -> Self {
        match path {
            UpgradePath::Primary => Self {
                primary: self.primary.saturating_add(1),
                secondary: self.secondary,
            },
            UpgradePath::Secondary => Self {
                primary: self.primary,
                secondary: self.secondary.saturating_add(1),
            },
        }
    }
}

/// Difficulty presets selectable when a session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Generous money and health, discounted towers.
    Easy,
    /// Baseline economy.
    Medium,
    /// Reduced resources and a tower surcharge.
    Hard,
    /// Minimal resources and the steepest surcharge.
    UltraNightmare,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::UltraNightmare => "ultra nightmare",
        };
        f.write_str(label)
    }
}

/// Controls what happens once the authored waves run out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// The session is won after the final authored wave is cleared.
    Fixed,
    /// Procedural waves continue indefinitely after the authored set.
    Infinity,
}

/// Selects the active rows of the content pack for one play session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Economy preset applied to money, health and costs.
    pub difficulty: Difficulty,
    /// Wave continuation policy.
    pub mode: GameMode,
    /// Map the session is played on.
    pub map: MapId,
}

impl SessionSettings {
    /// Creates settings from explicit values.
    #[must_use]
    pub fn new(difficulty: Difficulty, mode: GameMode, map: MapId) -> Self {
        Self {
            difficulty,
            mode,
            map,
        }
    }
}

/// Terminal and non-terminal session states reported to the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The session is still running.
    #[default]
    InProgress,
    /// Health was depleted while the provided wave was active.
    Defeat {
        /// Wave number active when the defence fell.
        wave: u32,
    },
    /// Every authored wave was cleared in fixed mode.
    Victory {
        /// Final wave number that was cleared.
        wave: u32,
    },
}

impl GameOutcome {
    /// Reports whether the session reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Static content problems detected while resolving definitions.
///
/// These indicate a broken content pack or an engine bug and are never
/// swallowed: every entry point that can encounter one returns it.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A tower kind is referenced that the catalog does not define.
    #[error("unknown tower kind '{0}'")]
    UnknownTower(TowerKind),
    /// A balloon kind is referenced that the catalog does not define.
    #[error("unknown balloon kind '{0}'")]
    UnknownBalloon(BalloonKind),
    /// A projectile kind is referenced that the catalog does not define.
    #[error("unknown projectile kind '{0}'")]
    UnknownProjectile(ProjectileKind),
    /// A map id is referenced that the content pack does not define.
    #[error("unknown map '{0}'")]
    UnknownMap(MapId),
    /// A tower instance claims more upgrade tiers than its path offers.
    #[error("tower '{kind}' has {level} tiers on {path:?} but only {available} exist")]
    UpgradeOutOfRange {
        /// Tower kind whose path was exceeded.
        kind: TowerKind,
        /// Path that was exceeded.
        path: UpgradePath,
        /// Purchased level recorded on the instance.
        level: u8,
        /// Number of tiers the definition provides.
        available: usize,
    },
    /// A map path has fewer than two vertices.
    #[error("map '{0}' needs at least two path vertices")]
    DegeneratePath(MapId),
}

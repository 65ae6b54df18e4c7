//! Read-only content tables consumed by the simulation.
//!
//! Definitions are plain data: the engine never mutates them, and every
//! instance in the world refers back to its definition by key. Lookups that
//! miss return a [`ConfigError`] so a broken pack can never be silently
//! simulated.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    BalloonKind, ConfigError, Difficulty, MapId, ProjectileKind, TowerKind, UpgradePath,
};

/// Slow status applied by a projectile on hit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlowEffect {
    /// Multiplier applied to the target's speed while slowed.
    pub factor: f32,
    /// How long the slow lasts, in milliseconds.
    pub duration_ms: u64,
}

impl SlowEffect {
    /// Duration of the slow as a [`Duration`].
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Complete description of a projectile as fired by a tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileProfile {
    /// Key of the projectile entry this profile derives from.
    pub id: ProjectileKind,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Health removed from each balloon the projectile damages.
    pub damage: u32,
    /// Number of distinct balloons the projectile may damage.
    pub pierce: u32,
    /// Radius of the secondary explosion around each primary hit.
    #[serde(default)]
    pub aoe_radius: Option<f32>,
    /// Slow applied to every primary hit.
    #[serde(default)]
    pub slow: Option<SlowEffect>,
    /// Whether the projectile damages lead balloons.
    #[serde(default)]
    pub can_pop_lead: bool,
    /// Maximum distance travelled before the projectile is culled.
    #[serde(default)]
    pub max_distance: Option<f32>,
    /// Maximum age in milliseconds before the projectile is culled.
    #[serde(default)]
    pub lifetime_ms: Option<u64>,
}

impl ProjectileProfile {
    /// Maximum age of the projectile, if bounded.
    #[must_use]
    pub fn lifetime(&self) -> Option<Duration> {
        self.lifetime_ms.map(Duration::from_millis)
    }
}

/// Partial projectile profile carried by an upgrade tier.
///
/// Every field that is present overwrites the matching profile field; absent
/// fields leave the profile untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectilePatch {
    /// Replacement travel speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    /// Replacement damage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<u32>,
    /// Replacement pierce count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pierce: Option<u32>,
    /// Replacement explosion radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aoe_radius: Option<f32>,
    /// Replacement slow effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow: Option<SlowEffect>,
    /// Replacement lead-popping capability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_pop_lead: Option<bool>,
}

impl ProjectilePatch {
    /// Shallow-merges the patch into `profile`.
    pub fn apply_to(&self, profile: &mut ProjectileProfile) {
        if let Some(speed) = self.speed {
            profile.speed = speed;
        }
        if let Some(damage) = self.damage {
            profile.damage = damage;
        }
        if let Some(pierce) = self.pierce {
            profile.pierce = pierce;
        }
        if let Some(radius) = self.aoe_radius {
            profile.aoe_radius = Some(radius);
        }
        if let Some(slow) = self.slow {
            profile.slow = Some(slow);
        }
        if let Some(can_pop_lead) = self.can_pop_lead {
            profile.can_pop_lead = can_pop_lead;
        }
    }
}

/// Closed set of firing behaviours a tower can exhibit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum FiringPattern {
    /// One projectile aimed at the target.
    #[default]
    Single,
    /// `count` projectiles evenly spread around the full circle.
    Radial {
        /// Number of projectiles per volley.
        count: u32,
    },
    /// Two projectiles straddling the aim direction.
    Twin {
        /// Angle in radians between the two projectiles.
        spread: f32,
    },
}

/// Effect patch applied when an upgrade tier is purchased.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradeEffect {
    /// Replacement shots per second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fire_rate: Option<f32>,
    /// Replacement targeting range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<f32>,
    /// Replacement firing pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firing: Option<FiringPattern>,
    /// Field-wise projectile overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projectile: Option<ProjectilePatch>,
}

/// One purchasable tier on an upgrade path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeTier {
    /// Display name of the tier.
    pub name: String,
    /// Undiscounted price of the tier.
    pub cost: u32,
    /// Stat changes granted by the tier.
    #[serde(default)]
    pub effect: UpgradeEffect,
}

/// Static description of a tower type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerDefinition {
    /// Key of the tower.
    pub id: TowerKind,
    /// Display name of the tower.
    pub name: String,
    /// Undiscounted placement price.
    pub cost: u32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Shots per second.
    pub fire_rate: f32,
    /// Footprint radius used for placement checks.
    pub size: f32,
    /// Projectile fired before upgrades.
    pub projectile: ProjectileKind,
    /// Firing behaviour before upgrades.
    #[serde(default)]
    pub firing: FiringPattern,
    /// Tiers on the first path, in purchase order.
    #[serde(default)]
    pub primary: Vec<UpgradeTier>,
    /// Tiers on the second path, in purchase order.
    #[serde(default)]
    pub secondary: Vec<UpgradeTier>,
}

impl TowerDefinition {
    /// Tiers offered on the provided path.
    #[must_use]
    pub fn path(&self, path: UpgradePath) -> &[UpgradeTier] {
        match path {
            UpgradePath::Primary => &self.primary,
            UpgradePath::Secondary => &self.secondary,
        }
    }
}

/// Static description of a balloon type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalloonDefinition {
    /// Key of the balloon.
    pub id: BalloonKind,
    /// Hit points before popping.
    pub health: u32,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Money credited when popped.
    pub money: u32,
    /// Collision radius.
    pub size: f32,
    /// Balloons released at the pop location, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BalloonKind>,
    /// Ignores area-of-effect damage.
    #[serde(default)]
    pub immune_to_explosions: bool,
    /// Ignores slow effects.
    #[serde(default)]
    pub immune_to_freeze: bool,
    /// Only damaged by projectiles that can pop lead.
    #[serde(default)]
    pub lead: bool,
    /// Large unit whose leak costs its full health.
    #[serde(default)]
    pub blimp: bool,
}

impl BalloonDefinition {
    /// Health lost when a balloon of this type with `max_health` leaks.
    ///
    /// Blimps cost their full health, layered balloons cost one point per
    /// layer they still contain.
    #[must_use]
    pub fn leak_damage(&self, max_health: u32) -> u32 {
        if self.blimp {
            max_health
        } else {
            u32::try_from(self.children.len())
                .unwrap_or(u32::MAX)
                .saturating_add(1)
        }
    }
}

/// One group of identical balloons inside a wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveGroup {
    /// Balloon type spawned by the group.
    pub balloon: BalloonKind,
    /// Number of balloons in the group.
    pub count: u32,
    /// Gap between consecutive spawns, in milliseconds.
    pub spawn_delay_ms: u64,
}

/// Authored wave composed of sequential groups.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    /// Groups spawned one after another.
    pub groups: Vec<WaveGroup>,
}

/// Regular group included in every procedural wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProceduralGroup {
    /// Balloon type spawned by the group.
    pub balloon: BalloonKind,
    /// Count before scaling by the count multiplier.
    pub base_count: u32,
    /// Gap between consecutive spawns, in milliseconds.
    pub spawn_delay_ms: u64,
}

/// Rules for synthesising waves past the authored table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProceduralRecipe {
    /// Health multiplier growth per wave past the authored set.
    pub health_step: f64,
    /// Count multiplier growth per wave past the authored set.
    pub count_step: f64,
    /// Heavy units appear on wave numbers divisible by this interval.
    pub heavy_interval: u32,
    /// Heavy unit balloon type.
    pub heavy: BalloonKind,
    /// One extra heavy unit per this many waves past the authored set.
    pub heavy_count_divisor: u32,
    /// Gap between heavy unit spawns, in milliseconds.
    pub heavy_spawn_delay_ms: u64,
    /// Regular groups appended to every procedural wave.
    pub groups: Vec<ProceduralGroup>,
}

/// Axis-aligned rectangle in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and extents.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reports whether `point` lies strictly inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.x
            && point.x < self.x + self.width
            && point.y > self.y
            && point.y < self.y + self.height
    }
}

/// Region outside of which projectiles are culled.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayfieldBounds {
    /// Smallest coordinates still inside the playfield (exclusive).
    pub min: Vec2,
    /// Largest coordinates still inside the playfield (exclusive).
    pub max: Vec2,
}

impl PlayfieldBounds {
    /// Reports whether `point` lies strictly inside the bounds.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.min.x && point.x < self.max.x && point.y > self.min.y && point.y < self.max.y
    }
}

/// Geometry of a playable map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    /// Key of the map.
    pub id: MapId,
    /// Display name of the map.
    pub name: String,
    /// Ordered vertices balloons travel along.
    pub path: Vec<Vec2>,
    /// Rectangles where towers cannot be placed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusion_zones: Vec<Rect>,
    /// Projectile culling region.
    pub bounds: PlayfieldBounds,
}

/// Starting economy and pricing for one difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Money available before the first purchase.
    pub initial_money: u32,
    /// Health available before the first leak.
    pub initial_health: i32,
    /// Scalar applied to every tower and upgrade price.
    pub cost_multiplier: f64,
}

/// Settings for every [`Difficulty`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    /// Settings for [`Difficulty::Easy`].
    pub easy: DifficultySettings,
    /// Settings for [`Difficulty::Medium`].
    pub medium: DifficultySettings,
    /// Settings for [`Difficulty::Hard`].
    pub hard: DifficultySettings,
    /// Settings for [`Difficulty::UltraNightmare`].
    pub ultra_nightmare: DifficultySettings,
}

impl DifficultyTable {
    /// Settings for the provided difficulty.
    #[must_use]
    pub const fn get(&self, difficulty: Difficulty) -> &DifficultySettings {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
            Difficulty::UltraNightmare => &self.ultra_nightmare,
        }
    }
}

/// Keyed lookup over tower, balloon and projectile definitions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CatalogEntries", into = "CatalogEntries")]
pub struct Catalog {
    towers: BTreeMap<TowerKind, TowerDefinition>,
    balloons: BTreeMap<BalloonKind, BalloonDefinition>,
    projectiles: BTreeMap<ProjectileKind, ProjectileProfile>,
}

impl Catalog {
    /// Creates a catalog from definition lists; later duplicates win.
    #[must_use]
    pub fn new(
        towers: Vec<TowerDefinition>,
        balloons: Vec<BalloonDefinition>,
        projectiles: Vec<ProjectileProfile>,
    ) -> Self {
        Self {
            towers: towers
                .into_iter()
                .map(|definition| (definition.id.clone(), definition))
                .collect(),
            balloons: balloons
                .into_iter()
                .map(|definition| (definition.id.clone(), definition))
                .collect(),
            projectiles: projectiles
                .into_iter()
                .map(|profile| (profile.id.clone(), profile))
                .collect(),
        }
    }

    /// Looks up a tower definition.
    pub fn tower(&self, kind: &TowerKind) -> Result<&TowerDefinition, ConfigError> {
        self.towers
            .get(kind)
            .ok_or_else(|| ConfigError::UnknownTower(kind.clone()))
    }

    /// Looks up a balloon definition.
    pub fn balloon(&self, kind: &BalloonKind) -> Result<&BalloonDefinition, ConfigError> {
        self.balloons
            .get(kind)
            .ok_or_else(|| ConfigError::UnknownBalloon(kind.clone()))
    }

    /// Looks up a projectile profile.
    pub fn projectile(&self, kind: &ProjectileKind) -> Result<&ProjectileProfile, ConfigError> {
        self.projectiles
            .get(kind)
            .ok_or_else(|| ConfigError::UnknownProjectile(kind.clone()))
    }

    /// Iterator over tower definitions in key order.
    pub fn towers(&self) -> impl Iterator<Item = &TowerDefinition> {
        self.towers.values()
    }

    /// Iterator over balloon definitions in key order.
    pub fn balloons(&self) -> impl Iterator<Item = &BalloonDefinition> {
        self.balloons.values()
    }

    /// Iterator over projectile profiles in key order.
    pub fn projectiles(&self) -> impl Iterator<Item = &ProjectileProfile> {
        self.projectiles.values()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct CatalogEntries {
    #[serde(default)]
    towers: Vec<TowerDefinition>,
    #[serde(default)]
    balloons: Vec<BalloonDefinition>,
    #[serde(default)]
    projectiles: Vec<ProjectileProfile>,
}

impl From<CatalogEntries> for Catalog {
    fn from(entries: CatalogEntries) -> Self {
        Self::new(entries.towers, entries.balloons, entries.projectiles)
    }
}

impl From<Catalog> for CatalogEntries {
    fn from(catalog: Catalog) -> Self {
        Self {
            towers: catalog.towers.into_values().collect(),
            balloons: catalog.balloons.into_values().collect(),
            projectiles: catalog.projectiles.into_values().collect(),
        }
    }
}

/// Complete content pack consumed by a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Tower, balloon and projectile definitions.
    pub catalog: Catalog,
    /// Authored waves; wave `n` is stored at index `n - 1`.
    pub waves: Vec<Wave>,
    /// Rules for waves past the authored set.
    pub procedural: ProceduralRecipe,
    /// Playable maps.
    pub maps: Vec<MapData>,
    /// Economy presets.
    pub difficulties: DifficultyTable,
}

impl Content {
    /// Looks up a map by id.
    pub fn map(&self, id: &MapId) -> Result<&MapData, ConfigError> {
        self.maps
            .iter()
            .find(|map| &map.id == id)
            .ok_or_else(|| ConfigError::UnknownMap(id.clone()))
    }

    /// Number of authored waves.
    #[must_use]
    pub fn authored_wave_count(&self) -> u32 {
        u32::try_from(self.waves.len()).unwrap_or(u32::MAX)
    }

    /// Checks that every cross-reference in the pack resolves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for tower in self.catalog.towers() {
            let _ = self.catalog.projectile(&tower.projectile)?;
        }

        for balloon in self.catalog.balloons() {
            for child in &balloon.children {
                let _ = self.catalog.balloon(child)?;
            }
        }

        for group in self.waves.iter().flat_map(|wave| wave.groups.iter()) {
            let _ = self.catalog.balloon(&group.balloon)?;
        }

        let _ = self.catalog.balloon(&self.procedural.heavy)?;
        for group in &self.procedural.groups {
            let _ = self.catalog.balloon(&group.balloon)?;
        }

        for map in &self.maps {
            if map.path.len() < 2 {
                return Err(ConfigError::DegeneratePath(map.id.clone()));
            }
        }

        Ok(())
    }
}

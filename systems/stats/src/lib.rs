#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure resolver that folds purchased upgrades into effective tower stats.
//!
//! Stats are derived on demand from the base definition and the purchased
//! levels. Nothing here mutates content: [`resolve_stats`] is a pure function
//! and [`StatCache`] only memoises its results.

use std::{
    collections::{btree_map::Entry, BTreeMap},
    time::Duration,
};

use pop_defence_core::{
    Catalog, ConfigError, FiringPattern, ProjectileProfile, TowerDefinition, TowerKind,
    UpgradeLevels, UpgradePath, UpgradeTier,
};

/// Fraction of the total spend returned when a tower is sold, as `numerator / denominator`.
const SELL_REFUND: (u64, u64) = (4, 5);

/// Stats a tower instance exhibits after its purchased upgrades.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveStats {
    /// Tower kind the stats were resolved for.
    pub kind: TowerKind,
    /// Display name of the tower kind.
    pub name: String,
    /// Targeting radius in world units.
    pub range: f32,
    /// Shots per second.
    pub fire_rate: f32,
    /// Projectile fired by the tower.
    pub projectile: ProjectileProfile,
    /// Volley shape fired by the tower.
    pub firing: FiringPattern,
    /// Footprint radius.
    pub size: f32,
    /// Scaled placement cost plus every scaled tier cost, each floored.
    pub total_spent: u32,
}

impl EffectiveStats {
    /// Minimum time between shots.
    ///
    /// A tower that does not fire has an unbounded interval.
    #[must_use]
    pub fn fire_interval(&self) -> Duration {
        if self.fire_rate.is_nan() || self.fire_rate <= 0.0 {
            return Duration::MAX;
        }
        Duration::try_from_secs_f32(self.fire_rate.recip()).unwrap_or(Duration::MAX)
    }

    /// Money refunded when the tower is sold.
    #[must_use]
    pub fn sell_value(&self) -> u32 {
        let (numerator, denominator) = SELL_REFUND;
        let refund = u64::from(self.total_spent) * numerator / denominator;
        u32::try_from(refund).unwrap_or(u32::MAX)
    }
}

/// Applies a difficulty multiplier to a price, rounding down.
#[must_use]
pub fn scaled_cost(cost: u32, multiplier: f64) -> u32 {
    let scaled = (f64::from(cost) * multiplier).floor();
    if scaled <= 0.0 {
        0
    } else if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Resolves the effective stats for a tower kind at the provided levels.
///
/// Tiers are applied primary path first, each path in purchase order. Scalar
/// fields are last-write-wins; the projectile profile is merged field by field.
pub fn resolve_stats(
    catalog: &Catalog,
    kind: &TowerKind,
    levels: UpgradeLevels,
    cost_multiplier: f64,
) -> Result<EffectiveStats, ConfigError> {
    let definition = catalog.tower(kind)?;
    let mut stats = EffectiveStats {
        kind: definition.id.clone(),
        name: definition.name.clone(),
        range: definition.range,
        fire_rate: definition.fire_rate,
        projectile: catalog.projectile(&definition.projectile)?.clone(),
        firing: definition.firing,
        size: definition.size,
        total_spent: scaled_cost(definition.cost, cost_multiplier),
    };

    for path in UpgradePath::ALL {
        for tier in purchased(definition, path, levels)? {
            let effect = &tier.effect;
            if let Some(fire_rate) = effect.fire_rate {
                stats.fire_rate = fire_rate;
            }
            if let Some(range) = effect.range {
                stats.range = range;
            }
            if let Some(firing) = effect.firing {
                stats.firing = firing;
            }
            if let Some(patch) = &effect.projectile {
                patch.apply_to(&mut stats.projectile);
            }
            stats.total_spent = stats
                .total_spent
                .saturating_add(scaled_cost(tier.cost, cost_multiplier));
        }
    }

    Ok(stats)
}

/// Scaled price of the next tier on `path`, or `None` once the path is complete.
pub fn upgrade_cost(
    catalog: &Catalog,
    kind: &TowerKind,
    levels: UpgradeLevels,
    path: UpgradePath,
    cost_multiplier: f64,
) -> Result<Option<u32>, ConfigError> {
    let definition = catalog.tower(kind)?;
    let tiers = definition.path(path);
    let level = levels.level(path);
    if usize::from(level) > tiers.len() {
        return Err(out_of_range(definition, path, level));
    }

    Ok(tiers
        .get(usize::from(level))
        .map(|tier| scaled_cost(tier.cost, cost_multiplier)))
}

fn purchased(
    definition: &TowerDefinition,
    path: UpgradePath,
    levels: UpgradeLevels,
) -> Result<&[UpgradeTier], ConfigError> {
    let tiers = definition.path(path);
    let level = levels.level(path);
    tiers
        .get(..usize::from(level))
        .ok_or_else(|| out_of_range(definition, path, level))
}

fn out_of_range(definition: &TowerDefinition, path: UpgradePath, level: u8) -> ConfigError {
    ConfigError::UpgradeOutOfRange {
        kind: definition.id.clone(),
        path,
        level,
        available: definition.path(path).len(),
    }
}

/// Memoises resolved stats per `(kind, levels)` for one cost multiplier.
#[derive(Debug, Default)]
pub struct StatCache {
    cost_multiplier: f64,
    entries: BTreeMap<(TowerKind, UpgradeLevels), EffectiveStats>,
}

impl StatCache {
    /// Creates an empty cache for the provided cost multiplier.
    #[must_use]
    pub fn new(cost_multiplier: f64) -> Self {
        Self {
            cost_multiplier,
            entries: BTreeMap::new(),
        }
    }

    /// Cost multiplier every cached entry was resolved with.
    #[must_use]
    pub const fn cost_multiplier(&self) -> f64 {
        self.cost_multiplier
    }

    /// Returns the cached stats, resolving them on first use.
    pub fn get(
        &mut self,
        catalog: &Catalog,
        kind: &TowerKind,
        levels: UpgradeLevels,
    ) -> Result<&EffectiveStats, ConfigError> {
        match self.entries.entry((kind.clone(), levels)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let stats = resolve_stats(catalog, kind, levels, self.cost_multiplier)?;
                Ok(entry.insert(stats))
            }
        }
    }

    /// Number of memoised entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing has been memoised yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Tower instances owned by the world.

use std::time::Duration;

use pop_defence_core::{TowerId, TowerKind, UpgradeLevels, Vec2};
use pop_defence_system_placement::Footprint;
use serde::{Deserialize, Serialize};

/// Tower placed on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    /// Identifier allocated by the world for the tower.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Centre of the tower.
    pub position: Vec2,
    /// Footprint radius taken from the definition.
    pub radius: f32,
    /// Simulation time of the most recent shot.
    pub last_shot: Duration,
    /// Facing angle in radians.
    pub angle: f32,
    /// Tiers purchased on each upgrade path.
    pub levels: UpgradeLevels,
}

impl Tower {
    /// Placement footprint occupied by the tower.
    #[must_use]
    pub fn footprint(&self) -> Footprint {
        Footprint {
            center: self.position,
            radius: self.radius,
        }
    }
}

/// Locates a tower in a placement-ordered list.
///
/// Identifiers are allocated in placement order and removal preserves order,
/// so the list is always sorted by id.
pub(crate) fn index_of(towers: &[Tower], id: TowerId) -> Option<usize> {
    towers.binary_search_by_key(&id, |tower| tower.id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tower(id: u32) -> Tower {
        Tower {
            id: TowerId::new(id),
            kind: TowerKind::new("dart_monkey"),
            position: Vec2::ZERO,
            radius: 25.0,
            last_shot: Duration::ZERO,
            angle: 0.0,
            levels: UpgradeLevels::default(),
        }
    }

    #[test]
    fn index_lookup_survives_removals() {
        let mut towers = vec![tower(0), tower(1), tower(2), tower(3)];
        let _ = towers.remove(1);

        assert_eq!(index_of(&towers, TowerId::new(2)), Some(1));
        assert_eq!(index_of(&towers, TowerId::new(1)), None);
        assert_eq!(index_of(&towers, TowerId::new(3)), Some(2));
    }
}

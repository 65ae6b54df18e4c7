#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks deterministic tower targets from world snapshots.
//!
//! Each ready tower aims at the balloon inside its range that has travelled
//! furthest along the path. Ties go to the balloon seen first, which keeps the
//! choice stable across replays.

use pop_defence_core::{BalloonId, TowerId, Vec2};

/// Tower whose cooldown has elapsed and that is looking for a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReadyTower {
    /// Identifier of the tower.
    pub id: TowerId,
    /// Centre of the tower.
    pub position: Vec2,
    /// Effective targeting radius.
    pub range: f32,
}

/// Balloon that may be targeted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetCandidate {
    /// Identifier of the balloon.
    pub id: BalloonId,
    /// Current world position.
    pub position: Vec2,
    /// Normalised progress along the path.
    pub progress: f32,
}

/// Target assignment produced for one tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Balloon being targeted.
    pub balloon: BalloonId,
    /// Centre of the tower.
    pub tower_position: Vec2,
    /// Position of the balloon when it was selected.
    pub balloon_position: Vec2,
}

impl TowerTarget {
    /// Angle in radians from the tower towards the balloon.
    #[must_use]
    pub fn aim(&self) -> f32 {
        let delta = self.balloon_position - self.tower_position;
        delta.y.atan2(delta.x)
    }
}

/// Tower targeting system that reuses scratch buffers between ticks.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<ReadyTower>,
    balloon_workspace: Vec<TargetCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes targets for every ready tower.
    ///
    /// The output buffer is cleared first. Towers with nothing in range are
    /// left out of the output.
    pub fn handle(
        &mut self,
        towers: impl IntoIterator<Item = ReadyTower>,
        balloons: impl IntoIterator<Item = TargetCandidate>,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        self.tower_workspace.clear();
        self.tower_workspace.extend(towers);
        if self.tower_workspace.is_empty() {
            return;
        }

        self.balloon_workspace.clear();
        self.balloon_workspace.extend(balloons);
        if self.balloon_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            if let Some(best) = furthest_in_range(&self.balloon_workspace, tower) {
                out.push(TowerTarget {
                    tower: tower.id,
                    balloon: best.id,
                    tower_position: tower.position,
                    balloon_position: best.position,
                });
            }
        }
    }
}

fn furthest_in_range<'a>(
    candidates: &'a [TargetCandidate],
    tower: &ReadyTower,
) -> Option<&'a TargetCandidate> {
    let mut best: Option<&TargetCandidate> = None;
    for candidate in candidates {
        if tower.position.distance(candidate.position) > tower.range {
            continue;
        }

        if best.map_or(true, |existing| candidate.progress > existing.progress) {
            best = Some(candidate);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tower(id: u32, x: f32, y: f32, range: f32) -> ReadyTower {
        ReadyTower {
            id: TowerId::new(id),
            position: Vec2::new(x, y),
            range,
        }
    }

    fn balloon(id: u32, x: f32, y: f32, progress: f32) -> TargetCandidate {
        TargetCandidate {
            id: BalloonId::new(id),
            position: Vec2::new(x, y),
            progress,
        }
    }

    #[test]
    fn furthest_balloon_in_range_is_selected() {
        let mut system = TowerTargeting::new();
        let mut out = Vec::new();

        system.handle(
            [tower(1, 0.0, 0.0, 100.0)],
            [
                balloon(1, 10.0, 0.0, 0.2),
                balloon(2, 50.0, 0.0, 0.4),
                balloon(3, 500.0, 0.0, 0.9),
            ],
            &mut out,
        );

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tower, TowerId::new(1));
        assert_eq!(out[0].balloon, BalloonId::new(2));
    }

    #[test]
    fn first_balloon_wins_progress_ties() {
        let mut system = TowerTargeting::new();
        let mut out = Vec::new();

        system.handle(
            [tower(1, 0.0, 0.0, 100.0)],
            [balloon(7, 10.0, 0.0, 0.5), balloon(3, 20.0, 0.0, 0.5)],
            &mut out,
        );

        assert_eq!(out[0].balloon, BalloonId::new(7));
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let mut system = TowerTargeting::new();
        let mut out = Vec::new();

        system.handle(
            [tower(1, 0.0, 0.0, 30.0)],
            [balloon(1, 30.0, 0.0, 0.1)],
            &mut out,
        );
        assert_eq!(out.len(), 1);

        system.handle(
            [tower(1, 0.0, 0.0, 29.0)],
            [balloon(1, 30.0, 0.0, 0.1)],
            &mut out,
        );
        assert!(out.is_empty(), "stale targets must be cleared");
    }

    #[test]
    fn towers_resolve_targets_independently() {
        let mut system = TowerTargeting::new();
        let mut out = Vec::new();

        system.handle(
            [tower(1, 0.0, 0.0, 50.0), tower(2, 400.0, 0.0, 50.0)],
            [balloon(1, 20.0, 0.0, 0.1), balloon(2, 390.0, 0.0, 0.8)],
            &mut out,
        );

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].balloon, BalloonId::new(1));
        assert_eq!(out[1].balloon, BalloonId::new(2));
    }

    #[test]
    fn aim_points_from_tower_to_balloon() {
        let target = TowerTarget {
            tower: TowerId::new(1),
            balloon: BalloonId::new(1),
            tower_position: Vec2::new(0.0, 0.0),
            balloon_position: Vec2::new(0.0, 10.0),
        };
        assert!((target.aim() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}

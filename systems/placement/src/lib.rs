#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Geometric legality checks for tower placement.

use pop_defence_core::{Rect, Vec2};
use pop_defence_system_path::PathGeometry;

/// Clearance kept between a tower footprint and the balloon path.
pub const PATH_CLEARANCE: f32 = 20.0;

/// Circular footprint occupied by an existing tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    /// Centre of the footprint.
    pub center: Vec2,
    /// Radius of the footprint.
    pub radius: f32,
}

/// Reasons a placement was refused.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum PlacementError {
    /// The footprint would encroach on the balloon path.
    #[error("too close to the path")]
    NearPath,
    /// The footprint would overlap an existing tower.
    #[error("overlaps an existing tower")]
    OverlapsTower,
    /// The position lies inside a zone that forbids towers.
    #[error("inside an exclusion zone")]
    ExclusionZone,
    /// The position has a NaN or infinite coordinate.
    #[error("position is not finite")]
    NonFinite,
}

/// Checks whether a tower of `radius` may be centred on `position`.
pub fn validate(
    path: &PathGeometry,
    exclusion_zones: &[Rect],
    towers: impl IntoIterator<Item = Footprint>,
    position: Vec2,
    radius: f32,
) -> Result<(), PlacementError> {
    if !position.is_finite() {
        return Err(PlacementError::NonFinite);
    }

    let margin = PATH_CLEARANCE + radius;
    if path.distance_to_path(position) < margin {
        return Err(PlacementError::NearPath);
    }

    if towers
        .into_iter()
        .any(|other| position.distance(other.center) < other.radius + radius)
    {
        return Err(PlacementError::OverlapsTower);
    }

    if exclusion_zones.iter().any(|zone| zone.contains(position)) {
        return Err(PlacementError::ExclusionZone);
    }

    Ok(())
}

/// Boolean form of [`validate`].
#[must_use]
pub fn is_valid(
    path: &PathGeometry,
    exclusion_zones: &[Rect],
    towers: impl IntoIterator<Item = Footprint>,
    position: Vec2,
    radius: f32,
) -> bool {
    validate(path, exclusion_zones, towers, position, radius).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_TOWERS: [Footprint; 0] = [];

    fn straight() -> PathGeometry {
        PathGeometry::new(vec![Vec2::new(0.0, 100.0), Vec2::new(400.0, 100.0)])
    }

    #[test]
    fn clearance_is_path_margin_plus_radius() {
        let path = straight();
        assert_eq!(
            validate(&path, &[], NO_TOWERS, Vec2::new(200.0, 140.0), 25.0),
            Err(PlacementError::NearPath)
        );
        assert!(is_valid(&path, &[], NO_TOWERS, Vec2::new(200.0, 145.0), 25.0));
    }

    #[test]
    fn degenerate_segments_measure_point_distance() {
        let path = PathGeometry::new(vec![Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0)]);
        assert!(!is_valid(&path, &[], NO_TOWERS, Vec2::new(50.0, 80.0), 25.0));
        assert!(is_valid(&path, &[], NO_TOWERS, Vec2::new(50.0, 95.0), 25.0));
    }

    #[test]
    fn overlapping_towers_are_rejected() {
        let path = straight();
        let existing = Footprint {
            center: Vec2::new(200.0, 300.0),
            radius: 25.0,
        };

        assert_eq!(
            validate(&path, &[], [existing], Vec2::new(240.0, 300.0), 25.0),
            Err(PlacementError::OverlapsTower)
        );
        assert!(is_valid(&path, &[], [existing], Vec2::new(250.0, 300.0), 25.0));
    }

    #[test]
    fn exclusion_zone_interior_is_rejected() {
        let path = straight();
        let zones = [Rect::new(300.0, 300.0, 100.0, 100.0)];

        assert_eq!(
            validate(&path, &zones, NO_TOWERS, Vec2::new(350.0, 350.0), 10.0),
            Err(PlacementError::ExclusionZone)
        );
        assert!(is_valid(&path, &zones, NO_TOWERS, Vec2::new(300.0, 350.0), 10.0));
    }

    #[test]
    fn non_finite_positions_are_rejected() {
        let path = straight();
        for position in [
            Vec2::new(f32::NAN, 300.0),
            Vec2::new(200.0, f32::NAN),
            Vec2::new(f32::INFINITY, 300.0),
        ] {
            assert_eq!(
                validate(&path, &[], NO_TOWERS, position, 25.0),
                Err(PlacementError::NonFinite)
            );
        }
    }
}

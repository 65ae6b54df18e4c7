#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Polyline geometry that maps normalised path progress to world positions.

use std::time::Duration;

use pop_defence_core::Vec2;

/// Route balloons travel along, with its total length precomputed.
#[derive(Clone, Debug, PartialEq)]
pub struct PathGeometry {
    vertices: Vec<Vec2>,
    total_length: f32,
}

impl PathGeometry {
    /// Creates geometry from ordered vertices.
    #[must_use]
    pub fn new(vertices: impl Into<Vec<Vec2>>) -> Self {
        let vertices = vertices.into();
        let total_length = vertices
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum();

        Self {
            vertices,
            total_length,
        }
    }

    /// Sum of the lengths of every segment.
    #[must_use]
    pub const fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Vertices in travel order.
    #[must_use]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Consecutive vertex pairs in travel order.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.vertices.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// World position at the provided fraction of the route.
    ///
    /// Progress at or below zero yields the first vertex and progress at or
    /// above one yields the last. An empty route yields the origin.
    #[must_use]
    pub fn position_at_progress(&self, progress: f32) -> Vec2 {
        let (Some(&first), Some(&last)) = (self.vertices.first(), self.vertices.last()) else {
            return Vec2::ZERO;
        };

        if progress <= 0.0 {
            return first;
        }
        if progress >= 1.0 {
            return last;
        }

        let target = progress * self.total_length;
        let mut travelled = 0.0;
        for (start, end) in self.segments() {
            let length = start.distance(end);
            if length <= 0.0 {
                continue;
            }

            if travelled + length >= target {
                let t = (target - travelled) / length;
                return start.lerp(end, t);
            }
            travelled += length;
        }

        last
    }

    /// Progress gained by a unit moving at `speed` world units per second for `dt`.
    ///
    /// A route with no length is completed in a single step.
    #[must_use]
    pub fn progress_delta(&self, speed: f32, dt: Duration) -> f32 {
        if self.total_length <= 0.0 {
            return 1.0;
        }
        speed / self.total_length * dt.as_secs_f32()
    }

    /// Shortest distance from `point` to any part of the route.
    ///
    /// A single vertex route measures the distance to that vertex; an empty
    /// route is infinitely far away.
    #[must_use]
    pub fn distance_to_path(&self, point: Vec2) -> f32 {
        match self.vertices.as_slice() {
            [] => f32::INFINITY,
            [only] => point.distance(*only),
            _ => self
                .segments()
                .map(|(start, end)| distance_to_segment(point, start, end))
                .fold(f32::INFINITY, f32::min),
        }
    }
}

/// Distance from `point` to the closest point on the segment `start..end`.
///
/// A zero-length segment degenerates to the distance to `start`.
#[must_use]
pub fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let direction = end - start;
    let length_sq = direction.length_squared();
    if length_sq == 0.0 {
        return point.distance(start);
    }

    let t = ((point - start).dot(direction) / length_sq).clamp(0.0, 1.0);
    point.distance(start + direction * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> PathGeometry {
        PathGeometry::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
        ])
    }

    fn assert_close(actual: Vec2, expected: Vec2) {
        assert!(
            actual.distance(expected) < 1e-3,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn total_length_sums_segments() {
        assert!((l_shape().total_length() - 200.0).abs() < f32::EPSILON);
    }

    #[test]
    fn endpoints_are_returned_at_zero_and_one() {
        let path = l_shape();
        assert_close(path.position_at_progress(0.0), Vec2::new(0.0, 0.0));
        assert_close(path.position_at_progress(1.0), Vec2::new(100.0, 100.0));
        assert_close(path.position_at_progress(-0.5), Vec2::new(0.0, 0.0));
        assert_close(path.position_at_progress(7.0), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn interior_progress_interpolates_within_segment() {
        let path = l_shape();
        assert_close(path.position_at_progress(0.25), Vec2::new(50.0, 0.0));
        assert_close(path.position_at_progress(0.5), Vec2::new(100.0, 0.0));
        assert_close(path.position_at_progress(0.75), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn zero_length_segments_are_skipped() {
        let path = PathGeometry::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
        ]);
        assert_close(path.position_at_progress(0.5), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn empty_route_yields_origin() {
        let path = PathGeometry::new(Vec::new());
        assert_eq!(path.position_at_progress(0.5), Vec2::ZERO);
        assert!(path.distance_to_path(Vec2::ONE).is_infinite());
    }

    #[test]
    fn progress_delta_scales_with_length() {
        let path = l_shape();
        let delta = path.progress_delta(100.0, Duration::from_millis(500));
        assert!((delta - 0.25).abs() < 1e-6);

        let degenerate = PathGeometry::new(vec![Vec2::ONE, Vec2::ONE]);
        assert!((degenerate.progress_delta(1.0, Duration::from_millis(1)) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn segment_distance_clamps_projection() {
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(10.0, 0.0);
        assert!((distance_to_segment(Vec2::new(5.0, 3.0), start, end) - 3.0).abs() < 1e-6);
        assert!((distance_to_segment(Vec2::new(-4.0, 3.0), start, end) - 5.0).abs() < 1e-6);
        assert!((distance_to_segment(Vec2::new(3.0, 4.0), start, start) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn distance_to_path_takes_nearest_segment() {
        let path = l_shape();
        assert!((path.distance_to_path(Vec2::new(90.0, 50.0)) - 10.0).abs() < 1e-6);
    }
}

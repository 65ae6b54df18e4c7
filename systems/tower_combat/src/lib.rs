#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that expands tower volleys into projectile launches.

use std::f32::consts::TAU;

use pop_defence_core::{FiringPattern, TowerId, Vec2};

/// Tower that fires this tick, with its resolved firing pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Volley {
    /// Tower that fires.
    pub tower: TowerId,
    /// Launch point of every projectile in the volley.
    pub origin: Vec2,
    /// Angle in radians towards the target.
    pub aim: f32,
    /// Shape of the volley.
    pub pattern: FiringPattern,
}

/// Single projectile to be created by the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Launch {
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Starting position of the projectile.
    pub origin: Vec2,
    /// Heading of the projectile in radians.
    pub angle: f32,
}

/// Tower combat system that reuses a scratch buffer between ticks.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Launch>,
}

impl TowerCombat {
    /// Creates a new tower combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the launches produced by every volley to `out`, in volley order.
    pub fn handle(&mut self, volleys: &[Volley], out: &mut Vec<Launch>) {
        if volleys.is_empty() {
            return;
        }

        self.scratch.clear();
        for volley in volleys {
            expand(volley, &mut self.scratch);
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn expand(volley: &Volley, out: &mut Vec<Launch>) {
    let launch = |angle: f32| Launch {
        tower: volley.tower,
        origin: volley.origin,
        angle,
    };

    match volley.pattern {
        FiringPattern::Single => out.push(launch(volley.aim)),
        FiringPattern::Radial { count } => {
            let total = count as f32;
            out.extend((0..count).map(|index| launch(index as f32 / total * TAU)));
        }
        FiringPattern::Twin { spread } => {
            let half = spread / 2.0;
            out.push(launch(volley.aim - half));
            out.push(launch(volley.aim + half));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volley(tower: u32, aim: f32, pattern: FiringPattern) -> Volley {
        Volley {
            tower: TowerId::new(tower),
            origin: Vec2::new(10.0, 20.0),
            aim,
            pattern,
        }
    }

    #[test]
    fn single_fires_along_the_aim() {
        let mut system = TowerCombat::new();
        let mut out = Vec::new();

        system.handle(&[volley(1, 0.75, FiringPattern::Single)], &mut out);

        assert_eq!(
            out,
            vec![Launch {
                tower: TowerId::new(1),
                origin: Vec2::new(10.0, 20.0),
                angle: 0.75,
            }]
        );
    }

    #[test]
    fn radial_ignores_aim_and_covers_the_circle() {
        let mut system = TowerCombat::new();
        let mut out = Vec::new();

        system.handle(
            &[volley(2, 1.0, FiringPattern::Radial { count: 8 })],
            &mut out,
        );

        assert_eq!(out.len(), 8);
        assert!(out[0].angle.abs() < f32::EPSILON);
        assert!((out[2].angle - TAU / 4.0).abs() < 1e-6);
        assert!((out[7].angle - TAU * 7.0 / 8.0).abs() < 1e-6);
    }

    #[test]
    fn twin_straddles_the_aim() {
        let mut system = TowerCombat::new();
        let mut out = Vec::new();

        system.handle(
            &[volley(3, 1.0, FiringPattern::Twin { spread: 0.1 })],
            &mut out,
        );

        assert_eq!(out.len(), 2);
        assert!((out[0].angle - 0.95).abs() < 1e-6);
        assert!((out[1].angle - 1.05).abs() < 1e-6);
    }

    #[test]
    fn launches_are_appended_in_volley_order() {
        let mut system = TowerCombat::new();
        let mut out = vec![Launch {
            tower: TowerId::new(9),
            origin: Vec2::ZERO,
            angle: 0.0,
        }];

        system.handle(
            &[
                volley(4, 0.0, FiringPattern::Single),
                volley(5, 0.0, FiringPattern::Radial { count: 0 }),
                volley(6, 0.0, FiringPattern::Single),
            ],
            &mut out,
        );

        let towers: Vec<_> = out.iter().map(|launch| launch.tower.get()).collect();
        assert_eq!(towers, vec![9, 4, 6]);
    }
}

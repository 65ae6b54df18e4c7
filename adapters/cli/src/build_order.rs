use std::str::FromStr;

use pop_defence_core::{TowerKind, Vec2};
use thiserror::Error;

const POSITION_DELIMITER: char = '@';
const COORDINATE_DELIMITER: char = ',';

/// Tower placement requested on the command line as `kind@x,y`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BuildOrder {
    /// Type of tower to place.
    pub(crate) kind: TowerKind,
    /// World-space centre of the tower.
    pub(crate) position: Vec2,
}

/// Errors raised while parsing a build order.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum BuildOrderError {
    /// The `@` between kind and position was missing.
    #[error("build order '{0}' is missing '@' between tower kind and position")]
    MissingPosition(String),
    /// The tower kind was blank.
    #[error("build order '{0}' does not name a tower kind")]
    MissingKind(String),
    /// The position was not two comma separated numbers.
    #[error("could not parse position '{0}', expected 'x,y'")]
    InvalidPosition(String),
}

impl FromStr for BuildOrder {
    type Err = BuildOrderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (kind, position) = trimmed
            .split_once(POSITION_DELIMITER)
            .ok_or_else(|| BuildOrderError::MissingPosition(trimmed.to_owned()))?;

        let kind = kind.trim();
        if kind.is_empty() {
            return Err(BuildOrderError::MissingKind(trimmed.to_owned()));
        }

        Ok(Self {
            kind: TowerKind::new(kind),
            position: parse_position(position)?,
        })
    }
}

fn parse_position(position: &str) -> Result<Vec2, BuildOrderError> {
    let invalid = || BuildOrderError::InvalidPosition(position.to_owned());
    let (x, y) = position.split_once(COORDINATE_DELIMITER).ok_or_else(invalid)?;

    let x = x.trim().parse::<f32>().map_err(|_| invalid())?;
    let y = y.trim().parse::<f32>().map_err(|_| invalid())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(invalid());
    }

    Ok(Vec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kind_and_position() {
        let order: BuildOrder = " dart_monkey@275, 250.5 ".parse().expect("order parses");
        assert_eq!(order.kind, TowerKind::new("dart_monkey"));
        assert_eq!(order.position, Vec2::new(275.0, 250.5));
    }

    #[test]
    fn rejects_missing_position() {
        assert_eq!(
            "dart_monkey".parse::<BuildOrder>(),
            Err(BuildOrderError::MissingPosition("dart_monkey".to_owned()))
        );
    }

    #[test]
    fn rejects_blank_kind() {
        assert_eq!(
            "@1,2".parse::<BuildOrder>(),
            Err(BuildOrderError::MissingKind("@1,2".to_owned()))
        );
    }

    #[test]
    fn rejects_malformed_coordinates() {
        for input in ["tack_shooter@1", "tack_shooter@x,2", "tack_shooter@1,inf"] {
            assert!(matches!(
                input.parse::<BuildOrder>(),
                Err(BuildOrderError::InvalidPosition(_))
            ));
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Content packs for the Pop Defence engine.
//!
//! [`stock`] returns the built-in tables the game ships with. Alternative
//! packs are loaded from TOML with [`from_toml_str`] or [`from_toml_path`];
//! every loaded pack is validated before it is handed out.

use std::{
    fs,
    path::{Path, PathBuf},
};

use pop_defence_core::{ConfigError, Content, MapId};

mod stock;

pub use stock::{stock, STOCK_MAP};

/// Failures raised while loading a content pack.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The pack file could not be read.
    #[error("failed to read content pack {path}")]
    Io {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The pack is not valid TOML or does not match the content schema.
    #[error("content pack is malformed")]
    Parse(#[from] toml::de::Error),
    /// The pack parsed but references entries it does not define.
    #[error("content pack is inconsistent")]
    Invalid(#[from] ConfigError),
}

/// Parses and validates a content pack from TOML text.
pub fn from_toml_str(text: &str) -> Result<Content, ContentError> {
    let content: Content = toml::from_str(text)?;
    content.validate()?;
    Ok(content)
}

/// Reads, parses and validates a content pack from a TOML file.
pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Content, ContentError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_toml_str(&text)
}

/// Identifier of the map played when none is requested.
#[must_use]
pub fn default_map() -> MapId {
    MapId::new(STOCK_MAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pop_defence_core::{BalloonKind, TowerKind};

    const MINIMAL_PACK: &str = r#"
[catalog]
[[catalog.projectiles]]
id = "dart"
speed = 800.0
damage = 1
pierce = 2

[[catalog.towers]]
id = "dart_monkey"
name = "Dart Monkey"
cost = 150
range = 150.0
fire_rate = 1.2
size = 25.0
projectile = "dart"

[[catalog.towers.secondary]]
name = "Quick Shots"
cost = 100
effect = { fire_rate = 1.5 }

[[catalog.balloons]]
id = "red"
health = 1
speed = 75.0
money = 3
size = 15.0

[[waves]]
groups = [{ balloon = "red", count = 3, spawn_delay_ms = 500 }]

[procedural]
health_step = 0.1
count_step = 0.05
heavy_interval = 10
heavy = "red"
heavy_count_divisor = 10
heavy_spawn_delay_ms = 2000
groups = []

[[maps]]
id = "strip"
name = "Strip"
path = [[0.0, 100.0], [400.0, 100.0]]
bounds = { min = [-100.0, -100.0], max = [500.0, 300.0] }

[difficulties.easy]
initial_money = 650
initial_health = 150
cost_multiplier = 0.9

[difficulties.medium]
initial_money = 500
initial_health = 100
cost_multiplier = 1.0

[difficulties.hard]
initial_money = 400
initial_health = 75
cost_multiplier = 1.1

[difficulties.ultra_nightmare]
initial_money = 300
initial_health = 50
cost_multiplier = 1.25
"#;

    #[test]
    fn minimal_pack_parses_and_validates() {
        let content = from_toml_str(MINIMAL_PACK).expect("pack parses");

        let tower = content
            .catalog
            .tower(&TowerKind::new("dart_monkey"))
            .expect("tower present");
        assert_eq!(tower.secondary.len(), 1);
        assert_eq!(tower.secondary[0].effect.fire_rate, Some(1.5));
        assert_eq!(content.waves.len(), 1);
        assert!(content.map(&MapId::new("strip")).is_ok());
    }

    #[test]
    fn dangling_references_are_rejected() {
        let broken = MINIMAL_PACK.replace(
            "groups = [{ balloon = \"red\"",
            "groups = [{ balloon = \"purple\"",
        );

        match from_toml_str(&broken) {
            Err(ContentError::Invalid(ConfigError::UnknownBalloon(kind))) => {
                assert_eq!(kind, BalloonKind::new("purple"));
            }
            other => panic!("expected dangling balloon error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_text_reports_parse_error() {
        assert!(matches!(
            from_toml_str("catalog = 3"),
            Err(ContentError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = from_toml_path("/definitely/not/here.toml").expect_err("missing file");
        assert!(error.to_string().contains("/definitely/not/here.toml"));
    }
}

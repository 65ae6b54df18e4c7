use pop_defence_content::stock;
use pop_defence_core::{
    Catalog, ConfigError, FiringPattern, ProjectileKind, ProjectilePatch, ProjectileProfile,
    TowerDefinition, TowerKind, UpgradeEffect, UpgradeLevels, UpgradePath, UpgradeTier,
};
use pop_defence_system_stats::{resolve_stats, upgrade_cost};

#[test]
fn base_stats_match_definition() {
    let catalog = stock().catalog;
    let stats = resolve_stats(
        &catalog,
        &TowerKind::new("dart_monkey"),
        UpgradeLevels::default(),
        1.0,
    )
    .expect("stats resolve");

    assert_eq!(stats.name, "Dart Monkey");
    assert!((stats.range - 150.0).abs() < f32::EPSILON);
    assert!((stats.fire_rate - 1.2).abs() < f32::EPSILON);
    assert_eq!(stats.projectile.id, ProjectileKind::new("dart"));
    assert_eq!(stats.projectile.pierce, 2);
    assert_eq!(stats.firing, FiringPattern::Single);
    assert_eq!(stats.total_spent, 150);
}

#[test]
fn projectile_patches_merge_field_by_field() {
    let catalog = stock().catalog;
    let stats = resolve_stats(
        &catalog,
        &TowerKind::new("ninja_monkey"),
        UpgradeLevels::new(0, 2),
        1.0,
    )
    .expect("stats resolve");

    assert_eq!(stats.projectile.pierce, 6, "tier one pierce survives tier two");
    assert_eq!(stats.projectile.damage, 2);
    assert_eq!(stats.projectile.aoe_radius, Some(30.0));
    assert!(stats.projectile.can_pop_lead);
}

#[test]
fn firing_pattern_upgrades_resolve_through_stats() {
    let catalog = stock().catalog;
    let tack = resolve_stats(
        &catalog,
        &TowerKind::new("tack_shooter"),
        UpgradeLevels::new(2, 2),
        1.0,
    )
    .expect("stats resolve");
    assert_eq!(tack.firing, FiringPattern::Radial { count: 12 });
    assert!((tack.fire_rate - 1.3).abs() < f32::EPSILON);

    let ninja = resolve_stats(
        &catalog,
        &TowerKind::new("ninja_monkey"),
        UpgradeLevels::new(2, 0),
        1.0,
    )
    .expect("stats resolve");
    assert_eq!(ninja.firing, FiringPattern::Twin { spread: 0.1 });
}

#[test]
fn total_spent_floors_each_cost_individually() {
    let catalog = stock().catalog;
    let stats = resolve_stats(
        &catalog,
        &TowerKind::new("tack_shooter"),
        UpgradeLevels::new(1, 0),
        1.25,
    )
    .expect("stats resolve");

    assert_eq!(stats.total_spent, 312 + 187);
    assert_eq!(stats.sell_value(), 399);
}

#[test]
fn secondary_path_wins_when_both_paths_touch_a_field() {
    let catalog = overlapping_catalog();
    let kind = TowerKind::new("overlap");

    let stats = resolve_stats(&catalog, &kind, UpgradeLevels::new(1, 1), 1.0)
        .expect("stats resolve");
    assert!((stats.range - 300.0).abs() < f32::EPSILON);
    assert_eq!(stats.projectile.pierce, 4);

    let primary_only =
        resolve_stats(&catalog, &kind, UpgradeLevels::new(1, 0), 1.0).expect("stats resolve");
    assert!((primary_only.range - 200.0).abs() < f32::EPSILON);
}

#[test]
fn levels_beyond_path_length_are_config_errors() {
    let catalog = stock().catalog;
    let error = resolve_stats(
        &catalog,
        &TowerKind::new("dart_monkey"),
        UpgradeLevels::new(3, 0),
        1.0,
    )
    .expect_err("only two tiers exist");

    assert_eq!(
        error,
        ConfigError::UpgradeOutOfRange {
            kind: TowerKind::new("dart_monkey"),
            path: UpgradePath::Primary,
            level: 3,
            available: 2,
        }
    );
}

#[test]
fn unknown_tower_kind_is_a_config_error() {
    let catalog = stock().catalog;
    let error = resolve_stats(
        &catalog,
        &TowerKind::new("banana_farm"),
        UpgradeLevels::default(),
        1.0,
    )
    .expect_err("not in the catalog");

    assert_eq!(error, ConfigError::UnknownTower(TowerKind::new("banana_farm")));
}

#[test]
fn upgrade_cost_reports_next_tier_or_none() {
    let catalog = stock().catalog;
    let kind = TowerKind::new("dart_monkey");

    assert_eq!(
        upgrade_cost(&catalog, &kind, UpgradeLevels::default(), UpgradePath::Primary, 1.1),
        Ok(Some(154))
    );
    assert_eq!(
        upgrade_cost(&catalog, &kind, UpgradeLevels::new(1, 0), UpgradePath::Primary, 1.0),
        Ok(Some(220))
    );
    assert_eq!(
        upgrade_cost(&catalog, &kind, UpgradeLevels::new(2, 0), UpgradePath::Primary, 1.0),
        Ok(None)
    );
}

fn overlapping_catalog() -> Catalog {
    let tier = |name: &str, effect: UpgradeEffect| UpgradeTier {
        name: name.to_owned(),
        cost: 10,
        effect,
    };

    let tower = TowerDefinition {
        id: TowerKind::new("overlap"),
        name: "Overlap".to_owned(),
        cost: 100,
        range: 100.0,
        fire_rate: 1.0,
        size: 20.0,
        projectile: ProjectileKind::new("pin"),
        firing: FiringPattern::Single,
        primary: vec![tier(
            "Longer",
            UpgradeEffect {
                range: Some(200.0),
                projectile: Some(ProjectilePatch {
                    pierce: Some(4),
                    ..ProjectilePatch::default()
                }),
                ..UpgradeEffect::default()
            },
        )],
        secondary: vec![tier(
            "Longest",
            UpgradeEffect {
                range: Some(300.0),
                ..UpgradeEffect::default()
            },
        )],
    };

    let pin = ProjectileProfile {
        id: ProjectileKind::new("pin"),
        speed: 500.0,
        damage: 1,
        pierce: 1,
        aoe_radius: None,
        slow: None,
        can_pop_lead: false,
        max_distance: None,
        lifetime_ms: None,
    };

    Catalog::new(vec![tower], Vec::new(), vec![pin])
}

use pop_defence_content::{default_map, stock};
use pop_defence_core::{BalloonKind, Difficulty, FiringPattern, TowerKind, UpgradePath};

#[test]
fn stock_pack_is_internally_consistent() {
    let content = stock();
    content.validate().expect("stock content validates");

    assert_eq!(content.catalog.towers().count(), 12);
    assert_eq!(content.catalog.balloons().count(), 11);
    assert_eq!(content.catalog.projectiles().count(), 12);
    assert_eq!(content.authored_wave_count(), 40);
    assert!(content.map(&default_map()).is_ok());
}

#[test]
fn first_wave_is_ten_reds_eight_hundred_ms_apart() {
    let content = stock();
    let first = &content.waves[0];

    assert_eq!(first.groups.len(), 1);
    assert_eq!(first.groups[0].balloon, BalloonKind::new("red"));
    assert_eq!(first.groups[0].count, 10);
    assert_eq!(first.groups[0].spawn_delay_ms, 800);
}

#[test]
fn medium_difficulty_matches_baseline_economy() {
    let content = stock();
    let medium = content.difficulties.get(Difficulty::Medium);

    assert_eq!(medium.initial_money, 500);
    assert_eq!(medium.initial_health, 100);
    assert!((medium.cost_multiplier - 1.0).abs() < f64::EPSILON);
}

#[test]
fn tack_shooter_upgrades_widen_the_radial_burst() {
    let content = stock();
    let tack = content
        .catalog
        .tower(&TowerKind::new("tack_shooter"))
        .expect("tack shooter present");

    assert_eq!(tack.firing, FiringPattern::Radial { count: 8 });
    let counts: Vec<_> = tack
        .path(UpgradePath::Secondary)
        .iter()
        .map(|tier| tier.effect.firing)
        .collect();
    assert_eq!(
        counts,
        vec![
            Some(FiringPattern::Radial { count: 10 }),
            Some(FiringPattern::Radial { count: 12 }),
        ]
    );
}

#[test]
fn moab_is_a_blimp_carrying_four_ceramics() {
    let content = stock();
    let moab = content
        .catalog
        .balloon(&BalloonKind::new("moab"))
        .expect("moab present");

    assert!(moab.blimp);
    assert_eq!(moab.children, vec![BalloonKind::new("ceramic"); 4]);
    assert_eq!(moab.leak_damage(moab.health), 200);
}

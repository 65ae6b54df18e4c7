//! Built-in content tables.

use pop_defence_core::{
    BalloonDefinition, BalloonKind, Catalog, Content, DifficultySettings, DifficultyTable,
    FiringPattern, MapData, MapId, PlayfieldBounds, ProceduralGroup, ProceduralRecipe,
    ProjectileKind, ProjectilePatch, ProjectileProfile, SlowEffect, TowerDefinition, TowerKind,
    UpgradeEffect, UpgradeTier, Vec2, Wave, WaveGroup,
};

/// Identifier of the map shipped with the stock pack.
pub const STOCK_MAP: &str = "green_meadow";

/// Returns the content pack the game ships with.
#[must_use]
pub fn stock() -> Content {
    Content {
        catalog: Catalog::new(towers(), balloons(), projectiles()),
        waves: waves(),
        procedural: procedural(),
        maps: vec![green_meadow()],
        difficulties: difficulties(),
    }
}

fn difficulties() -> DifficultyTable {
    DifficultyTable {
        easy: DifficultySettings {
            initial_money: 650,
            initial_health: 150,
            cost_multiplier: 0.9,
        },
        medium: DifficultySettings {
            initial_money: 500,
            initial_health: 100,
            cost_multiplier: 1.0,
        },
        hard: DifficultySettings {
            initial_money: 400,
            initial_health: 75,
            cost_multiplier: 1.1,
        },
        ultra_nightmare: DifficultySettings {
            initial_money: 300,
            initial_health: 50,
            cost_multiplier: 1.25,
        },
    }
}

fn projectile(id: &str, speed: f32, damage: u32, pierce: u32) -> ProjectileProfile {
    ProjectileProfile {
        id: ProjectileKind::new(id),
        speed,
        damage,
        pierce,
        aoe_radius: None,
        slow: None,
        can_pop_lead: false,
        max_distance: None,
        lifetime_ms: None,
    }
}

fn slow(factor: f32, duration_ms: u64) -> SlowEffect {
    SlowEffect {
        factor,
        duration_ms,
    }
}

fn projectiles() -> Vec<ProjectileProfile> {
    vec![
        projectile("dart", 800.0, 1, 2),
        projectile("tack", 600.0, 1, 1),
        ProjectileProfile {
            slow: Some(slow(0.6, 1500)),
            ..projectile("ice_shard", 700.0, 0, 1)
        },
        ProjectileProfile {
            aoe_radius: Some(50.0),
            can_pop_lead: true,
            ..projectile("bomb", 400.0, 2, 1)
        },
        ProjectileProfile {
            can_pop_lead: true,
            ..projectile("plasma", 1000.0, 1, 2)
        },
        projectile("bullet", 2500.0, 5, 1),
        ProjectileProfile {
            slow: Some(slow(0.4, 4000)),
            ..projectile("glue", 500.0, 0, 1)
        },
        projectile("shuriken", 900.0, 1, 3),
        ProjectileProfile {
            aoe_radius: Some(40.0),
            can_pop_lead: true,
            ..projectile("acid_potion", 400.0, 1, 1)
        },
        projectile("thorn", 800.0, 1, 5),
        ProjectileProfile {
            aoe_radius: Some(80.0),
            can_pop_lead: true,
            ..projectile("mortar_shell", 300.0, 2, 1)
        },
        projectile("spike", 1000.0, 1, 10),
    ]
}

fn tier(name: &str, cost: u32, effect: UpgradeEffect) -> UpgradeTier {
    UpgradeTier {
        name: name.to_owned(),
        cost,
        effect,
    }
}

fn fire_rate(rate: f32) -> UpgradeEffect {
    UpgradeEffect {
        fire_rate: Some(rate),
        ..UpgradeEffect::default()
    }
}

fn range(range: f32) -> UpgradeEffect {
    UpgradeEffect {
        range: Some(range),
        ..UpgradeEffect::default()
    }
}

fn firing(pattern: FiringPattern) -> UpgradeEffect {
    UpgradeEffect {
        firing: Some(pattern),
        ..UpgradeEffect::default()
    }
}

fn patch(patch: ProjectilePatch) -> UpgradeEffect {
    UpgradeEffect {
        projectile: Some(patch),
        ..UpgradeEffect::default()
    }
}

fn pierce(pierce: u32) -> UpgradeEffect {
    patch(ProjectilePatch {
        pierce: Some(pierce),
        ..ProjectilePatch::default()
    })
}

fn aoe(radius: f32) -> UpgradeEffect {
    patch(ProjectilePatch {
        aoe_radius: Some(radius),
        ..ProjectilePatch::default()
    })
}

fn damage(damage: u32) -> UpgradeEffect {
    patch(ProjectilePatch {
        damage: Some(damage),
        ..ProjectilePatch::default()
    })
}

fn slowing(factor: f32, duration_ms: u64) -> UpgradeEffect {
    patch(ProjectilePatch {
        slow: Some(slow(factor, duration_ms)),
        ..ProjectilePatch::default()
    })
}

#[allow(clippy::too_many_arguments)]
fn tower(
    id: &str,
    name: &str,
    cost: u32,
    range: f32,
    fire_rate: f32,
    projectile: &str,
    size: f32,
    primary: Vec<UpgradeTier>,
    secondary: Vec<UpgradeTier>,
) -> TowerDefinition {
    TowerDefinition {
        id: TowerKind::new(id),
        name: name.to_owned(),
        cost,
        range,
        fire_rate,
        size,
        projectile: ProjectileKind::new(projectile),
        firing: FiringPattern::Single,
        primary,
        secondary,
    }
}

fn towers() -> Vec<TowerDefinition> {
    vec![
        tower(
            "dart_monkey",
            "Dart Monkey",
            150,
            150.0,
            1.2,
            "dart",
            25.0,
            vec![
                tier("Sharp Shots", 140, pierce(3)),
                tier("Razor Sharp", 220, pierce(6)),
            ],
            vec![
                tier("Quick Shots", 100, fire_rate(1.5)),
                tier("Very Quick Shots", 190, fire_rate(2.0)),
            ],
        ),
        TowerDefinition {
            firing: FiringPattern::Radial { count: 8 },
            ..tower(
                "tack_shooter",
                "Tack Shooter",
                250,
                100.0,
                0.8,
                "tack",
                30.0,
                vec![
                    tier("Faster Shooting", 150, fire_rate(1.0)),
                    tier("Even Faster", 250, fire_rate(1.3)),
                ],
                vec![
                    tier("More Tacks", 200, firing(FiringPattern::Radial { count: 10 })),
                    tier(
                        "Even More Tacks",
                        300,
                        firing(FiringPattern::Radial { count: 12 }),
                    ),
                ],
            )
        },
        tower(
            "ice_monkey",
            "Ice Monkey",
            300,
            120.0,
            1.0,
            "ice_shard",
            25.0,
            vec![
                tier("Enhanced Freeze", 200, slowing(0.6, 2500)),
                tier("Permafrost", 320, slowing(0.5, 4000)),
            ],
            vec![
                tier("Increased Range", 150, range(150.0)),
                tier("Arctic Wind", 380, range(180.0)),
            ],
        ),
        tower(
            "bomb_shooter",
            "Bomb Shooter",
            420,
            160.0,
            0.6,
            "bomb",
            30.0,
            vec![
                tier("Bigger Bombs", 300, aoe(70.0)),
                tier("Really Big Bombs", 500, aoe(90.0)),
            ],
            vec![
                tier("Faster Reload", 250, fire_rate(0.8)),
                tier("Missile Launcher", 450, fire_rate(1.2)),
            ],
        ),
        tower(
            "sniper_monkey",
            "Sniper Monkey",
            400,
            1000.0,
            0.5,
            "bullet",
            25.0,
            vec![
                tier(
                    "Full Metal Jacket",
                    300,
                    patch(ProjectilePatch {
                        pierce: Some(2),
                        can_pop_lead: Some(true),
                        ..ProjectilePatch::default()
                    }),
                ),
                tier("Armor Piercing Darts", 650, pierce(5)),
            ],
            vec![
                tier("Fast Firing", 250, fire_rate(0.8)),
                tier("Semi-Automatic", 600, fire_rate(1.5)),
            ],
        ),
        tower(
            "glue_gunner",
            "Glue Gunner",
            200,
            140.0,
            0.9,
            "glue",
            25.0,
            vec![
                tier("Stickier Glue", 150, slowing(0.4, 6000)),
                tier("Super Glue", 300, slowing(0.3, 10_000)),
            ],
            vec![
                tier("Glue Soak", 200, pierce(2)),
                tier(
                    "Corrosive Glue",
                    350,
                    patch(ProjectilePatch {
                        damage: Some(1),
                        pierce: Some(3),
                        ..ProjectilePatch::default()
                    }),
                ),
            ],
        ),
        tower(
            "super_monkey",
            "Super Monkey",
            1800,
            200.0,
            5.0,
            "plasma",
            30.0,
            vec![
                tier("Laser Blasts", 1200, pierce(5)),
                tier("Plasma Blasts", 2500, pierce(10)),
            ],
            vec![
                tier("Super Range", 800, range(250.0)),
                tier("Epic Range", 1500, range(300.0)),
            ],
        ),
        tower(
            "ninja_monkey",
            "Ninja Monkey",
            450,
            160.0,
            3.0,
            "shuriken",
            25.0,
            vec![
                tier("Ninja Discipline", 250, fire_rate(4.0)),
                tier("Double Shot", 400, firing(FiringPattern::Twin { spread: 0.1 })),
            ],
            vec![
                tier("Sharp Shurikens", 300, pierce(6)),
                tier(
                    "Flash Bomb",
                    600,
                    patch(ProjectilePatch {
                        damage: Some(2),
                        aoe_radius: Some(30.0),
                        can_pop_lead: Some(true),
                        ..ProjectilePatch::default()
                    }),
                ),
            ],
        ),
        tower(
            "alchemist",
            "Alchemist",
            500,
            140.0,
            0.8,
            "acid_potion",
            25.0,
            vec![
                tier("Larger Potions", 250, aoe(60.0)),
                tier("Perishing Potions", 500, damage(3)),
            ],
            vec![
                tier("Faster Throwing", 350, fire_rate(1.2)),
                tier("Acidic Mixture Dip", 600, pierce(5)),
            ],
        ),
        tower(
            "druid",
            "Druid",
            350,
            150.0,
            1.0,
            "thorn",
            25.0,
            vec![
                tier("Hard Thorns", 200, pierce(8)),
                tier(
                    "Heart of Thunder",
                    750,
                    patch(ProjectilePatch {
                        damage: Some(3),
                        can_pop_lead: Some(true),
                        ..ProjectilePatch::default()
                    }),
                ),
            ],
            vec![
                tier("Druid of the Jungle", 300, range(180.0)),
                tier("Heart of Vengeance", 400, fire_rate(1.5)),
            ],
        ),
        tower(
            "mortar_tower",
            "Mortar Tower",
            600,
            250.0,
            0.5,
            "mortar_shell",
            30.0,
            vec![
                tier("Bigger Blast", 400, aoe(100.0)),
                tier("Bloon Buster", 800, damage(5)),
            ],
            vec![
                tier("Increased Accuracy", 200, fire_rate(0.7)),
                tier("Rapid Reload", 700, fire_rate(1.2)),
            ],
        ),
        tower(
            "spike_factory",
            "Spike Factory",
            700,
            120.0,
            0.3,
            "spike",
            30.0,
            vec![
                tier("Faster Production", 450, fire_rate(0.5)),
                tier("Even Faster Production", 650, fire_rate(0.8)),
            ],
            vec![
                tier("Bigger Stacks", 500, pierce(20)),
                tier(
                    "White Hot Spikes",
                    700,
                    patch(ProjectilePatch {
                        can_pop_lead: Some(true),
                        ..ProjectilePatch::default()
                    }),
                ),
            ],
        ),
    ]
}

fn balloon(
    id: &str,
    health: u32,
    speed: f32,
    money: u32,
    size: f32,
    children: &[&str],
) -> BalloonDefinition {
    BalloonDefinition {
        id: BalloonKind::new(id),
        health,
        speed,
        money,
        size,
        children: children.iter().copied().map(BalloonKind::new).collect(),
        immune_to_explosions: false,
        immune_to_freeze: false,
        lead: false,
        blimp: false,
    }
}

fn balloons() -> Vec<BalloonDefinition> {
    vec![
        balloon("red", 1, 75.0, 3, 15.0, &[]),
        balloon("blue", 1, 90.0, 3, 16.0, &["red"]),
        balloon("green", 1, 110.0, 4, 17.0, &["blue"]),
        balloon("yellow", 1, 150.0, 5, 18.0, &["green"]),
        balloon("pink", 1, 200.0, 6, 19.0, &["yellow"]),
        BalloonDefinition {
            immune_to_explosions: true,
            ..balloon("black", 1, 120.0, 8, 18.0, &["pink"])
        },
        BalloonDefinition {
            immune_to_freeze: true,
            ..balloon("white", 1, 130.0, 8, 18.0, &["pink"])
        },
        BalloonDefinition {
            lead: true,
            ..balloon("lead", 1, 70.0, 15, 20.0, &["black", "black"])
        },
        BalloonDefinition {
            immune_to_explosions: true,
            immune_to_freeze: true,
            ..balloon("zebra", 1, 120.0, 12, 19.0, &["black", "white"])
        },
        balloon("ceramic", 10, 90.0, 25, 22.0, &["pink", "pink"]),
        BalloonDefinition {
            blimp: true,
            ..balloon(
                "moab",
                200,
                40.0,
                100,
                50.0,
                &["ceramic", "ceramic", "ceramic", "ceramic"],
            )
        },
    ]
}

fn wave(groups: &[(&str, u32, u64)]) -> Wave {
    Wave {
        groups: groups
            .iter()
            .map(|&(balloon, count, spawn_delay_ms)| WaveGroup {
                balloon: BalloonKind::new(balloon),
                count,
                spawn_delay_ms,
            })
            .collect(),
    }
}

fn waves() -> Vec<Wave> {
    vec![
        wave(&[("red", 10, 800)]),
        wave(&[("red", 15, 600)]),
        wave(&[("red", 10, 500), ("blue", 5, 700)]),
        wave(&[("blue", 15, 500)]),
        wave(&[("green", 10, 600), ("blue", 5, 400)]),
        wave(&[("yellow", 8, 800)]),
        wave(&[("green", 20, 300)]),
        wave(&[("yellow", 10, 500), ("pink", 5, 1000)]),
        wave(&[("pink", 15, 400)]),
        wave(&[("yellow", 20, 200), ("pink", 10, 300)]),
        wave(&[("red", 50, 100)]),
        wave(&[("blue", 30, 200), ("green", 10, 500)]),
        wave(&[("yellow", 15, 300), ("pink", 15, 400)]),
        wave(&[("ceramic", 2, 1000)]),
        wave(&[("pink", 30, 150)]),
        wave(&[("green", 100, 50)]),
        wave(&[("yellow", 40, 150)]),
        wave(&[("ceramic", 5, 800), ("blue", 20, 100)]),
        wave(&[("ceramic", 8, 500)]),
        wave(&[("ceramic", 10, 400), ("pink", 20, 100)]),
        wave(&[("black", 10, 600)]),
        wave(&[("white", 10, 600)]),
        wave(&[("lead", 5, 1200)]),
        wave(&[("zebra", 8, 900)]),
        wave(&[("ceramic", 12, 300)]),
        wave(&[("lead", 10, 500), ("red", 50, 50)]),
        wave(&[("black", 15, 200), ("white", 15, 200)]),
        wave(&[("yellow", 100, 50)]),
        wave(&[("ceramic", 10, 200), ("lead", 5, 1000)]),
        wave(&[("zebra", 20, 300)]),
        wave(&[("ceramic", 20, 250)]),
        wave(&[("pink", 50, 50), ("lead", 10, 200)]),
        wave(&[("black", 20, 100), ("white", 20, 100), ("zebra", 10, 200)]),
        wave(&[("ceramic", 25, 150)]),
        wave(&[("lead", 15, 300), ("zebra", 15, 400)]),
        wave(&[("ceramic", 15, 100), ("yellow", 50, 30)]),
        wave(&[("ceramic", 30, 100)]),
        wave(&[("lead", 25, 200)]),
        wave(&[("ceramic", 20, 50), ("zebra", 20, 100)]),
        wave(&[("moab", 1, 1000)]),
    ]
}

fn procedural() -> ProceduralRecipe {
    let group = |balloon: &str, base_count: u32, spawn_delay_ms: u64| ProceduralGroup {
        balloon: BalloonKind::new(balloon),
        base_count,
        spawn_delay_ms,
    };

    ProceduralRecipe {
        health_step: 0.1,
        count_step: 0.05,
        heavy_interval: 10,
        heavy: BalloonKind::new("moab"),
        heavy_count_divisor: 10,
        heavy_spawn_delay_ms: 2000,
        groups: vec![
            group("ceramic", 10, 150),
            group("lead", 15, 250),
            group("zebra", 15, 250),
        ],
    }
}

fn green_meadow() -> MapData {
    let path = [
        (-50.0, 150.0),
        (150.0, 150.0),
        (150.0, 400.0),
        (400.0, 400.0),
        (400.0, 100.0),
        (650.0, 100.0),
        (650.0, 500.0),
        (900.0, 500.0),
        (900.0, 250.0),
        (1150.0, 250.0),
        (1150.0, 650.0),
        (1250.0, 650.0),
    ];

    MapData {
        id: MapId::new(STOCK_MAP),
        name: "Green Meadow".to_owned(),
        path: path.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        exclusion_zones: Vec::new(),
        bounds: PlayfieldBounds {
            min: Vec2::new(-100.0, -100.0),
            max: Vec2::new(1300.0, 900.0),
        },
    }
}

//! Fixed-order simulation step.

use std::{collections::BTreeSet, time::Duration};

use pop_defence_core::{BalloonId, Catalog, ConfigError, GameMode, GameOutcome, Vec2};
use pop_defence_system_tower_targeting::{ReadyTower, TargetCandidate};
use pop_defence_system_tower_combat::Volley;
use pop_defence_system_wave_scheduler::{schedule_wave, wave_available};
use tracing::info;

use crate::{
    state::{Balloon, IdAllocator, Projectile, Slow, VisualKind, VisualMarker},
    towers::index_of,
    World, MAX_TICK, WAVE_COOLDOWN,
};

const WAVE_BONUS_BASE: u32 = 50;
const WAVE_BONUS_PER_WAVE: u32 = 5;

/// Advances the world by `dt`, clamped to [`MAX_TICK`].
pub(crate) fn advance(world: &mut World, dt: Duration) -> Result<(), ConfigError> {
    let dt = dt.min(MAX_TICK);
    world.state.clock += dt;

    spawn_due(world)?;
    move_balloons(world, dt);
    move_projectiles(world, dt);
    fire_towers(world)?;
    resolve_collisions(world)?;

    let clock = world.state.clock;
    world.state.visuals.retain(|marker| marker.is_live(clock));

    advance_wave_timer(world, dt)?;
    update_outcome(world);
    Ok(())
}

/// Schedules the wave after the current one. Returns `false` when none exists.
pub(crate) fn begin_next_wave(world: &mut World) -> Result<bool, ConfigError> {
    let next = world.state.wave_number.saturating_add(1);
    let Some(spawns) = schedule_wave(
        &world.content,
        next,
        world.settings.mode,
        world.state.clock,
    )?
    else {
        return Ok(false);
    };

    info!(wave = next, spawns = spawns.len(), "wave started");
    let state = &mut world.state;
    state.pending_spawns.extend(spawns);
    state
        .pending_spawns
        .make_contiguous()
        .sort_by_key(|entry| entry.at);
    state.wave_spawning = true;
    state.wave_number = next;
    state.time_to_next_wave = Duration::ZERO;
    Ok(true)
}

fn spawn_due(world: &mut World) -> Result<(), ConfigError> {
    let state = &mut world.state;
    let start = world.path.position_at_progress(0.0);

    while state
        .pending_spawns
        .front()
        .is_some_and(|entry| entry.at <= state.clock)
    {
        let Some(entry) = state.pending_spawns.pop_front() else {
            break;
        };
        let definition = world.content.catalog.balloon(&entry.balloon)?;
        let id = state.ids.balloon();
        state.balloons.push(Balloon::spawn(
            id,
            definition,
            entry.health_override,
            0.0,
            start,
        ));
    }

    if state.pending_spawns.is_empty() && state.wave_spawning {
        state.wave_spawning = false;
    }
    Ok(())
}

fn move_balloons(world: &mut World, dt: Duration) {
    let path = &world.path;
    let state = &mut world.state;
    let clock = state.clock;
    let mut leaked: i64 = 0;

    state.balloons.retain_mut(|balloon| {
        let speed = balloon.effective_speed(clock);
        if balloon.status.slow.is_some_and(|slow| slow.until <= clock) {
            balloon.status.slow = None;
        }

        balloon.progress += path.progress_delta(speed, dt);
        if balloon.progress >= 1.0 {
            leaked += i64::from(balloon.stats.leak_damage);
            return false;
        }

        balloon.position = path.position_at_progress(balloon.progress);
        true
    });

    if leaked > 0 {
        let health = i64::from(state.health) - leaked;
        state.health = i32::try_from(health).unwrap_or(i32::MIN);
    }
}

fn move_projectiles(world: &mut World, dt: Duration) {
    let bounds = world.map.bounds;
    let clock = world.state.clock;
    let seconds = dt.as_secs_f32();

    world.state.projectiles.retain_mut(|projectile| {
        let distance = projectile.profile.speed * seconds;
        projectile.position += Vec2::from_angle(projectile.angle) * distance;
        projectile.distance_travelled += distance;

        let within_range = projectile
            .profile
            .max_distance
            .map_or(true, |limit| projectile.distance_travelled <= limit);
        let within_lifetime = projectile
            .profile
            .lifetime()
            .map_or(true, |limit| clock.saturating_sub(projectile.created_at) <= limit);

        bounds.contains(projectile.position) && within_range && within_lifetime
    });
}

fn fire_towers(world: &mut World) -> Result<(), ConfigError> {
    let clock = world.state.clock;
    let systems = &mut world.systems;

    systems.ready.clear();
    for tower in &world.state.towers {
        let stats = world
            .stats
            .get(&world.content.catalog, &tower.kind, tower.levels)?;
        if clock.saturating_sub(tower.last_shot) >= stats.fire_interval() {
            systems.ready.push(ReadyTower {
                id: tower.id,
                position: tower.position,
                range: stats.range,
            });
        }
    }
    if systems.ready.is_empty() || world.state.balloons.is_empty() {
        return Ok(());
    }

    systems.candidates.clear();
    systems
        .candidates
        .extend(world.state.balloons.iter().map(|balloon| TargetCandidate {
            id: balloon.id,
            position: balloon.position,
            progress: balloon.progress,
        }));
    systems.targeting.handle(
        systems.ready.iter().copied(),
        systems.candidates.iter().copied(),
        &mut systems.targets,
    );

    systems.volleys.clear();
    for target in &systems.targets {
        let Some(index) = index_of(&world.state.towers, target.tower) else {
            continue;
        };
        let tower = &mut world.state.towers[index];
        let aim = target.aim();
        tower.angle = aim;
        tower.last_shot = clock;
        world.state.visuals.push(VisualMarker::new(
            VisualKind::MuzzleFlash { angle: aim },
            tower.position,
            clock,
        ));

        let stats = world
            .stats
            .get(&world.content.catalog, &tower.kind, tower.levels)?;
        systems.volleys.push(Volley {
            tower: tower.id,
            origin: tower.position,
            aim,
            pattern: stats.firing,
        });
    }

    systems.launches.clear();
    systems.combat.handle(&systems.volleys, &mut systems.launches);

    for launch in &systems.launches {
        let Some(index) = index_of(&world.state.towers, launch.tower) else {
            continue;
        };
        let tower = &world.state.towers[index];
        let profile = world
            .stats
            .get(&world.content.catalog, &tower.kind, tower.levels)?
            .projectile
            .clone();

        let id = world.state.ids.projectile();
        world.state.projectiles.push(Projectile {
            id,
            tower: launch.tower,
            pierce_left: profile.pierce,
            profile,
            position: launch.origin,
            angle: launch.angle,
            distance_travelled: 0.0,
            created_at: clock,
            hit: BTreeSet::new(),
        });
    }

    Ok(())
}

/// Pops and payouts gathered while resolving one tick of collisions.
#[derive(Default)]
struct PopLedger {
    popped: BTreeSet<BalloonId>,
    children: Vec<Balloon>,
    money: u32,
}

impl PopLedger {
    fn pop(
        &mut self,
        balloon: &Balloon,
        catalog: &Catalog,
        ids: &mut IdAllocator,
        visuals: &mut Vec<VisualMarker>,
        clock: Duration,
    ) -> Result<(), ConfigError> {
        if !self.popped.insert(balloon.id) {
            return Ok(());
        }

        let money = balloon.stats.money;
        self.money = self.money.saturating_add(money);
        if money > 0 {
            visuals.push(VisualMarker::new(
                VisualKind::CashPop { amount: money },
                balloon.position,
                clock,
            ));
        }
        visuals.push(VisualMarker::new(VisualKind::Pop, balloon.position, clock));

        let definition = catalog.balloon(&balloon.kind)?;
        for child in &definition.children {
            let child_definition = catalog.balloon(child)?;
            self.children.push(Balloon::spawn(
                ids.balloon(),
                child_definition,
                None,
                balloon.progress,
                balloon.position,
            ));
        }
        Ok(())
    }
}

fn resolve_collisions(world: &mut World) -> Result<(), ConfigError> {
    let catalog = &world.content.catalog;
    let state = &mut world.state;
    let clock = state.clock;
    let mut ledger = PopLedger::default();

    for projectile in &mut state.projectiles {
        if projectile.pierce_left == 0 {
            continue;
        }

        for index in 0..state.balloons.len() {
            let balloon = &state.balloons[index];
            if ledger.popped.contains(&balloon.id) || projectile.hit.contains(&balloon.id) {
                continue;
            }
            if projectile.position.distance(balloon.position) >= balloon.stats.radius {
                continue;
            }
            if balloon.stats.lead && !projectile.profile.can_pop_lead {
                continue;
            }

            let balloon = &mut state.balloons[index];
            balloon.health = balloon.health.saturating_sub(projectile.profile.damage);
            let _ = projectile.hit.insert(balloon.id);
            projectile.pierce_left -= 1;
            // Freeze-immune balloons still absorb the hit and a point of
            // pierce; only the slow itself is withheld.
            if let Some(slow) = projectile.profile.slow {
                if !balloon.stats.immune_to_freeze {
                    balloon.status.slow = Some(Slow {
                        factor: slow.factor,
                        until: clock + slow.duration(),
                    });
                }
            }

            let balloon = &state.balloons[index];
            if balloon.health == 0 {
                ledger.pop(balloon, catalog, &mut state.ids, &mut state.visuals, clock)?;
            }

            if let Some(radius) = projectile.profile.aoe_radius {
                let center = balloon.position;
                let primary = balloon.id;
                state
                    .visuals
                    .push(VisualMarker::new(VisualKind::Explosion { radius }, center, clock));

                for other in 0..state.balloons.len() {
                    let target = &state.balloons[other];
                    if target.id == primary
                        || ledger.popped.contains(&target.id)
                        || target.stats.immune_to_explosions
                        || center.distance(target.position) > radius
                    {
                        continue;
                    }

                    let target = &mut state.balloons[other];
                    target.health = target.health.saturating_sub(projectile.profile.damage);
                    let target = &state.balloons[other];
                    if target.health == 0 {
                        ledger.pop(target, catalog, &mut state.ids, &mut state.visuals, clock)?;
                    }
                }
            }

            if projectile.pierce_left == 0 {
                break;
            }
        }
    }

    let PopLedger {
        popped,
        children,
        money,
    } = ledger;
    state
        .balloons
        .retain(|balloon| !popped.contains(&balloon.id));
    state.balloons.extend(children);
    state
        .projectiles
        .retain(|projectile| projectile.pierce_left > 0);
    state.money = state.money.saturating_add(money);
    Ok(())
}

fn advance_wave_timer(world: &mut World, dt: Duration) -> Result<(), ConfigError> {
    let state = &mut world.state;
    let wave_over = !state.wave_spawning && state.balloons.is_empty();
    if wave_over
        && state.wave_number > 0
        && state.time_to_next_wave.is_zero()
        && wave_available(&world.content, state.wave_number + 1, world.settings.mode)
    {
        let bonus = WAVE_BONUS_BASE.saturating_add(WAVE_BONUS_PER_WAVE.saturating_mul(state.wave_number));
        state.money = state.money.saturating_add(bonus);
        state.time_to_next_wave = WAVE_COOLDOWN;
        info!(wave = state.wave_number, bonus, "wave cleared");
    }

    if state.time_to_next_wave.is_zero() {
        return Ok(());
    }

    state.time_to_next_wave = state.time_to_next_wave.saturating_sub(dt);
    if state.time_to_next_wave.is_zero() {
        let _ = begin_next_wave(world)?;
    }
    Ok(())
}

fn update_outcome(world: &mut World) {
    let state = &mut world.state;
    if state.health <= 0 {
        state.outcome = GameOutcome::Defeat {
            wave: state.wave_number,
        };
        info!(wave = state.wave_number, health = state.health, "defeat");
        return;
    }

    let authored = world.content.authored_wave_count();
    if world.settings.mode == GameMode::Fixed
        && state.wave_number >= authored
        && !state.wave_spawning
        && state.pending_spawns.is_empty()
        && state.balloons.is_empty()
    {
        state.outcome = GameOutcome::Victory {
            wave: state.wave_number,
        };
        info!(wave = state.wave_number, "victory");
    }
}

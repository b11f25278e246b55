//! village — two-tile demo for the plaguetide engine.
//!
//! Populates two neighboring village tiles, seeds one case on each, and runs
//! a few sim-days while the "player" walks from one tile to the other and
//! back.  Pass a JSON `EngineConfig` path as the first argument to override
//! the defaults; set `RUST_LOG=debug` to see scheduler and status logging.

mod world;

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pt_agent::{AgentBuilder, HealthState, Location, Payload, Role, SocialClass};
use pt_contagion::{EventEffect, HealthTransition, PlayerEvent};
use pt_core::{AgentId, BuildingId, EngineConfig, SimSettings, TileCoord, Vec2, wrap_hour};
use pt_movement::DoorEvent;
use pt_schedule::{BuildingStatus, BuildingStatusChange};
use pt_sim::{AgentObserver, MoraleStats, Sim, SimBuilder};

use world::{CHURCH, FIRST_HOUSE, HOUSES, VillageProvider};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:           u64 = 42;
const SIM_DAYS:       u32 = 3;
const FRAME_SECS:     f64 = 1.0 / 30.0;
/// Sim-seconds per wall-second: one in-game minute per real second.
const SPEED:          f64 = 60.0;
const START_HOUR:     f64 = 6.0;
const HOUSEHOLD_SIZE: u32 = 4;

const WEST: TileCoord = TileCoord::new(0, 0);
const EAST: TileCoord = TileCoord::new(1, 0);

const HOUSEHOLD_ROLES: [Role; 4] = [Role::Laborer, Role::Homemaker, Role::Artisan, Role::Merchant];

/// Presentation payload carried through the engine untouched.
#[derive(Debug)]
struct Sprite(&'static str);

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct VillageLog {
    infections:  usize,
    deaths:      usize,
    cures:       usize,
    door_events: usize,
    plagued:     usize,
    morale:      Option<MoraleStats>,
}

impl AgentObserver for VillageLog {
    fn on_tile_activated(&mut self, tile: TileCoord) {
        println!("  → player arrives on tile {tile}");
    }

    fn on_health_change(&mut self, _tile: TileCoord, t: &HealthTransition) {
        match (t.from, t.to) {
            (HealthState::Healthy, HealthState::Incubating) => self.infections += 1,
            (_, HealthState::Deceased)                      => self.deaths += 1,
            (_, HealthState::Healthy)                       => self.cures += 1,
            _ => {}
        }
    }

    fn on_door(&mut self, _tile: TileCoord, _agent: AgentId, _event: DoorEvent) {
        self.door_events += 1;
    }

    fn on_building_status(&mut self, _tile: TileCoord, change: &BuildingStatusChange) {
        if change.to >= BuildingStatus::Infected && change.from < BuildingStatus::Infected {
            self.plagued += 1;
        }
    }

    fn on_morale(&mut self, _tile: TileCoord, stats: &MoraleStats) {
        self.morale = Some(*stats);
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config() -> Result<EngineConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(EngineConfig { seed: SEED, ..EngineConfig::default() });
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    Ok(config)
}

/// Fill every house with a household and the church with worshippers.
/// One household per tile starts with an incubating case.
fn populate(sim: &mut Sim<VillageProvider>, tile: TileCoord, patient_zero_house: u32) -> Result<usize> {
    let mut spawned = 0;
    let mut next = 0u32;

    for h in 0..HOUSES {
        let home = BuildingId(FIRST_HOUSE + h);
        for m in 0..HOUSEHOLD_SIZE {
            let class = match (h, m) {
                (0, _) => SocialClass::Nobility,
                (_, 0) => SocialClass::Peasant,
                _      => SocialClass::Commoner,
            };
            let mut builder = AgentBuilder::new(AgentId(next))
                .home(home)
                .location(Location::Interior)
                .role(HOUSEHOLD_ROLES[m as usize % HOUSEHOLD_ROLES.len()])
                .social_class(class)
                .payload(Payload::new(Sprite("villager")));
            if h == patient_zero_house && m == 0 {
                builder = builder.health(HealthState::Incubating);
            }
            sim.spawn(tile, builder)?;
            next += 1;
            spawned += 1;
        }
    }

    for _ in 0..3 {
        sim.spawn(
            tile,
            AgentBuilder::new(AgentId(next))
                .home(CHURCH)
                .location(Location::Interior)
                .role(Role::Worshipper)
                .social_class(SocialClass::Clergy)
                .payload(Payload::new(Sprite("monk"))),
        )?;
        next += 1;
        spawned += 1;
    }

    for i in 0..4 {
        sim.spawn(
            tile,
            AgentBuilder::new(AgentId(next))
                .position(Vec2::new(-10.0 + 5.0 * i as f32, -12.0))
                .role(Role::Guard)
                .payload(Payload::new(Sprite("guard"))),
        )?;
        next += 1;
        spawned += 1;
    }
    Ok(spawned)
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn print_tiles(sim: &Sim<VillageProvider>) {
    println!(
        "  {:<8} {:>8} {:>10} {:>9} {:>9} {:>9} {:>9}",
        "Tile", "Healthy", "Incubating", "Infected", "Deceased", "Awareness", "Panic"
    );
    for coord in sim.sessions().coords() {
        let Ok(session) = sim.tile(coord) else { continue };
        let stats = MoraleStats::compute(&session.registry);
        println!(
            "  {:<8} {:>8} {:>10} {:>9} {:>9} {:>9.1} {:>9.1}",
            coord.to_string(),
            stats.health.healthy,
            stats.health.incubating,
            stats.health.infected,
            stats.health.deceased,
            stats.avg_awareness,
            stats.avg_panic,
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== village — plaguetide demo ===");
    let config = load_config()?;
    println!("Seed: {}  |  Days: {SIM_DAYS}  |  Speed: {SPEED}×", config.seed);
    println!();

    let mut sim = SimBuilder::new(VillageProvider { seed: config.seed }).config(config).build()?;
    let west = populate(&mut sim, WEST, 2)?;
    let east = populate(&mut sim, EAST, 5)?;
    info!(west, east, "villages populated");

    let mut settings = SimSettings {
        infection_rate:   0.6,
        hygiene_level:    0.2,
        simulation_speed: SPEED,
        time_of_day:      START_HOUR,
        ..SimSettings::default()
    };
    let mut log = VillageLog::default();
    sim.activate_tile(WEST, &settings, &mut log);

    let frames_per_hour = sim.clock.hours_to_secs(1.0) / (FRAME_SECS * SPEED);
    let total_frames = (f64::from(SIM_DAYS) * 24.0 * frames_per_hour).round() as u64;
    let half_frame = 0.5 / frames_per_hour;
    let mut last_sermon = None;
    let t0 = Instant::now();

    for _ in 0..total_frames {
        settings.time_of_day = wrap_hour(START_HOUR + sim.now());
        sim.update(FRAME_SECS, &settings, &mut log);

        let hours = sim.now();
        let day = ((START_HOUR + hours) / 24.0) as u32;
        let hour = settings.hour();

        // Each morning a sermon calms the square and the player tends one patient.
        if hour >= 8.0 && last_sermon != Some(day) {
            last_sermon = Some(day);
            sim.push_event(PlayerEvent {
                timestamp: hours,
                position:  Vec2::new(0.0, 0.0),
                radius:    15.0,
                effect:    EventEffect::Calming,
            });
            let patient = sim.active_agents().find(|a| a.health == HealthState::Infected).map(|a| a.id);
            if let Some(id) = patient {
                sim.cure(id, &mut log)?;
            }
        }

        // Alternate tiles at noon, stopping at the church for an hour.
        if (hour - 12.0).abs() < half_frame {
            let target = if day % 2 == 0 { EAST } else { WEST };
            if sim.active_tile() != Some(target) {
                print_tiles(&sim);
                sim.activate_tile(target, &settings, &mut log);
                sim.enter_interior(CHURCH);
            }
        }
        if sim.player_interior().is_some() && (hour - 13.0).abs() < half_frame {
            sim.leave_interior();
        }
    }

    let elapsed = t0.elapsed();
    println!();
    println!("Simulated {total_frames} frames in {:.3} s", elapsed.as_secs_f64());
    println!("  sim clock     : {}", sim.clock);
    println!("  infections    : {}", log.infections);
    println!("  deaths        : {}", log.deaths);
    println!("  cures         : {}", log.cures);
    println!("  door crossings: {}", log.door_events);
    println!("  plagued houses: {}", log.plagued);
    if let Some(m) = log.morale {
        println!("  active morale : awareness {:.1}, panic {:.1}, {} alive", m.avg_awareness, m.avg_panic, m.agent_count);
    }
    println!();
    print_tiles(&sim);

    let sprites = sim
        .active_agents()
        .filter(|a| a.payload.downcast_ref::<Sprite>().is_some_and(|s| s.0 == "monk"))
        .count();
    println!();
    println!("  monks on the active tile: {sprites}");
    Ok(())
}

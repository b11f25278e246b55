//! End-to-end scenarios driven through the public `Sim` API.

use pt_agent::{AgentBuilder, HealthState, Location, Role};
use pt_contagion::HealthTransition;
use pt_core::{AgentId, BuildingId, EngineConfig, SimSettings, TileCoord, Vec2};
use pt_movement::DoorEvent;
use pt_schedule::{BuildingStatus, BuildingStatusChange};
use pt_sim::{AgentObserver, NoopObserver, Sim, SimBuilder, catch_up_record};
use pt_spatial::{
    Bounds, BuildingFootprint, BuildingKind, EntranceSide, OpenField, TileGeometry,
    WorldGeometryProvider,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const HOME: TileCoord = TileCoord::new(0, 0);

/// Every tile holds one residential house north of the origin.
struct OneHouse;

impl WorldGeometryProvider for OneHouse {
    fn tile_geometry(&self, _tile: TileCoord) -> TileGeometry {
        TileGeometry {
            bounds:    Bounds::square(30.0),
            buildings: vec![BuildingFootprint {
                id:        BuildingId(1),
                center:    Vec2::new(0.0, 10.0),
                size:      Vec2::new(6.0, 4.0),
                entrance:  EntranceSide::South,
                kind:      BuildingKind::Residential,
                elevation: 0.0,
            }],
            obstacles: vec![],
        }
    }
}

#[derive(Default)]
struct Recorder {
    transitions: Vec<(TileCoord, HealthTransition)>,
    buildings:   Vec<BuildingStatusChange>,
    doors:       Vec<(AgentId, DoorEvent)>,
}

impl AgentObserver for Recorder {
    fn on_health_change(&mut self, tile: TileCoord, t: &HealthTransition) {
        self.transitions.push((tile, *t));
    }
    fn on_building_status(&mut self, _tile: TileCoord, change: &BuildingStatusChange) {
        self.buildings.push(*change);
    }
    fn on_door(&mut self, _tile: TileCoord, agent: AgentId, event: DoorEvent) {
        self.doors.push((agent, event));
    }
}

fn open_sim(config: EngineConfig) -> Sim<OpenField> {
    SimBuilder::new(OpenField { half_extent: 20.0 }).config(config).build().unwrap()
}

fn health_of<G: WorldGeometryProvider>(sim: &Sim<G>, tile: TileCoord, id: AgentId) -> HealthState {
    sim.tile(tile).unwrap().registry.get(id).unwrap().health
}

/// One sim-second per frame.
fn frames<G: WorldGeometryProvider, O: AgentObserver>(
    sim: &mut Sim<G>,
    n: usize,
    settings: &SimSettings,
    observer: &mut O,
) {
    for _ in 0..n {
        sim.update(1.0, settings, observer);
    }
}

// ── Infection ─────────────────────────────────────────────────────────────────

#[test]
fn close_contact_infects_within_two_checks() {
    let settings = SimSettings { infection_rate: 1.0, ..SimSettings::default() };
    let trials = 200;
    let mut infected = 0;

    for seed in 0..trials {
        let cfg = EngineConfig { seed, walk_speed: 0.001, ..EngineConfig::default() };
        let mut sim = open_sim(cfg);
        sim.spawn(HOME, AgentBuilder::new(AgentId(0)).health(HealthState::Infected)).unwrap();
        sim.spawn(HOME, AgentBuilder::new(AgentId(1)).position(Vec2::new(1.0, 0.0))).unwrap();
        sim.activate_tile(HOME, &settings, &mut NoopObserver);

        frames(&mut sim, 2, &settings, &mut NoopObserver);
        if health_of(&sim, HOME, AgentId(1)) != HealthState::Healthy {
            infected += 1;
        }
    }
    assert!(infected as f64 / trials as f64 >= 0.99, "only {infected}/{trials} infected");
}

#[test]
fn zero_rate_never_infects() {
    let settings = SimSettings { infection_rate: 0.0, ..SimSettings::default() };
    let cfg = EngineConfig { walk_speed: 0.001, ..EngineConfig::default() };
    let mut sim = open_sim(cfg);
    sim.spawn(HOME, AgentBuilder::new(AgentId(0)).health(HealthState::Infected)).unwrap();
    sim.spawn(HOME, AgentBuilder::new(AgentId(1)).position(Vec2::new(1.0, 0.0))).unwrap();
    sim.activate_tile(HOME, &settings, &mut NoopObserver);

    frames(&mut sim, 60, &settings, &mut NoopObserver);
    assert_eq!(health_of(&sim, HOME, AgentId(1)), HealthState::Healthy);
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn infected_agent_dies_on_the_boundary() {
    let settings = SimSettings::default();
    let mut sim = open_sim(EngineConfig::default());
    sim.spawn(HOME, AgentBuilder::new(AgentId(0)).health(HealthState::Infected)).unwrap();
    let mut rec = Recorder::default();
    sim.activate_tile(HOME, &settings, &mut rec);

    let mut died_at_frame = None;
    for frame in 1..=200 {
        sim.update(1.0, &settings, &mut rec);
        if health_of(&sim, HOME, AgentId(0)) == HealthState::Deceased {
            died_at_frame = Some(frame);
            break;
        }
    }

    let frame = died_at_frame.unwrap();
    assert!((120..=121).contains(&frame), "died at frame {frame}");
    let (_, death) = rec.transitions.last().copied().unwrap();
    assert_eq!(death.to, HealthState::Deceased);
    assert_eq!(death.at, 2.0);
}

#[test]
fn quarantine_freezes_the_infected_but_not_their_clock() {
    let settings = SimSettings { quarantine: true, ..SimSettings::default() };
    let mut sim = open_sim(EngineConfig::default());
    let id = sim
        .spawn(HOME, AgentBuilder::new(AgentId(0)).health(HealthState::Infected).position(Vec2::new(3.0, 3.0)))
        .unwrap();
    sim.activate_tile(HOME, &settings, &mut NoopObserver);
    let start = sim.tile(HOME).unwrap().registry.get(id).unwrap().position;

    frames(&mut sim, 100, &settings, &mut NoopObserver);
    let r = sim.tile(HOME).unwrap().registry.get(id).unwrap();
    assert_eq!(r.position, start);
    assert_eq!(r.last_update_at, sim.now());
    assert_eq!(r.health, HealthState::Infected);

    frames(&mut sim, 25, &settings, &mut NoopObserver);
    assert_eq!(health_of(&sim, HOME, id), HealthState::Deceased);
}

#[test]
fn healthy_agents_still_walk_under_quarantine() {
    let settings = SimSettings { quarantine: true, ..SimSettings::default() };
    let mut sim = open_sim(EngineConfig::default());
    let id = sim.spawn(HOME, AgentBuilder::new(AgentId(0))).unwrap();
    sim.activate_tile(HOME, &settings, &mut NoopObserver);

    frames(&mut sim, 10, &settings, &mut NoopObserver);
    let r = sim.tile(HOME).unwrap().registry.get(id).unwrap();
    assert_ne!(r.position, Vec2::ZERO);
}

// ── Pause ─────────────────────────────────────────────────────────────────────

#[test]
fn paused_engine_changes_nothing() {
    let running = SimSettings::default();
    let paused = SimSettings { simulation_speed: 0.0, ..running };
    let mut sim = open_sim(EngineConfig::default());
    let id = sim.spawn(HOME, AgentBuilder::new(AgentId(0)).health(HealthState::Infected)).unwrap();
    sim.activate_tile(HOME, &running, &mut NoopObserver);
    frames(&mut sim, 3, &running, &mut NoopObserver);

    let before = sim.tile(HOME).unwrap().registry.get(id).unwrap().position;
    let now = sim.now();
    for _ in 0..500 {
        assert!(!sim.update(1.0, &paused, &mut NoopObserver));
    }
    assert_eq!(sim.now(), now);
    assert_eq!(sim.tile(HOME).unwrap().registry.get(id).unwrap().position, before);
    assert_eq!(health_of(&sim, HOME, id), HealthState::Infected);
}

// ── Buildings ─────────────────────────────────────────────────────────────────

#[test]
fn household_status_follows_its_occupants() {
    // Midnight: laborers stay home.  A zero rate keeps the rest of the
    // household healthy.
    let settings = SimSettings { time_of_day: 0.0, infection_rate: 0.0, ..SimSettings::default() };
    let mut sim = SimBuilder::new(OneHouse).build().unwrap();
    for id in 0..3 {
        let health = if id == 0 { HealthState::Infected } else { HealthState::Healthy };
        sim.spawn(
            HOME,
            AgentBuilder::new(AgentId(id))
                .health(health)
                .role(Role::Laborer)
                .home(BuildingId(1))
                .location(Location::Interior),
        )
        .unwrap();
    }
    let mut rec = Recorder::default();
    sim.activate_tile(HOME, &settings, &mut rec);

    let state = |sim: &Sim<OneHouse>| {
        sim.building_states().find(|s| s.building == BuildingId(1)).copied().unwrap()
    };
    assert_eq!(state(&sim).status, BuildingStatus::Infected);
    assert_eq!(state(&sim).occupants, 3);

    // Death at 2 h, next aggregator pass at 3 h.
    frames(&mut sim, 200, &settings, &mut rec);
    assert_eq!(health_of(&sim, HOME, AgentId(0)), HealthState::Deceased);
    assert_eq!(state(&sim).status, BuildingStatus::DeceasedPresent);

    // The body is carried out; the house stays at risk while contamination lingers.
    sim.tile_mut(HOME).unwrap().registry.remove(AgentId(0)).unwrap();
    frames(&mut sim, 90, &settings, &mut rec);
    assert_eq!(state(&sim).status, BuildingStatus::AtRisk);
    assert_eq!(state(&sim).occupants, 2);

    let path: Vec<_> = rec.buildings.iter().map(|c| c.to).collect();
    assert_eq!(
        path,
        vec![BuildingStatus::Infected, BuildingStatus::DeceasedPresent, BuildingStatus::AtRisk]
    );
}

#[test]
fn player_inside_pins_the_household() {
    // 10:00 is outside a laborer's home window, so they would normally leave.
    let settings = SimSettings { time_of_day: 10.0, ..SimSettings::default() };
    let mut sim = SimBuilder::new(OneHouse).build().unwrap();
    let id = sim
        .spawn(
            HOME,
            AgentBuilder::new(AgentId(0)).role(Role::Laborer).home(BuildingId(1)).location(Location::Interior),
        )
        .unwrap();

    let night = SimSettings { time_of_day: 0.0, ..settings };
    let mut rec = Recorder::default();
    sim.activate_tile(HOME, &night, &mut rec);
    sim.enter_interior(BuildingId(1));
    frames(&mut sim, 95, &settings, &mut rec);
    assert!(rec.doors.is_empty());
    assert!(!sim.tile(HOME).unwrap().registry.get(id).unwrap().is_outdoor());

    sim.leave_interior();
    frames(&mut sim, 95, &settings, &mut rec);
    assert_eq!(rec.doors.first(), Some(&(id, DoorEvent::Exited(BuildingId(1)))));
}

// ── Offscreen tiles ───────────────────────────────────────────────────────────

#[test]
fn inactive_tiles_keep_progressing() {
    let settings = SimSettings::default();
    let away = TileCoord::new(5, 0);
    let mut sim = SimBuilder::new(OneHouse).build().unwrap();
    sim.spawn(
        away,
        AgentBuilder::new(AgentId(0))
            .health(HealthState::Infected)
            .home(BuildingId(1))
            .location(Location::Interior),
    )
    .unwrap();
    let mut rec = Recorder::default();
    sim.activate_tile(HOME, &settings, &mut rec);

    frames(&mut sim, 150, &settings, &mut rec);
    assert_eq!(health_of(&sim, away, AgentId(0)), HealthState::Deceased);

    let (tile, death) = rec.transitions.last().copied().unwrap();
    assert_eq!(tile, away);
    assert_eq!(death.at, 2.0);
}

#[test]
fn returning_to_a_tile_catches_it_up() {
    let settings = SimSettings::default();
    let away = TileCoord::new(0, 1);
    let mut sim = SimBuilder::new(OneHouse).build().unwrap();
    sim.spawn(away, AgentBuilder::new(AgentId(0)).health(HealthState::Incubating)).unwrap();
    sim.activate_tile(HOME, &settings, &mut NoopObserver);

    // Less than the sweep threshold: the record stays behind.
    frames(&mut sim, 10, &settings, &mut NoopObserver);
    let stale = sim.tile(away).unwrap().registry.get(AgentId(0)).unwrap().last_update_at;
    assert_eq!(stale, 0.0);

    sim.activate_tile(away, &settings, &mut NoopObserver);
    let r = sim.tile(away).unwrap().registry.get(AgentId(0)).unwrap();
    assert_eq!(r.last_update_at, sim.now());
}

// ── Catch-up equivalence ──────────────────────────────────────────────────────

fn census(outcomes: &[HealthState]) -> [f64; 4] {
    let mut c = [0.0; 4];
    for h in outcomes {
        let i = match h {
            HealthState::Healthy    => 0,
            HealthState::Incubating => 1,
            HealthState::Infected   => 2,
            HealthState::Deceased   => 3,
        };
        c[i] += 1.0;
    }
    c.map(|n| n / outcomes.len() as f64)
}

#[test]
fn catch_up_matches_frame_by_frame_progress() {
    let settings = SimSettings::default();
    let cfg = EngineConfig::default();
    let mut sim = open_sim(cfg.clone());
    let starts = [
        (HealthState::Incubating, Vec2::new(-15.0, 0.0)),
        (HealthState::Infected, Vec2::new(15.0, 0.0)),
    ];
    for (i, &(health, at)) in starts.iter().enumerate() {
        sim.spawn(HOME, AgentBuilder::new(AgentId(i as u32)).health(health).position(at)).unwrap();
    }
    let mut rec = Recorder::default();
    sim.activate_tile(HOME, &settings, &mut rec);
    frames(&mut sim, 200, &settings, &mut rec);
    let now = sim.now();

    for (i, &(health, _)) in starts.iter().enumerate() {
        let id = AgentId(i as u32);
        let stepped = sim.tile(HOME).unwrap().registry.get(id).unwrap();
        let stepped_path: Vec<_> =
            rec.transitions.iter().map(|(_, t)| *t).filter(|t| t.agent == id).collect();

        let mut lumped = AgentBuilder::new(id).health(health).build(7, 0.0);
        let mut lumped_path = Vec::new();
        catch_up_record(&mut lumped, now, false, &cfg, settings.infection_rate, &mut lumped_path);

        assert_eq!(stepped.health, HealthState::Deceased);
        assert_eq!(lumped.health, stepped.health);
        assert!((lumped.state_entered_at - stepped.state_entered_at).abs() < 1e-9);
        assert_eq!(lumped_path.len(), stepped_path.len());
        for (l, s) in lumped_path.iter().zip(&stepped_path) {
            assert_eq!((l.from, l.to), (s.from, s.to));
            assert!((l.at - s.at).abs() < 1e-9, "{:?}: lumped {} vs stepped {}", l.to, l.at, s.at);
        }
    }
    // Death lands on the stage boundary, not the frame that noticed it.
    let death_of_first = rec
        .transitions
        .iter()
        .map(|(_, t)| t)
        .find(|t| t.agent == AgentId(0) && t.to == HealthState::Deceased);
    assert_eq!(death_of_first.map(|t| t.at), Some(cfg.incubation_hours + cfg.infected_hours()));
}

#[test]
fn lumped_catch_up_matches_fine_steps() {
    let cfg = EngineConfig::default();
    let rate = 0.5;
    let horizon = 4.0;
    let trials = 4_000u64;

    let record = |seed: u64| {
        AgentBuilder::new(AgentId(0))
            .location(Location::Interior)
            .home(BuildingId(1))
            .build(seed, 0.0)
    };

    let mut fine = Vec::new();
    let mut lump = Vec::new();
    let mut out = Vec::new();
    for seed in 0..trials {
        let mut r = record(seed);
        for step in 1..=16 {
            catch_up_record(&mut r, step as f64 * horizon / 16.0, true, &cfg, rate, &mut out);
        }
        fine.push(r.health);

        let mut r = record(seed + trials);
        catch_up_record(&mut r, horizon, true, &cfg, rate, &mut out);
        lump.push(r.health);
    }

    // Onset ~ Exp(0.3/h): healthy e^-1.2, dead if onset ≤ 1 h, infected if
    // onset in (1, 3], incubating if onset in (3, 4].
    let lambda: f64 = cfg.household_hazard_per_hour * rate;
    let expected = [
        (-lambda * 4.0).exp(),
        (-lambda * 3.0).exp() - (-lambda * 4.0).exp(),
        (-lambda * 1.0).exp() - (-lambda * 3.0).exp(),
        1.0 - (-lambda * 1.0).exp(),
    ];
    let (fine, lump) = (census(&fine), census(&lump));
    for i in 0..4 {
        assert!((fine[i] - lump[i]).abs() < 0.04, "state {i}: fine {} vs lump {}", fine[i], lump[i]);
        assert!((lump[i] - expected[i]).abs() < 0.04, "state {i}: {} vs {}", lump[i], expected[i]);
    }
}

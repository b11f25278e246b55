//! The `Sim` struct and its frame loop.

use tracing::{debug, info, trace};

use pt_agent::{AgentBuilder, AgentRecord, HealthState};
use pt_contagion::{
    HealthTransition, InfectionParams, PlayerEvent, RumorParams, apply_player_event, cure, infect,
    progress, propagate_infection, propagate_rumor,
};
use pt_core::{AgentId, BuildingId, EngineConfig, SimClock, SimSettings, Ticker, TileCoord};
use pt_movement::{DoorEvent, MoveContext, step_agent, try_exit};
use pt_schedule::{BuildingInfectionState, BuildingStatusChange, run_schedule};
use pt_spatial::WorldGeometryProvider;

use crate::catchup::{catch_up_record, catch_up_tile};
use crate::{AgentObserver, AgentView, MoraleStats, SimError, SimResult, TileSession, WorldSessionStore};

// ── Cadences ──────────────────────────────────────────────────────────────────

/// One ticker per coarse subsystem.  All but `schedule` count sim-seconds;
/// `schedule` counts sim-hours.
#[derive(Clone, Copy, Debug)]
struct Tickers {
    rumor:     Ticker,
    infection: Ticker,
    catch_up:  Ticker,
    schedule:  Ticker,
}

impl Tickers {
    fn new(config: &EngineConfig) -> Self {
        Self {
            rumor:     Ticker::new(config.rumor_secs),
            infection: Ticker::new(config.infection_check_secs),
            catch_up:  Ticker::new(config.catch_up_sweep_secs),
            schedule:  Ticker::new(config.schedule_hours),
        }
    }
}

/// Events collected during a frame, delivered to the observer at the end.
#[derive(Default)]
struct Outbox {
    transitions: Vec<HealthTransition>,
    doors:       Vec<(AgentId, DoorEvent)>,
    changes:     Vec<BuildingStatusChange>,
}

impl Outbox {
    fn flush<O: AgentObserver>(&mut self, tile: TileCoord, observer: &mut O) {
        for t in self.transitions.drain(..) {
            if t.to == HealthState::Deceased {
                debug!(tile = %tile, agent = %t.agent, at = t.at, "agent died");
            }
            observer.on_health_change(tile, &t);
        }
        for (agent, event) in self.doors.drain(..) {
            observer.on_door(tile, agent, event);
        }
        for change in self.changes.drain(..) {
            observer.on_building_status(tile, &change);
        }
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The engine.
///
/// `Sim<G>` owns every tile session and drives the frame loop:
///
/// 1. **Player events** queued since the last frame are applied.
/// 2. **Movement**: every living outdoor agent on the active tile steps and
///    has its health durations progressed; finished visitors come out.
/// 3. **Hash gate**: the agent hash is rebuilt if dirty (0.2 s) or old (1 s).
/// 4. **Rumor** (0.5 s) and **infection** (1 s) propagators.
/// 5. **Morale stats** on every second hash rebuild.
/// 6. **Scheduler + aggregator** (1.5 sim-hours).
/// 7. **Catch-up sweep** (1 s) over every tile for stale records.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<G: WorldGeometryProvider> {
    pub config: EngineConfig,
    pub clock:  SimClock,

    geometry:        G,
    sessions:        WorldSessionStore,
    active:          Option<TileCoord>,
    player_interior: Option<BuildingId>,
    tickers:         Tickers,
    events:          Vec<PlayerEvent>,
    outbox:          Outbox,
}

impl<G: WorldGeometryProvider> Sim<G> {
    pub(crate) fn new(config: EngineConfig, geometry: G) -> Self {
        Self {
            clock:           SimClock::new(config.hours_per_second),
            tickers:         Tickers::new(&config),
            config,
            geometry,
            sessions:        WorldSessionStore::new(),
            active:          None,
            player_interior: None,
            events:          Vec::new(),
            outbox:          Outbox::default(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Current sim time in sim-hours.
    #[inline]
    pub fn now(&self) -> f64 {
        self.clock.sim_hours
    }

    pub fn active_tile(&self) -> Option<TileCoord> {
        self.active
    }

    pub fn player_interior(&self) -> Option<BuildingId> {
        self.player_interior
    }

    pub fn sessions(&self) -> &WorldSessionStore {
        &self.sessions
    }

    pub fn tile(&self, coord: TileCoord) -> SimResult<&TileSession> {
        self.sessions.get(coord).ok_or(SimError::UnknownTile(coord))
    }

    pub fn tile_mut(&mut self, coord: TileCoord) -> SimResult<&mut TileSession> {
        self.sessions.get_mut(coord).ok_or(SimError::UnknownTile(coord))
    }

    fn active_session(&self) -> Option<&TileSession> {
        self.active.and_then(|c| self.sessions.get(c))
    }

    /// Every agent of the active tile, in id order.  Empty when no tile is
    /// active.
    pub fn active_agents(&self) -> impl Iterator<Item = AgentView<'_>> {
        self.active_session()
            .into_iter()
            .flat_map(|s| s.registry.iter())
            .map(AgentView::from)
    }

    /// Building states of the active tile, in building-id order.
    pub fn building_states(&self) -> impl Iterator<Item = &BuildingInfectionState> {
        self.active_session().into_iter().flat_map(|s| s.buildings.iter())
    }

    // ── World management ──────────────────────────────────────────────────

    /// Register a new agent on `tile`, creating the tile session if needed.
    pub fn spawn(&mut self, tile: TileCoord, builder: AgentBuilder) -> SimResult<AgentId> {
        let now = self.clock.sim_hours;
        let session = self.sessions.get_or_create(tile, &self.geometry, &self.config);
        session.spawn(builder, now, &self.config)
    }

    /// Make `coord` the rendered tile.
    ///
    /// Every record on the tile is caught up to the present regardless of
    /// the usual threshold, stale building states are discarded, and the
    /// schedule and aggregator run immediately.
    pub fn activate_tile<O: AgentObserver>(
        &mut self,
        coord:    TileCoord,
        settings: &SimSettings,
        observer: &mut O,
    ) {
        let now = self.clock.sim_hours;
        let rate = settings.effective_infection_rate(self.config.hygiene_effect);
        let config = &self.config;
        let outbox = &mut self.outbox;

        let session = self.sessions.get_or_create(coord, &self.geometry, config);
        let advanced = catch_up_tile(
            session, now, 0.0, config, rate, &mut outbox.transitions, &mut outbox.doors,
        );
        if session.buildings.is_stale(now, config.building_stale_hours) {
            session.buildings.discard();
        }
        schedule_pass(session, now, settings.hour(), None, config, rate, outbox);
        session.rebuild_hash();

        info!(
            tile = %coord,
            agents = session.registry.len(),
            caught_up = advanced,
            "tile activated"
        );

        self.active = Some(coord);
        self.player_interior = None;
        self.tickers.rumor.reset();
        self.tickers.infection.reset();
        self.tickers.schedule.reset();

        observer.on_tile_activated(coord);
        self.outbox.flush(coord, observer);
    }

    /// The player walked into `building` on the active tile.  Its occupants
    /// are held inside until [`leave_interior`](Self::leave_interior).
    pub fn enter_interior(&mut self, building: BuildingId) {
        self.player_interior = Some(building);
    }

    pub fn leave_interior(&mut self) {
        self.player_interior = None;
    }

    /// Queue a player action; it is applied at the start of the next frame.
    pub fn push_event(&mut self, event: PlayerEvent) {
        self.events.push(event);
    }

    /// Cure an Incubating or Infected agent on the active tile.
    ///
    /// Returns `false` if the agent was in any other state.
    pub fn cure<O: AgentObserver>(&mut self, agent: AgentId, observer: &mut O) -> SimResult<bool> {
        self.apply_to_active(agent, observer, cure)
    }

    /// Force a Healthy agent on the active tile into Incubating.
    ///
    /// Returns `false` if the agent was not Healthy.
    pub fn infect<O: AgentObserver>(&mut self, agent: AgentId, observer: &mut O) -> SimResult<bool> {
        self.apply_to_active(agent, observer, infect)
    }

    fn apply_to_active<O, F>(&mut self, agent: AgentId, observer: &mut O, edge: F) -> SimResult<bool>
    where
        O: AgentObserver,
        F: FnOnce(&mut AgentRecord, f64) -> Option<HealthTransition>,
    {
        let coord = self.active.ok_or(SimError::NoActiveTile)?;
        let now = self.clock.sim_hours;
        let session = self.sessions.get_mut(coord).ok_or(SimError::UnknownTile(coord))?;
        let record = session.registry.require_mut(agent)?;
        // Bring the record up to date before the edge is applied.
        progress(record, now, &self.config, &mut self.outbox.transitions);
        let applied = edge(record, now);
        let changed = applied.is_some();
        self.outbox.transitions.extend(applied);
        if changed {
            session.gate.mark_dirty();
        }
        self.outbox.flush(coord, observer);
        Ok(changed)
    }

    // ── Frame loop ────────────────────────────────────────────────────────

    /// Advance one frame of `wall_dt` real seconds.
    ///
    /// Returns `false` without touching any state when the game is paused
    /// (`simulation_speed <= 0`) or `wall_dt` is not positive.
    pub fn update<O: AgentObserver>(
        &mut self,
        wall_dt:  f64,
        settings: &SimSettings,
        observer: &mut O,
    ) -> bool {
        if settings.is_paused() || !(wall_dt > 0.0) {
            return false;
        }
        let sim_secs = wall_dt * settings.simulation_speed;
        let hours = self.clock.advance(sim_secs);
        let now = self.clock.sim_hours;

        if let Some(coord) = self.active {
            self.update_active(coord, sim_secs, hours, now, settings, observer);
        }
        if self.tickers.catch_up.advance(sim_secs) {
            self.sweep_catch_up(now, settings, observer);
        }
        true
    }

    fn update_active<O: AgentObserver>(
        &mut self,
        coord:    TileCoord,
        sim_secs: f64,
        hours:    f64,
        now:      f64,
        settings: &SimSettings,
        observer: &mut O,
    ) {
        let Sim { config, sessions, tickers, events, outbox, player_interior, .. } = self;
        let config = &*config;
        let Some(session) = sessions.get_mut(coord) else {
            return;
        };
        let rate = settings.effective_infection_rate(config.hygiene_effect);

        // ① Player events.
        for event in events.drain(..) {
            apply_player_event(&mut session.registry, &event, &mut outbox.transitions);
        }

        // ② Movement and per-frame health.
        {
            let TileSession { registry, layer, hash, buildings, .. } = &mut *session;
            let ctx = MoveContext::new(layer, hash, config, settings, now);
            for record in registry.iter_mut() {
                if record.is_outdoor() {
                    if let Some(event) = step_agent(record, &ctx, sim_secs as f32) {
                        outbox.doors.push((record.id, event));
                    }
                    progress(record, now, config, &mut outbox.transitions);
                    record.last_update_at = now;
                } else if record.motion.visit_until.is_some_and(|until| now >= until) {
                    let at_risk = record
                        .occupied_building()
                        .is_some_and(|b| buildings.status(b).is_at_risk());
                    catch_up_record(record, now, at_risk, config, rate, &mut outbox.transitions);
                    if let Some(event) = try_exit(record, layer, config.agent_radius, now) {
                        outbox.doors.push((record.id, event));
                    }
                }
            }
        }

        // ③ Hash gate.
        let rebuilt = session.maybe_rebuild_hash(sim_secs, config.hash_move_epsilon_sq);
        let stats_due = rebuilt && session.gate.rebuilds() % 2 == 0;

        // ④ Rumor.
        if tickers.rumor.advance(sim_secs) {
            propagate_rumor(&mut session.registry, &session.hash, &RumorParams::new(config));
        }

        // ⑤ Infection.
        if let Some(elapsed) = tickers.infection.advance_elapsed(sim_secs) {
            let params = InfectionParams::new(config, settings);
            propagate_infection(
                &mut session.registry,
                &session.hash,
                &params,
                elapsed,
                now,
                &mut outbox.transitions,
            );
        }

        // ⑥ Morale stats.
        if stats_due {
            observer.on_morale(coord, &MoraleStats::compute(&session.registry));
        }

        // ⑦ Scheduler and building aggregator.
        if tickers.schedule.advance(hours) {
            schedule_pass(session, now, settings.hour(), *player_interior, config, rate, outbox);
        }

        outbox.flush(coord, observer);
    }

    fn sweep_catch_up<O: AgentObserver>(&mut self, now: f64, settings: &SimSettings, observer: &mut O) {
        let rate = settings.effective_infection_rate(self.config.hygiene_effect);
        for coord in self.sessions.coords() {
            let Some(session) = self.sessions.get_mut(coord) else { continue };
            let advanced = catch_up_tile(
                session,
                now,
                self.config.catch_up_hours,
                &self.config,
                rate,
                &mut self.outbox.transitions,
                &mut self.outbox.doors,
            );
            if advanced > 0 {
                trace!(tile = %coord, advanced, "catch-up sweep");
            }
            self.outbox.flush(coord, observer);
        }
    }
}

/// Reconcile, reschedule, and re-aggregate one tile.
fn schedule_pass(
    session: &mut TileSession,
    now:     f64,
    hour:    f64,
    pinned:  Option<BuildingId>,
    config:  &EngineConfig,
    rate:    f64,
    outbox:  &mut Outbox,
) {
    catch_up_tile(session, now, 0.0, config, rate, &mut outbox.transitions, &mut outbox.doors);
    run_schedule(
        &mut session.registry,
        &session.layer,
        hour,
        pinned,
        config.agent_radius,
        &mut outbox.doors,
    );
    session.buildings.recompute(
        &session.registry,
        &session.layer,
        now,
        config.contamination_linger_hours,
        &mut outbox.changes,
    );
    session.last_schedule_time = Some(now);
}

use ::rand::SeedableRng;
use macroquad::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use crate::agent::Agent;
use crate::body::BodyId;
use crate::collision::{self, BatchOutcome};
use crate::config::{self, SessionConfig};
use crate::items::{self, ItemPreset};
use crate::lifecycle::{DeathSequencer, SequenceStep};
use crate::physics::{ContactPair, PhysicsWorld, SimplePhysics};
use crate::presentation::StatusSnapshot;
use crate::registry::EntityRegistry;
use crate::stats::VitalsHistory;
use crate::timers::{TimerKind, TimerQueue};
use crate::world::World;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounters {
    pub deaths: u32,
    pub respawns: u32,
    pub items_spawned: u32,
    pub items_consumed: u32,
}

/// Everything one interactive session owns. All mutation goes through `tick`,
/// `handle_contacts` and `spawn_item`, one call at a time.
pub struct Session {
    pub config: SessionConfig,
    pub world: World,
    pub physics: SimplePhysics,
    pub registry: EntityRegistry,
    pub agent: Agent,
    pub sequencer: DeathSequencer,
    pub timers: TimerQueue,
    pub snapshot: StatusSnapshot,
    pub history: VitalsHistory,
    pub counters: SessionCounters,
    pub rng: ChaCha8Rng,
    pub tick_count: u64,
    pub paused: bool,
    pub speed_multiplier: f32,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let mut physics = SimplePhysics::new(vec2(0.0, config.gravity));
        let mut registry = EntityRegistry::new();
        let mut world = World::new(config.width, config.height);
        world.build_walls(&mut physics);
        let agent = Agent::spawn(&mut physics, &mut registry, &world);

        let mut timers = TimerQueue::new();
        timers.schedule(
            config::PRESENTATION_INTERVAL_TICKS,
            TimerKind::PresentationRefresh,
        );

        let snapshot = StatusSnapshot::capture(&agent);
        info!(
            seed = config.seed,
            width = config.width,
            height = config.height,
            "session started"
        );

        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            world,
            physics,
            registry,
            agent,
            sequencer: DeathSequencer::new(),
            timers,
            snapshot,
            history: VitalsHistory::new(config::HISTORY_CAPACITY),
            counters: SessionCounters::default(),
            tick_count: 0,
            paused: false,
            speed_multiplier: 1.0,
        }
    }

    /// One fixed step: physics, collision interpretation, then every timer now due.
    pub fn tick(&mut self) {
        let contacts = self.physics.step(config::FIXED_DT);
        self.agent.track_position(&self.physics);
        self.handle_contacts(&contacts);

        self.tick_count += 1;
        self.process_timers();
    }

    /// Interpret one batch of contact-start pairs. Death, if any, is entered
    /// after the whole batch, pickups included, has been applied.
    pub fn handle_contacts(&mut self, pairs: &[ContactPair]) -> BatchOutcome {
        let outcome = collision::interpret_batch(
            pairs,
            &mut self.agent,
            &mut self.physics,
            &mut self.registry,
        );
        self.counters.items_consumed += outcome.consumed.len() as u32;
        if outcome.lethal {
            self.enter_death();
        }
        outcome
    }

    /// Guarded death entry; returns false if a death sequence is already running.
    pub fn enter_death(&mut self) -> bool {
        let started = self.sequencer.begin_death(
            self.tick_count,
            &mut self.agent,
            &mut self.physics,
            &mut self.registry,
            &mut self.timers,
            &mut self.rng,
        );
        if started {
            self.counters.deaths += 1;
        }
        started
    }

    pub fn spawn_item(&mut self, preset: ItemPreset) -> BodyId {
        self.counters.items_spawned += 1;
        items::spawn_preset(&mut self.physics, &mut self.registry, &self.world, preset)
    }

    pub fn process_timers(&mut self) {
        while let Some(event) = self.timers.pop_due(self.tick_count) {
            match event.kind {
                TimerKind::PresentationRefresh => {
                    self.refresh_presentation();
                    self.timers.schedule(
                        event.tick + config::PRESENTATION_INTERVAL_TICKS,
                        TimerKind::PresentationRefresh,
                    );
                }
                kind => {
                    let step = self.sequencer.handle_timer(
                        kind,
                        event.tick,
                        &mut self.agent,
                        &mut self.physics,
                        &mut self.registry,
                        &self.world,
                        &mut self.timers,
                    );
                    if step == SequenceStep::Respawned {
                        self.counters.respawns += 1;
                    }
                }
            }
        }
    }

    pub fn refresh_presentation(&mut self) {
        self.snapshot = StatusSnapshot::capture(&self.agent);
        self.history.record(&self.snapshot);
    }
}

#[cfg(test)]
impl Session {
    pub fn run_ticks(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::DeathPhase;
    use crate::registry::EntityTag;
    use crate::vitals::Status;

    fn quiet_session() -> Session {
        Session::new(SessionConfig {
            gravity: 0.0,
            ..SessionConfig::default()
        })
    }

    fn assert_no_dangling(session: &Session) {
        for (id, _) in session.registry.iter() {
            assert!(session.physics.contains(id), "{id:?} registered but not in world");
        }
    }

    #[test]
    fn weapon_hit_scenario() {
        let mut session = quiet_session();
        let sword = session.spawn_item(ItemPreset::Sword);
        let agent = session.agent.body.unwrap();

        session.handle_contacts(&[ContactPair::new(agent, sword, 2.0)]);

        let vitals = &session.agent.vitals;
        assert!((vitals.energy - 92.8).abs() < 1e-4);
        assert!((vitals.conscience.stress - 1.44).abs() < 1e-4);
        assert!((vitals.conscience.guilt - 0.48).abs() < 1e-4);
        assert_eq!(vitals.status, Status::Active);
        assert_eq!(vitals.last_decision, "Hit by weapon");
        assert!(session.registry.contains(sword));
    }

    #[test]
    fn lethal_collision_scenario_bursts_once() {
        let mut session = quiet_session();
        session.agent.vitals.energy = 5.0;
        let agent = session.agent.body.unwrap();
        let wall = session.world.walls[0];

        session.handle_contacts(&[
            ContactPair::new(agent, wall, 4.0),
            ContactPair::new(wall, agent, 4.0),
        ]);

        assert_eq!(session.agent.vitals.energy, 0.0);
        assert_eq!(session.agent.vitals.status, Status::Dead);
        assert_eq!(session.counters.deaths, 1);
        assert_eq!(session.registry.particle_count(), config::DEATH_PARTICLE_COUNT);
        assert!(!session.physics.contains(agent));

        // Re-entrant death while dying.
        assert!(!session.enter_death());
        assert_eq!(session.registry.particle_count(), config::DEATH_PARTICLE_COUNT);
        assert_no_dangling(&session);
    }

    #[test]
    fn full_death_cycle_leaves_one_fresh_agent() {
        let mut session = quiet_session();
        session.agent.vitals.conscience.stress = 9.0;
        session.agent.vitals.conscience.guilt = 9.0;
        session.agent.vitals.energy = 1.0;
        let agent = session.agent.body.unwrap();
        let wall = session.world.walls[2];
        session.handle_contacts(&[ContactPair::new(agent, wall, 10.0)]);
        assert_eq!(session.sequencer.phase(), DeathPhase::Dying);

        session.run_ticks(config::FADE_DELAY_TICKS);
        assert_eq!(session.sequencer.phase(), DeathPhase::Fading);
        assert_no_dangling(&session);

        session.run_ticks(config::RESPAWN_DELAY_TICKS - config::FADE_DELAY_TICKS);
        assert_eq!(session.sequencer.phase(), DeathPhase::Alive);
        assert_eq!(session.counters.respawns, 1);

        let vitals = &session.agent.vitals;
        assert_eq!(vitals.status, Status::Active);
        assert_eq!(vitals.energy, config::MAX_ENERGY);
        assert_eq!(vitals.conscience.stress, 0.0);
        assert_eq!(vitals.conscience.guilt, 0.0);
        assert_eq!(session.registry.particle_count(), 0);
        let agents = session
            .registry
            .iter()
            .filter(|(_, tag)| **tag == EntityTag::Agent)
            .count();
        assert_eq!(agents, 1);
        assert_no_dangling(&session);
    }

    #[test]
    fn contacts_are_ignored_while_dead() {
        let mut session = quiet_session();
        session.agent.vitals.energy = 1.0;
        let agent = session.agent.body.unwrap();
        let orb = session.spawn_item(ItemPreset::Orb);
        let wall = session.world.walls[0];
        session.handle_contacts(&[ContactPair::new(agent, wall, 5.0)]);

        let outcome = session.handle_contacts(&[ContactPair::new(agent, orb, 1.0)]);
        assert_eq!(outcome, BatchOutcome::default());
        assert!(session.registry.contains(orb));
    }

    #[test]
    fn presentation_refreshes_on_its_cadence() {
        let mut session = quiet_session();
        let sword = session.spawn_item(ItemPreset::Sword);
        let agent = session.agent.body.unwrap();
        session.handle_contacts(&[ContactPair::new(agent, sword, 2.0)]);

        // Snapshot still shows the previous refresh.
        assert_eq!(session.snapshot.energy, config::MAX_ENERGY);
        session.run_ticks(config::PRESENTATION_INTERVAL_TICKS);
        assert!(session.snapshot.energy < config::MAX_ENERGY);
        assert_eq!(session.history.energy.len(), 1);
        assert_eq!(
            session
                .timers
                .count_matching(|k| *k == TimerKind::PresentationRefresh),
            1
        );
    }

    #[test]
    fn weapon_left_on_resting_agent_hits_once() {
        let mut session = Session::new(SessionConfig::default());
        session.run_ticks(600);
        assert!(session.agent.is_alive());
        let before = session.agent.vitals.energy;

        let ruler = session.spawn_item(ItemPreset::Ruler);
        let above = session.agent.position(&session.physics) - vec2(0.0, 36.0);
        session.physics.set_position(ruler, above);
        session.run_ticks(600);

        assert_eq!(session.counters.deaths, 0);
        let lost = before - session.agent.vitals.energy;
        assert!(lost > 0.0 && lost < 6.0, "expected a single light hit, lost {lost}");
        assert_eq!(session.agent.vitals.last_decision, "Hit by weapon");
    }

    #[test]
    fn long_run_with_gravity_keeps_invariants() {
        let mut session = Session::new(SessionConfig::default());
        for i in 0..3000u64 {
            if i % 45 == 0 {
                let preset = ItemPreset::ALL[(i / 45) as usize % ItemPreset::ALL.len()];
                session.spawn_item(preset);
            }
            session.tick();

            let vitals = &session.agent.vitals;
            assert!((0.0..=config::MAX_ENERGY).contains(&vitals.energy));
            assert!((0.0..=config::MAX_STRESS).contains(&vitals.conscience.stress));
            assert!((0.0..=config::MAX_GUILT).contains(&vitals.conscience.guilt));
            assert_eq!(session.agent.is_alive(), session.agent.body.is_some());
        }
        assert_no_dangling(&session);
        assert!(session.counters.respawns <= session.counters.deaths);
        assert!(session.counters.deaths <= session.counters.respawns + 1);
    }
}

use ::rand::Rng;
use macroquad::prelude::*;
use tracing::{debug, info};

use crate::agent::Agent;
use crate::body::{BodyDesc, BodyId};
use crate::config;
use crate::physics::PhysicsWorld;
use crate::registry::{EntityRegistry, EntityTag};
use crate::timers::{TimerKind, TimerQueue};
use crate::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathPhase {
    Alive,
    Dying,
    Fading,
}

impl DeathPhase {
    pub fn label(self) -> &'static str {
        match self {
            DeathPhase::Alive => "alive",
            DeathPhase::Dying => "dying",
            DeathPhase::Fading => "fading",
        }
    }
}

/// Result of feeding a timer into the sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceStep {
    FadeStarted,
    Faded,
    Respawned,
    /// Timer belonged to another sequence or arrived in the wrong phase.
    Ignored,
}

/// Death → particle burst → fade → cleanup → respawn.
///
/// Each death opens a new epoch; timers carry the epoch they were scheduled
/// for, so a timer can only ever advance the sequence that created it.
pub struct DeathSequencer {
    phase: DeathPhase,
    epoch: u64,
    fade_started: u64,
    particles: Vec<BodyId>,
}

impl Default for DeathSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl DeathSequencer {
    pub fn new() -> Self {
        Self {
            phase: DeathPhase::Alive,
            epoch: 0,
            fade_started: 0,
            particles: Vec::new(),
        }
    }

    pub fn phase(&self) -> DeathPhase {
        self.phase
    }

    /// Enter the death sequence. Returns false (and does nothing) if one is already running.
    pub fn begin_death(
        &mut self,
        now: u64,
        agent: &mut Agent,
        physics: &mut impl PhysicsWorld,
        registry: &mut EntityRegistry,
        timers: &mut TimerQueue,
        rng: &mut impl Rng,
    ) -> bool {
        if self.phase != DeathPhase::Alive || !agent.is_alive() {
            debug!(epoch = self.epoch, phase = ?self.phase, "death already in progress");
            return false;
        }

        self.epoch += 1;
        agent.vitals.mark_dead();
        let origin = agent.remove_body(physics, registry);

        let scale = config::TICKS_PER_SECOND as f32;
        self.particles = (0..config::DEATH_PARTICLE_COUNT)
            .map(|_| {
                let id = physics.add_body(particle_desc(), origin);
                physics.set_velocity(id, burst_velocity(rng) * scale);
                registry.insert(id, EntityTag::Particle { opacity: 1.0 });
                id
            })
            .collect();

        timers.schedule(
            now + config::FADE_DELAY_TICKS,
            TimerKind::BeginFade { epoch: self.epoch },
        );
        timers.schedule(
            now + config::RESPAWN_DELAY_TICKS,
            TimerKind::Respawn { epoch: self.epoch },
        );
        self.phase = DeathPhase::Dying;

        info!(
            epoch = self.epoch,
            x = origin.x,
            y = origin.y,
            "agent died"
        );
        true
    }

    pub fn handle_timer(
        &mut self,
        kind: TimerKind,
        now: u64,
        agent: &mut Agent,
        physics: &mut impl PhysicsWorld,
        registry: &mut EntityRegistry,
        world: &World,
        timers: &mut TimerQueue,
    ) -> SequenceStep {
        match kind {
            TimerKind::BeginFade { epoch }
                if epoch == self.epoch && self.phase == DeathPhase::Dying =>
            {
                self.phase = DeathPhase::Fading;
                self.fade_started = now;
                self.schedule_fade_tick(now, timers);
                debug!(epoch, "particles fading");
                SequenceStep::FadeStarted
            }
            TimerKind::FadeTick { epoch }
                if epoch == self.epoch && self.phase == DeathPhase::Fading =>
            {
                for id in &self.particles {
                    if let Some(EntityTag::Particle { opacity }) = registry.get_mut(*id) {
                        *opacity = (*opacity - config::FADE_STEP).max(0.0);
                    }
                }
                self.schedule_fade_tick(now, timers);
                SequenceStep::Faded
            }
            TimerKind::Respawn { epoch }
                if epoch == self.epoch && self.phase != DeathPhase::Alive =>
            {
                for id in self.particles.drain(..) {
                    physics.remove_body(id);
                    registry.remove(id);
                }
                *agent = Agent::spawn(physics, registry, world);
                self.phase = DeathPhase::Alive;
                info!(epoch, "agent respawned");
                SequenceStep::Respawned
            }
            _ => SequenceStep::Ignored,
        }
    }

    /// Fade ticks only fire strictly inside the fade window.
    fn schedule_fade_tick(&self, now: u64, timers: &mut TimerQueue) {
        let next = now + config::FADE_INTERVAL_TICKS;
        if next < self.fade_started + config::FADE_WINDOW_TICKS {
            timers.schedule(next, TimerKind::FadeTick { epoch: self.epoch });
        }
    }
}

#[cfg(test)]
impl DeathSequencer {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn particles(&self) -> &[BodyId] {
        &self.particles
    }
}

fn particle_desc() -> BodyDesc {
    BodyDesc::circle(config::PARTICLE_RADIUS)
}

/// Outward/upward burst in per-tick units: x in [-5, 5), y in [-6, 0].
pub fn burst_velocity(rng: &mut impl Rng) -> Vec2 {
    vec2(
        rng.gen_range(-config::PARTICLE_SPREAD_X..config::PARTICLE_SPREAD_X),
        -rng.gen_range(0.0..=config::PARTICLE_LIFT_Y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::SimplePhysics;
    use crate::vitals::Status;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Rig {
        physics: SimplePhysics,
        registry: EntityRegistry,
        world: World,
        timers: TimerQueue,
        rng: ChaCha8Rng,
        agent: Agent,
        seq: DeathSequencer,
    }

    impl Rig {
        fn new() -> Self {
            let mut physics = SimplePhysics::new(Vec2::ZERO);
            let mut registry = EntityRegistry::new();
            let world = World::new(800.0, 600.0);
            let agent = Agent::spawn(&mut physics, &mut registry, &world);
            Self {
                physics,
                registry,
                world,
                timers: TimerQueue::new(),
                rng: ChaCha8Rng::seed_from_u64(9),
                agent,
                seq: DeathSequencer::new(),
            }
        }

        fn kill(&mut self, now: u64) -> bool {
            self.seq.begin_death(
                now,
                &mut self.agent,
                &mut self.physics,
                &mut self.registry,
                &mut self.timers,
                &mut self.rng,
            )
        }

        fn run_until(&mut self, now: u64) -> Vec<SequenceStep> {
            let mut steps = Vec::new();
            while let Some(event) = self.timers.pop_due(now) {
                steps.push(self.seq.handle_timer(
                    event.kind,
                    event.tick,
                    &mut self.agent,
                    &mut self.physics,
                    &mut self.registry,
                    &self.world,
                    &mut self.timers,
                ));
            }
            steps
        }
    }

    #[test]
    fn death_spawns_one_burst_at_last_position() {
        let mut rig = Rig::new();
        let body = rig.agent.body.unwrap();
        rig.physics.set_position(body, vec2(200.0, 250.0));

        assert!(rig.kill(10));
        assert_eq!(rig.seq.phase(), DeathPhase::Dying);
        assert_eq!(rig.seq.phase().label(), "dying");
        assert_eq!(rig.agent.vitals.status, Status::Dead);
        assert!(!rig.physics.contains(body));
        assert_eq!(rig.registry.particle_count(), config::DEATH_PARTICLE_COUNT);
        for id in rig.seq.particles() {
            assert_eq!(rig.physics.position(*id), Some(vec2(200.0, 250.0)));
        }
    }

    #[test]
    fn re_entrant_death_is_ignored() {
        let mut rig = Rig::new();
        assert!(rig.kill(0));
        assert!(!rig.kill(1));
        rig.run_until(config::FADE_DELAY_TICKS + 20);
        assert_eq!(rig.seq.phase(), DeathPhase::Fading);
        assert!(!rig.kill(config::FADE_DELAY_TICKS + 20));

        assert_eq!(rig.registry.particle_count(), config::DEATH_PARTICLE_COUNT);
        assert_eq!(
            rig.timers
                .count_matching(|k| matches!(k, TimerKind::Respawn { .. })),
            1
        );

        let steps = rig.run_until(10_000);
        let respawns = steps
            .iter()
            .filter(|s| **s == SequenceStep::Respawned)
            .count();
        assert_eq!(respawns, 1);
    }

    #[test]
    fn particles_fade_but_never_vanish_before_respawn() {
        let mut rig = Rig::new();
        rig.kill(0);
        rig.run_until(config::RESPAWN_DELAY_TICKS - 1);

        assert_eq!(rig.seq.phase(), DeathPhase::Fading);
        for (_, opacity) in rig.registry.particles() {
            assert!((opacity - 0.42).abs() < 1e-4, "29 fade steps, got {opacity}");
        }
    }

    #[test]
    fn full_sequence_restores_a_fresh_agent() {
        let mut rig = Rig::new();
        rig.agent.vitals.conscience.stress = 8.0;
        rig.agent.vitals.conscience.guilt = 4.0;
        rig.agent.vitals.energy = 0.0;
        rig.kill(100);

        assert!(rig.run_until(100 + config::RESPAWN_DELAY_TICKS - 1)
            .iter()
            .all(|s| *s != SequenceStep::Respawned));
        rig.run_until(100 + config::RESPAWN_DELAY_TICKS);

        assert_eq!(rig.seq.phase(), DeathPhase::Alive);
        assert_eq!(rig.agent.vitals.status, Status::Active);
        assert_eq!(rig.agent.vitals.energy, config::MAX_ENERGY);
        assert_eq!(rig.agent.vitals.conscience.stress, 0.0);
        assert_eq!(rig.agent.vitals.conscience.guilt, 0.0);
        assert_eq!(rig.registry.particle_count(), 0);
        assert!(rig.seq.particles().is_empty());

        let agents = rig
            .registry
            .iter()
            .filter(|(_, tag)| **tag == EntityTag::Agent)
            .count();
        assert_eq!(agents, 1);
        let body = rig.agent.body.unwrap();
        assert_eq!(rig.physics.position(body), Some(rig.world.agent_spawn()));
        // Only the agent is left in the physics world.
        assert_eq!(rig.physics.body_count(), 1);
    }

    #[test]
    fn stale_epoch_timers_are_ignored() {
        let mut rig = Rig::new();
        rig.kill(0);
        rig.run_until(config::RESPAWN_DELAY_TICKS);
        assert_eq!(rig.seq.epoch(), 1);

        // A leftover timer from the finished sequence must not touch the new agent.
        let step = rig.seq.handle_timer(
            TimerKind::Respawn { epoch: 1 },
            1000,
            &mut rig.agent,
            &mut rig.physics,
            &mut rig.registry,
            &rig.world,
            &mut rig.timers,
        );
        assert_eq!(step, SequenceStep::Ignored);
        assert!(rig.agent.is_alive());
    }

    #[test]
    fn burst_velocities_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = burst_velocity(&mut rng);
            assert!((-5.0..5.0).contains(&v.x));
            assert!((-6.0..=0.0).contains(&v.y));
        }
    }
}

use macroquad::prelude::*;
use tracing::info;

use crate::body::{BodyDesc, BodyId};
use crate::config;
use crate::physics::PhysicsWorld;
use crate::registry::{EntityRegistry, EntityTag};
use crate::vitals::Vitals;
use crate::world::World;

/// The player-controlled body and its vitals.
///
/// `body` is `None` between death and respawn; the vitals stay readable
/// (with `Status::Dead`) for the whole interval.
#[derive(Clone, Debug)]
pub struct Agent {
    pub body: Option<BodyId>,
    pub vitals: Vitals,
    pub last_position: Vec2,
}

impl Agent {
    pub fn body_desc() -> BodyDesc {
        BodyDesc::circle(config::AGENT_RADIUS)
            .restitution(config::AGENT_RESTITUTION)
            .density(config::AGENT_DENSITY)
            .linear_drag(config::AGENT_DRAG)
    }

    /// A fresh agent at the canonical spawn point with full energy and a clear conscience.
    pub fn spawn(
        physics: &mut impl PhysicsWorld,
        registry: &mut EntityRegistry,
        world: &World,
    ) -> Self {
        let pos = world.agent_spawn();
        let id = physics.add_body(Self::body_desc(), pos);
        registry.insert(id, EntityTag::Agent);
        info!(?id, "agent spawned");
        Self {
            body: Some(id),
            vitals: Vitals::default(),
            last_position: pos,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.vitals.is_alive()
    }

    /// Latest known position; falls back to the last tracked one once the body is gone.
    pub fn position(&self, physics: &impl PhysicsWorld) -> Vec2 {
        self.body
            .and_then(|id| physics.position(id))
            .unwrap_or(self.last_position)
    }

    pub fn track_position(&mut self, physics: &impl PhysicsWorld) {
        self.last_position = self.position(physics);
    }

    /// Take the body out of the world, keeping its last position. Returns the position.
    pub fn remove_body(
        &mut self,
        physics: &mut impl PhysicsWorld,
        registry: &mut EntityRegistry,
    ) -> Vec2 {
        self.track_position(physics);
        if let Some(id) = self.body.take() {
            physics.remove_body(id);
            registry.remove(id);
        }
        self.last_position
    }
}

use macroquad::prelude::*;

use crate::body::BodyId;
use crate::config;
use crate::physics::{PhysicsWorld, SimplePhysics};

/// Spring-like mouse grab: the held body is steered toward the cursor.
#[derive(Default)]
pub struct DragController {
    pub held: Option<BodyId>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// `pressed` is the press edge, `down` the held state of the grab button.
    pub fn update(&mut self, physics: &mut SimplePhysics, cursor: Vec2, pressed: bool, down: bool) {
        if pressed {
            self.held = physics.pick_dynamic(cursor, config::PICK_SLACK);
        }
        if !down {
            self.held = None;
            return;
        }
        let Some(id) = self.held else {
            return;
        };
        match physics.position(id) {
            Some(pos) => physics.set_velocity(id, drag_velocity(pos, cursor)),
            // The body left the world (consumed, or the agent died) mid-drag.
            None => self.held = None,
        }
    }
}

/// Velocity that closes `DRAG_STIFFNESS` of the gap each tick.
pub fn drag_velocity(body_pos: Vec2, cursor: Vec2) -> Vec2 {
    (cursor - body_pos) * config::DRAG_STIFFNESS * config::TICKS_PER_SECOND as f32
}

use macroquad::prelude::*;

use crate::body::{BodyDesc, BodyId};
use crate::config;
use crate::physics::PhysicsWorld;

/// Play-field bounds and the fixed points things appear at.
#[derive(Clone, Debug)]
pub struct World {
    pub width: f32,
    pub height: f32,
    pub walls: Vec<BodyId>,
}

impl World {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            walls: Vec::new(),
        }
    }

    pub fn agent_spawn(&self) -> Vec2 {
        vec2(self.width * 0.5, config::AGENT_SPAWN_Y)
    }

    pub fn item_spawn(&self) -> Vec2 {
        vec2(self.width * 0.5, config::ITEM_SPAWN_Y)
    }

    /// Four static slabs just outside each edge.
    pub fn build_walls(&mut self, physics: &mut impl PhysicsWorld) {
        let t = config::WALL_THICKNESS;
        let off = config::WALL_OFFSET;
        let (w, h) = (self.width, self.height);
        let slabs = [
            (vec2(w * 0.5, h + off), w, t),
            (vec2(w * 0.5, -off), w, t),
            (vec2(-off, h * 0.5), t, h),
            (vec2(w + off, h * 0.5), t, h),
        ];
        for (pos, sw, sh) in slabs {
            self.walls.push(physics.add_body(BodyDesc::rect(sw, sh).fixed(), pos));
        }
    }

    pub fn is_wall(&self, id: BodyId) -> bool {
        self.walls.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::SimplePhysics;

    #[test]
    fn walls_enclose_the_field() {
        let mut physics = SimplePhysics::new(Vec2::ZERO);
        let mut world = World::new(400.0, 300.0);
        world.build_walls(&mut physics);
        assert_eq!(world.walls.len(), 4);

        let floor = physics.body(world.walls[0]).unwrap();
        let top_edge = floor.pos.y - floor.shape.half_extents().y;
        assert!((top_edge - 290.0).abs() < 1e-4, "floor overlaps the bottom 10px");
        assert!(world.walls.iter().all(|id| world.is_wall(*id)));
    }

    #[test]
    fn spawn_points_are_horizontally_centred() {
        let world = World::new(1000.0, 600.0);
        assert_eq!(world.agent_spawn(), vec2(500.0, 120.0));
        assert_eq!(world.item_spawn(), vec2(500.0, 80.0));
    }
}

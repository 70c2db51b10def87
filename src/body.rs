use macroquad::prelude::*;

use crate::config;

/// Stable handle to a rigid body. The generation field invalidates stale references.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct BodyId {
    pub index: u32,
    pub generation: u32,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned box, centred on the body position.
    Rect { width: f32, height: f32 },
}

impl Shape {
    pub fn area(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
            Shape::Rect { width, height } => width * height,
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => vec2(radius, radius),
            Shape::Rect { width, height } => vec2(width * 0.5, height * 0.5),
        }
    }
}

/// Construction parameters for a body.
#[derive(Clone, Copy, Debug)]
pub struct BodyDesc {
    pub shape: Shape,
    pub density: f32,
    pub restitution: f32,
    pub linear_drag: f32,
    pub is_static: bool,
}

impl BodyDesc {
    pub fn circle(radius: f32) -> Self {
        Self::with_shape(Shape::Circle { radius })
    }

    pub fn rect(width: f32, height: f32) -> Self {
        Self::with_shape(Shape::Rect { width, height })
    }

    fn with_shape(shape: Shape) -> Self {
        Self {
            shape,
            density: config::DEFAULT_DENSITY,
            restitution: config::DEFAULT_RESTITUTION,
            linear_drag: config::DEFAULT_DRAG,
            is_static: false,
        }
    }

    pub fn density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn linear_drag(mut self, linear_drag: f32) -> Self {
        self.linear_drag = linear_drag;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct Body {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub velocity: Vec2,
    pub shape: Shape,
    pub inv_mass: f32,
    pub restitution: f32,
    pub linear_drag: f32,
    pub is_static: bool,
}

impl Body {
    pub fn new(desc: BodyDesc, pos: Vec2) -> Self {
        let mass = desc.density * desc.shape.area();
        let inv_mass = if desc.is_static || mass <= 0.0 {
            0.0
        } else {
            1.0 / mass
        };
        Self {
            pos,
            prev_pos: pos,
            velocity: Vec2::ZERO,
            shape: desc.shape,
            inv_mass,
            restitution: desc.restitution,
            linear_drag: desc.linear_drag,
            is_static: desc.is_static,
        }
    }

    pub fn contains_point(&self, point: Vec2, slack: f32) -> bool {
        match self.shape {
            Shape::Circle { radius } => (point - self.pos).length() <= radius + slack,
            Shape::Rect { .. } => {
                let half = self.shape.half_extents() + Vec2::splat(slack);
                let d = (point - self.pos).abs();
                d.x <= half.x && d.y <= half.y
            }
        }
    }
}

/// Arena-based body storage with generational indices and free list.
pub struct BodyArena {
    pub bodies: Vec<Option<Body>>,
    pub generations: Vec<u32>,
    pub free_list: Vec<u32>,
    pub count: usize,
}

impl BodyArena {
    pub fn new(capacity: usize) -> Self {
        Self {
            bodies: vec![None; capacity],
            generations: vec![0; capacity],
            free_list: (0..capacity as u32).rev().collect(),
            count: 0,
        }
    }

    pub fn insert(&mut self, body: Body) -> BodyId {
        self.count += 1;
        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            self.bodies[idx] = Some(body);
            BodyId {
                index,
                generation: self.generations[idx],
            }
        } else {
            // Grow the arena
            let index = self.bodies.len() as u32;
            self.bodies.push(Some(body));
            self.generations.push(0);
            BodyId {
                index,
                generation: 0,
            }
        }
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let idx = id.index as usize;
        if idx < self.bodies.len() && self.generations[idx] == id.generation {
            let body = self.bodies[idx].take()?;
            self.generations[idx] += 1;
            self.free_list.push(id.index);
            self.count -= 1;
            Some(body)
        } else {
            None
        }
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        let idx = id.index as usize;
        if idx < self.bodies.len() && self.generations[idx] == id.generation {
            self.bodies[idx].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        let idx = id.index as usize;
        if idx < self.bodies.len() && self.generations[idx] == id.generation {
            self.bodies[idx].as_mut()
        } else {
            None
        }
    }

    /// Iterate over (id, &Body) for all live bodies.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref().map(|b| {
                (
                    BodyId {
                        index: i as u32,
                        generation: self.generations[i],
                    },
                    b,
                )
            })
        })
    }

    pub fn len(&self) -> usize {
        self.count
    }
}

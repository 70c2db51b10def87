use macroquad::prelude::*;
use std::collections::HashSet;

use crate::body::{Body, BodyArena, BodyDesc, BodyId, Shape};

const POSITION_SLOP: f32 = 0.05;
const POSITION_CORRECTION: f32 = 0.8;
/// Closing speed (px/s) below which contacts do not bounce.
const RESTING_SPEED: f32 = 120.0;
/// Gap (px) a touching pair may open up and still count as touching.
const CONTACT_HOLD: f32 = 1.0;

/// A pair of bodies that started touching during the last step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactPair {
    pub a: BodyId,
    pub b: BodyId,
    pub depth: f32,
}

impl ContactPair {
    pub fn new(a: BodyId, b: BodyId, depth: f32) -> Self {
        Self { a, b, depth }
    }

    /// The body on the other side of the pair, if `id` is one of its sides.
    pub fn other(&self, id: BodyId) -> Option<BodyId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// The narrow surface the simulation core needs from a rigid-body engine.
///
/// Removing or mutating a body that is no longer in the world is a no-op.
pub trait PhysicsWorld {
    fn add_body(&mut self, desc: BodyDesc, pos: Vec2) -> BodyId;
    fn remove_body(&mut self, id: BodyId) -> bool;
    fn position(&self, id: BodyId) -> Option<Vec2>;
    fn set_velocity(&mut self, id: BodyId, velocity: Vec2);
    /// Advance by `dt` seconds and report the pairs whose contact began this step.
    fn step(&mut self, dt: f32) -> Vec<ContactPair>;
}

/// Contact normal points from the first body towards the second.
#[derive(Clone, Copy, Debug)]
struct Manifold {
    normal: Vec2,
    depth: f32,
}

/// Small impulse-based engine: gravity, per-step drag, circles and axis-aligned boxes.
pub struct SimplePhysics {
    pub bodies: BodyArena,
    pub gravity: Vec2,
    touching: HashSet<(BodyId, BodyId)>,
}

impl SimplePhysics {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            bodies: BodyArena::new(64),
            gravity,
            touching: HashSet::new(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Nearest dynamic body whose shape covers `point`.
    pub fn pick_dynamic(&self, point: Vec2, slack: f32) -> Option<BodyId> {
        let mut best: Option<(f32, BodyId)> = None;
        for (id, body) in self.bodies.iter() {
            if body.is_static || !body.contains_point(point, slack) {
                continue;
            }
            let dist_sq = (body.pos - point).length_squared();
            match best {
                Some((best_sq, _)) if dist_sq >= best_sq => {}
                _ => best = Some((dist_sq, id)),
            }
        }
        best.map(|(_, id)| id)
    }

    fn integrate(&mut self, dt: f32) {
        for slot in self.bodies.bodies.iter_mut() {
            if let Some(body) = slot {
                body.prev_pos = body.pos;
                if body.is_static {
                    continue;
                }
                body.velocity += self.gravity * dt;
                body.velocity *= (1.0 - body.linear_drag).max(0.0);
                body.pos += body.velocity * dt;
            }
        }
    }

    fn detect_all(&self) -> Vec<(BodyId, BodyId, Manifold)> {
        let live: Vec<(BodyId, &Body)> = self.bodies.iter().collect();
        let mut contacts = Vec::new();
        for (i, (id_a, a)) in live.iter().enumerate() {
            for (id_b, b) in live.iter().skip(i + 1) {
                if a.is_static && b.is_static {
                    continue;
                }
                if let Some(m) = detect(a, b) {
                    contacts.push((*id_a, *id_b, m));
                }
            }
        }
        contacts
    }

    fn within_hold(&self, (id_a, id_b): (BodyId, BodyId)) -> bool {
        match (self.bodies.get(id_a), self.bodies.get(id_b)) {
            (Some(a), Some(b)) => detect_within(a, b, CONTACT_HOLD).is_some(),
            _ => false,
        }
    }

    fn resolve(&mut self, id_a: BodyId, id_b: BodyId, m: Manifold) {
        let (Some(a), Some(b)) = (self.bodies.get(id_a).cloned(), self.bodies.get(id_b).cloned())
        else {
            return;
        };
        let inv_sum = a.inv_mass + b.inv_mass;
        if inv_sum <= 0.0 {
            return;
        }

        let correction =
            m.normal * ((m.depth - POSITION_SLOP).max(0.0) * POSITION_CORRECTION / inv_sum);
        let mut vel_a = a.velocity;
        let mut vel_b = b.velocity;

        let closing = (vel_b - vel_a).dot(m.normal);
        if closing < 0.0 {
            let restitution = if -closing < RESTING_SPEED {
                0.0
            } else {
                a.restitution.max(b.restitution)
            };
            let j = -(1.0 + restitution) * closing / inv_sum;
            vel_a -= m.normal * (j * a.inv_mass);
            vel_b += m.normal * (j * b.inv_mass);
        }

        if let Some(body) = self.bodies.get_mut(id_a) {
            body.pos -= correction * a.inv_mass;
            body.velocity = vel_a;
        }
        if let Some(body) = self.bodies.get_mut(id_b) {
            body.pos += correction * b.inv_mass;
            body.velocity = vel_b;
        }
    }
}

impl PhysicsWorld for SimplePhysics {
    fn add_body(&mut self, desc: BodyDesc, pos: Vec2) -> BodyId {
        self.bodies.insert(Body::new(desc, pos))
    }

    fn remove_body(&mut self, id: BodyId) -> bool {
        let removed = self.bodies.remove(id).is_some();
        if removed {
            self.touching.retain(|(a, b)| *a != id && *b != id);
        }
        removed
    }

    fn position(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(id).map(|b| b.pos)
    }

    fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(id) {
            if !body.is_static {
                body.velocity = velocity;
            }
        }
    }

    fn step(&mut self, dt: f32) -> Vec<ContactPair> {
        self.integrate(dt);

        let contacts = self.detect_all();
        let mut now_touching = HashSet::with_capacity(contacts.len());
        let mut started = Vec::new();
        for (id_a, id_b, m) in contacts {
            if !self.touching.contains(&(id_a, id_b)) {
                started.push(ContactPair::new(id_a, id_b, m.depth));
            }
            now_touching.insert((id_a, id_b));
            self.resolve(id_a, id_b, m);
        }

        let held: Vec<(BodyId, BodyId)> = self
            .touching
            .iter()
            .filter(|pair| !now_touching.contains(*pair) && self.within_hold(**pair))
            .copied()
            .collect();
        now_touching.extend(held);

        self.touching = now_touching;
        started
    }
}

#[cfg(test)]
impl SimplePhysics {
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.get(id).is_some()
    }

    pub fn set_position(&mut self, id: BodyId, pos: Vec2) {
        if let Some(body) = self.bodies.get_mut(id) {
            body.pos = pos;
            body.prev_pos = pos;
        }
    }

    pub fn velocity(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(id).map(|b| b.velocity)
    }
}

fn detect(a: &Body, b: &Body) -> Option<Manifold> {
    detect_within(a, b, 0.0)
}

/// Overlap test with both shapes grown by `margin`.
fn detect_within(a: &Body, b: &Body, margin: f32) -> Option<Manifold> {
    let grow = Vec2::splat(margin);
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(a.pos, ra + margin, b.pos, rb + margin)
        }
        (Shape::Circle { radius }, Shape::Rect { .. }) => {
            circle_rect(a.pos, radius + margin, b.pos, b.shape.half_extents() + grow)
        }
        (Shape::Rect { .. }, Shape::Circle { radius }) => {
            circle_rect(b.pos, radius + margin, a.pos, a.shape.half_extents() + grow).map(|m| {
                Manifold {
                    normal: -m.normal,
                    depth: m.depth,
                }
            })
        }
        (Shape::Rect { .. }, Shape::Rect { .. }) => rect_rect(
            a.pos,
            a.shape.half_extents() + grow,
            b.pos,
            b.shape.half_extents() + grow,
        ),
    }
}

fn circle_circle(pa: Vec2, ra: f32, pb: Vec2, rb: f32) -> Option<Manifold> {
    let delta = pb - pa;
    let dist = delta.length();
    let depth = ra + rb - dist;
    if depth <= 0.0 {
        return None;
    }
    let normal = if dist > 1e-6 { delta / dist } else { Vec2::Y };
    Some(Manifold { normal, depth })
}

fn circle_rect(center: Vec2, radius: f32, box_pos: Vec2, half: Vec2) -> Option<Manifold> {
    let min = box_pos - half;
    let max = box_pos + half;
    let closest = center.clamp(min, max);
    let diff = closest - center;
    let dist_sq = diff.length_squared();

    if dist_sq > 1e-12 {
        if dist_sq >= radius * radius {
            return None;
        }
        let dist = dist_sq.sqrt();
        return Some(Manifold {
            normal: diff / dist,
            depth: radius - dist,
        });
    }

    // Centre inside the box: leave through the nearest face.
    let to_faces = [
        (center.x - min.x, Vec2::X),
        (max.x - center.x, -Vec2::X),
        (center.y - min.y, Vec2::Y),
        (max.y - center.y, -Vec2::Y),
    ];
    let (face_dist, normal) = to_faces
        .into_iter()
        .min_by(|l, r| l.0.total_cmp(&r.0))
        .unwrap_or((0.0, Vec2::Y));
    Some(Manifold {
        normal,
        depth: radius + face_dist,
    })
}

fn rect_rect(pa: Vec2, ha: Vec2, pb: Vec2, hb: Vec2) -> Option<Manifold> {
    let delta = pb - pa;
    let overlap = ha + hb - delta.abs();
    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return None;
    }
    if overlap.x < overlap.y {
        let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
        Some(Manifold {
            normal: vec2(sign, 0.0),
            depth: overlap.x,
        })
    } else {
        let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
        Some(Manifold {
            normal: vec2(0.0, sign),
            depth: overlap.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor(physics: &mut SimplePhysics) -> BodyId {
        physics.add_body(BodyDesc::rect(1000.0, 80.0).fixed(), vec2(500.0, 540.0))
    }

    #[test]
    fn contact_is_reported_only_when_it_starts() {
        let mut physics = SimplePhysics::new(Vec2::ZERO);
        let a = physics.add_body(BodyDesc::circle(10.0), vec2(0.0, 0.0));
        let b = physics.add_body(BodyDesc::circle(10.0), vec2(15.0, 0.0));

        let first = physics.step(1.0 / 60.0);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].other(a), Some(b));
        assert!(first[0].depth > 0.0);

        // Hold them overlapping: no new start event.
        physics.set_position(a, vec2(0.0, 0.0));
        physics.set_position(b, vec2(15.0, 0.0));
        physics.set_velocity(a, Vec2::ZERO);
        physics.set_velocity(b, Vec2::ZERO);
        assert!(physics.step(1.0 / 60.0).is_empty());
    }

    #[test]
    fn falling_ball_hits_floor_and_bounces() {
        let mut physics = SimplePhysics::new(vec2(0.0, 1000.0));
        let floor = floor(&mut physics);
        let ball = physics.add_body(BodyDesc::circle(30.0).restitution(0.8), vec2(500.0, 300.0));

        let mut hit = None;
        for _ in 0..120 {
            let contacts = physics.step(1.0 / 60.0);
            if let Some(pair) = contacts.iter().find(|p| p.other(ball) == Some(floor)) {
                hit = Some(*pair);
                break;
            }
        }
        let pair = hit.expect("ball should reach the floor");
        assert!(pair.depth > 0.0);
        assert!(physics.velocity(ball).unwrap().y < 0.0, "ball should rebound upward");
    }

    #[test]
    fn static_bodies_do_not_move() {
        let mut physics = SimplePhysics::new(vec2(0.0, 1000.0));
        let floor = floor(&mut physics);
        let before = physics.position(floor).unwrap();
        for _ in 0..30 {
            physics.step(1.0 / 60.0);
        }
        assert_eq!(physics.position(floor).unwrap(), before);
    }

    #[test]
    fn removing_absent_body_is_a_no_op() {
        let mut physics = SimplePhysics::new(Vec2::ZERO);
        let id = physics.add_body(BodyDesc::circle(5.0), Vec2::ZERO);
        assert!(physics.remove_body(id));
        assert!(!physics.remove_body(id));
        assert!(!physics.contains(id));
        physics.set_velocity(id, vec2(1.0, 1.0));
        assert_eq!(physics.velocity(id), None);
    }

    #[test]
    fn circle_inside_box_is_pushed_out_of_nearest_face() {
        let m = circle_rect(vec2(0.0, -8.0), 5.0, Vec2::ZERO, vec2(20.0, 10.0)).unwrap();
        // Nearest face is the top one; normal points from circle into the box.
        assert_eq!(m.normal, Vec2::Y);
        assert!((m.depth - 7.0).abs() < 1e-5);
    }

    #[test]
    fn box_overlap_uses_shallow_axis() {
        let m = rect_rect(Vec2::ZERO, vec2(10.0, 10.0), vec2(18.0, 2.0), vec2(10.0, 10.0)).unwrap();
        assert_eq!(m.normal, vec2(1.0, 0.0));
        assert!((m.depth - 2.0).abs() < 1e-5);
        assert!(rect_rect(Vec2::ZERO, vec2(1.0, 1.0), vec2(5.0, 0.0), vec2(1.0, 1.0)).is_none());
    }

    #[test]
    fn slow_contacts_do_not_bounce() {
        let mut physics = SimplePhysics::new(Vec2::ZERO);
        let a = physics.add_body(BodyDesc::circle(10.0).restitution(1.0), vec2(0.0, 0.0));
        let b = physics.add_body(BodyDesc::circle(10.0).restitution(1.0), vec2(20.5, 0.0));
        physics.set_velocity(b, vec2(-60.0, 0.0));

        assert_eq!(physics.step(1.0 / 60.0).len(), 1);
        let (va, vb) = (physics.velocity(a).unwrap(), physics.velocity(b).unwrap());
        assert!((va.x - vb.x).abs() < 1e-3, "resting contact should not rebound");
    }

    #[test]
    fn small_gap_keeps_pair_touching() {
        let mut physics = SimplePhysics::new(Vec2::ZERO);
        let a = physics.add_body(BodyDesc::circle(10.0), vec2(0.0, 0.0));
        let b = physics.add_body(BodyDesc::circle(10.0), vec2(15.0, 0.0));
        assert_eq!(physics.step(1.0 / 60.0).len(), 1);

        let place = |physics: &mut SimplePhysics, gap: f32| {
            physics.set_position(a, vec2(0.0, 0.0));
            physics.set_position(b, vec2(20.0 + gap, 0.0));
            physics.set_velocity(a, Vec2::ZERO);
            physics.set_velocity(b, Vec2::ZERO);
        };

        place(&mut physics, 0.5);
        assert!(physics.step(1.0 / 60.0).is_empty());
        place(&mut physics, -2.0);
        assert!(physics.step(1.0 / 60.0).is_empty(), "re-closing a tiny gap is not a new contact");

        place(&mut physics, 10.0);
        assert!(physics.step(1.0 / 60.0).is_empty());
        place(&mut physics, -2.0);
        assert_eq!(physics.step(1.0 / 60.0).len(), 1);
    }

    #[test]
    fn weapon_resting_on_settled_agent_starts_contact_once() {
        let mut physics = SimplePhysics::new(vec2(0.0, 1000.0));
        floor(&mut physics);
        let agent = physics.add_body(crate::agent::Agent::body_desc(), vec2(500.0, 300.0));
        for _ in 0..600 {
            physics.step(1.0 / 60.0);
        }

        let settled = physics.position(agent).unwrap();
        let ruler = physics.add_body(crate::items::ItemPreset::Ruler.body(), settled - vec2(0.0, 36.0));

        let mut starts = 0;
        for _ in 0..600 {
            starts += physics
                .step(1.0 / 60.0)
                .iter()
                .filter(|p| p.other(agent) == Some(ruler))
                .count();
        }
        assert_eq!(starts, 1);
        assert!(physics.position(ruler).unwrap().y < physics.position(agent).unwrap().y);
    }

    #[test]
    fn pick_prefers_nearest_dynamic_body() {
        let mut physics = SimplePhysics::new(Vec2::ZERO);
        let _wall = physics.add_body(BodyDesc::rect(100.0, 100.0).fixed(), Vec2::ZERO);
        let near = physics.add_body(BodyDesc::circle(10.0), vec2(2.0, 0.0));
        let _far = physics.add_body(BodyDesc::circle(20.0), vec2(15.0, 0.0));
        assert_eq!(physics.pick_dynamic(Vec2::ZERO, 0.0), Some(near));
        assert_eq!(physics.pick_dynamic(vec2(300.0, 0.0), 0.0), None);
    }
}

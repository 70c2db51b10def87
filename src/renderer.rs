use macroquad::prelude::*;

use crate::body::{Body, Shape};
use crate::presentation::StressBand;
use crate::registry::EntityTag;
use crate::simulation::Session;

const BG_COLOR: Color = Color::new(0.133, 0.133, 0.133, 1.0);
const WALL_COLOR: Color = Color::new(0.3, 0.32, 0.36, 1.0);
const PARTICLE_COLOR: Color = Color::new(1.0, 0.0, 0.0, 1.0);

/// Uniform scale + letterbox offset from world space to the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTransform {
    pub scale: f32,
    pub offset: Vec2,
}

impl ScreenTransform {
    pub fn fit(world_size: Vec2, screen_size: Vec2) -> Self {
        let scale = (screen_size.x / world_size.x)
            .min(screen_size.y / world_size.y)
            .max(f32::EPSILON);
        let offset = (screen_size - world_size * scale) * 0.5;
        Self { scale, offset }
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.offset
    }

    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.offset) / self.scale
    }
}

pub fn screen_transform(session: &Session) -> ScreenTransform {
    ScreenTransform::fit(
        vec2(session.world.width, session.world.height),
        vec2(screen_width(), screen_height()),
    )
}

/// Draw the world scene and HUD. `alpha` interpolates between the last two physics steps.
pub fn draw(session: &Session, alpha: f32) {
    clear_background(BG_COLOR);
    let xf = screen_transform(session);

    for (id, body) in session.physics.bodies.iter() {
        let pos = body.prev_pos.lerp(body.pos, alpha);
        match session.registry.get(id) {
            Some(EntityTag::Item(item_type)) => draw_body(&xf, body, pos, item_type.color()),
            Some(EntityTag::Particle { opacity }) => {
                let color = Color::new(
                    PARTICLE_COLOR.r,
                    PARTICLE_COLOR.g,
                    PARTICLE_COLOR.b,
                    opacity.clamp(0.0, 1.0),
                );
                draw_body(&xf, body, pos, color);
            }
            Some(EntityTag::Agent) => {
                // Freshly respawned agents start calm until the next refresh.
                let band = session.snapshot.band.unwrap_or(StressBand::Calm);
                draw_body(&xf, body, pos, band.color());
            }
            None if session.world.is_wall(id) => draw_body(&xf, body, body.pos, WALL_COLOR),
            None => {}
        }
    }

    draw_hud(session);
}

fn draw_body(xf: &ScreenTransform, body: &Body, pos: Vec2, color: Color) {
    let p = xf.to_screen(pos);
    match body.shape {
        Shape::Circle { radius } => draw_circle(p.x, p.y, radius * xf.scale, color),
        Shape::Rect { width, height } => {
            let (w, h) = (width * xf.scale, height * xf.scale);
            draw_rectangle(p.x - w * 0.5, p.y - h * 0.5, w, h, color);
        }
    }
}

fn draw_hud(session: &Session) {
    let tc = Color::new(0.7, 0.75, 0.8, 1.0);
    let sh = Color::new(0.0, 0.0, 0.0, 0.5);

    let lines = [
        format!("FPS: {}", get_fps()),
        format!("Tick: {}", session.tick_count),
        format!(
            "Items: {}  Bodies: {}",
            session.registry.item_count(),
            session.physics.body_count()
        ),
    ];
    for (i, text) in lines.iter().enumerate() {
        let y = screen_height() - 60.0 + i as f32 * 20.0;
        draw_text(text, 11.0, y + 1.0, 18.0, sh);
        draw_text(text, 10.0, y, 18.0, tc);
    }

    if session.paused {
        let pause_text = "PAUSED (Space to resume)";
        let tw = measure_text(pause_text, None, 24, 1.0).width;
        let x = screen_width() * 0.5 - tw * 0.5;
        draw_text(pause_text, x + 1.0, 61.0, 24.0, sh);
        draw_text(pause_text, x, 60.0, 24.0, Color::new(1.0, 0.8, 0.2, 0.9));
    }
}

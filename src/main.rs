use macroquad::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod agent;
mod body;
mod collision;
mod config;
mod error;
mod headless;
mod input;
mod items;
mod lifecycle;
mod physics;
mod presentation;
mod registry;
mod renderer;
mod report;
mod simulation;
mod stats;
mod timers;
mod ui;
mod vitals;
mod world;

use config::{CliArgs, SessionConfig};
use input::DragController;
use simulation::Session;
use ui::UiState;

fn window_conf() -> Conf {
    Conf {
        window_title: "Ball Physics".to_string(),
        window_width: config::DEFAULT_WORLD_WIDTH as i32,
        window_height: config::DEFAULT_WORLD_HEIGHT as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() {
    init_tracing();

    let cli = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: ball-physics [--config <path>] [--seed <n>] [--headless <ticks>]");
            std::process::exit(2);
        }
    };

    let mut session_config = match &cli.config_path {
        Some(path) => SessionConfig::load(path).unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default config");
            SessionConfig::default()
        }),
        None => SessionConfig::default(),
    };
    if let Some(seed) = cli.seed {
        session_config.seed = seed;
    }

    if let Some(ticks) = cli.headless_ticks {
        let report = headless::run(session_config, ticks);
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => error!(error = %e, "failed to serialize run report"),
        }
        return;
    }

    info!(seed = session_config.seed, "opening window");
    macroquad::Window::from_config(window_conf(), run_interactive(session_config));
}

async fn run_interactive(session_config: SessionConfig) {
    let mut session = Session::new(session_config);
    let mut drag = DragController::new();
    let mut ui_state = UiState::default();
    let mut accumulator = 0.0f64;

    loop {
        let frame_time = get_frame_time() as f64;
        accumulator += frame_time.min(0.1);

        let effective_dt = config::FIXED_DT as f64 / session.speed_multiplier as f64;
        if !session.paused {
            while accumulator >= effective_dt {
                session.tick();
                accumulator -= effective_dt;
            }
        } else {
            accumulator = 0.0;
            if ui_state.step_requested {
                session.tick();
            }
        }
        ui_state.step_requested = false;

        // Mouse grab (only if egui doesn't want the input)
        let mut egui_wants_pointer = false;
        egui_macroquad::cfg(|ctx| {
            egui_wants_pointer = ctx.wants_pointer_input();
        });
        let cursor = renderer::screen_transform(&session).to_world(Vec2::from(mouse_position()));
        drag.update(
            &mut session.physics,
            cursor,
            !egui_wants_pointer && is_mouse_button_pressed(MouseButton::Left),
            is_mouse_button_down(MouseButton::Left),
        );

        if is_key_pressed(KeyCode::Space) {
            session.paused = !session.paused;
        }

        let alpha = if !session.paused {
            (accumulator / effective_dt) as f32
        } else {
            1.0
        };

        renderer::draw(&session, alpha);
        ui::draw_ui(&mut session, &mut ui_state);

        next_frame().await;
    }
}

// All tunable simulation constants in one place.

use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

// Clock
pub const TICKS_PER_SECOND: u64 = 60;
pub const FIXED_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;

// World
pub const DEFAULT_WORLD_WIDTH: f32 = 1280.0;
pub const DEFAULT_WORLD_HEIGHT: f32 = 800.0;
pub const DEFAULT_GRAVITY: f32 = 1000.0;
pub const DEFAULT_SEED: u64 = 42;
pub const WALL_THICKNESS: f32 = 80.0;
pub const WALL_OFFSET: f32 = 30.0;
pub const AGENT_SPAWN_Y: f32 = 120.0;
pub const ITEM_SPAWN_Y: f32 = 80.0;

// Body defaults
pub const DEFAULT_DENSITY: f32 = 0.001;
pub const DEFAULT_RESTITUTION: f32 = 0.0;
pub const DEFAULT_DRAG: f32 = 0.01;

// Agent body
pub const AGENT_RADIUS: f32 = 30.0;
pub const AGENT_RESTITUTION: f32 = 0.8;
pub const AGENT_DENSITY: f32 = 0.001;
pub const AGENT_DRAG: f32 = 0.02;

// Vitals
pub const MAX_ENERGY: f32 = 100.0;
pub const MAX_STRESS: f32 = 10.0;
pub const MAX_GUILT: f32 = 10.0;
pub const IMPACT_SCALE: f32 = 6.0;
pub const COLLISION_ENERGY_COEFF: f32 = 0.25;
pub const COLLISION_STRESS_COEFF: f32 = 0.05;
pub const COLLISION_GUILT_COEFF: f32 = 0.02;
pub const WEAPON_ENERGY_COEFF: f32 = 0.6;
pub const WEAPON_STRESS_COEFF: f32 = 0.12;
pub const WEAPON_GUILT_COEFF: f32 = 0.04;
pub const ORB_ENERGY: f32 = 12.0;
pub const ORB_RELIEF: f32 = 2.2;
pub const MED_ENERGY: f32 = 25.0;
pub const MED_RELIEF: f32 = 3.5;
pub const STRESS_CAUTION: f32 = 3.0;
pub const STRESS_ALARM: f32 = 6.0;

// Items
pub const ORB_RADIUS: f32 = 12.0;
pub const ORB_RESTITUTION: f32 = 0.4;
pub const RECT_ITEM_RESTITUTION: f32 = 0.3;
pub const RECT_ITEM_DENSITY: f32 = 0.003;
pub const RECT_ITEM_DRAG: f32 = 0.02;

// Death sequence (ticks)
pub const DEATH_PARTICLE_COUNT: usize = 30;
pub const PARTICLE_RADIUS: f32 = 5.0;
pub const PARTICLE_SPREAD_X: f32 = 5.0;
pub const PARTICLE_LIFT_Y: f32 = 6.0;
pub const FADE_DELAY_TICKS: u64 = 5 * TICKS_PER_SECOND;
pub const RESPAWN_DELAY_TICKS: u64 = 8 * TICKS_PER_SECOND;
pub const FADE_INTERVAL_TICKS: u64 = TICKS_PER_SECOND / 10;
/// Fade ticks fire strictly inside this window after the fade starts, so a
/// death gets 29 decrements (opacity 1.0 -> 0.42), not 30.
pub const FADE_WINDOW_TICKS: u64 = 3 * TICKS_PER_SECOND;
pub const FADE_STEP: f32 = 0.02;

// Presentation
pub const PRESENTATION_INTERVAL_TICKS: u64 = TICKS_PER_SECOND / 10;
pub const HISTORY_CAPACITY: usize = 600;

// Input
pub const DRAG_STIFFNESS: f32 = 0.15;
pub const PICK_SLACK: f32 = 4.0;

// Headless
pub const HEADLESS_SPAWN_INTERVAL: u64 = 90;

/// Run-time settings that may be overridden from a JSON file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub seed: u64,
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            width: DEFAULT_WORLD_WIDTH,
            height: DEFAULT_WORLD_HEIGHT,
            gravity: DEFAULT_GRAVITY,
        }
    }
}

impl SessionConfig {
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // Walls sit outside the edges, so anything smaller than the agent is unusable.
        let min_extent = AGENT_RADIUS * 4.0;
        if !(self.width >= min_extent && self.height >= min_extent) {
            return Err(ConfigError::Invalid(format!(
                "world must be at least {min_extent}x{min_extent}, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::Invalid("gravity must be finite".to_string()));
        }
        Ok(())
    }
}

/// `ball-physics [--config <path>] [--seed <n>] [--headless <ticks>]`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CliArgs {
    pub config_path: Option<std::path::PathBuf>,
    pub seed: Option<u64>,
    pub headless_ticks: Option<u64>,
}

impl CliArgs {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ConfigError> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let mut value = || {
                args.next()
                    .ok_or_else(|| ConfigError::Usage(format!("{flag} needs a value")))
            };
            match flag.as_str() {
                "--config" => parsed.config_path = Some(value()?.into()),
                "--seed" => parsed.seed = Some(parse_number(&flag, &value()?)?),
                "--headless" => parsed.headless_ticks = Some(parse_number(&flag, &value()?)?),
                other => return Err(ConfigError::Usage(format!("unknown argument {other}"))),
            }
        }
        Ok(parsed)
    }
}

fn parse_number(flag: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Usage(format!("{flag} expects a number, got {value}")))
}

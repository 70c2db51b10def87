use macroquad::prelude::*;
use serde::Serialize;

use crate::agent::Agent;
use crate::config;
use crate::vitals::Status;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StressBand {
    Calm,
    Caution,
    Alarm,
}

impl StressBand {
    pub fn from_stress(stress: f32) -> Self {
        if stress < config::STRESS_CAUTION {
            StressBand::Calm
        } else if stress < config::STRESS_ALARM {
            StressBand::Caution
        } else {
            StressBand::Alarm
        }
    }

    pub fn color(self) -> Color {
        match self {
            StressBand::Calm => Color::new(0.0, 1.0, 1.0, 1.0),
            StressBand::Caution => YELLOW,
            StressBand::Alarm => RED,
        }
    }
}

/// Read-only view of the agent handed to the rendering and UI layers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub alive: bool,
    /// Colour category; only tracked while alive.
    pub band: Option<StressBand>,
    pub energy: f32,
    pub stress: f32,
    pub guilt: f32,
    pub status: Status,
    pub last_decision: String,
}

impl StatusSnapshot {
    pub fn capture(agent: &Agent) -> Self {
        let vitals = &agent.vitals;
        let alive = agent.is_alive();
        Self {
            alive,
            band: alive.then(|| StressBand::from_stress(vitals.conscience.stress)),
            energy: vitals.energy,
            stress: vitals.conscience.stress,
            guilt: vitals.conscience.guilt,
            status: vitals.status,
            last_decision: vitals.last_decision.clone(),
        }
    }

    pub fn status_text(&self) -> String {
        format!(
            "Energy: {}\nStress: {:.2}\nGuilt: {:.2}\nStatus: {}",
            self.energy.round() as i32,
            self.stress,
            self.guilt,
            self.status.label()
        )
    }
}

use serde::Serialize;

use crate::config;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Dead,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Dead => "dead",
        }
    }
}

/// What the agent ran into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImpactSource {
    Weapon,
    Other,
}

impl ImpactSource {
    /// (energy, stress, guilt) per unit of impact magnitude.
    fn coefficients(self) -> (f32, f32, f32) {
        match self {
            ImpactSource::Weapon => (
                config::WEAPON_ENERGY_COEFF,
                config::WEAPON_STRESS_COEFF,
                config::WEAPON_GUILT_COEFF,
            ),
            ImpactSource::Other => (
                config::COLLISION_ENERGY_COEFF,
                config::COLLISION_STRESS_COEFF,
                config::COLLISION_GUILT_COEFF,
            ),
        }
    }

    fn decision(self) -> &'static str {
        match self {
            ImpactSource::Weapon => "Hit by weapon",
            ImpactSource::Other => "Collided",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consumable {
    Orb,
    Med,
}

impl Consumable {
    /// (energy restored, stress and guilt relieved)
    fn effect(self) -> (f32, f32) {
        match self {
            Consumable::Orb => (config::ORB_ENERGY, config::ORB_RELIEF),
            Consumable::Med => (config::MED_ENERGY, config::MED_RELIEF),
        }
    }

    fn decision(self) -> &'static str {
        match self {
            Consumable::Orb => "Consumed orb",
            Consumable::Med => "Consumed med",
        }
    }
}

/// Stress and guilt accumulators, both held in `[0, 10]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Conscience {
    pub stress: f32,
    pub guilt: f32,
}

impl Conscience {
    fn add(&mut self, stress: f32, guilt: f32) {
        self.stress = clamp_finite(self.stress + stress, 0.0, config::MAX_STRESS);
        self.guilt = clamp_finite(self.guilt + guilt, 0.0, config::MAX_GUILT);
    }
}

/// The agent's energy, status and conscience. Every mutation clamps immediately.
#[derive(Clone, Debug, PartialEq)]
pub struct Vitals {
    pub energy: f32,
    pub status: Status,
    pub last_decision: String,
    pub conscience: Conscience,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            energy: config::MAX_ENERGY,
            status: Status::Active,
            last_decision: "Initialized".to_string(),
            conscience: Conscience::default(),
        }
    }
}

impl Vitals {
    pub fn is_alive(&self) -> bool {
        self.status == Status::Active
    }

    /// Apply collision damage. Returns true when energy has run out.
    pub fn apply_impact(&mut self, magnitude: f32, source: ImpactSource) -> bool {
        let magnitude = if magnitude.is_nan() {
            0.0
        } else {
            magnitude.max(0.0)
        };
        let (energy_k, stress_k, guilt_k) = source.coefficients();

        self.energy = clamp_finite(self.energy - magnitude * energy_k, 0.0, config::MAX_ENERGY);
        self.conscience.add(magnitude * stress_k, magnitude * guilt_k);
        self.last_decision = source.decision().to_string();

        self.energy <= 0.0
    }

    pub fn apply_consumable(&mut self, kind: Consumable) {
        let (energy, relief) = kind.effect();
        self.energy = clamp_finite(self.energy + energy, 0.0, config::MAX_ENERGY);
        self.conscience.add(-relief, -relief);
        self.last_decision = kind.decision().to_string();
    }

    pub fn mark_dead(&mut self) {
        self.status = Status::Dead;
    }
}

/// Clamp that sends NaN to the lower bound.
fn clamp_finite(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

use serde::Serialize;

use crate::presentation::StatusSnapshot;
use crate::simulation::{Session, SessionCounters};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p90: f64,
}

#[derive(Debug, Clone, Default)]
pub struct MetricAggregator {
    samples: Vec<f64>,
}

impl MetricAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.samples.push(value);
    }

    pub fn summary(&self) -> MetricSummary {
        if self.samples.is_empty() {
            return MetricSummary::default();
        }

        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let sum: f64 = sorted.iter().sum();

        MetricSummary {
            count: sorted.len(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean: sum / sorted.len() as f64,
            p50: nearest_rank(&sorted, 0.50),
            p90: nearest_rank(&sorted, 0.90),
        }
    }
}

fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    let rank = ((p.clamp(0.0, 1.0) * sorted.len() as f64).ceil() as usize).saturating_sub(1);
    sorted[rank.min(sorted.len() - 1)]
}

/// Summary of a headless run, printed as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub ticks: u64,
    pub counters: SessionCounters,
    pub live_items: usize,
    pub live_particles: usize,
    pub final_status: StatusSnapshot,
    pub energy: MetricSummary,
    pub stress: MetricSummary,
}

impl RunReport {
    pub fn from_session(
        session: &Session,
        energy: &MetricAggregator,
        stress: &MetricAggregator,
    ) -> Self {
        Self {
            seed: session.config.seed,
            ticks: session.tick_count,
            counters: session.counters,
            live_items: session.registry.item_count(),
            live_particles: session.registry.particle_count(),
            final_status: session.snapshot.clone(),
            energy: energy.summary(),
            stress: stress.summary(),
        }
    }
}

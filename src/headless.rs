use tracing::info;

use crate::config::{self, SessionConfig};
use crate::items::ItemPreset;
use crate::report::{MetricAggregator, RunReport};
use crate::simulation::Session;

/// Run a session without a window: drop one catalog item every
/// `HEADLESS_SPAWN_INTERVAL` ticks (round-robin) and report what happened.
pub fn run(config: SessionConfig, ticks: u64) -> RunReport {
    let mut session = Session::new(config);
    let mut energy = MetricAggregator::new();
    let mut stress = MetricAggregator::new();
    let mut next_preset = 0usize;

    for _ in 0..ticks {
        if session.tick_count % config::HEADLESS_SPAWN_INTERVAL == 0 {
            session.spawn_item(ItemPreset::ALL[next_preset]);
            next_preset = (next_preset + 1) % ItemPreset::ALL.len();
        }
        session.tick();

        if session.tick_count % config::PRESENTATION_INTERVAL_TICKS == 0 {
            energy.push(session.snapshot.energy as f64);
            stress.push(session.snapshot.stress as f64);
        }
    }

    let report = RunReport::from_session(&session, &energy, &stress);
    info!(
        ticks = report.ticks,
        deaths = report.counters.deaths,
        respawns = report.counters.respawns,
        "headless run finished"
    );
    report
}

use egui;

use crate::config;
use crate::presentation::StressBand;
use crate::simulation::Session;

/// Agent status panel, fed from the periodically refreshed snapshot.
pub fn draw_status(ctx: &egui::Context, session: &Session) {
    let snapshot = &session.snapshot;

    egui::Window::new("Agent")
        .default_pos(egui::pos2(12.0, 260.0))
        .default_size(egui::vec2(220.0, 180.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.monospace(snapshot.status_text());
            ui.separator();

            vital_bar(ui, "Energy", snapshot.energy / config::MAX_ENERGY, snapshot.energy);
            vital_bar(ui, "Stress", snapshot.stress / config::MAX_STRESS, snapshot.stress);
            vital_bar(ui, "Guilt", snapshot.guilt / config::MAX_GUILT, snapshot.guilt);

            ui.separator();
            ui.label(format!("Last: {}", snapshot.last_decision));
            let mood = match snapshot.band {
                Some(StressBand::Calm) => "calm",
                Some(StressBand::Caution) => "caution",
                Some(StressBand::Alarm) => "alarm",
                None => "-",
            };
            ui.label(format!("Mood: {mood}"));
            ui.label(format!("Sequence: {}", session.sequencer.phase().label()));
            ui.label(format!(
                "Deaths: {}  Respawns: {}",
                session.counters.deaths, session.counters.respawns
            ));
        });
}

fn vital_bar(ui: &mut egui::Ui, label: &str, frac: f32, value: f32) {
    ui.horizontal(|ui| {
        ui.label(format!("{label}:"));
        let bar = egui::ProgressBar::new(frac.clamp(0.0, 1.0)).text(format!("{value:.1}"));
        ui.add(bar);
    });
}

use egui;

use super::{to_color32, UiState};
use crate::presentation::StressBand;
use crate::simulation::Session;

const SPEEDS: [f32; 3] = [0.5, 1.0, 2.0];
const MUTED: egui::Color32 = egui::Color32::from_rgb(150, 170, 185);

/// Top strip: run controls, panel toggles and the agent's headline vitals.
pub fn draw_toolbar(ctx: &egui::Context, session: &mut Session, ui_state: &mut UiState) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.add_space(3.0);
        ui.horizontal_wrapped(|ui| {
            ui.label(
                egui::RichText::new("BALL PHYSICS")
                    .strong()
                    .color(egui::Color32::from_rgb(120, 230, 240)),
            );
            ui.separator();

            run_controls(ui, session, ui_state);
            ui.separator();

            ui.toggle_value(&mut ui_state.show_inventory, "Inventory");
            ui.toggle_value(&mut ui_state.show_status, "Status");
            ui.toggle_value(&mut ui_state.show_graphs, "Graphs");
            ui.separator();

            vitals_readout(ui, session);
        });
        ui.add_space(3.0);
    });
}

fn run_controls(ui: &mut egui::Ui, session: &mut Session, ui_state: &mut UiState) {
    let pause_label = if session.paused { "Play" } else { "Pause" };
    if ui.button(pause_label).clicked() {
        session.paused = !session.paused;
    }
    // Stepping only makes sense while paused.
    if ui
        .add_enabled(session.paused, egui::Button::new("Step"))
        .clicked()
    {
        ui_state.step_requested = true;
    }

    ui.label(egui::RichText::new("speed").small().color(MUTED));
    for speed in SPEEDS {
        let selected = (session.speed_multiplier - speed).abs() < 0.01;
        if ui.selectable_label(selected, format!("{speed}x")).clicked() {
            session.speed_multiplier = speed;
        }
    }
}

/// Energy and stress, tinted by the last presentation snapshot.
fn vitals_readout(ui: &mut egui::Ui, session: &Session) {
    let snapshot = &session.snapshot;
    if !snapshot.alive {
        ui.label(
            egui::RichText::new("DEAD")
                .strong()
                .color(egui::Color32::from_rgb(230, 80, 80)),
        );
        ui.label(egui::RichText::new(snapshot.last_decision.as_str()).small().color(MUTED));
        return;
    }

    let band = snapshot.band.unwrap_or(StressBand::Calm);
    let energy_tint = if snapshot.energy < 25.0 {
        egui::Color32::from_rgb(230, 120, 80)
    } else {
        egui::Color32::from_rgb(205, 215, 225)
    };
    ui.label(
        egui::RichText::new(format!("energy {}", snapshot.energy.round() as i32))
            .monospace()
            .color(energy_tint),
    );
    ui.label(
        egui::RichText::new(format!("stress {:.2}", snapshot.stress))
            .monospace()
            .color(to_color32(band.color())),
    );
    ui.label(
        egui::RichText::new(format!("items {}", session.registry.item_count()))
            .small()
            .color(MUTED),
    );
}

use egui;

use super::to_color32;
use crate::items::ItemPreset;
use crate::simulation::Session;

/// One zero-argument spawn button per catalog preset.
pub fn draw_inventory(ctx: &egui::Context, session: &mut Session, open: &mut bool) {
    egui::Window::new("Inventory")
        .open(open)
        .default_pos(egui::pos2(12.0, 60.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new("Consumables")
                    .small()
                    .color(egui::Color32::from_rgb(150, 170, 185)),
            );
            ui.horizontal(|ui| {
                spawn_button(ui, session, ItemPreset::Orb);
                spawn_button(ui, session, ItemPreset::Med);
            });

            ui.separator();
            ui.label(
                egui::RichText::new("Weapons")
                    .small()
                    .color(egui::Color32::from_rgb(150, 170, 185)),
            );
            ui.horizontal_wrapped(|ui| {
                for preset in ItemPreset::ALL
                    .into_iter()
                    .filter(|p| p.item_type().is_weapon())
                {
                    spawn_button(ui, session, preset);
                }
            });
        });
}

fn spawn_button(ui: &mut egui::Ui, session: &mut Session, preset: ItemPreset) {
    let swatch = to_color32(preset.item_type().color());
    let label = egui::RichText::new(preset.label()).color(swatch);
    if ui.button(label).clicked() {
        session.spawn_item(preset);
    }
}

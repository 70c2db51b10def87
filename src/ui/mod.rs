pub mod graphs;
pub mod inventory;
pub mod status;
pub mod toolbar;

use macroquad::color::Color;

use crate::simulation::Session;

pub fn to_color32(c: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(
        (c.r * 255.0) as u8,
        (c.g * 255.0) as u8,
        (c.b * 255.0) as u8,
        (c.a * 255.0) as u8,
    )
}

/// Tracks which UI panels are open.
pub struct UiState {
    pub show_inventory: bool,
    pub show_status: bool,
    pub show_graphs: bool,
    pub step_requested: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_inventory: false,
            show_status: true,
            show_graphs: false,
            step_requested: false,
        }
    }
}

/// Draw all egui UI panels.
pub fn draw_ui(session: &mut Session, ui_state: &mut UiState) {
    egui_macroquad::ui(|ctx| {
        toolbar::draw_toolbar(ctx, session, ui_state);

        if ui_state.show_inventory {
            inventory::draw_inventory(ctx, session, &mut ui_state.show_inventory);
        }

        if ui_state.show_status {
            status::draw_status(ctx, session);
        }

        if ui_state.show_graphs {
            graphs::draw_graphs(ctx, &session.history);
        }
    });

    egui_macroquad::draw();
}

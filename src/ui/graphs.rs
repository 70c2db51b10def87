use egui;

use crate::stats::{SampleRing, VitalsHistory};

/// Draw energy, stress and guilt history.
pub fn draw_graphs(ctx: &egui::Context, history: &VitalsHistory) {
    egui::Window::new("Vitals History")
        .default_pos(egui::pos2(300.0, 420.0))
        .default_size(egui::vec2(400.0, 300.0))
        .resizable(true)
        .show(ctx, |ui| {
            ui.collapsing("Energy", |ui| {
                draw_line_graph(ui, &history.energy, 100.0, egui::Color32::from_rgb(200, 200, 100));
            });

            ui.collapsing("Stress / Guilt", |ui| {
                let size = egui::vec2(ui.available_width(), 80.0);
                let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
                let rect = response.rect;
                painter.rect_filled(rect, 2.0, egui::Color32::from_gray(20));

                draw_line_in_rect(&painter, &history.stress, 10.0, rect, egui::Color32::from_rgb(255, 200, 60));
                draw_line_in_rect(&painter, &history.guilt, 10.0, rect, egui::Color32::from_rgb(200, 120, 255));

                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::from_rgb(255, 200, 60), "Stress");
                    ui.colored_label(egui::Color32::from_rgb(200, 120, 255), "Guilt");
                });
            });
        });
}

fn draw_line_graph(ui: &mut egui::Ui, ring: &SampleRing, ceiling: f32, color: egui::Color32) {
    let size = egui::vec2(ui.available_width(), 80.0);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect;

    painter.rect_filled(rect, 2.0, egui::Color32::from_gray(20));
    draw_line_in_rect(&painter, ring, ceiling, rect, color);

    if let Some(val) = ring.last() {
        painter.text(
            egui::pos2(rect.right() - 4.0, rect.top() + 2.0),
            egui::Align2::RIGHT_TOP,
            format!("{val:.0}"),
            egui::FontId::proportional(10.0),
            egui::Color32::from_gray(200),
        );
    }
}

/// Vitals have fixed ranges, so the y axis is `[0, ceiling]` rather than auto-scaled.
fn draw_line_in_rect(
    painter: &egui::Painter,
    ring: &SampleRing,
    ceiling: f32,
    rect: egui::Rect,
    color: egui::Color32,
) {
    let len = ring.len();
    if len < 2 {
        return;
    }

    let points: Vec<egui::Pos2> = ring
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = rect.left() + (i as f32 / (len - 1) as f32) * rect.width();
            let y = rect.bottom() - (v / ceiling).clamp(0.0, 1.0) * rect.height();
            egui::pos2(x, y)
        })
        .collect();

    for pair in points.windows(2) {
        painter.line_segment([pair[0], pair[1]], egui::Stroke::new(1.5, color));
    }
}

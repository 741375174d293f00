use eframe::egui;
use railmap_graph::style;

use crate::i18n::LabelLookup;
use crate::theme::{overlay_card, to_egui_color};

const SWATCH_RADIUS: f32 = 5.0;

/// Every known line with its color, plus the hub marker.
pub fn show(ui: &mut egui::Ui, labels: &LabelLookup) {
    overlay_card(ui, |ui| {
        ui.strong(&*labels.label("map.legend"));
        egui::Grid::new("map_legend")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                for line in style::known_lines() {
                    swatch(ui, to_egui_color(style::line_color_or_default(&line)), false);
                    ui.label(line.as_str());
                    ui.end_row();
                }
                swatch(ui, to_egui_color(style::HUB_COLOR), true);
                ui.label(&*labels.label("map.hub"));
                ui.end_row();
            });
    });
}

fn swatch(ui: &mut egui::Ui, color: egui::Color32, ring: bool) {
    let size = egui::vec2(SWATCH_RADIUS * 3.0, SWATCH_RADIUS * 3.0);
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), SWATCH_RADIUS, color);
    if ring {
        painter.circle_stroke(
            rect.center(),
            SWATCH_RADIUS + 2.0,
            egui::Stroke::new(1.0, to_egui_color(style::HUB_RING_COLOR)),
        );
    }
}

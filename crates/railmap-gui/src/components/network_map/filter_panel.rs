use eframe::egui;
use egui_phosphor::regular as ph;
use railmap_core::FilterState;
use railmap_events::{Event, EventBus};
use railmap_graph::style;

use super::session::NetworkMapSession;
use crate::i18n::LabelLookup;
use crate::theme::{overlay_card, spacing, to_egui_color};

/// Threshold slider, per-line toggles and reset. Changes are published as
/// events and applied by the app on the next dispatch.
pub fn show(
    ui: &mut egui::Ui,
    session: &NetworkMapSession,
    labels: &LabelLookup,
    event_bus: &EventBus,
) {
    overlay_card(ui, |ui| {
        ui.set_width(260.0);
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(ph::SLIDERS_HORIZONTAL).size(spacing::ICON_SIZE));
            ui.strong(&*labels.label("map.settings.title"));
        });
        ui.separator();

        ui.label(&*labels.label("map.settings.minTraffic"));
        let mut min_traffic = session.filter().min_traffic;
        let slider = egui::Slider::new(&mut min_traffic, FilterState::SLIDER_RANGE)
            .step_by(f64::from(FilterState::SLIDER_STEP))
            .suffix(format!(" {}", labels.label("map.settings.trains")));
        if ui.add(slider).changed() {
            event_bus.publish(Event::SetMinTraffic(min_traffic));
        }
        ui.label(
            egui::RichText::new(labels.label("map.settings.adjustHint"))
                .small()
                .weak(),
        );

        ui.add_space(spacing::SECTION_SPACING);
        ui.label(&*labels.label("map.settings.visibleLines"));
        ui.horizontal_wrapped(|ui| {
            for line in session.known_lines() {
                let selected = session.filter().is_line_selected(line);
                let color = to_egui_color(style::line_color_or_default(line));
                let text = egui::RichText::new(line.as_str()).strong().color(if selected {
                    egui::Color32::WHITE
                } else {
                    ui.visuals().weak_text_color()
                });
                let button = egui::Button::new(text)
                    .fill(if selected {
                        color
                    } else {
                        ui.visuals().faint_bg_color
                    })
                    .stroke(egui::Stroke::new(1.0, color));
                if ui.add(button).clicked() {
                    event_bus.publish(Event::ToggleLine(line.clone()));
                }
            }
        });

        ui.add_space(spacing::SECTION_SPACING);
        let reset = egui::Button::new(format!(
            "{} {}",
            ph::ARROW_COUNTER_CLOCKWISE,
            labels.label("map.settings.reset")
        ));
        if ui.add(reset).clicked() {
            event_bus.publish(Event::ResetFilters);
        }
    });
}

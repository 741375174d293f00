//! Network topology view: canvas plus floating header, filter panel and legend.

pub mod canvas;
pub mod filter_panel;
pub mod legend;
pub mod session;

pub use session::NetworkMapSession;

use eframe::egui;
use egui_phosphor::regular as ph;
use railmap_events::{Event, EventBus, SurfaceObserver};

use crate::i18n::LabelLookup;
use crate::settings::AppSettings;
use crate::theme::{icon_button, overlay_card};

const OVERLAY_MARGIN: f32 = 16.0;

pub fn show(
    ui: &mut egui::Ui,
    session: &mut NetworkMapSession,
    surface: &SurfaceObserver,
    labels: &LabelLookup,
    settings: &AppSettings,
    event_bus: &EventBus,
) {
    let rect = canvas::show(ui, session, surface, event_bus);
    let ctx = ui.ctx().clone();
    let margin = egui::vec2(OVERLAY_MARGIN, OVERLAY_MARGIN);

    egui::Area::new(egui::Id::new("map_header"))
        .fixed_pos(rect.min + margin)
        .show(&ctx, |ui| {
            overlay_card(ui, |ui| {
                ui.heading(&*labels.label("map.topoTitle"));
                ui.label(
                    egui::RichText::new(format!(
                        "{} ({})",
                        labels.label("map.topoSubtitle"),
                        session.visible().nodes.len()
                    ))
                    .small(),
                );
                if session.is_loading() {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new());
                        ui.label(&*labels.label("map.loading"));
                    });
                }
            });
        });

    egui::Area::new(egui::Id::new("map_controls"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-OVERLAY_MARGIN, rect.min.y + OVERLAY_MARGIN))
        .show(&ctx, |ui| {
            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    if ui
                        .add(icon_button(ph::CORNERS_OUT))
                        .on_hover_text(&*labels.label("map.zoomToFit"))
                        .clicked()
                    {
                        event_bus.publish(Event::ZoomToFit);
                    }
                    let toggle =
                        icon_button(ph::SLIDERS_HORIZONTAL).selected(session.is_panel_open());
                    if ui
                        .add(toggle)
                        .on_hover_text(&*labels.label("map.settings.title"))
                        .clicked()
                    {
                        event_bus.publish(Event::ToggleFilterPanel);
                    }
                });
                if session.is_panel_open() {
                    filter_panel::show(ui, session, labels, event_bus);
                }
            });
        });

    if settings.show_legend {
        egui::Area::new(egui::Id::new("map_legend_area"))
            .pivot(egui::Align2::LEFT_BOTTOM)
            .fixed_pos(egui::pos2(rect.min.x + OVERLAY_MARGIN, rect.max.y - OVERLAY_MARGIN))
            .show(&ctx, |ui| legend::show(ui, labels));
    }
}

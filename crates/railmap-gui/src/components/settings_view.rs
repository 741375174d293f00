use eframe::egui;

use crate::i18n::{Language, LabelLookup};
use crate::settings::{AppSettings, ThemeMode};

/// Settings page. Returns `true` when something changed and should be saved.
pub fn show(ui: &mut egui::Ui, settings: &mut AppSettings, labels: &LabelLookup) -> bool {
    let before = settings.clone();

    ui.heading(&*labels.label("nav.settings"));
    ui.add_space(8.0);
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label(&*labels.label("settings.theme"));
            for mode in ThemeMode::ALL {
                ui.radio_value(&mut settings.theme, mode, mode.label());
            }
        });

        ui.horizontal(|ui| {
            ui.label(&*labels.label("settings.language"));
            egui::ComboBox::from_id_salt("settings_language")
                .selected_text(settings.language.native_name())
                .show_ui(ui, |ui| {
                    for language in Language::ALL {
                        ui.selectable_value(
                            &mut settings.language,
                            language,
                            language.native_name(),
                        );
                    }
                });
        });

        ui.add(
            egui::Slider::new(&mut settings.ui_scale, 0.5..=2.0)
                .text(&*labels.label("settings.uiScale")),
        );
        ui.checkbox(&mut settings.show_legend, &*labels.label("settings.showLegend"));
        ui.checkbox(
            &mut settings.open_filter_panel_on_start,
            &*labels.label("settings.openPanelOnStart"),
        );
    });

    *settings != before
}

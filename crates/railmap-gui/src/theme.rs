//! Rail map theme.
//!
//! Chrome colors come from catppuccin-egui; the map canvas itself keeps the
//! dark slate background the line palette was designed against.

use eframe::egui::{self, Color32, Vec2};
use railmap_graph::Color;

use crate::settings::ThemeMode;

pub mod spacing {
    pub const PANEL_PADDING: f32 = 12.0;
    pub const ITEM_SPACING: f32 = 8.0;
    pub const SECTION_SPACING: f32 = 16.0;
    pub const BUTTON_PADDING: f32 = 8.0;
    pub const ICON_SIZE: f32 = 16.0;
}

pub mod radius {
    use eframe::egui::CornerRadius;

    pub const LARGE: CornerRadius = CornerRadius::same(8);
}

/// Canvas background (slate-900).
pub const MAP_BACKGROUND: Color32 = Color32::from_rgb(0x0f, 0x17, 0x2a);

#[derive(Debug, Clone)]
pub struct Theme {
    pub mode: ThemeMode,
    pub flavor: catppuccin_egui::Theme,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}

impl Theme {
    pub fn new(mode: ThemeMode) -> Self {
        let flavor = match mode {
            ThemeMode::Latte => catppuccin_egui::LATTE,
            ThemeMode::Frappe => catppuccin_egui::FRAPPE,
            ThemeMode::Macchiato => catppuccin_egui::MACCHIATO,
            ThemeMode::Mocha => catppuccin_egui::MOCHA,
        };
        Self { mode, flavor }
    }

    /// Apply theme to egui context
    pub fn apply(&self, ctx: &egui::Context) {
        catppuccin_egui::set_theme(ctx, self.flavor);

        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        ctx.set_fonts(fonts);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::new(spacing::ITEM_SPACING, spacing::ITEM_SPACING);
        style.spacing.button_padding =
            Vec2::new(spacing::BUTTON_PADDING, spacing::BUTTON_PADDING / 2.0);
        style.spacing.window_margin = egui::Margin::same(spacing::PANEL_PADDING as i8);
        style.interaction.show_tooltips_only_when_still = false;
        ctx.set_style(style);
    }
}

pub fn to_egui_color(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub fn icon_button(text: &str) -> egui::Button<'_> {
    egui::Button::new(egui::RichText::new(text).size(spacing::ICON_SIZE))
}

/// Translucent floating card drawn over the map.
pub fn overlay_card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::new()
        .fill(ui.visuals().panel_fill.gamma_multiply(0.85))
        .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
        .corner_radius(radius::LARGE)
        .inner_margin(egui::Margin::same(spacing::PANEL_PADDING as i8))
        .show(ui, add_contents);
}

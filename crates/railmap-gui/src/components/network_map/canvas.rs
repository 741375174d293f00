use eframe::egui;
use railmap_core::{Vec2, ViewportSize};
use railmap_events::{Event, EventBus, SurfaceObserver};
use railmap_graph::render::{Canvas, TextShadow};
use railmap_graph::{Camera, Color};

use super::session::NetworkMapSession;
use crate::theme::{MAP_BACKGROUND, to_egui_color};

const SCROLL_ZOOM_SPEED: f32 = 0.002;

/// [`Canvas`] backed by an egui painter. World coordinates are mapped through
/// the session camera into the allocated rect.
pub struct EguiCanvas<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    camera: Camera,
    viewport: ViewportSize,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a egui::Painter, rect: egui::Rect, camera: Camera) -> Self {
        Self {
            painter,
            origin: rect.min,
            camera,
            viewport: ViewportSize::new(rect.width(), rect.height()),
        }
    }

    fn to_screen(&self, world: Vec2) -> egui::Pos2 {
        let local = self.camera.world_to_screen(world, self.viewport);
        self.origin + egui::vec2(local.x, local.y)
    }

    fn scaled(&self, world_length: f32) -> f32 {
        world_length * self.camera.zoom
    }
}

impl Canvas for EguiCanvas<'_> {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.painter
            .circle_filled(self.to_screen(center), self.scaled(radius), to_egui_color(color));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.painter.circle_stroke(
            self.to_screen(center),
            self.scaled(radius),
            egui::Stroke::new(self.scaled(width), to_egui_color(color)),
        );
    }

    fn text_with_shadow(
        &mut self,
        anchor: Vec2,
        text: &str,
        font_size: f32,
        color: Color,
        shadow: TextShadow,
    ) {
        let pos = self.to_screen(anchor);
        let font = egui::FontId::proportional(self.scaled(font_size));
        // egui has no text blur; a small offset copy stands in for it
        let offset = (shadow.blur * 0.25).max(1.0);
        self.painter.text(
            pos + egui::vec2(offset, offset),
            egui::Align2::CENTER_CENTER,
            text,
            font.clone(),
            to_egui_color(shadow.color),
        );
        self.painter
            .text(pos, egui::Align2::CENTER_CENTER, text, font, to_egui_color(color));
    }

    fn quadratic_curve(&mut self, from: Vec2, control: Vec2, to: Vec2, width: f32, color: Color) {
        let shape = egui::epaint::QuadraticBezierShape::from_points_stroke(
            [self.to_screen(from), self.to_screen(control), self.to_screen(to)],
            false,
            egui::Color32::TRANSPARENT,
            egui::Stroke::new(self.scaled(width), to_egui_color(color)),
        );
        self.painter.add(shape);
    }

    fn fill_triangle(&mut self, points: [Vec2; 3], color: Color) {
        self.painter.add(egui::Shape::convex_polygon(
            points.iter().map(|p| self.to_screen(*p)).collect(),
            to_egui_color(color),
            egui::Stroke::NONE,
        ));
    }
}

/// Draws the session and turns pointer input into camera moves and events.
pub fn show(
    ui: &mut egui::Ui,
    session: &mut NetworkMapSession,
    surface: &SurfaceObserver,
    event_bus: &EventBus,
) -> egui::Rect {
    let rect = ui.available_rect_before_wrap();
    let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
    surface.report(ViewportSize::new(rect.width(), rect.height()));
    session.viewport_mut().sync_surface();

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, MAP_BACKGROUND);

    if response.hovered() {
        let (zoom_delta, scroll) = ui.input(|i| (i.zoom_delta(), i.smooth_scroll_delta.y));
        let factor = zoom_delta * (scroll * SCROLL_ZOOM_SPEED).exp();
        if (factor - 1.0).abs() > f32::EPSILON {
            if let Some(pointer) = response.hover_pos() {
                let local = pointer - rect.min;
                session
                    .viewport_mut()
                    .zoom_about(Vec2::new(local.x, local.y), factor);
            }
        }
    }

    if response.dragged() {
        let delta = response.drag_delta();
        session
            .viewport_mut()
            .pan_by_screen(Vec2::new(delta.x, delta.y));
    }

    let hovered = response.hover_pos().and_then(|pointer| {
        let local = pointer - rect.min;
        session.station_at(Vec2::new(local.x, local.y)).cloned()
    });

    if response.clicked() {
        if let Some(node) = &hovered {
            event_bus.publish(Event::ActivateStation {
                id: node.id.clone(),
            });
        }
    }
    if response.double_clicked() && hovered.is_none() {
        event_bus.publish(Event::ZoomToFit);
    }

    let mut canvas = EguiCanvas::new(&painter, rect, session.viewport().camera());
    session.render(&mut canvas);

    if let Some(node) = hovered {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        response.on_hover_ui_at_pointer(|ui| {
            ui.strong(node.id.as_str());
            ui.label(format!("{:.0}", node.traffic));
            let lines: Vec<&str> = node.lines.iter().map(|l| l.as_str()).collect();
            ui.label(lines.join(" · "));
        });
    }

    rect
}

use eframe::egui;
use egui_phosphor::regular as ph;
use railmap_api::{ApiConfig, HttpNetworkProvider, NetworkProvider};
use railmap_core::NetworkError;
use railmap_events::{Event, EventBus, EventListener, SurfaceObserver, ViewId};
use railmap_graph::GraphStatus;
use std::sync::Arc;
use std::time::Duration;

use crate::components::network_map::{self, NetworkMapSession};
use crate::components::settings_view;
use crate::i18n::LabelLookup;
use crate::settings::AppSettings;
use crate::theme::Theme;

/// Upper bound on the per-frame animation step after a stall.
const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

pub struct RailMapApp {
    settings: AppSettings,
    theme: Theme,
    needs_initial_theme_apply: bool,
    applied_ui_scale: f32,
    labels: LabelLookup,
    event_bus: EventBus,
    surface: SurfaceObserver,
    provider: Result<Arc<dyn NetworkProvider>, NetworkError>,
    active_view: ViewId,
    session: Option<NetworkMapSession>,
    status_message: String,
}

impl RailMapApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = AppSettings::load();
        let config = ApiConfig::from_env();
        tracing::info!("Using network API at {}", config.base_url);
        let provider = HttpNetworkProvider::new(config)
            .map(|p| Arc::new(p) as Arc<dyn NetworkProvider>)
            .inspect_err(|e| tracing::error!("Could not build HTTP client: {}", e));

        Self {
            theme: Theme::new(settings.theme),
            needs_initial_theme_apply: true,
            applied_ui_scale: settings.ui_scale,
            labels: LabelLookup::new(settings.language),
            settings,
            event_bus: EventBus::new(),
            surface: SurfaceObserver::new(),
            provider,
            active_view: ViewId::NetworkMap,
            session: None,
            status_message: String::new(),
        }
    }

    fn ensure_session(&mut self) {
        if self.active_view != ViewId::NetworkMap || self.session.is_some() {
            return;
        }
        let panel_open = self.settings.open_filter_panel_on_start;
        self.session = Some(match &self.provider {
            Ok(provider) => {
                NetworkMapSession::activate(provider.clone(), &self.surface, panel_open)
            }
            Err(e) => NetworkMapSession::unavailable(
                e.clone(),
                &self.surface,
                panel_open,
                &self.event_bus,
            ),
        });
    }

    fn switch_view(&mut self, view: ViewId) {
        if view == self.active_view {
            return;
        }
        tracing::debug!("Switching view {:?} -> {:?}", self.active_view, view);
        if self.active_view == ViewId::NetworkMap {
            self.session = None;
        }
        self.active_view = view;
    }

    fn sync_settings(&mut self, ctx: &egui::Context) {
        if self.needs_initial_theme_apply || self.theme.mode != self.settings.theme {
            tracing::info!("Applying theme {:?}", self.settings.theme);
            self.theme = Theme::new(self.settings.theme);
            self.theme.apply(ctx);
            self.needs_initial_theme_apply = false;
            ctx.set_pixels_per_point(self.settings.ui_scale);
            self.applied_ui_scale = self.settings.ui_scale;
        }
        if (self.applied_ui_scale - self.settings.ui_scale).abs() > f32::EPSILON {
            ctx.set_pixels_per_point(self.settings.ui_scale);
            self.applied_ui_scale = self.settings.ui_scale;
        }
        if self.labels.language() != self.settings.language {
            self.labels.set_language(self.settings.language);
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("nav_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let views = [
                    (ViewId::NetworkMap, ph::GRAPH, "nav.map"),
                    (ViewId::Settings, ph::GEAR, "nav.settings"),
                ];
                for (view, icon, key) in views {
                    let text = format!("{} {}", icon, self.labels.label(key));
                    if ui.selectable_label(self.active_view == view, text).clicked() {
                        self.event_bus.publish(Event::SwitchView(view));
                    }
                }
            });
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(session) = &self.session {
                    if matches!(session.status(), GraphStatus::NoData(_)) {
                        ui.label(
                            egui::RichText::new(ph::WARNING).color(ui.visuals().warn_fg_color),
                        );
                    }
                }
                ui.label(egui::RichText::new(&self.status_message).small());
                if let Some(session) = &self.session {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let visible = session.visible();
                        ui.label(
                            egui::RichText::new(format!(
                                "{} {} · {} {} · zoom {:.2} · {:?}",
                                visible.nodes.len(),
                                self.labels.label("status.stations"),
                                visible.links.len(),
                                self.labels.label("status.links"),
                                session.viewport().zoom(),
                                session.camera_phase()
                            ))
                            .small()
                            .weak(),
                        );
                    });
                }
            });
        });
    }
}

impl eframe::App for RailMapApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session = None;
        self.settings.save();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_settings(ctx);
        self.ensure_session();

        if let Some(session) = &mut self.session {
            session.poll_fetch(&self.event_bus);
        }

        let bus = self.event_bus.clone();
        bus.dispatch_to(self);
        self.ensure_session();

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);

        let dt = Duration::from_secs_f32(ctx.input(|i| i.stable_dt)).min(MAX_FRAME_STEP);
        let mut animating = false;

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| match self.active_view {
                ViewId::NetworkMap => {
                    if let Some(session) = &mut self.session {
                        animating = session.tick(dt, &self.event_bus);
                        network_map::show(
                            ui,
                            session,
                            &self.surface,
                            &self.labels,
                            &self.settings,
                            &self.event_bus,
                        );
                    }
                }
                ViewId::Settings => {
                    egui::Frame::new()
                        .inner_margin(egui::Margin::same(16))
                        .show(ui, |ui| {
                            if settings_view::show(ui, &mut self.settings, &self.labels) {
                                self.settings.save();
                            }
                        });
                }
            });

        if animating {
            ctx.request_repaint();
        }
    }
}

impl EventListener for RailMapApp {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::SwitchView(view) => self.switch_view(*view),
            Event::NetworkLoaded { .. } | Event::NetworkUnavailable { .. } => {
                if let Some(notice) = data_notice(event, &self.labels) {
                    self.event_bus.publish(notice);
                }
            }
            Event::LayoutSettled { ticks } => {
                tracing::debug!("Layout settled after {} ticks", ticks);
            }
            Event::ShowInfo { message } => {
                tracing::info!("{}", message);
                self.status_message = message.clone();
            }
            Event::ShowWarning { message } => {
                tracing::warn!("{}", message);
                self.status_message = message.clone();
            }
            _ => {
                let Some(session) = &mut self.session else {
                    tracing::debug!("No active map session for {:?}", event);
                    return;
                };
                match event {
                    Event::ActivateStation { id } => {
                        session.activate_station(id);
                    }
                    Event::ZoomToFit => session.zoom_to_fit(),
                    Event::SetMinTraffic(value) => session.set_min_traffic(*value),
                    Event::ToggleLine(line) => session.toggle_line(line),
                    Event::ResetFilters => session.reset_filters(),
                    Event::ToggleFilterPanel => session.toggle_panel(),
                    _ => {}
                }
            }
        }
    }
}

/// Status-bar notification for a data lifecycle event.
fn data_notice(event: &Event, labels: &LabelLookup) -> Option<Event> {
    match event {
        Event::NetworkLoaded {
            station_count,
            link_count,
        } => Some(Event::ShowInfo {
            message: format!(
                "{}: {} {} · {} {}",
                labels.label("status.loaded"),
                station_count,
                labels.label("status.stations"),
                link_count,
                labels.label("status.links")
            ),
        }),
        Event::NetworkUnavailable { reason } => Some(Event::ShowWarning {
            message: format!("{}: {}", labels.label("map.unavailable"), reason),
        }),
        _ => None,
    }
}

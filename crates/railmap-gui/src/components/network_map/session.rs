//! State owned by one activation of the network map view.
//!
//! A session is created when the view becomes active and dropped when it is
//! left. Dropping it releases the surface subscription, and an in-flight fetch
//! result is discarded because its channel receiver goes away with the session.

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use railmap_api::{NetworkProvider, RawNetwork};
use railmap_core::{FilterState, LineId, NetworkError, StationId, Vec2};
use railmap_events::{Event, EventBus, SurfaceObserver};
use railmap_graph::{
    Canvas, CameraPhase, ForceSimulation, FrameStats, GraphDataStore, GraphStatus, LayoutEvent,
    RenderAdapter, StationNode, ViewportController, VisibleGraph, filter_with_state, hit_test,
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

type FetchResult = Result<RawNetwork, NetworkError>;

pub struct NetworkMapSession {
    id: Uuid,
    store: GraphDataStore,
    filter: FilterState,
    visible: VisibleGraph,
    simulation: ForceSimulation,
    viewport: ViewportController,
    renderer: RenderAdapter,
    pending_fetch: Option<Receiver<FetchResult>>,
    panel_open: bool,
}

impl NetworkMapSession {
    /// Start a session and fetch the network on a worker thread.
    pub fn activate(
        provider: Arc<dyn NetworkProvider>,
        surface: &SurfaceObserver,
        panel_open: bool,
    ) -> Self {
        let mut session = Self::new(surface, panel_open);
        let (tx, rx) = bounded(1);
        let session_id = session.id;
        std::thread::spawn(move || {
            let result = provider.fetch_network();
            if tx.send(result).is_err() {
                tracing::debug!(session = %session_id, "Session closed before fetch completed");
            }
        });
        session.pending_fetch = Some(rx);
        session
    }

    /// Start a session that already knows the network cannot be fetched.
    pub fn unavailable(
        error: NetworkError,
        surface: &SurfaceObserver,
        panel_open: bool,
        event_bus: &EventBus,
    ) -> Self {
        let mut session = Self::new(surface, panel_open);
        session.apply_fetch(Err(error), event_bus);
        session
    }

    fn new(surface: &SurfaceObserver, panel_open: bool) -> Self {
        let id = Uuid::new_v4();
        let store = GraphDataStore::new();
        let filter = FilterState::new(store.known_lines());
        let mut viewport = ViewportController::default();
        viewport.attach(surface.observe());
        tracing::info!(session = %id, "Network map session activated");

        Self {
            id,
            store,
            filter,
            visible: VisibleGraph::default(),
            simulation: ForceSimulation::default(),
            viewport,
            renderer: RenderAdapter::default(),
            pending_fetch: None,
            panel_open,
        }
    }

    /// Take the fetch result if it has arrived. Returns `true` once, when the
    /// result is applied.
    pub fn poll_fetch(&mut self, event_bus: &EventBus) -> bool {
        let Some(rx) = &self.pending_fetch else {
            return false;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(NetworkError::Request(
                "fetch worker exited without a result".to_string(),
            )),
        };
        self.pending_fetch = None;
        self.apply_fetch(result, event_bus);
        true
    }

    fn apply_fetch(&mut self, result: FetchResult, event_bus: &EventBus) {
        self.store = GraphDataStore::from_fetch(result);
        match self.store.status() {
            GraphStatus::NoData(reason) => event_bus.publish(Event::NetworkUnavailable {
                reason: reason.clone(),
            }),
            _ => {
                let graph = self.store.graph();
                event_bus.publish(Event::NetworkLoaded {
                    station_count: graph.nodes.len(),
                    link_count: graph.links.len(),
                });
            }
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = filter_with_state(self.store.graph(), &self.filter);
        if self.simulation.set_graph(&self.visible) {
            tracing::debug!(
                session = %self.id,
                "Visible graph changed: {} stations, {} links",
                self.visible.nodes.len(),
                self.visible.links.len()
            );
        }
    }

    pub fn set_min_traffic(&mut self, value: u32) {
        if self.filter.set_min_traffic(FilterState::snap_to_slider(value)) {
            self.recompute();
        }
    }

    pub fn toggle_line(&mut self, line: &LineId) {
        self.filter.toggle_line(line);
        self.recompute();
    }

    pub fn reset_filters(&mut self) {
        self.filter.reset(self.store.known_lines());
        self.recompute();
    }

    pub fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    /// Focus the camera on a visible station. Returns `false` if it is not laid out.
    pub fn activate_station(&mut self, id: &StationId) -> bool {
        let Some(position) = self.simulation.position(id) else {
            tracing::debug!("Ignoring activation of hidden station {}", id);
            return false;
        };
        self.viewport.activate_node(position);
        true
    }

    pub fn zoom_to_fit(&mut self) {
        self.viewport.auto_fit(self.simulation.bounds());
    }

    /// Advance layout and camera by one frame. Returns `true` while anything
    /// still needs repainting.
    pub fn tick(&mut self, dt: Duration, event_bus: &EventBus) -> bool {
        self.viewport.sync_surface();
        if let Some(LayoutEvent::Settled { ticks }) = self.simulation.step() {
            self.viewport.auto_fit(self.simulation.bounds());
            event_bus.publish(Event::LayoutSettled { ticks });
        }
        let camera_moving = self.viewport.advance(dt);
        camera_moving || self.simulation.is_running() || self.pending_fetch.is_some()
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) -> FrameStats {
        self.renderer.render(&self.simulation, self.viewport.zoom(), canvas)
    }

    pub fn station_at(&self, screen: Vec2) -> Option<&Arc<StationNode>> {
        hit_test(&self.simulation, &self.viewport, screen)
    }

    pub fn is_loading(&self) -> bool {
        self.pending_fetch.is_some()
    }

    pub fn status(&self) -> &GraphStatus {
        self.store.status()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn known_lines(&self) -> &[LineId] {
        self.store.known_lines()
    }

    pub fn visible(&self) -> &VisibleGraph {
        &self.visible
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn camera_phase(&self) -> CameraPhase {
        self.viewport.phase()
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }
}

impl Drop for NetworkMapSession {
    fn drop(&mut self) {
        self.viewport.detach();
        tracing::info!(session = %self.id, "Network map session closed");
    }
}

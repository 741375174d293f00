use crossbeam_channel::{Receiver, Sender, unbounded};
use railmap_core::{LineId, StationId};
use serde::{Deserialize, Serialize};

pub mod surface;

pub use surface::{ResizeSubscription, SurfaceObserver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ViewId {
    #[default]
    NetworkMap,
    Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Map interaction
    ActivateStation {
        id: StationId,
    },
    ZoomToFit,

    // Filter controls
    SetMinTraffic(u32),
    ToggleLine(LineId),
    ResetFilters,
    ToggleFilterPanel,

    // Navigation
    SwitchView(ViewId),

    // Data lifecycle
    NetworkLoaded {
        station_count: usize,
        link_count: usize,
    },
    NetworkUnavailable {
        reason: String,
    },
    LayoutSettled {
        ticks: usize,
    },

    // Notifications
    ShowInfo {
        message: String,
    },
    ShowWarning {
        message: String,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener, including any the listener
    /// publishes while handling them.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Trait for components that respond to events.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}

//! Viewport size tracking and the camera command state machine.
//!
//! Two commands drive the camera: focusing a station (recenter, then zoom in)
//! and fitting the whole graph after the layout settles. Both run on a clock
//! advanced by the caller, and a new command always replaces the one in flight.

use crate::camera::{Bounds, Camera, Tween};
use railmap_core::{Vec2, ViewportSize};
use railmap_events::ResizeSubscription;
use serde::Serialize;
use std::time::Duration;

pub const FOCUS_CENTER_DURATION: Duration = Duration::from_millis(1000);
pub const FOCUS_ZOOM_DURATION: Duration = Duration::from_millis(2000);
pub const FOCUS_ZOOM: f32 = 3.0;
pub const FIT_DURATION: Duration = Duration::from_millis(400);
pub const FIT_PADDING: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CameraPhase {
    Idle,
    Centering,
    Zooming,
    Fitting,
}

#[derive(Debug, Clone, Copy)]
enum Command {
    /// Center and zoom tweens start together; the zoom outlasts the pan.
    Focus {
        center: Tween<Vec2>,
        zoom: Tween<f32>,
        elapsed: Duration,
    },
    Fit {
        center: Tween<Vec2>,
        zoom: Tween<f32>,
        elapsed: Duration,
    },
}

pub struct ViewportController {
    size: ViewportSize,
    camera: Camera,
    command: Option<Command>,
    subscription: Option<ResizeSubscription>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewportSize::default())
    }
}

impl std::fmt::Debug for ViewportController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportController")
            .field("size", &self.size)
            .field("camera", &self.camera)
            .field("phase", &self.phase())
            .field("observing", &self.subscription.is_some())
            .finish()
    }
}

impl ViewportController {
    pub fn new(size: ViewportSize) -> Self {
        Self {
            size,
            camera: Camera::default(),
            command: None,
            subscription: None,
        }
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn zoom(&self) -> f32 {
        self.camera.zoom
    }

    pub fn phase(&self) -> CameraPhase {
        match self.command {
            None => CameraPhase::Idle,
            Some(Command::Fit { .. }) => CameraPhase::Fitting,
            Some(Command::Focus {
                center, elapsed, ..
            }) => {
                if elapsed < center.duration {
                    CameraPhase::Centering
                } else {
                    CameraPhase::Zooming
                }
            }
        }
    }

    /// Start receiving surface sizes. Replaces (and so releases) any previous
    /// subscription.
    pub fn attach(&mut self, subscription: ResizeSubscription) {
        self.subscription = Some(subscription);
        self.sync_surface();
    }

    /// Release the surface subscription.
    pub fn detach(&mut self) {
        if self.subscription.take().is_some() {
            tracing::debug!("Viewport detached from surface");
        }
    }

    /// Apply every size reported since the last call. Returns `true` if the
    /// stored size changed.
    pub fn sync_surface(&mut self) -> bool {
        let sizes = match &self.subscription {
            Some(subscription) => subscription.drain(),
            None => return false,
        };
        sizes
            .into_iter()
            .fold(false, |changed, size| self.resize(size) || changed)
    }

    /// Store a measured size. Non-positive sizes are ignored.
    pub fn resize(&mut self, size: ViewportSize) -> bool {
        if !size.is_positive() || size == self.size {
            return false;
        }
        tracing::trace!("Viewport resized to {}x{}", size.width, size.height);
        self.size = size;
        true
    }

    /// Recenter on `position`, then zoom to the focus magnification.
    pub fn activate_node(&mut self, position: Vec2) {
        self.command = Some(Command::Focus {
            center: Tween {
                from: self.camera.center,
                to: position,
                duration: FOCUS_CENTER_DURATION,
            },
            zoom: Tween {
                from: self.camera.zoom,
                to: FOCUS_ZOOM,
                duration: FOCUS_ZOOM_DURATION,
            },
            elapsed: Duration::ZERO,
        });
    }

    /// Animate the camera to show `bounds`. Ignored when there is nothing to fit.
    pub fn auto_fit(&mut self, bounds: Option<Bounds>) {
        let Some(bounds) = bounds else {
            return;
        };
        let target = Camera::fit(bounds, self.size, FIT_PADDING);
        self.command = Some(Command::Fit {
            center: Tween {
                from: self.camera.center,
                to: target.center,
                duration: FIT_DURATION,
            },
            zoom: Tween {
                from: self.camera.zoom,
                to: target.zoom,
                duration: FIT_DURATION,
            },
            elapsed: Duration::ZERO,
        });
    }

    /// Advance the running command by `dt`. Returns `true` while the camera is
    /// animating.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let Some(command) = self.command.as_mut() else {
            return false;
        };
        let (center, zoom, elapsed) = match command {
            Command::Focus {
                center,
                zoom,
                elapsed,
            }
            | Command::Fit {
                center,
                zoom,
                elapsed,
            } => (center, zoom, elapsed),
        };
        *elapsed += dt;
        self.camera.center = center.sample(*elapsed);
        self.camera.zoom = zoom.sample(*elapsed);

        if *elapsed >= center.duration.max(zoom.duration) {
            self.command = None;
        }
        true
    }

    /// Manual pan; cancels any running command.
    pub fn pan_by_screen(&mut self, delta: Vec2) {
        self.command = None;
        self.camera.pan_by_screen(delta);
    }

    /// Manual zoom about a screen point; cancels any running command.
    pub fn zoom_about(&mut self, anchor: Vec2, factor: f32) {
        self.command = None;
        self.camera.zoom_about(anchor, factor, self.size);
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.camera.world_to_screen(world, self.size)
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.camera.screen_to_world(screen, self.size)
    }
}

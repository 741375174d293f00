//! World/screen transform and eased camera transitions.

use railmap_core::{Vec2, ViewportSize};
use serde::Serialize;
use std::time::Duration;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 12.0;

/// Axis-aligned bounds in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let start = Self {
            min: first,
            max: first,
        };
        Some(iter.fold(start, |b, p| Self {
            min: Vec2::new(b.min.x.min(p.x), b.min.y.min(p.y)),
            max: Vec2::new(b.max.x.max(p.x), b.max.y.max(p.y)),
        }))
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        self.min.lerp(self.max, 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    /// World point shown at the viewport center.
    pub center: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn world_to_screen(&self, world: Vec2, viewport: ViewportSize) -> Vec2 {
        let origin = viewport.center();
        Vec2::new(
            (world.x - self.center.x) * self.zoom + origin.x,
            (world.y - self.center.y) * self.zoom + origin.y,
        )
    }

    pub fn screen_to_world(&self, screen: Vec2, viewport: ViewportSize) -> Vec2 {
        let origin = viewport.center();
        Vec2::new(
            (screen.x - origin.x) / self.zoom + self.center.x,
            (screen.y - origin.y) / self.zoom + self.center.y,
        )
    }

    /// Camera that shows `bounds` inside `viewport` with `padding` screen
    /// pixels on every side. Degenerate extents fit as one world unit.
    pub fn fit(bounds: Bounds, viewport: ViewportSize, padding: f32) -> Self {
        let available_w = (viewport.width - padding * 2.0).max(1.0);
        let available_h = (viewport.height - padding * 2.0).max(1.0);
        let zoom = (available_w / bounds.width().max(1.0))
            .min(available_h / bounds.height().max(1.0))
            .clamp(MIN_ZOOM, MAX_ZOOM);
        Self {
            center: bounds.center(),
            zoom,
        }
    }

    /// Zoom by `factor` keeping the world point under `anchor` fixed.
    pub fn zoom_about(&mut self, anchor: Vec2, factor: f32, viewport: ViewportSize) {
        let before = self.screen_to_world(anchor, viewport);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let after = self.screen_to_world(anchor, viewport);
        self.center.x += before.x - after.x;
        self.center.y += before.y - after.y;
    }

    pub fn pan_by_screen(&mut self, delta: Vec2) {
        self.center.x -= delta.x / self.zoom;
        self.center.y -= delta.y / self.zoom;
    }
}

pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// A single eased property animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    pub duration: Duration,
}

impl<T: Copy> Tween<T> {
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

impl Tween<Vec2> {
    pub fn sample(&self, elapsed: Duration) -> Vec2 {
        if self.is_finished(elapsed) {
            return self.to;
        }
        self.from.lerp(self.to, ease_in_out_cubic(progress(elapsed, self.duration)))
    }
}

impl Tween<f32> {
    pub fn sample(&self, elapsed: Duration) -> f32 {
        if self.is_finished(elapsed) {
            return self.to;
        }
        let t = ease_in_out_cubic(progress(elapsed, self.duration));
        self.from + (self.to - self.from) * t
    }
}

fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        1.0
    } else {
        (elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
    }
}

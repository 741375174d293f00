use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

pub mod error;

pub use error::NetworkError;

/// Station identifier. The station name doubles as its unique key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub String);

impl StationId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Service line identifier, e.g. `S1` or `S60`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub String);

impl LineId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: Vec2) -> f32 {
        Vec2::new(self.x - other.x, self.y - other.y).length()
    }

    pub fn lerp(&self, other: Vec2, t: f32) -> Vec2 {
        Vec2::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Pixel size of the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// The pair of controls that decides which part of the network is visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub min_traffic: u32,
    pub selected_lines: BTreeSet<LineId>,
}

impl FilterState {
    pub const DEFAULT_MIN_TRAFFIC: u32 = 50;
    /// Bounds of the traffic slider.
    pub const SLIDER_RANGE: RangeInclusive<u32> = 10..=2000;
    pub const SLIDER_STEP: u32 = 10;

    /// Default state: threshold 50 with every known line selected.
    pub fn new<'a>(known_lines: impl IntoIterator<Item = &'a LineId>) -> Self {
        Self {
            min_traffic: Self::DEFAULT_MIN_TRAFFIC,
            selected_lines: known_lines.into_iter().cloned().collect(),
        }
    }

    pub fn reset<'a>(&mut self, known_lines: impl IntoIterator<Item = &'a LineId>) {
        *self = Self::new(known_lines);
    }

    /// Returns `true` if the threshold actually changed.
    pub fn set_min_traffic(&mut self, min_traffic: u32) -> bool {
        if self.min_traffic == min_traffic {
            return false;
        }
        self.min_traffic = min_traffic;
        true
    }

    /// Flips the selection of `line`; returns whether it is now selected.
    pub fn toggle_line(&mut self, line: &LineId) -> bool {
        if self.selected_lines.remove(line) {
            false
        } else {
            self.selected_lines.insert(line.clone());
            true
        }
    }

    pub fn is_line_selected(&self, line: &LineId) -> bool {
        self.selected_lines.contains(line)
    }

    /// Clamps and rounds a raw slider value onto the slider's grid.
    pub fn snap_to_slider(raw: u32) -> u32 {
        let (lo, hi) = (*Self::SLIDER_RANGE.start(), *Self::SLIDER_RANGE.end());
        let clamped = raw.clamp(lo, hi);
        let steps = (clamped - lo + Self::SLIDER_STEP / 2) / Self::SLIDER_STEP;
        (lo + steps * Self::SLIDER_STEP).min(hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<LineId> {
        ["S1", "S2", "S3"].into_iter().map(LineId::from).collect()
    }

    #[test]
    fn test_filter_state_defaults() {
        let known = lines();
        let state = FilterState::new(&known);
        assert_eq!(state.min_traffic, 50);
        assert_eq!(state.selected_lines.len(), 3);
    }

    #[test]
    fn test_reset_restores_defaults_after_changes() {
        let known = lines();
        let mut state = FilterState::new(&known);
        state.set_min_traffic(1200);
        state.toggle_line(&LineId::from("S2"));
        state.toggle_line(&LineId::from("S9"));

        state.reset(&known);

        assert_eq!(state, FilterState::new(&known));
    }

    #[test]
    fn test_toggle_line_round_trips() {
        let known = lines();
        let mut state = FilterState::new(&known);
        let s2 = LineId::from("S2");
        assert!(!state.toggle_line(&s2));
        assert!(!state.is_line_selected(&s2));
        assert!(state.toggle_line(&s2));
        assert!(state.is_line_selected(&s2));
    }

    #[test]
    fn test_set_min_traffic_reports_change() {
        let mut state = FilterState::new(&lines());
        assert!(!state.set_min_traffic(50));
        assert!(state.set_min_traffic(60));
    }

    #[test]
    fn test_snap_to_slider() {
        assert_eq!(FilterState::snap_to_slider(0), 10);
        assert_eq!(FilterState::snap_to_slider(54), 50);
        assert_eq!(FilterState::snap_to_slider(55), 60);
        assert_eq!(FilterState::snap_to_slider(5000), 2000);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = StationId::from("Hauptbahnhof");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"Hauptbahnhof\"");
        let line: LineId = serde_json::from_str("\"S60\"").unwrap();
        assert_eq!(line.as_str(), "S60");
    }

    #[test]
    fn test_viewport_size_positive() {
        assert!(ViewportSize::new(800.0, 600.0).is_positive());
        assert!(!ViewportSize::new(0.0, 600.0).is_positive());
        assert!(!ViewportSize::new(800.0, -1.0).is_positive());
    }
}

//! Network Map Style System
//!
//! Color and size rules for stations and links. Line colors follow the
//! operator's published palette; stations served by more than two lines are
//! drawn as hubs.

use railmap_core::LineId;
use serde::{Deserialize, Serialize};

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..*self
        }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ============================================================================
// Color Constants
// ============================================================================

/// Known service lines in legend order.
pub const LINE_PALETTE: [(&str, Color); 7] = [
    ("S1", Color::rgb(0x82, 0xa1, 0x36)),  // green
    ("S2", Color::rgb(0xcf, 0x22, 0x2e)),  // red
    ("S3", Color::rgb(0xf5, 0x9e, 0x0b)),  // orange
    ("S4", Color::rgb(0x25, 0x63, 0xeb)),  // blue
    ("S5", Color::rgb(0x38, 0xbd, 0xf8)),  // light blue
    ("S6", Color::rgb(0x7c, 0x3a, 0xed)),  // purple
    ("S60", Color::rgb(0xc0, 0x84, 0xfc)), // light purple
];

pub const HUB_COLOR: Color = Color::rgb(0xff, 0xff, 0xff);
pub const DEFAULT_LINE_COLOR: Color = Color::rgb(0x64, 0x74, 0x8b);

pub const HUB_RING_COLOR: Color = Color::rgba(255, 255, 255, 77);
pub const LABEL_COLOR: Color = Color::rgb(0xf8, 0xfa, 0xfc);
pub const LABEL_MUTED_COLOR: Color = Color::rgba(0xf8, 0xfa, 0xfc, 179);
pub const LABEL_SHADOW_COLOR: Color = Color::rgba(0, 0, 0, 204);

// ============================================================================
// Size Constants
// ============================================================================

/// Radius multiplier for hubs.
pub const HUB_RADIUS_FACTOR: f32 = 2.0;
/// Radius multiplier for stations on one or two lines.
pub const STATION_RADIUS_FACTOR: f32 = 1.5;

/// Stations above this traffic value always carry a label.
pub const MAJOR_STATION_TRAFFIC: f64 = 1500.0;

/// A station becomes a hub when it is served by more than this many lines.
pub const HUB_LINE_COUNT: usize = 2;

pub fn known_lines() -> Vec<LineId> {
    LINE_PALETTE
        .iter()
        .map(|(name, _)| LineId::from(*name))
        .collect()
}

pub fn line_color(line: &LineId) -> Option<Color> {
    LINE_PALETTE
        .iter()
        .find(|(name, _)| *name == line.as_str())
        .map(|(_, color)| *color)
}

pub fn line_color_or_default(line: &LineId) -> Color {
    line_color(line).unwrap_or(DEFAULT_LINE_COLOR)
}

pub fn is_hub(lines: &[LineId]) -> bool {
    lines.len() > HUB_LINE_COUNT
}

/// Hubs get the hub color; everything else takes the color of its first line.
pub fn node_color(lines: &[LineId]) -> Color {
    if is_hub(lines) {
        return HUB_COLOR;
    }
    lines
        .first()
        .map(line_color_or_default)
        .unwrap_or(DEFAULT_LINE_COLOR)
}

/// `sqrt(traffic) * k`, with a larger `k` for hubs.
pub fn node_radius(traffic: f64, hub: bool) -> f32 {
    let factor = if hub {
        HUB_RADIUS_FACTOR
    } else {
        STATION_RADIUS_FACTOR
    };
    (traffic.max(0.0).sqrt() as f32) * factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(names: &[&str]) -> Vec<LineId> {
        names.iter().map(|n| LineId::from(*n)).collect()
    }

    #[test]
    fn test_hex_round_trip() {
        let color = Color::from_hex("#82a136").unwrap();
        assert_eq!(color, LINE_PALETTE[0].1);
        assert_eq!(color.to_hex(), "#82a136");
        assert_eq!(Color::from_hex("#000000cc"), Some(LABEL_SHADOW_COLOR));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#zz0000"), None);
    }

    #[test]
    fn test_node_color_rules() {
        assert_eq!(node_color(&lines(&["S1", "S2", "S3"])), HUB_COLOR);
        assert_eq!(node_color(&lines(&["S2", "S1"])), LINE_PALETTE[1].1);
        assert_eq!(node_color(&lines(&["S99"])), DEFAULT_LINE_COLOR);
        assert_eq!(node_color(&[]), DEFAULT_LINE_COLOR);
    }

    #[test]
    fn test_known_lines_in_legend_order() {
        let names: Vec<String> = known_lines().iter().map(|l| l.to_string()).collect();
        assert_eq!(names, ["S1", "S2", "S3", "S4", "S5", "S6", "S60"]);
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(LABEL_COLOR.with_alpha(0.5).a, 128);
        assert_eq!(HUB_COLOR.with_alpha(2.0).a, 255);
    }

    // ========================================================================
    // Property-Based Tests
    // ========================================================================

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn line_strategy() -> impl Strategy<Value = LineId> {
            prop_oneof![
                Just(LineId::from("S1")),
                Just(LineId::from("S2")),
                Just(LineId::from("S3")),
                Just(LineId::from("S4")),
                Just(LineId::from("S5")),
                Just(LineId::from("S6")),
                Just(LineId::from("S60")),
                "[A-Z][0-9]{1,3}".prop_map(LineId::new),
            ]
        }

        proptest! {
            /// Color is a pure function of the line list.
            #[test]
            fn prop_node_color_is_pure(served in prop::collection::vec(line_strategy(), 0..6)) {
                let color = node_color(&served);
                prop_assert_eq!(color, node_color(&served.clone()));

                let expected = if served.len() > 2 {
                    HUB_COLOR
                } else {
                    served.first().and_then(line_color).unwrap_or(DEFAULT_LINE_COLOR)
                };
                prop_assert_eq!(color, expected);
            }

            /// Radius never shrinks as traffic grows.
            #[test]
            fn prop_radius_monotone(
                a in 0.0f64..100_000.0,
                b in 0.0f64..100_000.0,
                hub in any::<bool>(),
            ) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(node_radius(lo, hub) <= node_radius(hi, hub));
            }

            /// Hubs are strictly larger than ordinary stations of equal traffic.
            #[test]
            fn prop_hub_radius_exceeds_station(v in 0.001f64..100_000.0) {
                prop_assert!(node_radius(v, true) > node_radius(v, false));
            }
        }
    }
}

//! Per-frame drawing policy: node discs, hub rings, zoom-dependent labels and
//! curved directed edges.
//!
//! Everything is expressed in world coordinates against the [`Canvas`] trait.
//! Sizes that must stay constant on screen (edge width, label font) are
//! divided by the current zoom before they reach the canvas.

use crate::filter::id_of;
use crate::layout::ForceSimulation;
use crate::store::StationNode;
use crate::style::{self, Color};
use railmap_core::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextShadow {
    pub color: Color,
    pub blur: f32,
}

/// Drawing surface in world coordinates.
pub trait Canvas {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color);
    /// Text centered on `anchor`, both horizontally and vertically.
    fn text_with_shadow(
        &mut self,
        anchor: Vec2,
        text: &str,
        font_size: f32,
        color: Color,
        shadow: TextShadow,
    );
    fn quadratic_curve(&mut self, from: Vec2, control: Vec2, to: Vec2, width: f32, color: Color);
    fn fill_triangle(&mut self, points: [Vec2; 3], color: Color);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Screen pixels.
    pub link_width: f32,
    pub link_curvature: f32,
    pub arrow_length: f32,
    pub label_zoom_threshold: f32,
    /// Screen pixels.
    pub label_font_size: f32,
    pub hub_label_offset: f32,
    pub label_offset: f32,
    pub ring_gap: f32,
    pub ring_width: f32,
    /// Radius of the loop drawn for a link from a station to itself.
    pub self_loop_radius: f32,
    pub label_shadow: TextShadow,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            link_width: 2.0,
            link_curvature: 0.25,
            arrow_length: 3.5,
            label_zoom_threshold: 2.0,
            label_font_size: 12.0,
            hub_label_offset: 10.0,
            label_offset: 7.0,
            ring_gap: 2.0,
            ring_width: 0.5,
            self_loop_radius: 4.0,
            label_shadow: TextShadow {
                color: style::LABEL_SHADOW_COLOR,
                blur: 4.0,
            },
        }
    }
}

const DRAWN_RADIUS_SCALE: f32 = 0.06;
const MIN_DRAWN_RADIUS: f32 = 1.5;
const MAX_DRAWN_RADIUS: f32 = 8.0;

/// World-space disc radius for a station.
pub fn drawn_radius(node: &StationNode) -> f32 {
    (node.radius * DRAWN_RADIUS_SCALE).clamp(MIN_DRAWN_RADIUS, MAX_DRAWN_RADIUS)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub nodes: usize,
    pub rings: usize,
    pub labels: usize,
    pub edges: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RenderAdapter {
    config: RenderConfig,
}

impl RenderAdapter {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn shows_label(&self, node: &StationNode, zoom: f32) -> bool {
        node.is_major() || zoom > self.config.label_zoom_threshold
    }

    /// Draw every edge, then every node, at `zoom`.
    ///
    /// A link whose endpoints share a position is drawn as a small loop
    /// above the target disc, without an arrow.
    pub fn render<C: Canvas + ?Sized>(
        &self,
        simulation: &ForceSimulation,
        zoom: f32,
        canvas: &mut C,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        let zoom = zoom.max(f32::EPSILON);

        for link in simulation.links() {
            let (Some(from), Some(to)) = (
                simulation.position(id_of(&link.source)),
                simulation.position(id_of(&link.target)),
            ) else {
                continue;
            };
            let target_radius = simulation
                .node(id_of(&link.target))
                .map_or(0.0, |node| drawn_radius(node));
            self.draw_edge(from, to, target_radius, link.color, zoom, canvas);
            stats.edges += 1;
        }

        for (node, position) in simulation.positions() {
            self.draw_node(node, position, zoom, canvas, &mut stats);
        }

        tracing::trace!(?stats, zoom, "Frame rendered");
        stats
    }

    fn draw_node<C: Canvas + ?Sized>(
        &self,
        node: &StationNode,
        position: Vec2,
        zoom: f32,
        canvas: &mut C,
        stats: &mut FrameStats,
    ) {
        let radius = drawn_radius(node);
        let hub = node.is_hub();
        canvas.fill_circle(position, radius, node.color);
        stats.nodes += 1;

        if hub {
            canvas.stroke_circle(
                position,
                radius + self.config.ring_gap,
                self.config.ring_width,
                style::HUB_RING_COLOR,
            );
            stats.rings += 1;
        }

        if self.shows_label(node, zoom) {
            let offset = if hub {
                self.config.hub_label_offset
            } else {
                self.config.label_offset
            }
            .max(radius + self.config.ring_gap);
            let color = if hub {
                style::LABEL_COLOR
            } else {
                style::LABEL_MUTED_COLOR
            };
            canvas.text_with_shadow(
                Vec2::new(position.x, position.y + offset),
                node.id.as_str(),
                self.config.label_font_size / zoom,
                color,
                self.config.label_shadow,
            );
            stats.labels += 1;
        }
    }

    fn draw_edge<C: Canvas + ?Sized>(
        &self,
        from: Vec2,
        to: Vec2,
        target_radius: f32,
        color: Color,
        zoom: f32,
        canvas: &mut C,
    ) {
        let width = self.config.link_width / zoom;
        if from.distance(to) <= f32::EPSILON {
            let loop_radius = self.config.self_loop_radius;
            let center = Vec2::new(to.x, to.y - target_radius - loop_radius * 0.5);
            canvas.stroke_circle(center, loop_radius, width, color);
            return;
        }
        let control = curve_control(from, to, self.config.link_curvature);
        canvas.quadratic_curve(from, control, to, width, color);

        if let Some(head) = arrow_head(from, control, to, target_radius, self.config.arrow_length) {
            canvas.fill_triangle(head, color);
        }
    }
}

/// Control point offset perpendicular to the chord by `curvature × length`.
pub fn curve_control(from: Vec2, to: Vec2, curvature: f32) -> Vec2 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let offset = (dx * dx + dy * dy).sqrt() * curvature;
    let angle = dy.atan2(dx) - std::f32::consts::FRAC_PI_2;
    let mid = from.lerp(to, 0.5);
    Vec2::new(mid.x + offset * angle.cos(), mid.y + offset * angle.sin())
}

pub fn quadratic_point(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    Vec2::new(
        u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    )
}

fn quadratic_tangent(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    Vec2::new(
        2.0 * u * (p1.x - p0.x) + 2.0 * t * (p2.x - p1.x),
        2.0 * u * (p1.y - p0.y) + 2.0 * t * (p2.y - p1.y),
    )
}

/// Arrow whose tip touches the target disc, pointing along the curve.
fn arrow_head(
    from: Vec2,
    control: Vec2,
    to: Vec2,
    target_radius: f32,
    length: f32,
) -> Option<[Vec2; 3]> {
    const STEPS: usize = 32;
    let mut t = 1.0;
    for i in (0..=STEPS).rev() {
        t = i as f32 / STEPS as f32;
        if quadratic_point(from, control, to, t).distance(to) >= target_radius {
            break;
        }
    }
    let tip = quadratic_point(from, control, to, t);
    let tangent = quadratic_tangent(from, control, to, t);
    let norm = tangent.length();
    if norm <= f32::EPSILON {
        return None;
    }
    let dir = Vec2::new(tangent.x / norm, tangent.y / norm);
    let half_width = length / 1.6 / 2.0;
    let base = Vec2::new(tip.x - dir.x * length, tip.y - dir.y * length);
    Some([
        tip,
        Vec2::new(base.x - dir.y * half_width, base.y + dir.x * half_width),
        Vec2::new(base.x + dir.y * half_width, base.y - dir.x * half_width),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter;
    use crate::store::GraphDataStore;
    use railmap_api::{RawLink, RawNetwork, RawStation};
    use railmap_core::{LineId, StationId};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Fill { radius: f32, color: Color },
        Ring { radius: f32, color: Color },
        Text {
            text: String,
            font_size: f32,
            color: Color,
        },
        Curve { width: f32, color: Color },
        Arrow { tip: Vec2 },
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Canvas for Recorder {
        fn fill_circle(&mut self, _center: Vec2, radius: f32, color: Color) {
            self.ops.push(Op::Fill { radius, color });
        }

        fn stroke_circle(&mut self, _center: Vec2, radius: f32, _width: f32, color: Color) {
            self.ops.push(Op::Ring { radius, color });
        }

        fn text_with_shadow(
            &mut self,
            _anchor: Vec2,
            text: &str,
            font_size: f32,
            color: Color,
            _shadow: TextShadow,
        ) {
            self.ops.push(Op::Text {
                text: text.to_string(),
                font_size,
                color,
            });
        }

        fn quadratic_curve(
            &mut self,
            _from: Vec2,
            _control: Vec2,
            _to: Vec2,
            width: f32,
            color: Color,
        ) {
            self.ops.push(Op::Curve { width, color });
        }

        fn fill_triangle(&mut self, points: [Vec2; 3], _color: Color) {
            self.ops.push(Op::Arrow { tip: points[0] });
        }
    }

    fn line(name: &str) -> LineId {
        LineId::from(name)
    }

    fn simulation() -> ForceSimulation {
        simulation_with_links(vec![RawLink {
            source: StationId::from("Small"),
            target: StationId::from("Major"),
            line: line("S1"),
        }])
    }

    fn simulation_with_links(links: Vec<RawLink>) -> ForceSimulation {
        let raw = RawNetwork {
            nodes: vec![
                RawStation {
                    id: StationId::from("Small"),
                    value: 100.0,
                    lines: vec![line("S1")],
                },
                RawStation {
                    id: StationId::from("Major"),
                    value: 2000.0,
                    lines: vec![line("S1"), line("S2"), line("S3")],
                },
            ],
            links,
            ..Default::default()
        };
        let graph = GraphDataStore::enrich(&raw);
        let lines = style::known_lines().into_iter().collect();
        let mut sim = ForceSimulation::default();
        sim.set_graph(&filter(&graph, 50, &lines));
        for _ in 0..5 {
            sim.step();
        }
        sim
    }

    #[test]
    fn test_low_zoom_labels_only_major() {
        let mut canvas = Recorder::default();
        let stats = RenderAdapter::default().render(&simulation(), 1.0, &mut canvas);

        assert_eq!(
            stats,
            FrameStats {
                nodes: 2,
                rings: 1,
                labels: 1,
                edges: 1
            }
        );
        let labels: Vec<_> = canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text {
                    text,
                    font_size,
                    color,
                } => Some((text.clone(), *font_size, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec![("Major".to_string(), 12.0, style::LABEL_COLOR)]);
    }

    #[test]
    fn test_high_zoom_labels_everything() {
        let mut canvas = Recorder::default();
        let stats = RenderAdapter::default().render(&simulation(), 3.0, &mut canvas);

        assert_eq!(stats.labels, 2);
        assert!(canvas.ops.contains(&Op::Text {
            text: "Small".to_string(),
            font_size: 4.0,
            color: style::LABEL_MUTED_COLOR,
        }));
    }

    #[test]
    fn test_zoom_threshold_is_exclusive() {
        let mut canvas = Recorder::default();
        let stats = RenderAdapter::default().render(&simulation(), 2.0, &mut canvas);
        assert_eq!(stats.labels, 1);
    }

    #[test]
    fn test_edges_drawn_before_nodes() {
        let mut canvas = Recorder::default();
        RenderAdapter::default().render(&simulation(), 1.0, &mut canvas);

        assert_eq!(
            canvas.ops[0],
            Op::Curve {
                width: 2.0,
                color: style::line_color_or_default(&line("S1"))
            }
        );
        assert!(matches!(canvas.ops[1], Op::Arrow { .. }));
        assert!(matches!(canvas.ops[2], Op::Fill { .. }));
    }

    #[test]
    fn test_edge_width_is_screen_constant() {
        let mut canvas = Recorder::default();
        RenderAdapter::default().render(&simulation(), 4.0, &mut canvas);
        assert!(canvas.ops.contains(&Op::Curve {
            width: 0.5,
            color: style::line_color_or_default(&line("S1"))
        }));
    }

    #[test]
    fn test_hub_ring_surrounds_disc() {
        let mut canvas = Recorder::default();
        RenderAdapter::default().render(&simulation(), 1.0, &mut canvas);

        let hub_fill = canvas
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Fill { radius, color } if *color == style::HUB_COLOR => Some(*radius),
                _ => None,
            })
            .unwrap();
        let ring = canvas
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Ring { radius, .. } => Some(*radius),
                _ => None,
            })
            .unwrap();
        assert!(ring > hub_fill);
    }

    #[test]
    fn test_arrow_stops_at_target_station_disc() {
        let sim = simulation();
        let mut canvas = Recorder::default();
        RenderAdapter::default().render(&sim, 1.0, &mut canvas);

        let major = StationId::from("Major");
        let target = sim.position(&major).unwrap();
        let radius = drawn_radius(sim.node(&major).unwrap());
        let tip = canvas
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Arrow { tip } => Some(*tip),
                _ => None,
            })
            .unwrap();
        let gap = tip.distance(target);
        assert!(gap >= radius - 1e-3, "gap {gap} inside disc {radius}");
        assert!(gap < radius + 4.0, "gap {gap} too far from disc {radius}");
    }

    #[test]
    fn test_self_loop_is_drawn_once() {
        let sim = simulation_with_links(vec![RawLink {
            source: StationId::from("Small"),
            target: StationId::from("Small"),
            line: line("S1"),
        }]);
        let mut canvas = Recorder::default();
        let stats = RenderAdapter::default().render(&sim, 1.0, &mut canvas);

        assert_eq!(sim.links().len(), 1);
        assert_eq!(stats.edges, 1);
        let color = style::line_color_or_default(&line("S1"));
        assert_eq!(
            canvas.ops[0],
            Op::Ring {
                radius: 4.0,
                color
            }
        );
        assert!(!canvas.ops.iter().any(|op| matches!(op, Op::Arrow { .. })));
    }

    #[test]
    fn test_drawn_radius_is_clamped() {
        let mut node = StationNode {
            id: StationId::from("X"),
            traffic: 0.0,
            lines: vec![],
            color: style::DEFAULT_LINE_COLOR,
            radius: 0.0,
        };
        assert_eq!(drawn_radius(&node), 1.5);
        node.radius = 1_000.0;
        assert_eq!(drawn_radius(&node), 8.0);
    }

    #[test]
    fn test_curve_control_is_off_chord() {
        let control = curve_control(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 0.25);
        assert!((control.x - 50.0).abs() < 1e-3);
        assert!((control.y + 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_arrow_tip_touches_target_disc() {
        let from = Vec2::new(0.0, 0.0);
        let to = Vec2::new(100.0, 0.0);
        let control = curve_control(from, to, 0.25);
        let head = arrow_head(from, control, to, 5.0, 3.5).unwrap();
        let gap = head[0].distance(to);
        assert!((5.0..9.0).contains(&gap), "gap {gap}");
    }
}

//! Incremental force-directed layout.
//!
//! The simulation is stepped once per rendered frame. It combines a spring
//! force along links, pairwise repulsion and a centering shift, with alpha
//! cooling as in d3-force. A run ends when alpha drops below `alpha_min` or the
//! cooldown tick budget is spent; the end of a run is reported exactly once.

use crate::camera::Bounds;
use crate::filter::{VisibleGraph, id_of};
use crate::store::{Endpoint, NetworkEdge, StationNode};
use railmap_core::{StationId, Vec2};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub cooldown_ticks: usize,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub link_distance: f32,
    /// Negative values repel.
    pub charge_strength: f32,
    pub charge_distance_min: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cooldown_ticks: 100,
            alpha_decay: 0.01,
            velocity_decay: 0.3,
            alpha_min: 0.001,
            link_distance: 30.0,
            charge_strength: -30.0,
            charge_distance_min: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStatus {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEvent {
    /// The run has cooled down; emitted once per run.
    Settled { ticks: usize },
}

#[derive(Debug, Clone)]
struct SimNode {
    station: Arc<StationNode>,
    pos: Vec2,
    vel: Vec2,
}

#[derive(Debug)]
pub struct ForceSimulation {
    config: LayoutConfig,
    nodes: Vec<SimNode>,
    index: HashMap<StationId, usize>,
    links: Vec<NetworkEdge>,
    link_pairs: Vec<(usize, usize)>,
    degree: Vec<usize>,
    alpha: f32,
    ticks: usize,
    status: LayoutStatus,
    graph_key: Option<u64>,
}

impl Default for ForceSimulation {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl ForceSimulation {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            index: HashMap::new(),
            links: Vec::new(),
            link_pairs: Vec::new(),
            degree: Vec::new(),
            alpha: 1.0,
            ticks: 0,
            status: LayoutStatus::Stopped,
            graph_key: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the simulated graph. Returns `true` if the run restarted, which
    /// happens whenever the visible node/link set differs from the current one.
    /// Stations present before and after keep their position and velocity.
    pub fn set_graph(&mut self, graph: &VisibleGraph) -> bool {
        let key = graph.reference_key();
        if self.graph_key == Some(key) {
            return false;
        }
        self.graph_key = Some(key);

        let previous: HashMap<StationId, (Vec2, Vec2)> = self
            .nodes
            .drain(..)
            .map(|n| (n.station.id.clone(), (n.pos, n.vel)))
            .collect();

        self.index.clear();
        for (i, station) in graph.nodes.iter().enumerate() {
            let (pos, vel) = previous
                .get(&station.id)
                .copied()
                .unwrap_or_else(|| (phyllotaxis(i), Vec2::ZERO));
            self.index.insert(station.id.clone(), i);
            self.nodes.push(SimNode {
                station: station.clone(),
                pos,
                vel,
            });
        }

        self.links.clear();
        self.link_pairs.clear();
        self.degree = vec![0; self.nodes.len()];
        for link in &graph.links {
            let (Some(&s), Some(&t)) = (
                self.index.get(id_of(&link.source)),
                self.index.get(id_of(&link.target)),
            ) else {
                continue;
            };
            self.degree[s] += 1;
            self.degree[t] += 1;
            self.link_pairs.push((s, t));
            self.links.push(NetworkEdge {
                source: Endpoint::Node(self.nodes[s].station.clone()),
                target: Endpoint::Node(self.nodes[t].station.clone()),
                line: link.line.clone(),
                color: link.color,
            });
        }

        self.alpha = 1.0;
        self.ticks = 0;
        self.status = if self.nodes.is_empty() {
            LayoutStatus::Stopped
        } else {
            LayoutStatus::Running
        };

        tracing::debug!(
            "Layout restarted with {} nodes, {} links ({} carried over)",
            self.nodes.len(),
            self.links.len(),
            previous.len()
        );
        true
    }

    /// Advance one tick. Returns the settle event on the tick that ends the run.
    pub fn step(&mut self) -> Option<LayoutEvent> {
        if self.status == LayoutStatus::Stopped {
            return None;
        }

        self.alpha += (0.0 - self.alpha) * self.config.alpha_decay;

        self.apply_link_force();
        self.apply_charge_force();
        self.apply_center_force();

        let keep = 1.0 - self.config.velocity_decay;
        for node in &mut self.nodes {
            node.vel.x *= keep;
            node.vel.y *= keep;
            node.pos.x += node.vel.x;
            node.pos.y += node.vel.y;
        }

        self.ticks += 1;
        if self.alpha < self.config.alpha_min || self.ticks >= self.config.cooldown_ticks {
            self.status = LayoutStatus::Stopped;
            tracing::debug!("Layout settled after {} ticks", self.ticks);
            return Some(LayoutEvent::Settled { ticks: self.ticks });
        }
        None
    }

    fn apply_link_force(&mut self) {
        let alpha = self.alpha;
        for (i, &(s, t)) in self.link_pairs.iter().enumerate() {
            if s == t {
                continue;
            }
            let (ps, vs) = (self.nodes[s].pos, self.nodes[s].vel);
            let (pt, vt) = (self.nodes[t].pos, self.nodes[t].vel);
            let mut dx = pt.x + vt.x - ps.x - vs.x;
            let mut dy = pt.y + vt.y - ps.y - vs.y;
            if dx == 0.0 && dy == 0.0 {
                dx = jiggle(i);
                dy = jiggle(i + 1);
            }
            let len = (dx * dx + dy * dy).sqrt();
            let strength = 1.0 / self.degree[s].min(self.degree[t]).max(1) as f32;
            let k = (len - self.config.link_distance) / len * alpha * strength;
            dx *= k;
            dy *= k;

            let bias =
                self.degree[s] as f32 / (self.degree[s] + self.degree[t]).max(1) as f32;
            self.nodes[t].vel.x -= dx * bias;
            self.nodes[t].vel.y -= dy * bias;
            self.nodes[s].vel.x += dx * (1.0 - bias);
            self.nodes[s].vel.y += dy * (1.0 - bias);
        }
    }

    fn apply_charge_force(&mut self) {
        let strength = self.config.charge_strength * self.alpha;
        let min2 = self.config.charge_distance_min * self.config.charge_distance_min;
        let count = self.nodes.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let mut dx = self.nodes[j].pos.x - self.nodes[i].pos.x;
                let mut dy = self.nodes[j].pos.y - self.nodes[i].pos.y;
                if dx == 0.0 && dy == 0.0 {
                    dx = jiggle(i);
                    dy = jiggle(j);
                }
                let mut l2 = dx * dx + dy * dy;
                if l2 < min2 {
                    l2 = (min2 * l2).sqrt();
                }
                let w = strength / l2;
                self.nodes[i].vel.x += dx * w;
                self.nodes[i].vel.y += dy * w;
                self.nodes[j].vel.x -= dx * w;
                self.nodes[j].vel.y -= dy * w;
            }
        }
    }

    fn apply_center_force(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        let n = self.nodes.len() as f32;
        let (sx, sy) = self
            .nodes
            .iter()
            .fold((0.0, 0.0), |(x, y), node| (x + node.pos.x, y + node.pos.y));
        let (mx, my) = (sx / n, sy / n);
        for node in &mut self.nodes {
            node.pos.x -= mx;
            node.pos.y -= my;
        }
    }

    pub fn status(&self) -> LayoutStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == LayoutStatus::Running
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn position(&self, id: &StationId) -> Option<Vec2> {
        self.index.get(id).map(|&i| self.nodes[i].pos)
    }

    pub fn node(&self, id: &StationId) -> Option<&Arc<StationNode>> {
        self.index.get(id).map(|&i| &self.nodes[i].station)
    }

    /// Stations with their current positions, in visible-graph order.
    pub fn positions(&self) -> impl Iterator<Item = (&Arc<StationNode>, Vec2)> {
        self.nodes.iter().map(|n| (&n.station, n.pos))
    }

    /// Links with both endpoints resolved to station nodes.
    pub fn links(&self) -> &[NetworkEdge] {
        &self.links
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.nodes.iter().map(|n| n.pos))
    }
}

/// Deterministic initial placement on a sunflower spiral.
fn phyllotaxis(i: usize) -> Vec2 {
    let radius = 10.0 * (0.5 + i as f32).sqrt();
    let angle = i as f32 * std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
    Vec2::new(radius * angle.cos(), radius * angle.sin())
}

fn jiggle(seed: usize) -> f32 {
    ((seed % 7) as f32 + 1.0) * 1e-6
}

//! Enriched, immutable graph snapshot for one map session.

use crate::style;
use crate::style::Color;
use railmap_api::RawNetwork;
use railmap_core::{LineId, NetworkError, StationId};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationNode {
    pub id: StationId,
    pub traffic: f64,
    /// Serving lines, first occurrence order, no duplicates.
    pub lines: Vec<LineId>,
    pub color: Color,
    pub radius: f32,
}

impl StationNode {
    pub fn is_hub(&self) -> bool {
        style::is_hub(&self.lines)
    }

    pub fn is_major(&self) -> bool {
        self.traffic > style::MAJOR_STATION_TRAFFIC
    }
}

/// An edge endpoint: either the bare station id from the payload, or the node
/// itself once the layout has resolved it.
#[derive(Debug, Clone)]
pub enum Endpoint {
    Id(StationId),
    Node(Arc<StationNode>),
}

impl Endpoint {
    /// The underlying station id, whichever form the endpoint is in.
    pub fn id(&self) -> &StationId {
        match self {
            Endpoint::Id(id) => id,
            Endpoint::Node(node) => &node.id,
        }
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEdge {
    pub source: Endpoint,
    pub target: Endpoint,
    pub line: LineId,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichReport {
    pub rejected_nodes: usize,
    pub rejected_links: usize,
    pub duplicate_nodes: usize,
    /// Links naming a station absent from the node list. They are kept; the
    /// filter never shows them.
    pub dangling_links: usize,
}

#[derive(Debug, Clone, Default)]
pub struct EnrichedGraph {
    pub nodes: Vec<Arc<StationNode>>,
    pub links: Vec<NetworkEdge>,
    pub report: EnrichReport,
}

impl EnrichedGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &StationId) -> Option<&Arc<StationNode>> {
        self.nodes.iter().find(|n| &n.id == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GraphStatus {
    /// Nothing loaded yet.
    Empty,
    Ready,
    /// The provider failed or answered with an unusable payload.
    NoData(String),
}

#[derive(Debug)]
pub struct GraphDataStore {
    graph: EnrichedGraph,
    status: GraphStatus,
    known_lines: Vec<LineId>,
}

impl Default for GraphDataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphDataStore {
    pub fn new() -> Self {
        Self {
            graph: EnrichedGraph::default(),
            status: GraphStatus::Empty,
            known_lines: style::known_lines(),
        }
    }

    /// Build the store from a fetch outcome. Errors are logged and degrade to an
    /// empty graph; nothing is retried.
    pub fn from_fetch(result: Result<RawNetwork, NetworkError>) -> Self {
        let mut store = Self::new();
        match result {
            Ok(raw) => {
                store.graph = Self::enrich(&raw);
                store.status = GraphStatus::Ready;
            }
            Err(e) if e.is_malformed() => {
                tracing::error!("Network payload unusable: {}", e);
                store.status = GraphStatus::NoData(e.to_string());
            }
            Err(e) => {
                tracing::error!("Failed to fetch network graph: {}", e);
                store.status = GraphStatus::NoData(e.to_string());
            }
        }
        store
    }

    pub fn from_json_value(value: &serde_json::Value) -> Self {
        Self::from_fetch(RawNetwork::from_value(value))
    }

    /// Derive colors and radii for every station and link.
    pub fn enrich(raw: &RawNetwork) -> EnrichedGraph {
        let mut report = EnrichReport {
            rejected_nodes: raw.report.rejected_nodes,
            rejected_links: raw.report.rejected_links,
            ..Default::default()
        };

        let mut seen: HashSet<&StationId> = HashSet::with_capacity(raw.nodes.len());
        let mut nodes = Vec::with_capacity(raw.nodes.len());
        for station in &raw.nodes {
            if !seen.insert(&station.id) {
                tracing::warn!("Duplicate station id {}, keeping first record", station.id);
                report.duplicate_nodes += 1;
                continue;
            }

            let mut lines: Vec<LineId> = Vec::with_capacity(station.lines.len());
            for line in &station.lines {
                if !lines.contains(line) {
                    lines.push(line.clone());
                }
            }

            let hub = style::is_hub(&lines);
            nodes.push(Arc::new(StationNode {
                id: station.id.clone(),
                traffic: station.value,
                color: style::node_color(&lines),
                radius: style::node_radius(station.value, hub),
                lines,
            }));
        }

        let links: Vec<NetworkEdge> = raw
            .links
            .iter()
            .map(|link| {
                if !seen.contains(&link.source) || !seen.contains(&link.target) {
                    report.dangling_links += 1;
                }
                NetworkEdge {
                    source: Endpoint::Id(link.source.clone()),
                    target: Endpoint::Id(link.target.clone()),
                    line: link.line.clone(),
                    color: style::line_color_or_default(&link.line),
                }
            })
            .collect();

        tracing::debug!(
            "Enriched {} stations and {} links ({:?})",
            nodes.len(),
            links.len(),
            report
        );

        EnrichedGraph {
            nodes,
            links,
            report,
        }
    }

    pub fn graph(&self) -> &EnrichedGraph {
        &self.graph
    }

    pub fn status(&self) -> &GraphStatus {
        &self.status
    }

    /// Line identifiers offered as toggles and listed in the legend.
    pub fn known_lines(&self) -> &[LineId] {
        &self.known_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railmap_api::{RawLink, RawStation};
    use serde_json::json;

    fn station(id: &str, value: f64, lines: &[&str]) -> RawStation {
        RawStation {
            id: StationId::from(id),
            value,
            lines: lines.iter().map(|l| LineId::from(*l)).collect(),
        }
    }

    fn link(source: &str, target: &str, line: &str) -> RawLink {
        RawLink {
            source: StationId::from(source),
            target: StationId::from(target),
            line: LineId::from(line),
        }
    }

    #[test]
    fn test_enrich_derives_color_and_radius() {
        let raw = RawNetwork {
            nodes: vec![
                station("A", 100.0, &["S1"]),
                station("B", 2000.0, &["S1", "S2", "S3"]),
            ],
            links: vec![link("A", "B", "S1"), link("B", "A", "X9")],
            ..Default::default()
        };

        let graph = GraphDataStore::enrich(&raw);

        let a = graph.node(&StationId::from("A")).unwrap();
        assert_eq!(a.color, style::LINE_PALETTE[0].1);
        assert!((a.radius - 15.0).abs() < 1e-4);
        assert!(!a.is_hub());

        let b = graph.node(&StationId::from("B")).unwrap();
        assert_eq!(b.color, style::HUB_COLOR);
        assert!(b.is_hub());
        assert!(b.is_major());

        assert_eq!(graph.links[0].color, style::LINE_PALETTE[0].1);
        assert_eq!(graph.links[1].color, style::DEFAULT_LINE_COLOR);
        assert!(matches!(graph.links[0].source, Endpoint::Id(_)));
    }

    #[test]
    fn test_enrich_dedupes_lines_before_hub_check() {
        let raw = RawNetwork {
            nodes: vec![station("C", 400.0, &["S4", "S4", "S4", "S5"])],
            ..Default::default()
        };
        let graph = GraphDataStore::enrich(&raw);
        let c = &graph.nodes[0];
        assert_eq!(c.lines.len(), 2);
        assert!(!c.is_hub());
        assert_eq!(c.color, style::LINE_PALETTE[3].1);
    }

    #[test]
    fn test_enrich_reports_duplicates_and_dangling_links() {
        let raw = RawNetwork {
            nodes: vec![station("A", 10.0, &["S1"]), station("A", 99.0, &["S2"])],
            links: vec![link("A", "Nowhere", "S1")],
            ..Default::default()
        };
        let graph = GraphDataStore::enrich(&raw);
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].traffic, 10.0);
        assert_eq!(graph.report.duplicate_nodes, 1);
        assert_eq!(graph.report.dangling_links, 1);
    }

    #[test]
    fn test_missing_collection_yields_empty_graph_with_no_data() {
        let store = GraphDataStore::from_json_value(&json!({ "nodes": [] }));
        assert!(store.graph().is_empty());
        assert!(store.graph().links.is_empty());
        assert!(matches!(store.status(), GraphStatus::NoData(_)));
    }

    #[test]
    fn test_fetch_failure_degrades_to_empty() {
        let store =
            GraphDataStore::from_fetch(Err(NetworkError::Request("connection refused".into())));
        assert!(store.graph().is_empty());
        assert_eq!(
            store.status(),
            &GraphStatus::NoData("Request failed: connection refused".to_string())
        );
        assert_eq!(store.known_lines().len(), style::LINE_PALETTE.len());
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = GraphDataStore::new();
        assert_eq!(store.status(), &GraphStatus::Empty);
        assert!(store.graph().is_empty());
    }

    #[test]
    fn test_endpoint_equality_ignores_representation() {
        let node = Arc::new(StationNode {
            id: StationId::from("A"),
            traffic: 1.0,
            lines: vec![],
            color: style::DEFAULT_LINE_COLOR,
            radius: 1.0,
        });
        assert_eq!(Endpoint::Id(StationId::from("A")), Endpoint::Node(node));
    }
}

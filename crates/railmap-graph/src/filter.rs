//! Visible-subgraph derivation.

use crate::store::{EnrichedGraph, Endpoint, NetworkEdge, StationNode};
use railmap_core::{FilterState, LineId, StationId};
use serde_json::{Value, json};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Resolve an edge endpoint to its station id.
///
/// This is the only place that knows endpoints come in two shapes.
pub fn id_of(endpoint: &Endpoint) -> &StationId {
    endpoint.id()
}

/// The part of the network currently shown.
#[derive(Debug, Clone, Default)]
pub struct VisibleGraph {
    pub nodes: Vec<Arc<StationNode>>,
    pub links: Vec<NetworkEdge>,
}

impl VisibleGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> HashSet<&StationId> {
        self.nodes.iter().map(|n| &n.id).collect()
    }

    /// Identity of the node/link set. Two results with the same key contain the
    /// same stations and the same links, so the layout need not restart.
    pub fn reference_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.nodes.len().hash(&mut hasher);
        for node in &self.nodes {
            node.id.hash(&mut hasher);
        }
        self.links.len().hash(&mut hasher);
        for link in &self.links {
            id_of(&link.source).hash(&mut hasher);
            id_of(&link.target).hash(&mut hasher);
            link.line.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Stations with no visible link.
    pub fn isolated_nodes(&self) -> Vec<&StationId> {
        let linked: HashSet<&StationId> = self
            .links
            .iter()
            .flat_map(|l| [id_of(&l.source), id_of(&l.target)])
            .collect();
        self.nodes
            .iter()
            .map(|n| &n.id)
            .filter(|id| !linked.contains(id))
            .collect()
    }

    pub fn hubs(&self) -> impl Iterator<Item = &Arc<StationNode>> {
        self.nodes.iter().filter(|n| n.is_hub())
    }

    /// Plain `{nodes, links}` document with endpoints written as ids.
    pub fn to_json(&self) -> Value {
        json!({
            "nodes": self.nodes.iter().map(|n| json!({
                "id": n.id,
                "value": n.traffic,
                "lines": n.lines,
                "color": n.color.to_hex(),
                "radius": n.radius,
                "hub": n.is_hub(),
            })).collect::<Vec<_>>(),
            "links": self.links.iter().map(|l| json!({
                "source": id_of(&l.source),
                "target": id_of(&l.target),
                "line": l.line,
                "color": l.color.to_hex(),
            })).collect::<Vec<_>>(),
        })
    }
}

/// Derive the visible subgraph.
///
/// A station is visible iff its traffic reaches `min_traffic`. A link is visible
/// iff its line is selected and both endpoints are visible stations. Inputs are
/// not modified; runs in O(N + E).
pub fn filter(
    graph: &EnrichedGraph,
    min_traffic: u32,
    selected_lines: &BTreeSet<LineId>,
) -> VisibleGraph {
    let threshold = f64::from(min_traffic);

    let nodes: Vec<Arc<StationNode>> = graph
        .nodes
        .iter()
        .filter(|n| n.traffic >= threshold)
        .cloned()
        .collect();

    let visible_ids: HashSet<&StationId> = nodes.iter().map(|n| &n.id).collect();

    let links: Vec<NetworkEdge> = graph
        .links
        .iter()
        .filter(|link| {
            selected_lines.contains(&link.line)
                && visible_ids.contains(id_of(&link.source))
                && visible_ids.contains(id_of(&link.target))
        })
        .cloned()
        .collect();

    VisibleGraph { nodes, links }
}

pub fn filter_with_state(graph: &EnrichedGraph, state: &FilterState) -> VisibleGraph {
    filter(graph, state.min_traffic, &state.selected_lines)
}

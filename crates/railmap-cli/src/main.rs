use anyhow::{Result, bail};
use clap::Parser;
use railmap_api::{ApiConfig, FileNetworkProvider, HttpNetworkProvider, NetworkProvider};
use railmap_core::{FilterState, LineId};
use railmap_graph::{
    Bounds, ForceSimulation, GraphDataStore, GraphStatus, LayoutEvent, VisibleGraph,
    filter_with_state,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect the commuter-rail network graph", long_about = None)]
struct Args {
    /// Base URL of the analytics API (overrides RAILMAP_API_BASE)
    #[arg(long, conflicts_with = "file")]
    api_base: Option<String>,

    /// Read a saved `/network` response instead of calling the API
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Minimum traffic for a station to be shown
    #[arg(short, long, default_value_t = FilterState::DEFAULT_MIN_TRAFFIC)]
    min_traffic: u32,

    /// Lines whose links are shown (default: every known line)
    #[arg(short, long, value_delimiter = ',')]
    lines: Vec<String>,

    /// Run the force layout to convergence and report the settled extent
    #[arg(long)]
    layout: bool,

    /// Print the visible graph as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize, PartialEq)]
struct Summary {
    stations: usize,
    links: usize,
    hubs: Vec<String>,
    isolated: Vec<String>,
}

impl Summary {
    fn of(visible: &VisibleGraph) -> Self {
        Self {
            stations: visible.nodes.len(),
            links: visible.links.len(),
            hubs: visible.hubs().map(|n| n.id.to_string()).collect(),
            isolated: visible
                .isolated_nodes()
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct LayoutReport {
    ticks: usize,
    bounds: Option<Bounds>,
}

fn provider(args: &Args) -> Result<Box<dyn NetworkProvider>> {
    if let Some(path) = &args.file {
        return Ok(Box::new(FileNetworkProvider::new(path)));
    }
    let mut config = ApiConfig::from_env();
    if let Some(base) = &args.api_base {
        config = config.with_base_url(railmap_api::config::resolve_base_url(Some(base.clone())));
    }
    tracing::info!("Fetching network from {}", config.network_url());
    Ok(Box::new(HttpNetworkProvider::new(config)?))
}

fn filter_state(args: &Args, store: &GraphDataStore) -> FilterState {
    let mut state = FilterState::new(store.known_lines());
    state.set_min_traffic(args.min_traffic);
    if !args.lines.is_empty() {
        state.selected_lines = args
            .lines
            .iter()
            .map(|l| LineId::new(l.trim()))
            .filter(|l| !l.as_str().is_empty())
            .collect();
        for line in &state.selected_lines {
            if !store.known_lines().contains(line) {
                tracing::warn!("Line {} is not a known line", line);
            }
        }
    }
    state
}

fn run_layout(visible: &VisibleGraph) -> LayoutReport {
    let mut simulation = ForceSimulation::default();
    simulation.set_graph(visible);
    let mut ticks = 0;
    while simulation.is_running() {
        if let Some(LayoutEvent::Settled { ticks: settled }) = simulation.step() {
            ticks = settled;
        }
    }
    LayoutReport {
        ticks,
        bounds: simulation.bounds(),
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so `--json` output stays parseable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
    let args = Args::parse();

    let provider = provider(&args)?;
    let store = GraphDataStore::from_fetch(provider.fetch_network());
    if let GraphStatus::NoData(reason) = store.status() {
        bail!("No network data: {}", reason);
    }

    let graph = store.graph();
    let state = filter_state(&args, &store);
    let visible = filter_with_state(graph, &state);
    let summary = Summary::of(&visible);
    let layout = args.layout.then(|| run_layout(&visible));

    if args.json {
        let mut doc = visible.to_json();
        doc["summary"] = serde_json::to_value(&summary)?;
        if let Some(layout) = &layout {
            doc["layout"] = serde_json::to_value(layout)?;
        }
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!(
        "Network: {} stations, {} links (rejected {} stations, {} links; {} dangling links)",
        graph.nodes.len(),
        graph.links.len(),
        graph.report.rejected_nodes,
        graph.report.rejected_links,
        graph.report.dangling_links
    );
    let lines: Vec<&str> = state.selected_lines.iter().map(|l| l.as_str()).collect();
    println!(
        "Visible at >= {} trains on [{}]: {} stations, {} links",
        state.min_traffic,
        lines.join(","),
        summary.stations,
        summary.links
    );
    println!("Hubs ({}): {}", summary.hubs.len(), summary.hubs.join(", "));
    println!(
        "Isolated ({}): {}",
        summary.isolated.len(),
        summary.isolated.join(", ")
    );
    if let Some(layout) = layout {
        match layout.bounds {
            Some(b) => println!(
                "Layout settled after {} ticks, extent {:.1} x {:.1}",
                layout.ticks,
                b.width(),
                b.height()
            ),
            None => println!("Layout: nothing to place"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> GraphDataStore {
        GraphDataStore::from_json_value(&json!({
            "nodes": [
                {"id": "A", "value": 100, "lines": ["S1"]},
                {"id": "B", "value": 2000, "lines": ["S1", "S2", "S3"]},
                {"id": "C", "value": 700, "lines": ["S6"]}
            ],
            "links": [{"source": "A", "target": "B", "line": "S1"}]
        }))
    }

    #[test]
    fn test_args_parse_line_list() {
        let args = Args::parse_from([
            "railmap-cli",
            "--file",
            "net.json",
            "--lines",
            "S1, S2",
            "-m",
            "150",
        ]);
        let state = filter_state(&args, &store());
        assert_eq!(state.min_traffic, 150);
        assert_eq!(
            state.selected_lines,
            [LineId::from("S1"), LineId::from("S2")].into_iter().collect()
        );
    }

    #[test]
    fn test_api_base_conflicts_with_file() {
        let result = Args::try_parse_from([
            "railmap-cli",
            "--file",
            "a.json",
            "--api-base",
            "http://x",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_lists_hubs_and_isolated() {
        let args = Args::parse_from(["railmap-cli", "--file", "net.json"]);
        let store = store();
        let visible = filter_with_state(store.graph(), &filter_state(&args, &store));

        assert_eq!(
            Summary::of(&visible),
            Summary {
                stations: 3,
                links: 1,
                hubs: vec!["B".to_string()],
                isolated: vec!["C".to_string()],
            }
        );
    }

    #[test]
    fn test_layout_report_settles() {
        let store = store();
        let visible = filter_with_state(store.graph(), &FilterState::new(store.known_lines()));
        let report = run_layout(&visible);
        assert_eq!(report.ticks, 100);
        assert!(report.bounds.is_some());
    }
}

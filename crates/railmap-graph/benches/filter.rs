use criterion::{Criterion, black_box, criterion_group, criterion_main};
use railmap_api::{RawLink, RawNetwork, RawStation};
use railmap_core::{LineId, StationId};
use railmap_graph::{ForceSimulation, GraphDataStore, filter, style};
use std::collections::BTreeSet;

fn synthetic_network(station_count: usize) -> RawNetwork {
    let lines = style::known_lines();
    let nodes = (0..station_count)
        .map(|i| RawStation {
            id: StationId::new(format!("Station_{}", i)),
            value: ((i * 37) % 2000) as f64,
            lines: vec![lines[i % lines.len()].clone()],
        })
        .collect();
    let links = (1..station_count)
        .map(|i| RawLink {
            source: StationId::new(format!("Station_{}", i - 1)),
            target: StationId::new(format!("Station_{}", i)),
            line: lines[i % lines.len()].clone(),
        })
        .collect();
    RawNetwork {
        nodes,
        links,
        ..Default::default()
    }
}

fn bench_filter_5000_stations(c: &mut Criterion) {
    let graph = GraphDataStore::enrich(&synthetic_network(5000));
    let all: BTreeSet<LineId> = style::known_lines().into_iter().collect();

    c.bench_function("filter_5000_stations", |b| {
        b.iter(|| {
            let visible = filter(black_box(&graph), black_box(500), &all);
            black_box(visible);
        })
    });
}

fn bench_layout_run_300_stations(c: &mut Criterion) {
    let graph = GraphDataStore::enrich(&synthetic_network(300));
    let all: BTreeSet<LineId> = style::known_lines().into_iter().collect();
    let visible = filter(&graph, 10, &all);

    c.bench_function("layout_run_300_stations", |b| {
        b.iter(|| {
            let mut sim = ForceSimulation::default();
            sim.set_graph(black_box(&visible));
            while sim.step().is_none() {}
            black_box(sim.bounds());
        })
    });
}

criterion_group!(benches, bench_filter_5000_stations, bench_layout_run_300_stations);
criterion_main!(benches);

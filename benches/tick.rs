//! Criterion benchmarks for the simulator tick and snapshot export.
//!
//! Run with:
//!   cargo bench
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pulsenet::{LayerSizes, SimConfig, Simulator};

fn make_sim(layers: LayerSizes, seed: u64) -> Simulator {
    let cfg = SimConfig::default().with_layers(layers).with_seed(seed);
    let mut sim = Simulator::new(cfg).expect("default durations are valid");
    sim.resize(1280.0, 720.0);
    sim
}

/// Benchmark tick() with varying layer widths.
fn bench_tick_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_size");

    for width in [4usize, 16, 64, 256].iter() {
        let layers = LayerSizes::new(*width, *width, *width / 2);
        group.throughput(Throughput::Elements(layers.connection_count() as u64));

        group.bench_with_input(BenchmarkId::new("tick", width), &layers, |b, &layers| {
            let mut sim = make_sim(layers, 42);
            b.iter(|| black_box(sim.tick(1.0 / 60.0)));
        });
    }

    group.finish();
}

/// Benchmark a full frame: tick plus snapshot export.
fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    group.bench_function("default_layers", |b| {
        let mut sim = make_sim(LayerSizes::default(), 7);
        sim.set_hover(Some(4));
        b.iter(|| {
            sim.tick(1.0 / 60.0);
            black_box(sim.render_state().signals.len())
        });
    });

    group.bench_function("wide_layers", |b| {
        let mut sim = make_sim(LayerSizes::new(64, 64, 32), 7);
        b.iter(|| {
            sim.tick(1.0 / 60.0);
            black_box(sim.render_state().signals.len())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_tick_sizes, bench_frame);
criterion_main!(benches);

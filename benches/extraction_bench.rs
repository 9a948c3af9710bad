//! Extraction and projection benchmarks.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `latency_scan` | `extract_latency` on short, long and marker-less messages |
//! | `context` | `derive_context` for path-rooted and absolute URLs by depth |
//! | `projection` | Records/s through `Projection::project` at 10k/100k records |
//!
//! # Viewing results
//!
//! ```sh
//! cargo bench --bench extraction_bench
//! open target/criterion/report/index.html
//! ```

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lat_core::{derive_context, extract_latency, Projection, RawRecord};

fn corpus(n: usize) -> Vec<RawRecord> {
    const CONTEXTS: [&str; 4] = ["erp", "crm", "hr", "fin"];
    (0..n)
        .map(|i| {
            let ctx = CONTEXTS[i % CONTEXTS.len()];
            if i % 2 == 0 {
                RawRecord::embedded(
                    format!("t{i}"),
                    format!(
                        "GET http://erp-sys-apigateway:8765/{ctx}/item/{i}, Time Taken in ms= {}",
                        i % 997
                    ),
                )
            } else {
                RawRecord::split(
                    format!("t{i}"),
                    format!("/{ctx}/item/{i}"),
                    format!("Time Taken in ms= {}", i % 997),
                )
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Latency marker scan
// ---------------------------------------------------------------------------

fn latency_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("latency_scan");
    group.throughput(Throughput::Elements(1));

    let short = "Time Taken in ms= 42".to_string();
    let long = format!("{} Time Taken in ms= 42 trailing", "x".repeat(2_000));
    let missing = "y".repeat(2_000);

    for (name, message) in [("short", &short), ("long", &long), ("missing", &missing)] {
        group.bench_with_input(BenchmarkId::new(name, ""), message, |b, m| {
            b.iter(|| black_box(extract_latency(black_box(m))))
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Context derivation
// ---------------------------------------------------------------------------

fn context_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("context");

    let rooted = "/erp/orders/42/lines/7/notes";
    let absolute = "http://erp-sys-apigateway:8765/erp/orders/42/lines/7/notes";

    for depth in [0usize, 2, 8] {
        group.bench_with_input(BenchmarkId::new("path_rooted", depth), &depth, |b, &d| {
            b.iter(|| black_box(derive_context(black_box(rooted), d)))
        });
        group.bench_with_input(BenchmarkId::new("absolute", depth), &depth, |b, &d| {
            b.iter(|| black_box(derive_context(black_box(absolute), d)))
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Whole-batch projection
// ---------------------------------------------------------------------------

fn projection_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    for count in [10_000usize, 100_000] {
        let records = corpus(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("unfiltered", count), &records, |b, r| {
            let projection = Projection::new(1);
            b.iter(|| black_box(projection.project(r)))
        });
        group.bench_with_input(BenchmarkId::new("url_contains", count), &records, |b, r| {
            let projection = Projection::new(1).url_contains("crm");
            b.iter(|| black_box(projection.project(r)))
        });
    }
    group.finish();
}

criterion_group!(extraction_benches, latency_bench, context_bench, projection_bench);
criterion_main!(extraction_benches);

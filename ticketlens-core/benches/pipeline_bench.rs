//! Criterion benchmarks for the dashboard refresh path.
//!
//! Benchmarks:
//! 1. Filter alone, across dataset sizes
//! 2. Full `run` (filter + summary + distribution + trend series)
//! 3. Loader parse of a gzip payload

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

use ticketlens_core::criteria::FilterCriteria;
use ticketlens_core::data::parse_listings;
use ticketlens_core::domain::Listing;
use ticketlens_core::pipeline::filter;
use ticketlens_core::run;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_listings(n: usize) -> Vec<Listing> {
    let base = NaiveDate::from_ymd_opt(2024, 9, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| Listing {
            id: Some(format!("T{:05}", i % 500)),
            section: format!("{}", 100 + i % 40),
            row: format!("{}", 1 + i % 25),
            price: 80.0 + ((i as f64) * 0.37).sin().abs() * 1500.0,
            grade: (i % 10) as f64,
            timestamp: base + Duration::hours((i / 500) as i64),
        })
        .collect()
}

fn section_criteria() -> FilterCriteria {
    FilterCriteria::builder()
        .section("112")
        .min_price(100.0)
        .max_price(1600.0)
        .build()
        .unwrap()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    for n in [1_000usize, 10_000, 100_000] {
        let listings = make_listings(n);
        let criteria = FilterCriteria::builder().id_substring("t001").build().unwrap();
        group.bench_with_input(BenchmarkId::new("id_substring", n), &listings, |b, ls| {
            b.iter(|| filter(black_box(ls), black_box(&criteria)))
        });
        let criteria = section_criteria();
        group.bench_with_input(BenchmarkId::new("section_price", n), &listings, |b, ls| {
            b.iter(|| filter(black_box(ls), black_box(&criteria)))
        });
    }
    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let listings = make_listings(50_000);
    let criteria = section_criteria();
    c.bench_function("run_50k_section", |b| {
        b.iter(|| run(black_box(&listings), black_box(&criteria)))
    });
    let all = FilterCriteria::no_filter();
    c.bench_function("run_50k_no_filter", |b| {
        b.iter(|| run(black_box(&listings), black_box(&all)))
    });
}

fn bench_parse(c: &mut Criterion) {
    let json = serde_json::json!(make_listings(10_000)
        .iter()
        .map(|l| serde_json::json!({
            "id": l.id,
            "sid": l.section,
            "r": l.row,
            "p": l.price,
            "grade": l.grade,
            "timestamp": l.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }))
        .collect::<Vec<_>>());
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(json.to_string().as_bytes()).unwrap();
    let gz = enc.finish().unwrap();

    c.bench_function("parse_gzip_10k", |b| {
        b.iter(|| parse_listings(black_box(&gz)).unwrap())
    });
}

criterion_group!(benches, bench_filter, bench_run, bench_parse);
criterion_main!(benches);

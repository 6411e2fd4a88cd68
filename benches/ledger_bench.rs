//! Benchmarks for the visit ledger's derived computations
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use footfall::storage::{RegionAggregate, VisitRecord};

fn create_test_records(count: usize) -> Vec<VisitRecord> {
    (0..count)
        .map(|i| {
            // spread records over a handful of locations and dates
            let location = (i % 7) as f64;
            VisitRecord::new(
                10.0 + location,
                100.0 + location,
                format!("City {}, Region, Country", i % 7),
                format!("2025-01-{:02}", (i % 28) + 1),
                format!("2025-01-{:02}T12:00:00Z", (i % 28) + 1),
            )
        })
        .collect()
}

fn bench_dedup_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("dedup_scan");

    for size in [10, 100, 1000] {
        let records = create_test_records(size);
        let candidate = records[size / 2].clone();

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("scan_{}", size), |b| {
            b.iter(|| {
                black_box(&records)
                    .iter()
                    .any(|existing| existing.same_place_and_day(black_box(&candidate)))
            })
        });
    }

    group.finish();
}

fn bench_region_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("region_grouping");

    for size in [10, 100, 1000] {
        let records = create_test_records(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("group_{}", size), |b| {
            b.iter(|| RegionAggregate::group(black_box(&records)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dedup_scan, bench_region_grouping);
criterion_main!(benches);

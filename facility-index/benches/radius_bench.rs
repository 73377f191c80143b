//! Radius query benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use facility_index::{FacilityIndex, FacilityRecord, Position, QueryStrategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const KINDS: [&str; 6] = ["hospital", "clinic", "pharmacy", "doctors", "dentist", "laboratory"];

/// Random facilities spread over Austria's bounding box.
fn facilities(count: usize) -> Vec<FacilityRecord> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..count)
        .map(|i| {
            let lat = rng.gen_range(46.4..49.0);
            let lon = rng.gen_range(9.5..17.2);
            FacilityRecord::new(i as i64, Position::new(lat, lon), KINDS[i % KINDS.len()])
        })
        .collect()
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("Facility Load");

    for size in [1_000, 10_000, 50_000].iter() {
        let records = facilities(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            let index = FacilityIndex::new();
            b.iter(|| {
                index.load(records.clone()).unwrap();
                black_box(index.len())
            });
        });
    }

    group.finish();
}

fn bench_query_radius(c: &mut Criterion) {
    let mut group = c.benchmark_group("Facility Radius Query");
    let records = facilities(50_000);
    let center = Position::new(48.2082, 16.3738);

    for strategy in [QueryStrategy::Grid, QueryStrategy::Scan] {
        let index = FacilityIndex::builder().strategy(strategy).build().unwrap();
        index.load(records.clone()).unwrap();

        for radius in [2_000.0, 20_000.0] {
            let id = BenchmarkId::new(format!("{:?}", strategy), radius as u64);
            group.bench_with_input(id, &radius, |b, radius| {
                b.iter(|| black_box(index.query_radius(center, *radius, None).unwrap()));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_load, bench_query_radius);
criterion_main!(benches);

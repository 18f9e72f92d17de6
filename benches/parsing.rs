//! Benchmarking NAV parsing & orbit propagation
//! using a small mixed constellation file
extern crate criterion;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rinex_brdc::prelude::*;

const MIXED: &str = "test_resources/NAV/V3/MIXED.rnx";

fn benchmark(c: &mut Criterion) {
    let mut parsing_grp = c.benchmark_group("parsing");

    let content = std::fs::read_to_string(MIXED).unwrap();

    parsing_grp.bench_function("NAV/V3", |b| {
        b.iter(|| {
            let mut store = EphemerisStore::new();
            store.ingest(black_box(content.as_bytes())).unwrap();
        })
    });

    parsing_grp.finish();

    let mut propagation_grp = c.benchmark_group("propagation");

    let store = EphemerisStore::from_file(MIXED).unwrap();
    let t = Epoch::from_gregorian(2020, 6, 25, 0, 30, 0, 0, TimeScale::GPST);

    // Keplerian
    let g01 = SV::new(Constellation::GPS, 1);
    propagation_grp.bench_function("GPS", |b| {
        b.iter(|| {
            let _ = store.xvt(g01, black_box(t)).unwrap();
        })
    });

    // BDS GEO
    let c01 = SV::new(Constellation::BeiDou, 1);
    propagation_grp.bench_function("BDS/GEO", |b| {
        b.iter(|| {
            let _ = store.xvt(c01, black_box(t)).unwrap();
        })
    });

    // RK4 over ~15'
    let r01 = SV::new(Constellation::Glonass, 1);
    propagation_grp.bench_function("GLONASS", |b| {
        b.iter(|| {
            let _ = store.xvt(r01, black_box(t)).unwrap();
        })
    });

    propagation_grp.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);

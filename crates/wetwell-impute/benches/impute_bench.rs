//! Criterion benchmarks for wetwell-impute: analog flow fill at scale.

use chrono::{NaiveDate, NaiveDateTime};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use wetwell_impute::FlowFillConfig;
use wetwell_series::AlignedSeries;

fn axis(n: usize) -> Vec<NaiveDateTime> {
    let start = NaiveDate::from_ymd_opt(2017, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| start + chrono::Duration::seconds(i as i64 * 300))
        .collect()
}

/// Sawtooth level cycles with every tenth flow sample missing.
fn make_pair(n: usize) -> (AlignedSeries, AlignedSeries) {
    let levels: Vec<Option<f64>> = (0..n)
        .map(|i| {
            let phase = i % 20;
            let v = if phase < 10 {
                1.0 + phase as f64 * 0.2
            } else {
                3.0 - (phase - 10) as f64 * 0.2
            };
            Some(v)
        })
        .collect();
    let flows: Vec<Option<f64>> = (0..n)
        .map(|i| {
            if i % 10 == 3 {
                None
            } else if i % 20 < 10 {
                Some(0.0)
            } else {
                Some(40.0)
            }
        })
        .collect();
    let t = axis(n);
    (
        AlignedSeries::new(t.clone(), flows).unwrap(),
        AlignedSeries::new(t, levels).unwrap(),
    )
}

fn bench_flow_fill(c: &mut Criterion) {
    let cfg = FlowFillConfig::new().with_proximity_epsilon(0.05);
    let mut group = c.benchmark_group("flow_fill");
    for &n in &[1_000usize, 10_000, 50_000] {
        let (flow, level) = make_pair(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(flow, level), |b, (f, l)| {
            b.iter(|| cfg.fill(f, l).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_flow_fill);
criterion_main!(benches);

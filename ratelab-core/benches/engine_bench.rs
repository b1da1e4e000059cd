//! Criterion benchmarks for RateLab hot paths.
//!
//! Benchmarks:
//! 1. Full batch compute over a booking horizon
//! 2. Single-date evaluation per strategy
//! 3. Config validation (fingerprinting included)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ratelab_core::{compute, evaluate, RateSignal, RmsConfig, Strategy};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_signals(n: usize) -> Vec<RateSignal> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..n)
        .map(|i| {
            let wave = (i as f64 * 0.2).sin();
            let current = 160.0 + wave * 40.0;
            let mut signal = RateSignal::new(
                base_date + chrono::Duration::days(i as i64),
                current,
                current * (1.0 + (i as f64 * 0.07).cos() * 0.15),
            )
            .with_demand((5.0 + wave * 5.0).round() as i32)
            .with_rooms((i % 30) as i64)
            .with_pickup((i as f64 * 0.13).sin() * 400.0);
            if i % 11 == 0 {
                signal = signal.with_event(7);
            }
            signal
        })
        .collect()
}

// ── 1. Batch Compute ─────────────────────────────────────────────────

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute");
    let config = RmsConfig::default().validate().unwrap();

    for &dates in &[30, 365, 730] {
        let signals = make_signals(dates);
        group.bench_with_input(BenchmarkId::new("balanced", dates), &dates, |b, _| {
            b.iter(|| compute(black_box(&signals), black_box(&config)));
        });
    }

    group.finish();
}

// ── 2. Single Date ───────────────────────────────────────────────────

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let signal = make_signals(1).remove(0);

    for strategy in Strategy::ALL {
        let config = RmsConfig {
            strategy,
            ..RmsConfig::default()
        }
        .validate()
        .unwrap();
        group.bench_function(strategy.as_str(), |b| {
            b.iter(|| evaluate(black_box(&signal), black_box(&config)));
        });
    }

    group.finish();
}

// ── 3. Config Validation ─────────────────────────────────────────────

fn bench_validate(c: &mut Criterion) {
    c.bench_function("validate_default_config", |b| {
        b.iter(|| black_box(RmsConfig::default()).validate());
    });
}

criterion_group!(benches, bench_compute, bench_evaluate, bench_validate);
criterion_main!(benches);

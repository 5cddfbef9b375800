use bolus_core::{
    DosingConfig, InsulinAdministration, ProfileCfg, SafetyCfg, estimate_iob, recommend_dose,
};
use chrono::{Duration, TimeZone, Utc};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

// A long administration log: one bolus every 20 minutes for `days` days.
fn synth_history(days: i64) -> Vec<InsulinAdministration> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let n = days * 24 * 3;
    (0..n)
        .map(|i| InsulinAdministration {
            dose: 0.5 + (i % 7) as f64 * 0.25,
            timestamp: start + Duration::minutes(20 * i),
        })
        .collect()
}

pub fn bench_iob(c: &mut Criterion) {
    let mut g = c.benchmark_group("iob");
    // Allow quick tweaking without CLI flags (Criterion 0.5):
    //   BENCH_SAMPLE_SIZE=10 cargo bench -p bolus_core --bench iob
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE")
        && let Ok(n) = ss.parse::<usize>()
    {
        g.sample_size(n.max(10));
    }

    for &days in &[1_i64, 30, 365] {
        let history = synth_history(days);
        let now = history.last().map(|b| b.timestamp).unwrap() + Duration::minutes(1);
        g.bench_function(format!("estimate_iob_{days}d"), |b| {
            b.iter_batched(
                || history.clone(),
                |h| {
                    let iob = estimate_iob(black_box(&h), black_box(now), 3.0).unwrap();
                    black_box(iob);
                },
                BatchSize::LargeInput,
            )
        });
    }
    g.finish();
}

pub fn bench_recommend(c: &mut Criterion) {
    let cfg = DosingConfig::builder()
        .with_safety(SafetyCfg::default())
        .with_profile(ProfileCfg::default())
        .build()
        .unwrap();
    c.bench_function("recommend_dose", |b| {
        b.iter(|| {
            let rec = recommend_dose(
                black_box(240.0),
                black_box(100.0),
                black_box(45.0),
                black_box(1.7),
                &cfg,
            )
            .unwrap();
            black_box(rec);
        })
    });
}

criterion_group!(benches, bench_iob, bench_recommend);
criterion_main!(benches);

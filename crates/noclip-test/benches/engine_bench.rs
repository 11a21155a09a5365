//! Benchmarks for the lock compensation hot path

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use noclip_core::LockSample;
use noclip_engine::{has_foreign_fingerprint, CompensationEngine, EngineConfig};
use noclip_runtime::{Configuration, Session, SessionConfig};
use noclip_test::{LatencyProfile, RecordingSink, SimulatedClient};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_engine_process(c: &mut Criterion) {
    let mut engine = CompensationEngine::seeded(EngineConfig::default(), 1).unwrap();
    let sample = LockSample::new(0.48, 0.6, false).unwrap();

    c.bench_function("engine_process", |b| {
        b.iter(|| engine.process(black_box(sample), black_box(false)))
    });
}

fn bench_cast_rejection(c: &mut Criterion) {
    let mut engine = CompensationEngine::seeded(EngineConfig::default(), 2).unwrap();
    let sample = LockSample::new(0.48, 2.5, true).unwrap();

    c.bench_function("engine_cast_rejection", |b| {
        b.iter(|| engine.process(black_box(sample), black_box(false)))
    });
}

fn bench_fingerprint(c: &mut Criterion) {
    c.bench_function("foreign_fingerprint", |b| {
        b.iter(|| has_foreign_fingerprint(black_box(0.5935)))
    });
}

fn bench_session_observe(c: &mut Criterion) {
    let config = SessionConfig {
        seed: Some(3),
        ..SessionConfig::default()
    };
    let user = Configuration {
        enabled: true,
        ..Configuration::default()
    };
    let mut session =
        Session::with_config(config, user, SimulatedClient::new(), RecordingSink::default())
            .unwrap();
    let profile = LatencyProfile::typical();
    let mut rng = StdRng::seed_from_u64(4);

    c.bench_function("session_observe", |b| {
        b.iter(|| {
            let previous = 0.6 - profile.sample(&mut rng);
            session.observe(black_box(previous), black_box(0.6), false)
        })
    });
}

criterion_group!(
    benches,
    bench_engine_process,
    bench_cast_rejection,
    bench_fingerprint,
    bench_session_observe,
);
criterion_main!(benches);

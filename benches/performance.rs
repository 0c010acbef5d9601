use criterion::{criterion_group, criterion_main, Criterion};

use qsynth::prep::{prepare, Strategy};
use qsynth::state::RState;
use qsynth::transpile::{transpile, RyStrategy};

fn bench_prepare_ghz(c: &mut Criterion) {
    c.bench_function("prepare ghz(10) via auto", |b| {
        b.iter(|| {
            let mut weights = std::collections::BTreeMap::new();
            weights.insert(0u32, std::f64::consts::FRAC_1_SQRT_2);
            weights.insert((1u32 << 10) - 1, std::f64::consts::FRAC_1_SQRT_2);
            let state = RState::from_weights(10, weights).unwrap();
            prepare(&state, Strategy::Auto).unwrap()
        })
    });
}

fn bench_prepare_dicke(c: &mut Criterion) {
    c.bench_function("prepare dicke(6,3) via sparse reduction", |b| {
        b.iter(|| {
            let state = RState::dicke(6, 3).unwrap();
            prepare(&state, Strategy::Sparse).unwrap()
        })
    });
}

fn bench_transpile_ry(c: &mut Criterion) {
    let mut circuit = qsynth::circuit::Circuit::new(1);
    circuit.push(qsynth::gate::Gate::ry(0, 0.37));
    c.bench_function("transpile single RY via mitm, epsilon=1e-2", |b| {
        b.iter(|| transpile(&circuit, 1e-2, RyStrategy::MeetInTheMiddle).unwrap())
    });
}

criterion_group!(benches, bench_prepare_ghz, bench_prepare_dicke, bench_transpile_ry);
criterion_main!(benches);

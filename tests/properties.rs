//! Universal invariants from `spec.md` §8.

use std::collections::BTreeMap;

use qsynth::error::Error;
use qsynth::gate::Gate;
use qsynth::prep::{prepare, Strategy};
use qsynth::state::RState;

fn dicke_state(n: usize, k: usize) -> RState {
    RState::dicke(n, k).unwrap()
}

#[test]
fn prepared_circuit_reproduces_target_from_ground_state() {
    let target = dicke_state(5, 2);
    let circuit = prepare(&target, Strategy::Sparse).unwrap();
    let mut s = RState::ground(5).unwrap();
    for gate in circuit.gates() {
        s = s.apply(gate, false).unwrap();
    }
    assert_eq!(s, target);
}

#[test]
fn reversed_circuit_undoes_preparation() {
    let target = dicke_state(4, 1);
    let circuit = prepare(&target, Strategy::Sparse).unwrap();
    let mut s = RState::ground(4).unwrap();
    for gate in circuit.gates() {
        s = s.apply(gate, false).unwrap();
    }
    for gate in circuit.reversed().gates() {
        s = s.apply(gate, false).unwrap();
    }
    assert_eq!(s, RState::ground(4).unwrap());
}

#[test]
fn every_weight_in_a_live_state_exceeds_eps() {
    let target = dicke_state(6, 3);
    for &w in target.weights().values() {
        assert!(w.abs() > 1e-6);
    }
}

#[test]
fn total_probability_stays_normalized_after_gate_application() {
    let s = RState::ground(3).unwrap();
    let s = s.apply(&Gate::h(0), false).unwrap();
    let s = s.apply(&Gate::cx(0, true, 1), false).unwrap();
    let s = s.apply(&Gate::cry(1, true, 0.4, 2), false).unwrap();
    let norm_sqr: f64 = s.weights().values().map(|w| w * w).sum();
    assert!((norm_sqr - 1.0).abs() < 1e-9);
}

#[test]
fn complex_only_gates_are_rejected_on_real_states() {
    let s = RState::ground(1).unwrap();
    for gate in [Gate::s(0), Gate::sdg(0), Gate::t(0), Gate::tdg(0)] {
        assert!(matches!(s.apply(&gate, false), Err(Error::ContractViolation(_))));
    }
}

#[test]
fn construction_rejects_unnormalized_weights() {
    let mut weights = BTreeMap::new();
    weights.insert(0u32, 0.5);
    weights.insert(1u32, 0.5);
    assert!(matches!(
        RState::from_weights(1, weights),
        Err(Error::NotNormalized { .. })
    ));
}

#[test]
fn construction_rejects_all_zero_weights() {
    let mut weights = BTreeMap::new();
    weights.insert(0u32, 1e-12);
    assert!(matches!(RState::from_weights(1, weights), Err(Error::AllZero)));
}

#[test]
fn repr_is_invariant_under_key_insertion_order() {
    let mut a = BTreeMap::new();
    a.insert(0u32, std::f64::consts::FRAC_1_SQRT_2);
    a.insert(3u32, std::f64::consts::FRAC_1_SQRT_2);
    let mut b = BTreeMap::new();
    b.insert(3u32, std::f64::consts::FRAC_1_SQRT_2);
    b.insert(0u32, std::f64::consts::FRAC_1_SQRT_2);

    let sa = RState::from_weights(2, a).unwrap();
    let sb = RState::from_weights(2, b).unwrap();
    assert_eq!(sa.repr(), sb.repr());
}

//! Cardinality reduction (`spec.md` §4.4.2), grounded on
//! `lib/prepare-sparse.cpp`'s `maximize_difference_once`/
//! `cardinality_reduction_by_one`.
//!
//! [`find_reducing_cx`] is a cheap special case: a pair of qubits whose
//! values are perfectly correlated (or anti-correlated) across the current
//! support collapses one of them to constant with a single `CX`, one `CNOT`
//! instead of a full multi-controlled rotation. [`cardinality_reduction_by_one`]
//! is the general algorithm the original source actually runs every
//! iteration of its own `prepare_sparse_state`: it narrows the support down
//! to a representative pair of basis keys by repeatedly splitting on
//! whichever qubit discriminates the support most unevenly, then merges
//! that pair with a `CX` fan-out and a single `MCRY`.

use std::collections::{HashMap, HashSet};

use crate::circuit::Circuit;
use crate::error::Result;
use crate::gate::Gate;
use crate::math::{Key, N};
use crate::state::RState;

/// Looks for a pair `(ctrl, target)` in the current support such that
/// `target`'s bit equals (or always differs from) `ctrl`'s bit across every
/// key, and returns the `CX` that zeroes `target` out.
pub fn find_reducing_cx(state: &RState) -> Option<Gate> {
    let signatures = state.qubit_signatures();
    let supports = state.supports();
    let qubits: Vec<usize> = supports.iter().copied().collect();

    for (i, &a) in qubits.iter().enumerate() {
        for &b in &qubits[(i + 1)..] {
            let sig_a = &signatures[&a];
            let sig_b = &signatures[&b];
            if sig_a.iter().zip(sig_b).all(|(x, y)| x == y) {
                // a == b everywhere: CX(b, true, a) zeroes a.
                return Some(Gate::cx(b, true, a));
            }
            if sig_a.iter().zip(sig_b).all(|(x, y)| x != y) {
                // a == !b everywhere: CX(b, false, a) zeroes a.
                return Some(Gate::cx(b, false, a));
            }
        }
    }
    None
}

/// One step of `maximize_difference_once`: among qubits not already fixed
/// in `diff_values`, finds the one that splits `indices` most unevenly,
/// narrows `indices` down to whichever side is the minority, and records
/// that qubit's minority-side bit value. A qubit that's constant across all
/// of `indices` (every index agrees on its bit) carries no discriminating
/// information and is skipped.
fn maximize_difference_once(n: N, indices: &mut HashSet<Key>, diff_values: &mut HashMap<N, bool>) -> (N, bool) {
    let length = indices.len() as i64;
    let mut max_diff: i64 = -1;
    let mut max_diff_indices_1: HashSet<Key> = HashSet::new();
    let mut max_diff_qubit: N = 0;
    let mut max_diff_value = false;

    for qubit in 0..n {
        if diff_values.contains_key(&qubit) {
            continue;
        }
        let bit = 1u32 << qubit;
        let indices_1: HashSet<Key> = indices.iter().copied().filter(|idx| idx & bit != 0).collect();
        let diff = (length - 2 * indices_1.len() as i64).abs();
        if diff == length {
            continue;
        }
        if diff > max_diff {
            max_diff = diff;
            max_diff_value = length > 2 * indices_1.len() as i64;
            max_diff_indices_1 = indices_1;
            max_diff_qubit = qubit;
        }
        if max_diff == length - 1 {
            break;
        }
    }

    if max_diff_value {
        *indices = max_diff_indices_1;
    } else {
        for idx in &max_diff_indices_1 {
            indices.remove(idx);
        }
    }
    diff_values.insert(max_diff_qubit, max_diff_value);
    (max_diff_qubit, max_diff_value)
}

/// Reduces `cur`'s cardinality by exactly one, appending the gates used to
/// `reduction` in the order they're applied (`spec.md` §4.4.2). Narrows the
/// support to a representative `index0` via repeated
/// [`maximize_difference_once`] splits, finds a sibling `index1` that
/// agrees with every qubit fixed along the way except the final
/// differentiator, fans `index1` onto `index0` with plain `CX`s on every
/// other differing bit, then merges the two surviving weights with one
/// `MCRY` conditioned on the fixed qubits. A no-op when `cur`'s cardinality
/// is already `<= 1`.
pub fn cardinality_reduction_by_one(cur: &mut RState, reduction: &mut Circuit) -> Result<()> {
    let n = cur.n();
    let mut indices: HashSet<Key> = cur.weights().keys().copied().collect();
    if indices.len() <= 1 {
        return Ok(());
    }

    let mut diff_values: HashMap<N, bool> = HashMap::new();
    let mut diff_qubit = 0;
    while indices.len() > 1 {
        let (q, _) = maximize_difference_once(n, &mut indices, &mut diff_values);
        diff_qubit = q;
    }
    let index0 = *indices.iter().next().expect("just narrowed to one element");
    diff_values.remove(&diff_qubit);

    let mut candidates: HashSet<Key> = cur
        .weights()
        .keys()
        .copied()
        .filter(|idx| {
            !indices.contains(idx) && diff_values.iter().all(|(&q, &v)| ((*idx >> q) & 1 != 0) == v)
        })
        .collect();
    while candidates.len() > 1 {
        maximize_difference_once(n, &mut candidates, &mut diff_values);
    }
    let index1 = *candidates.iter().next().expect("just narrowed to one element");

    let diff_bit = 1u32 << diff_qubit;
    let diff_value = index0 & diff_bit != 0;
    for qubit in 0..n {
        let bit = 1u32 << qubit;
        if (index0 & bit) == (index1 & bit) || qubit == diff_qubit {
            continue;
        }
        let gate = Gate::cx(diff_qubit, diff_value, qubit);
        *cur = cur.apply(&gate, false)?;
        reduction.push(gate);
    }

    let idx0 = index1 & !diff_bit;
    let idx1 = index1 | diff_bit;
    let w0 = *cur.weights().get(&idx0).expect("diff_qubit's zero branch survives the fan-out");
    let w1 = *cur.weights().get(&idx1).expect("diff_qubit's one branch survives the fan-out");
    let mut theta = 2.0 * w1.atan2(w0);
    if index1 & diff_bit != 0 {
        theta = -std::f64::consts::PI + theta;
    }

    let ctrls: Vec<(N, bool)> = diff_values.into_iter().collect();
    // `theta` is the angle that would *create* the (w0, w1) split from a
    // collapsed pair; merging index1 back into index0 needs the opposite
    // rotation.
    let gate = Gate::mcry(ctrls, -theta, diff_qubit);
    *cur = cur.apply(&gate, false)?;
    reduction.push(gate);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_equal_correlation_in_ghz_support() {
        let mut weights = std::collections::BTreeMap::new();
        weights.insert(0u32, std::f64::consts::FRAC_1_SQRT_2);
        weights.insert(0b111u32, std::f64::consts::FRAC_1_SQRT_2);
        let state = RState::from_weights(3, weights).unwrap();
        let gate = find_reducing_cx(&state).expect("GHZ qubits are fully correlated");
        let reduced = state.apply(&gate, false).unwrap();
        assert!(reduced.supports().len() < state.supports().len());
    }

    #[test]
    fn none_when_no_pair_is_correlated() {
        // W state on 3 qubits: each pair of qubits disagrees in exactly
        // one of the three basis keys, so no pair is perfectly correlated.
        let mut weights = std::collections::BTreeMap::new();
        let w = 1.0 / 3f64.sqrt();
        weights.insert(0b001u32, w);
        weights.insert(0b010u32, w);
        weights.insert(0b100u32, w);
        let state = RState::from_weights(3, weights).unwrap();
        assert!(find_reducing_cx(&state).is_none());
    }
}

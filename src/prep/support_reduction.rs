//! Support reduction (`spec.md` §4.4.1), grounded on `lib/prepare_sparse.cpp`:
//! repeatedly peel off qubits that take a single constant value across the
//! current support. A constant-1 qubit is flipped to constant-0 with a
//! single `X`; a constant-0 qubit already matches the ground state and
//! needs nothing. Falls through to [`crate::prep::cardinality_reduction`]
//! whenever no qubit is currently constant: its cheap perfectly-correlated-
//! pair check first, then the general
//! [`cardinality_reduction::cardinality_reduction_by_one`] once that cheap
//! check doesn't apply.

use crate::circuit::Circuit;
use crate::error::Result;
use crate::gate::Gate;
use crate::state::RState;

use super::cardinality_reduction;

/// Reduces `state` toward the ground state, recording every gate applied,
/// and returns the preparation circuit (`spec.md` §4.4: the recorded
/// reduction run backward).
pub fn prepare_sparse(state: &RState) -> Result<Circuit> {
    let n = state.n();
    let mut reduction = Circuit::new(n);
    let mut cur = state.clone();

    while !cur.is_ground() {
        if let Some(q) = constant_one_qubit(&cur) {
            let gate = Gate::x(q);
            cur = cur.apply(&gate, false)?;
            reduction.push(gate);
            continue;
        }
        if let Some(gate) = cardinality_reduction::find_reducing_cx(&cur) {
            cur = cur.apply(&gate, false)?;
            reduction.push(gate);
            continue;
        }
        // Neither a constant qubit nor a perfectly-correlated pair: fall
        // back to the general algorithm, which always reduces cardinality
        // by exactly one and so always terminates.
        cardinality_reduction::cardinality_reduction_by_one(&mut cur, &mut reduction)?;
    }

    Ok(reduction.reversed())
}

fn constant_one_qubit(state: &RState) -> Option<usize> {
    let supports = state.supports();
    (0..state.n()).find(|q| {
        !supports.contains(q)
            && state.weights().keys().next().map(|&k| k & (1 << q) != 0).unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ghz_reduces_with_cardinality_collapses() {
        let mut weights = std::collections::BTreeMap::new();
        weights.insert(0u32, std::f64::consts::FRAC_1_SQRT_2);
        weights.insert(0b111u32, std::f64::consts::FRAC_1_SQRT_2);
        let state = RState::from_weights(3, weights).unwrap();
        let circuit = prepare_sparse(&state).unwrap();

        let mut replay = RState::ground(3).unwrap();
        for gate in circuit.gates() {
            replay = replay.apply(gate, false).unwrap();
        }
        assert_eq!(replay, state);
    }
}

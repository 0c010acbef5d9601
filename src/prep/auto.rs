//! Auto driver (`spec.md` §4.4.4): runs support/cardinality reduction
//! first, re-checking BFS feasibility after every step, and only pays for
//! a general cardinality-reduction-by-one step when neither a structural
//! reduction nor a BFS search is currently available. Mirrors the
//! recursive dispatch in `lib/prepare-auto.cpp`'s `prepare_auto_rec`
//! (flattened into a single accumulating loop: every gate this driver
//! records is pushed in the literal order it's applied during reduction,
//! so one final [`Circuit::reversed`] over the whole run recovers the
//! preparation circuit, the same convention [`crate::prep::support_reduction`]
//! uses).

use crate::circuit::Circuit;
use crate::error::Result;
use crate::gate::Gate;
use crate::state::RState;

use super::{bfs, cardinality_reduction};

/// Qubit count below which BFS is attempted at all
/// (`spec.md` §4.4.4: "bounded enough to search exhaustively").
const BFS_HANDOFF_SUPPORT: usize = 6;

pub fn prepare_auto(state: &RState) -> Result<Circuit> {
    let n = state.n();
    let mut reduction = Circuit::new(n);
    let mut cur = state.clone();

    loop {
        if cur.is_ground() {
            return Ok(reduction.reversed());
        }
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
        if cur.supports().len() <= BFS_HANDOFF_SUPPORT {
            if let Ok(tail) = bfs::prepare_bfs(&cur, bfs::Budget::default()) {
                reduction.append(tail.reversed());
                return Ok(reduction.reversed());
            }
        }
        cardinality_reduction::cardinality_reduction_by_one(&mut cur, &mut reduction)?;
    }
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
    fn w3_state_prepares_via_bfs_handoff() {
        let mut weights = std::collections::BTreeMap::new();
        let w = 1.0 / 3f64.sqrt();
        weights.insert(0b001u32, w);
        weights.insert(0b010u32, w);
        weights.insert(0b100u32, w);
        let target = RState::from_weights(3, weights).unwrap();

        let circuit = prepare_auto(&target).unwrap();
        let mut replay = RState::ground(3).unwrap();
        for gate in circuit.gates() {
            replay = replay.apply(gate, false).unwrap();
        }
        assert_eq!(replay, target);
    }
}

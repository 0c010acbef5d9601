//! Best-first search preparation engine (`spec.md` §4.4.3), grounded on
//! `lib/prepare_bfs.cpp`: a Dijkstra-style search over states ordered by
//! accumulated CNOT cost, with [`enumerate_gates`] generating the
//! neighborhood exactly the way `enumerate_gates` does in the original
//! source — a single `X` flip once the state collapses to one basis key,
//! then constant single-qubit `RY`s, then constant `CRY`s tried at both the
//! solved angle and its `-pi` complement, then every ordered `CX` pair.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::circuit::Circuit;
use crate::error::{Error, Result};
use crate::gate::Gate;
use crate::math::{approx_eq, PI, R};
use crate::state::RState;

/// Search limits (`spec.md` §4.4.3, §5): bounds both the queue size and the
/// circuit depth so a pathological input cannot run unbounded.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    pub max_visited: usize,
    pub max_depth: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self { max_visited: 20_000, max_depth: 256 }
    }
}

struct Node {
    cost: usize,
    state: RState,
    path: Circuit,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}
impl Eq for Node {}
impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // `BinaryHeap` is a max-heap; reverse so the lowest cost pops first.
        other.cost.cmp(&self.cost)
    }
}

/// Generates the candidate next gates from `state`, cheapest structural
/// moves first.
pub fn enumerate_gates(state: &RState) -> Vec<Gate> {
    let mut out = Vec::new();
    let supports: Vec<usize> = state.supports().into_iter().collect();

    if state.cardinality() == 1 {
        let key = *state.weights().keys().next().unwrap();
        for q in 0..state.n() {
            if key & (1 << q) != 0 {
                out.push(Gate::x(q));
            }
        }
        return out;
    }

    // Constant single-qubit RY: only useful when the angle needed to
    // collapse `target` is the same at every surviving key.
    for &target in &supports {
        let table = state.ry_table(target);
        if let Some(theta) = single_valued(table.values().copied()) {
            out.push(Gate::ry(target, -theta));
        }
    }

    // Constant CRY: same idea, but the angle only needs to agree among
    // keys that share the same `ctrl` bit. Both the solved angle and its
    // `-pi` complement are offered since the Gray-code solve in
    // `find_thetas` admits either branch.
    for &ctrl in &supports {
        for &target in &supports {
            if ctrl == target {
                continue;
            }
            let table = state.ry_table(target);
            let ctrl_bit = 1u32 << ctrl;
            let on: Vec<R> =
                table.iter().filter(|(k, _)| *k & ctrl_bit != 0).map(|(_, v)| *v).collect();
            if let Some(theta) = single_valued(on.into_iter()) {
                out.push(Gate::cry(ctrl, true, -theta, target));
                out.push(Gate::cry(ctrl, true, -theta + PI, target));
            }
        }
    }

    for &ctrl in &supports {
        for &target in &supports {
            if ctrl != target {
                out.push(Gate::cx(ctrl, true, target));
            }
        }
    }

    out
}

fn single_valued(mut it: impl Iterator<Item = R>) -> Option<R> {
    let first = it.next()?;
    if it.all(|v| approx_eq(v, first, 1e-6)) {
        Some(first)
    } else {
        None
    }
}

/// Runs the best-first search from `state` down to the ground state and
/// returns the preparation circuit.
pub fn prepare_bfs(state: &RState, budget: Budget) -> Result<Circuit> {
    let n = state.n();
    let mut heap = BinaryHeap::new();
    let mut visited: HashSet<u64> = HashSet::new();

    heap.push(Node { cost: 0, state: state.clone(), path: Circuit::new(n) });

    let mut visited_count = 0usize;
    while let Some(Node { cost, state: cur, path }) = heap.pop() {
        if cur.is_ground() {
            return Ok(path.reversed());
        }
        let repr = cur.repr();
        if !visited.insert(repr) {
            continue;
        }
        visited_count += 1;
        if visited_count > budget.max_visited || path.len() >= budget.max_depth {
            continue;
        }

        for gate in enumerate_gates(&cur) {
            let Ok(next) = cur.apply(&gate, false) else { continue };
            if visited.contains(&next.repr()) {
                continue;
            }
            let mut next_path = path.clone();
            next_path.push(gate.clone());
            heap.push(Node { cost: cost + gate.cnot_cost(), state: next, path: next_path });
        }
    }

    Err(Error::BudgetExceeded(format!(
        "prepare_bfs exhausted {} visited states without reaching the ground state",
        budget.max_visited
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bell_state_prepares_within_budget() {
        let mut weights = std::collections::BTreeMap::new();
        weights.insert(0u32, std::f64::consts::FRAC_1_SQRT_2);
        weights.insert(0b11u32, std::f64::consts::FRAC_1_SQRT_2);
        let target = RState::from_weights(2, weights).unwrap();

        let circuit = prepare_bfs(&target, Budget::default()).unwrap();
        let mut replay = RState::ground(2).unwrap();
        for gate in circuit.gates() {
            replay = replay.apply(gate, false).unwrap();
        }
        assert_eq!(replay, target);
    }
}

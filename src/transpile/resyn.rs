//! Windowed rotation resynthesis (`[SUPPLEMENT]`, `spec.md` §9's `resyn`
//! note), grounded on `lib/resyn.cpp`: walk a circuit in maximal runs of
//! consecutive gates that share a single target qubit, and try to replace
//! each run with a cheaper alternating `RY`/`CX` sequence that reproduces
//! the same per-control-pattern rotation.
//!
//! For every control pattern present in the run's support, the run acts as
//! a single `RY` by some angle that may also get negated by a `-pi`
//! correction depending on how many of the replacement's `CX`s fire on
//! that pattern. [`rotation_solver`] searches increasing replacement
//! lengths and solves for the angles with Gaussian elimination; a run is
//! only ever substituted when a solution using strictly fewer CNOTs than
//! the original is found.

use std::f64::consts::PI;

use crate::circuit::Circuit;
use crate::gate::Gate;
use crate::math::{Key, N, R};
use crate::state::RState;

/// An ordered list of `(control, phase)` pairs: the candidate replacement
/// interleaves `RY(target)` before each entry's `CX`.
type CxTemplate = Vec<(N, bool)>;

fn enumerate_cnot_templates(controls: &[N], n_cnots: usize) -> Vec<CxTemplate> {
    fn go(controls: &[N], remaining: usize, cur: &mut CxTemplate, out: &mut Vec<CxTemplate>) {
        if remaining == 0 {
            out.push(cur.clone());
            return;
        }
        for &control in controls {
            for phase in [true, false] {
                cur.push((control, phase));
                go(controls, remaining - 1, cur, out);
                cur.pop();
            }
        }
    }
    let mut out = Vec::new();
    go(controls, n_cnots, &mut Vec::new(), &mut out);
    out
}

/// The running sign a basis `index` picks up threading through `config`'s
/// `CX`s, read off in the same reversed-then-flipped order
/// `lib/resyn.cpp`'s `rotation_solver` builds it in: `row[0]` is the full
/// product over every `CX`, `row[k]` is the product over none of them.
fn polarity_row(index: Key, config: &CxTemplate) -> Vec<R> {
    let mut polarity = 1.0_f64;
    let mut row = vec![polarity];
    for &(control, phase) in config.iter().rev() {
        if (((index >> control) & 1 == 1)) == phase {
            polarity = -polarity;
        }
        row.push(polarity);
    }
    row.reverse();
    row
}

/// Partial-pivoted Gaussian elimination on an `m x n` system, `m >= n`
/// (`lib/resyn.cpp`'s `gaussian_elimination`): a zero pivot means no
/// solution, and any row beyond the first `n` must already reduce to
/// `0 = 0` for the (possibly overdetermined) system to be consistent.
fn gaussian_elimination(mut rows: Vec<Vec<R>>, mut b: Vec<R>) -> Option<Vec<R>> {
    let m = rows.len();
    let n = rows[0].len();
    for i in 0..n.min(m) {
        let mut max_row = i;
        for j in (i + 1)..m {
            if rows[j][i].abs() > rows[max_row][i].abs() {
                max_row = j;
            }
        }
        rows.swap(i, max_row);
        b.swap(i, max_row);
        let diag = rows[i][i];
        if diag == 0.0 {
            return None;
        }
        for k in i..n {
            rows[i][k] /= diag;
        }
        b[i] /= diag;
        for j in 0..m {
            if j == i {
                continue;
            }
            let factor = rows[j][i];
            for k in i..n {
                rows[j][k] -= factor * rows[i][k];
            }
            b[j] -= factor * b[i];
        }
    }
    for row in b.iter().skip(n) {
        if row.abs() > 1e-9 {
            return None;
        }
    }
    b.truncate(n);
    Some(b)
}

/// Searches replacement lengths `0..max_cnots` and returns the first
/// `(rotation angles, CX template)` that reproduces every `(index,
/// initial_theta, final_theta)` triple in `rlut`.
fn rotation_solver(
    rlut: &[(Key, R, R)],
    controls: &[N],
    max_cnots: usize,
) -> Option<(Vec<R>, CxTemplate)> {
    for n_cnots in 0..max_cnots {
        for config in enumerate_cnot_templates(controls, n_cnots) {
            let mut rows = Vec::with_capacity(rlut.len());
            let mut b = Vec::with_capacity(rlut.len());
            for &(index, initial_theta, final_theta) in rlut {
                let row = polarity_row(index, &config);
                let polarity = row[0];
                let mut coeff = if polarity == 1.0 { 0.0 } else { -PI };
                coeff -= initial_theta * polarity;
                coeff += final_theta;
                rows.push(row);
                b.push(coeff);
            }
            if let Some(sol) = gaussian_elimination(rows, b) {
                return Some((sol, config));
            }
        }
    }
    None
}

/// Runs resynthesis over every maximal same-target run in `circuit`,
/// substituting a run whenever a strictly cheaper equivalent is found.
pub fn resyn(circuit: &Circuit) -> Circuit {
    let n = circuit.n();
    let gates: Vec<&Gate> = circuit.gates().collect();
    let mut out = Circuit::new(n);
    let mut state = RState::ground(n).expect("n was already valid for the input circuit");
    let mut pos = 0;

    while pos < gates.len() {
        let target = gates[pos].target;
        let initial_state = state.clone();
        let mut initial_cost = gates[pos].cnot_cost();
        state = state.apply(gates[pos], false).expect("resyn runs before Clifford+T lowering");
        let mut end = pos + 1;
        while end < gates.len() && gates[end].target == target {
            initial_cost += gates[end].cnot_cost();
            state = state.apply(gates[end], false).expect("resyn runs before Clifford+T lowering");
            end += 1;
        }

        let initial_ry = initial_state.ry_table(target);
        let final_ry = state.ry_table(target);
        let rlut: Vec<(Key, R, R)> = initial_ry
            .into_iter()
            .map(|(index, initial_theta)| {
                let final_theta = final_ry.get(&index).copied().unwrap_or(0.0);
                (index, initial_theta, final_theta)
            })
            .collect();

        let controls: Vec<N> = (0..n).filter(|&q| q != target).collect();
        match rotation_solver(&rlut, &controls, initial_cost) {
            Some((angles, config)) => {
                for (i, &(control, phase)) in config.iter().enumerate() {
                    out.push(Gate::ry(target, angles[i]));
                    out.push(Gate::cx(control, phase, target));
                }
                out.push(Gate::ry(target, angles[config.len()]));
            }
            None => {
                for &gate in &gates[pos..end] {
                    out.push(gate.clone());
                }
            }
        }
        pos = end;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(c: &Circuit, n: usize) -> RState {
        let mut s = RState::ground(n).unwrap();
        for gate in c.gates() {
            s = s.apply(gate, false).unwrap();
        }
        s
    }

    #[test]
    fn resynthesized_circuit_reproduces_the_same_state() {
        let mut c = Circuit::new(2);
        c.push(Gate::h(0));
        c.push(Gate::ry(1, 0.4));
        c.push(Gate::cx(0, true, 1));
        c.push(Gate::ry(1, -0.4));

        let resolved = resyn(&c);
        assert_eq!(replay(&resolved, 2), replay(&c, 2));
    }

    #[test]
    fn run_with_no_cheaper_template_is_kept_verbatim() {
        let mut c = Circuit::new(1);
        c.push(Gate::ry(0, 0.9));
        let resolved = resyn(&c);
        assert_eq!(replay(&resolved, 1), replay(&c, 1));
    }
}

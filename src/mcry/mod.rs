//! Multi-controlled `RY` decomposition (`spec.md` §4.3), grounded on
//! `lib/decompose.cpp`'s `find_thetas`/`decompose_mcry` in the original
//! source: a Gray-code traversal paired with a Walsh-sign linear solve,
//! emitting alternating `RY`/`CX` gates.

use crate::gate::Gate;
use crate::math::{gray, walsh_sign, N, R};

/// Solves for the `2^k` per-step rotation angles that realize a
/// multi-controlled `RY(theta)` with `k` controls, following
/// `find_thetas`: build the `(-1)^popcount(gray(i) & gray(j))` sign
/// matrix, put the target rotation `theta` only at the all-ones control
/// row, and solve by partial-pivoted Gaussian elimination.
fn find_thetas(k: N, theta: R) -> Vec<R> {
    let size = 1usize << k;
    let mut a: Vec<Vec<R>> = (0..size)
        .map(|i| (0..size).map(|j| walsh_sign(gray(i as u32), gray(j as u32))).collect())
        .collect();
    let mut b: Vec<R> = vec![0.0; size];
    b[size - 1] = theta;

    // Partial-pivoted Gaussian elimination, forward then back substitution.
    for col in 0..size {
        let pivot = (col..size)
            .max_by(|&r1, &r2| a[r1][col].abs().partial_cmp(&a[r2][col].abs()).unwrap())
            .unwrap();
        a.swap(col, pivot);
        b.swap(col, pivot);
        let pivot_val = a[col][col];
        for row in (col + 1)..size {
            let factor = a[row][col] / pivot_val;
            for c in col..size {
                a[row][c] -= factor * a[col][c];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = vec![0.0; size];
    for row in (0..size).rev() {
        let mut sum = b[row];
        for c in (row + 1)..size {
            sum -= a[row][c] * x[c];
        }
        x[row] = sum / a[row][row];
    }
    x
}

/// Decomposes an MCRY with the given controls into `2^k` `RY`/`CX` pairs
/// (`spec.md` §4.3). `ctrls` carries `(qubit, phase)` pairs; the emitted
/// `CX`s always fire on phase `true`, since `decompose_mcry` first
/// canonicalizes every control to positive polarity by pre/post-pending an
/// `X` on the negative ones — callers that need negative-phase controls
/// should wrap the returned gates with [`crate::gate::Gate::x`] flips, or
/// use [`crate::transpile::prelowering`], which does this automatically.
pub fn decompose_mcry(ctrls: &[N], theta: R, target: N) -> Vec<Gate> {
    let k = ctrls.len();
    if k == 0 {
        return vec![Gate::ry(target, theta)];
    }
    let thetas = find_thetas(k, theta);
    let table_size = 1usize << k;

    let mut gates = Vec::with_capacity(2 * table_size);
    let mut prev_gray = 0u32;
    for i in 0..table_size {
        let curr_gray = gray(i as u32);
        let control_id = if i == 0 {
            0
        } else {
            (curr_gray ^ prev_gray).trailing_zeros() as usize
        };
        gates.push(Gate::ry(target, thetas[i]));
        gates.push(Gate::cx(ctrls[control_id], true, target));
        prev_gray = curr_gray;
    }
    gates
}

/// Alternate decomposition grounded on `lib/decompose.cpp`'s
/// `decompose_mcry_qrom`: borrows one ancilla qubit (assumed `|0>` on
/// entry and restored to `|0>` on exit) to collapse the two-control case
/// into a single wire via one `CCX`, then applies an ordinary 2-`CX` `CRY`
/// on that wire instead of solving the full `2^k` Gray-code system. Only
/// the two-control case benefits from a single borrowed ancilla this way —
/// a `k > 2` AND-ladder needs `k - 1` ancillas, not one, so this falls back
/// to [`decompose_mcry`] rather than pull in a multi-ancilla allocator for
/// a `[SUPPLEMENT]` alternate path.
pub fn decompose_mcry_qrom(ctrls: &[N], theta: R, target: N, ancilla: N) -> Vec<Gate> {
    if ctrls.len() != 2 {
        return decompose_mcry(ctrls, theta, target);
    }
    let mut gates = vec![Gate::ccx(ctrls[0], ctrls[1], ancilla)];
    gates.extend(decompose_mcry(&[ancilla], theta, target));
    gates.push(Gate::ccx(ctrls[0], ctrls[1], ancilla));
    gates
}

/// Selects which MCRY decomposition [`crate::transpile::prelowering`] uses
/// (`SPEC_FULL.md` §4.3 `[SUPPLEMENT]`): the exact Gray-code solve, or the
/// ancilla-assisted two-control shortcut. `Qrom` needs a scratch qubit
/// beyond `ctrls`/`target`; callers pick one that's otherwise idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McryStrategy {
    Exact,
    Qrom { ancilla: N },
}

impl McryStrategy {
    pub fn decompose(self, ctrls: &[N], theta: R, target: N) -> Vec<Gate> {
        match self {
            McryStrategy::Exact => decompose_mcry(ctrls, theta, target),
            McryStrategy::Qrom { ancilla } => decompose_mcry_qrom(ctrls, theta, target, ancilla),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RState;

    fn apply_all(mut s: RState, gates: &[Gate]) -> RState {
        for g in gates {
            s = s.apply(g, false).unwrap();
        }
        s
    }

    #[test]
    fn single_control_matches_cry_definition() {
        let theta = 0.73;
        let gates = decompose_mcry(&[0], theta, 1);
        assert_eq!(gates.len(), 4);

        let s0 = RState::ground(2).unwrap();
        let s0 = s0.apply(&Gate::x(0), false).unwrap();
        let s0 = apply_all(s0, &gates);

        let s1 = RState::ground(2).unwrap();
        let s1 = s1.apply(&Gate::x(0), false).unwrap();
        let s1 = s1.apply(&Gate::cry(0, true, theta, 1), false).unwrap();

        assert_eq!(s0, s1);
    }

    #[test]
    fn two_controls_only_rotate_on_all_ones_row() {
        let theta = 0.4;
        let gates = decompose_mcry(&[0, 1], theta, 2);
        // control qubits both 0: target should stay |0>.
        let s = RState::ground(3).unwrap();
        let s = apply_all(s, &gates);
        assert!(s.is_ground());
    }

    #[test]
    fn qrom_variant_matches_exact_decomposition_with_both_controls_set() {
        let theta = 0.6;
        // qubits 0,1 = controls, 2 = target, 3 = ancilla.
        let s0 = RState::ground(4).unwrap();
        let s0 = s0.apply(&Gate::x(0), false).unwrap();
        let s0 = s0.apply(&Gate::x(1), false).unwrap();
        let exact = apply_all(s0.clone(), &decompose_mcry(&[0, 1], theta, 2));
        let qrom = apply_all(s0, &decompose_mcry_qrom(&[0, 1], theta, 2, 3));
        assert_eq!(exact, qrom);
    }
}

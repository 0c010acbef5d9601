//! Structured presets (`spec.md` §4.4.5), grounded on
//! `lib/prepare_structured.cpp` (GHZ, W) and `lib/prepare_sparse.cpp`
//! (Dicke): known families get a circuit written down directly rather than
//! discovered by search, each qubit's known value (`qval`) propagated by
//! construction instead of solved for.

use std::collections::VecDeque;

use crate::circuit::Circuit;
use crate::error::{Error, Result};
use crate::gate::Gate;

/// `|0...0> + |1...1>` over `n` qubits (`spec.md` §4.4.5), grounded on
/// `lib/prepare_structured.cpp`'s `prepare_ghz`. `log_depth=false` runs a
/// single linear `CX` chain off qubit 0; `log_depth=true` runs a
/// binary-tree fan-out (`spec.md` §8 GHZ scenario: CNOT level `O(log n)`).
pub fn ghz(n: usize, log_depth: bool) -> Result<Circuit> {
    if n == 0 {
        return Err(Error::InvalidShape { len: n });
    }
    let mut c = Circuit::new(n);
    c.push(Gate::h(0));
    if log_depth {
        let mut i = 1usize;
        while i < n {
            for j in 0..i {
                if j + i < n {
                    c.push(Gate::cx(j, true, j + i));
                }
            }
            i <<= 1;
        }
    } else {
        for i in 1..n {
            c.push(Gate::cx(0, true, i));
        }
    }
    Ok(c)
}

/// The `W_n` state `sum_i |0..1_i..0> / sqrt(n)` (`spec.md` §4.4.5),
/// grounded on `lib/prepare_structured.cpp`'s `prepare_w`. Each step peels
/// a share `p = 1/(n-j)` of the remaining amplitude off qubit `j` onto
/// qubit `i` via `CRY(j, true, theta, i)`, then swaps it back with
/// `CX(i, true, j)` so the next step still pivots on qubit `j`.
/// `cnot_opt` substitutes the `CRY` for the equivalent
/// `RY, CX, RY` expansion pre-lowered to the same angle but phrased
/// without a two-qubit-controlled rotation. `log_depth` replaces the
/// linear chain with a divide-and-conquer queue of pairwise splits so the
/// rotations fan out over `O(log n)` levels instead of `n-1`.
pub fn w(n: usize, log_depth: bool, cnot_opt: bool) -> Result<Circuit> {
    if n == 0 {
        return Err(Error::InvalidShape { len: n });
    }
    let mut c = Circuit::new(n);
    c.push(Gate::x(0));

    if !log_depth {
        for i in 1..n {
            let j = i - 1;
            let p = 1.0 / (n - j) as f64;
            let theta = 2.0 * (1.0 - p).sqrt().atan2(p.sqrt());
            push_w_step(&mut c, j, i, theta, cnot_opt);
            c.push(Gate::cx(i, true, j));
        }
        return Ok(c);
    }

    let mut dicotomies: VecDeque<(usize, usize, usize)> = VecDeque::new();
    dicotomies.push_back((0, n, n >> 1));
    let mut q_next = 1usize;
    while let Some((q, total, curr)) = dicotomies.pop_front() {
        if total < 2 {
            continue;
        }
        let total_l = total >> 1;
        let curr_l = curr >> 1;
        let total_r = total - total_l;
        let curr_r = curr - curr_l;
        if total_l == 1 && curr_l == 1 {
            dicotomies.push_back((q, total_r, curr_r));
        } else {
            dicotomies.push_back((q, total_l, curr_l));
            dicotomies.push_back((q_next, total_r, curr_r));
        }

        let p = curr as f64 / total as f64;
        let theta = 2.0 * (1.0 - p).sqrt().atan2(p.sqrt());
        push_w_step(&mut c, q, q_next, theta, cnot_opt);
        c.push(Gate::cx(q_next, true, q));
        q_next += 1;
    }
    Ok(c)
}

/// `CRY(ctrl, true, theta, target)`, or (when `cnot_opt`) the equivalent
/// `RY(-((theta-pi)/2)), CX(ctrl, true, target), RY((theta-pi)/2)` phrased
/// without a controlled rotation.
fn push_w_step(c: &mut Circuit, ctrl: usize, target: usize, theta: f64, cnot_opt: bool) {
    if cnot_opt {
        c.push(Gate::ry(target, -(theta - std::f64::consts::PI) / 2.0));
        c.push(Gate::cx(ctrl, true, target));
        c.push(Gate::ry(target, (theta - std::f64::consts::PI) / 2.0));
    } else {
        c.push(Gate::cry(ctrl, true, theta, target));
    }
}

/// The symmetric Dicke state `|D(n,k)>` (`spec.md` §4.4.5), grounded on
/// `lib/prepare_sparse.cpp`'s `prepare_dicke_state`/`insert_scs`: a
/// closed-form cascade of `SCS` ("split and copy symmetric") blocks, one
/// per qubit. Each qubit's known value is tracked in `qval` as the cascade
/// runs, so a gate whose control is already known `false` is skipped
/// entirely and a gate whose control is known `true` degrades to the
/// next-lower-arity helper instead of paying for a dead control.
pub fn dicke(n: usize, k: usize) -> Result<Circuit> {
    if k > n || n == 0 {
        return Err(Error::InvalidShape { len: k });
    }
    let mut c = Circuit::new(n);
    let mut qval: Vec<Option<bool>> = vec![Some(false); n];
    for i in 0..k {
        c.push(Gate::x(i));
        qval[i] = Some(true);
    }
    for i in 0..n - 1 {
        insert_scs(&mut c, &mut qval, n, k, i);
    }
    Ok(c)
}

/// `CX(control, true, target)`, short-circuited on `qval[control]`: skipped
/// when the control is known `false`, degraded to a bare `X` on `target`
/// when the control is known `true`.
fn add_cx(c: &mut Circuit, qval: &mut [Option<bool>], control: usize, target: usize) {
    if qval[control] == Some(false) {
        return;
    }
    if qval[control] == Some(true) {
        c.push(Gate::x(target));
        if let Some(v) = qval[target] {
            qval[target] = Some(!v);
        }
        return;
    }
    c.push(Gate::cx(control, true, target));
    qval[target] = None;
}

fn add_ry(c: &mut Circuit, qval: &mut [Option<bool>], target: usize, theta: f64) {
    c.push(Gate::ry(target, theta));
    qval[target] = None;
}

/// `CRY(control, true, theta, target)`, short-circuited on `qval[control]`:
/// skipped when the control is known `false`, degraded to a bare `RY` when
/// the control is known `true`.
fn add_cry(c: &mut Circuit, qval: &mut [Option<bool>], control: usize, target: usize, theta: f64) {
    if qval[control] == Some(false) {
        return;
    }
    if qval[control] == Some(true) {
        add_ry(c, qval, target, theta);
        return;
    }
    c.push(Gate::cry(control, true, theta, target));
    qval[target] = None;
}

/// `MCRY([control1, control2], theta, target)`, short-circuited on
/// `qval[control1]`/`qval[control2]`: skipped when either control is known
/// `false`, degraded to [`add_cry`] on the other control when one is known
/// `true`.
fn add_mcry(c: &mut Circuit, qval: &mut [Option<bool>], control1: usize, control2: usize, target: usize, theta: f64) {
    if qval[control1] == Some(false) || qval[control2] == Some(false) {
        return;
    }
    if qval[control1] == Some(true) {
        return add_cry(c, qval, control2, target, theta);
    }
    if qval[control2] == Some(true) {
        return add_cry(c, qval, control1, target, theta);
    }
    c.push(Gate::mcry(vec![(control1, true), (control2, true)], theta, target));
    qval[target] = None;
}

fn insert_mu(c: &mut Circuit, qval: &mut [Option<bool>], n: usize, j: usize) {
    let theta = 2.0 * (1.0 / (n - j) as f64).sqrt().acos();
    add_cx(c, qval, j + 1, j);
    add_cry(c, qval, j, j + 1, theta);
    add_cx(c, qval, j + 1, j);
}

fn insert_m(c: &mut Circuit, qval: &mut [Option<bool>], n: usize, j: usize, i: usize) {
    let theta = 2.0 * ((i + 1) as f64 / (n - j) as f64).sqrt().acos();
    add_cx(c, qval, j + i + 1, j);
    add_mcry(c, qval, j + i, j, j + i + 1, theta);
    add_cx(c, qval, j + i + 1, j);
}

fn insert_scs(c: &mut Circuit, qval: &mut [Option<bool>], n: usize, k: usize, j: usize) {
    insert_mu(c, qval, n, j);
    for i in 1..k {
        if j + i + 1 >= n {
            break;
        }
        insert_m(c, qval, n, j, i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RState;

    fn replay(c: &Circuit, n: usize) -> RState {
        let mut s = RState::ground(n).unwrap();
        for gate in c.gates() {
            s = s.apply(gate, false).unwrap();
        }
        s
    }

    #[test]
    fn ghz_log_depth_has_two_equal_weight_terms() {
        let c = ghz(4, true).unwrap();
        let s = replay(&c, 4);
        assert_eq!(s.cardinality(), 2);
        assert!(s.weights().contains_key(&0));
        assert!(s.weights().contains_key(&0b1111));
    }

    #[test]
    fn ghz_log_depth_has_logarithmic_level() {
        let c = ghz(8, true).unwrap();
        assert!(c.level() <= 4);
    }

    #[test]
    fn ghz_linear_depth_has_two_equal_weight_terms() {
        let c = ghz(4, false).unwrap();
        let s = replay(&c, 4);
        assert_eq!(s.cardinality(), 2);
        assert!(s.weights().contains_key(&0));
        assert!(s.weights().contains_key(&0b1111));
        let num_cnots = c.gates().filter(|g| matches!(g.kind, crate::gate::Kind::X) && !g.ctrls.is_empty()).count();
        assert_eq!(num_cnots, 3);
    }

    #[test]
    fn w3_has_three_equal_weight_terms() {
        let c = w(3, false, false).unwrap();
        let s = replay(&c, 3);
        assert_eq!(s.cardinality(), 3);
        for key in [0b001u32, 0b010, 0b100] {
            assert!(s.weights().contains_key(&key));
        }
    }

    #[test]
    fn w4_cnot_opt_matches_plain_construction() {
        let plain = replay(&w(4, false, false).unwrap(), 4);
        let opt = replay(&w(4, false, true).unwrap(), 4);
        assert_eq!(plain, opt);
    }

    #[test]
    fn w4_log_depth_matches_linear_depth() {
        let linear = replay(&w(4, false, false).unwrap(), 4);
        let log = replay(&w(4, true, false).unwrap(), 4);
        assert_eq!(linear, log);
    }

    #[test]
    fn dicke_4_2_matches_closed_form() {
        let c = dicke(4, 2).unwrap();
        let s = replay(&c, 4);
        assert_eq!(s, RState::dicke(4, 2).unwrap());
    }

    #[test]
    fn dicke_5_3_matches_closed_form() {
        let c = dicke(5, 3).unwrap();
        let s = replay(&c, 5);
        assert_eq!(s, RState::dicke(5, 3).unwrap());
    }
}

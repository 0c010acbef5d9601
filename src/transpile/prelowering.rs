//! Pre-lowering (`spec.md` §4.5): rewrites `CRY`/`CCX`/`MCRY` down to the
//! `{H,S,S†,T,T†,Z,RY,CX}` basis the Clifford+T transpiler accepts.
//! Negative-phase controls are resolved by flanking `X` flips rather than
//! building a parallel negative-control gate set.

use crate::circuit::Circuit;
use crate::gate::{Gate, Kind};
use crate::mcry::decompose_mcry;

/// Lowers every gate in `circuit`, leaving already-primitive gates as is.
pub fn lower(circuit: &Circuit) -> Circuit {
    let mut out = Circuit::new(circuit.n());
    for gate in circuit.gates() {
        lower_gate(gate, &mut out);
    }
    out
}

fn lower_gate(gate: &Gate, out: &mut Circuit) {
    match (gate.kind, gate.ctrls.len()) {
        (Kind::Ry(theta), 1) => lower_cry(gate.ctrls[0], theta, gate.target, out),
        (Kind::X, 2) => lower_ccx(gate.ctrls[0], gate.ctrls[1], gate.target, out),
        (Kind::Ry(_), k) if k >= 2 => lower_mcry(gate, out),
        (_, 0) => out.push(gate.clone()),
        // A single-control, non-RY/X gate (e.g. a controlled-Z) is not
        // part of this spec's gate set; nothing upstream emits one.
        _ => out.push(gate.clone()),
    }
}

/// `CRY(theta) = (I ⊗ RY(theta/2)) · CX · (I ⊗ RY(-theta/2)) · CX`
/// (`spec.md` §4.5, §9). A negative-phase control is realized by flanking
/// `X` on the control qubit.
fn lower_cry(ctrl: (usize, bool), theta: f64, target: usize, out: &mut Circuit) {
    let (q, phase) = ctrl;
    if !phase {
        out.push(Gate::x(q));
    }
    out.push(Gate::ry(target, theta / 2.0));
    out.push(Gate::cx(q, true, target));
    out.push(Gate::ry(target, -theta / 2.0));
    out.push(Gate::cx(q, true, target));
    if !phase {
        out.push(Gate::x(q));
    }
}

/// Standard 6-`CX` Toffoli decomposition into `{H,T,T†,CX}`.
fn lower_ccx(c0: (usize, bool), c1: (usize, bool), target: usize, out: &mut Circuit) {
    let flips: Vec<usize> = [c0, c1].iter().filter(|(_, phase)| !phase).map(|(q, _)| *q).collect();
    for &q in &flips {
        out.push(Gate::x(q));
    }
    let (a, _) = c0;
    let (b, _) = c1;
    out.push(Gate::h(target));
    out.push(Gate::cx(b, true, target));
    out.push(Gate::tdg(target));
    out.push(Gate::cx(a, true, target));
    out.push(Gate::t(target));
    out.push(Gate::cx(b, true, target));
    out.push(Gate::tdg(target));
    out.push(Gate::cx(a, true, target));
    out.push(Gate::t(b));
    out.push(Gate::t(target));
    out.push(Gate::h(target));
    out.push(Gate::cx(a, true, b));
    out.push(Gate::t(a));
    out.push(Gate::tdg(b));
    out.push(Gate::cx(a, true, b));
    for &q in &flips {
        out.push(Gate::x(q));
    }
}

/// `MCRY` via [`decompose_mcry`], with negative-phase controls resolved by
/// flanking `X` flips, matching `decompose_mcry`'s own convention in the
/// original source of first canonicalizing every control to positive
/// polarity.
fn lower_mcry(gate: &Gate, out: &mut Circuit) {
    let theta = match gate.kind {
        Kind::Ry(t) => t,
        _ => unreachable!("lower_mcry only called for Ry kind"),
    };
    let neg: Vec<usize> = gate.ctrls.iter().filter(|(_, p)| !p).map(|(q, _)| *q).collect();
    for &q in &neg {
        out.push(Gate::x(q));
    }
    let ctrl_qubits: Vec<usize> = gate.ctrls.iter().map(|(q, _)| *q).collect();
    for g in decompose_mcry(&ctrl_qubits, theta, gate.target) {
        out.push(g);
    }
    for &q in &neg {
        out.push(Gate::x(q));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CState, RState};

    fn replay(c: &Circuit, n: usize) -> RState {
        let mut s = RState::ground(n).unwrap();
        for gate in c.gates() {
            s = s.apply(gate, false).unwrap();
        }
        s
    }

    fn replay_complex(c: &Circuit, n: usize) -> CState {
        let mut s = CState::ground(n);
        for gate in c.gates() {
            s = s.apply(gate, false).unwrap();
        }
        s
    }

    #[test]
    fn lowered_cry_matches_original() {
        let mut src = Circuit::new(2);
        src.push(Gate::x(0));
        src.push(Gate::cry(0, true, 0.8, 1));
        let want = replay(&src, 2);

        let mut lowered = Circuit::new(2);
        lowered.push(Gate::x(0));
        lower_gate(&Gate::cry(0, true, 0.8, 1), &mut lowered);
        let got = replay(&lowered, 2);

        assert_eq!(want, got);
    }

    #[test]
    fn lowered_ccx_matches_original() {
        // CCX decomposes through `T`/`T†`, so the intermediate states are
        // genuinely complex even though the net unitary is a real
        // permutation; compare via `CState`.
        let mut src = Circuit::new(3);
        src.push(Gate::x(0));
        src.push(Gate::x(1));
        src.push(Gate::ccx(0, 1, 2));
        let want = replay_complex(&src, 3);

        let mut lowered = Circuit::new(3);
        lowered.push(Gate::x(0));
        lowered.push(Gate::x(1));
        lower_gate(&Gate::ccx(0, 1, 2), &mut lowered);
        let got = replay_complex(&lowered, 3);

        assert_eq!(want.weights().len(), got.weights().len());
        for (key, w) in want.weights() {
            let g = got.weights().get(key).expect("same support");
            assert!((w - g).norm() < 1e-9);
        }
    }
}

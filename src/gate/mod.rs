//! Gate algebra (`spec.md` §3 Entity **Gate**, §4.2).
//!
//! A gate is represented the way qvnt represents an atomic operation plus a
//! control mask (see `operator::single::SingleOp` in the teacher crate): a
//! base one-qubit action (`Kind`) together with a `target` qubit and an
//! ordered list of `(qubit, phase)` control pairs. `CX`/`CRY`/`CCX`/`MCRY`
//! are exactly this with one, one, two, or `k` controls respectively; plain
//! `X`/`H`/`S`/... are the zero-control case.

use std::fmt;

use crate::math::{N, R};

/// The base one-qubit action a [`Gate`] performs once its controls match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kind {
    X,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    /// `RY(theta)`, the only parametrized kind.
    Ry(R),
}

impl Kind {
    /// Kinds that introduce a non-real phase and so cannot act on an
    /// [`crate::state::RState`] (`spec.md` §4.1, §7 `ContractViolation`).
    pub fn is_complex_only(self) -> bool {
        matches!(self, Kind::S | Kind::Sdg | Kind::T | Kind::Tdg)
    }

    fn name(self) -> &'static str {
        match self {
            Kind::X => "x",
            Kind::Z => "z",
            Kind::H => "h",
            Kind::S => "s",
            Kind::Sdg => "sdg",
            Kind::T => "t",
            Kind::Tdg => "tdg",
            Kind::Ry(_) => "ry",
        }
    }

    /// The adjoint kind (`spec.md` §4.1: "inverse selects the adjoint
    /// matrix").
    pub fn dgr(self) -> Kind {
        match self {
            Kind::S => Kind::Sdg,
            Kind::Sdg => Kind::S,
            Kind::T => Kind::Tdg,
            Kind::Tdg => Kind::T,
            Kind::Ry(theta) => Kind::Ry(-theta),
            other => other,
        }
    }
}

/// A control qubit together with the polarity it must fire on
/// (`spec.md` §4.2: `phase = true` fires on 1, `phase = false` fires on 0).
pub type Ctrl = (N, bool);

#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    pub kind: Kind,
    pub target: N,
    pub ctrls: Vec<Ctrl>,
}

impl Gate {
    pub fn new(kind: Kind, target: N, ctrls: Vec<Ctrl>) -> Self {
        Self { kind, target, ctrls }
    }

    pub fn x(target: N) -> Self {
        Self::new(Kind::X, target, vec![])
    }
    pub fn z(target: N) -> Self {
        Self::new(Kind::Z, target, vec![])
    }
    pub fn h(target: N) -> Self {
        Self::new(Kind::H, target, vec![])
    }
    pub fn s(target: N) -> Self {
        Self::new(Kind::S, target, vec![])
    }
    pub fn sdg(target: N) -> Self {
        Self::new(Kind::Sdg, target, vec![])
    }
    pub fn t(target: N) -> Self {
        Self::new(Kind::T, target, vec![])
    }
    pub fn tdg(target: N) -> Self {
        Self::new(Kind::Tdg, target, vec![])
    }
    pub fn ry(target: N, theta: R) -> Self {
        Self::new(Kind::Ry(theta), target, vec![])
    }
    pub fn cx(ctrl: N, phase: bool, target: N) -> Self {
        Self::new(Kind::X, target, vec![(ctrl, phase)])
    }
    pub fn cry(ctrl: N, phase: bool, theta: R, target: N) -> Self {
        Self::new(Kind::Ry(theta), target, vec![(ctrl, phase)])
    }
    pub fn ccx(c0: N, c1: N, target: N) -> Self {
        Self::new(Kind::X, target, vec![(c0, true), (c1, true)])
    }
    pub fn mcry(ctrls: Vec<Ctrl>, theta: R, target: N) -> Self {
        Self::new(Kind::Ry(theta), target, ctrls)
    }

    /// True for a gate whose control list is empty.
    pub fn is_uncontrolled(&self) -> bool {
        self.ctrls.is_empty()
    }

    /// True for the literal `CX(ctrl, phase, target)` shape: one control,
    /// `X` kind. Used by [`crate::circuit::Circuit::level`].
    pub fn is_plain_cx(&self) -> bool {
        matches!(self.kind, Kind::X) && self.ctrls.len() == 1
    }

    /// Ordered list of qubits this gate touches: controls first, target
    /// last (`spec.md` §3 Entity **Gate**).
    pub fn qubits(&self) -> Vec<N> {
        let mut v: Vec<N> = self.ctrls.iter().map(|(q, _)| *q).collect();
        v.push(self.target);
        v
    }

    /// CNOT-count cost, per the table in `spec.md` §4.2.
    pub fn cnot_cost(&self) -> usize {
        let k = self.ctrls.len();
        match (self.kind, k) {
            (_, 0) => 0,
            (Kind::Ry(_), 1) => 2,     // CRY
            (Kind::Ry(_), k) => 1 << k, // MCRY, worst case
            (_, 1) => 1,               // CX
            (_, 2) => 2,               // CCX
            (_, k) => (1 << k) - 1,    // generic multi-control fallback
        }
    }

    /// Adjoint gate: same controls/target, adjoint [`Kind`].
    pub fn dgr(&self) -> Gate {
        Gate { kind: self.kind.dgr(), target: self.target, ctrls: self.ctrls.clone() }
    }

    /// Textual rendering (`spec.md` §6). Standard gates render in OpenQASM
    /// style; negative-phase controls and MCRY use the documented
    /// non-standard extensions consumed only by this crate's own reader.
    pub fn render(&self) -> String {
        let qarg = |q: N| format!("q[{q}]");
        match (self.kind, self.ctrls.as_slice()) {
            (Kind::Ry(theta), []) => format!("ry({theta}) {};", qarg(self.target)),
            (_, []) => format!("{} {};", self.kind.name(), qarg(self.target)),
            (Kind::X, [(ctrl, true)]) => format!("cx {},{};", qarg(*ctrl), qarg(self.target)),
            (Kind::X, [(ctrl, false)]) => {
                format!("cx_false {},{};", qarg(*ctrl), qarg(self.target))
            }
            (Kind::Ry(theta), [(ctrl, true)]) => {
                format!("cry({theta}) {},{};", qarg(*ctrl), qarg(self.target))
            }
            (Kind::Ry(theta), [(ctrl, false)]) => {
                format!("cry_false({theta}) {},{};", qarg(*ctrl), qarg(self.target))
            }
            (Kind::X, [(c0, true), (c1, true)]) => {
                format!("ccx {},{},{};", qarg(*c0), qarg(*c1), qarg(self.target))
            }
            (Kind::Ry(theta), ctrls) => {
                let qubits = ctrls
                    .iter()
                    .map(|(q, _)| qarg(*q))
                    .chain(std::iter::once(qarg(self.target)))
                    .collect::<Vec<_>>()
                    .join(",");
                let phases: String =
                    ctrls.iter().map(|(_, p)| if *p { '1' } else { '0' }).collect();
                format!("mcry({theta},{phases}) {qubits};")
            }
            (_, ctrls) => {
                let qubits = ctrls
                    .iter()
                    .map(|(q, _)| qarg(*q))
                    .chain(std::iter::once(qarg(self.target)))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("mc{} {qubits};", self.kind.name())
            }
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn costs_match_table() {
        assert_eq!(Gate::x(0).cnot_cost(), 0);
        assert_eq!(Gate::cx(0, true, 1).cnot_cost(), 1);
        assert_eq!(Gate::cry(0, true, 1.0, 1).cnot_cost(), 2);
        assert_eq!(Gate::ccx(0, 1, 2).cnot_cost(), 2);
        assert_eq!(Gate::mcry(vec![(0, true), (1, false), (2, true)], 1.0, 3).cnot_cost(), 8);
    }

    #[test]
    fn dgr_negates_theta_and_swaps_phase_gates() {
        assert_eq!(Gate::ry(0, 1.2).dgr().kind, Kind::Ry(-1.2));
        assert_eq!(Gate::s(0).dgr().kind, Kind::Sdg);
        assert_eq!(Gate::t(0).dgr().dgr().kind, Kind::T);
    }

    #[test]
    fn render_matches_qasm_style() {
        assert_eq!(Gate::cx(0, true, 1).render(), "cx q[0],q[1];");
        assert_eq!(Gate::cx(0, false, 1).render(), "cx_false q[0],q[1];");
        assert_eq!(Gate::ccx(0, 1, 2).render(), "ccx q[0],q[1],q[2];");
    }
}

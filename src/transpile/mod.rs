//! Clifford+T transpilation (`spec.md` §4.5, §4.6).
//!
//! [`prelowering`] rewrites every gate down to the `{H,S,S†,T,T†,Z,RY,CX}`
//! basis; [`mitm`] and [`sk`] each turn a single `RY(theta)` into a
//! Clifford+T word, by meet-in-the-middle search and by Solovay-Kitaev
//! recursion respectively.

pub mod mitm;
pub mod prelowering;
pub mod resyn;
pub mod sk;

use crate::circuit::Circuit;
use crate::error::Result;
use crate::gate::{Gate, Kind};

/// Which `RY` approximator [`transpile`] uses (`spec.md` §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RyStrategy {
    MeetInTheMiddle,
    SolovayKitaev,
}

/// Lowers `circuit` to the Clifford+T basis and approximates every
/// remaining `RY` to within `epsilon` using `strategy` (`spec.md` §4.6).
pub fn transpile(circuit: &Circuit, epsilon: f64, strategy: RyStrategy) -> Result<Circuit> {
    let lowered = prelowering::lower(circuit);
    let mut out = Circuit::new(lowered.n());
    for gate in lowered.gates() {
        match gate.kind {
            Kind::Ry(theta) if gate.is_uncontrolled() => {
                // Both approximators target `RZ`; `RY(theta) = S.H.RZ(theta).H.S†`
                // (since `S X S† = Y` conjugates the rotation axis), so the
                // synthesized word is sandwiched between that fixed Clifford
                // change of basis.
                let word = match strategy {
                    RyStrategy::MeetInTheMiddle => mitm::synthesize_rz(theta, epsilon)?,
                    RyStrategy::SolovayKitaev => sk::synthesize_rz(theta, epsilon)?,
                };
                let t = gate.target;
                out.push(Gate::sdg(t));
                out.push(Gate::h(t));
                for g in word.to_gates(t) {
                    out.push(g);
                }
                out.push(Gate::h(t));
                out.push(Gate::s(t));
            }
            _ => out.push(gate.clone()),
        }
    }
    Ok(out)
}

/// A Clifford+T word acting on a single qubit: a sequence of `H`/`T`/`T†`
/// applications, read left to right as the order gates are applied
/// (`spec.md` §4.6). Grounded on `lib/transpile.cpp`'s `GateWord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateWord(pub Vec<Letter>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Letter {
    H,
    T,
    Tdg,
}

impl GateWord {
    pub fn empty() -> Self {
        GateWord(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenates two words, `self` first.
    pub fn concat(&self, other: &GateWord) -> GateWord {
        let mut letters = self.0.clone();
        letters.extend_from_slice(&other.0);
        GateWord(letters)
    }

    /// The adjoint word: letters reversed, each adjointed in place
    /// (`H` is self-adjoint, `T`/`T†` swap). Promoted from the original
    /// source's file-private `invert_word` to a public operation since
    /// both [`mitm`] and [`sk`] need it.
    pub fn inverse(&self) -> GateWord {
        let letters = self
            .0
            .iter()
            .rev()
            .map(|l| match l {
                Letter::H => Letter::H,
                Letter::T => Letter::Tdg,
                Letter::Tdg => Letter::T,
            })
            .collect();
        GateWord(letters)
    }

    /// Expands this word into concrete single-qubit gates on `target`.
    pub fn to_gates(&self, target: usize) -> Vec<Gate> {
        self.0
            .iter()
            .map(|l| match l {
                Letter::H => Gate::h(target),
                Letter::T => Gate::t(target),
                Letter::Tdg => Gate::tdg(target),
            })
            .collect()
    }
}

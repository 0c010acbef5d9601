//! `CState`: the complex-amplitude mirror of [`crate::state::RState`]
//! (`spec.md` §3, §4.1). Used only where a gate leaves the real subgroup
//! (`S`, `S†`, `T`, `T†`) or where the transpiler needs to track an
//! arbitrary single-qubit phase while searching for a Clifford+T word.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::gate::{Gate, Kind};
use crate::math::{Key, C, EPS, N, R};

pub struct CState {
    n: N,
    weights: BTreeMap<Key, C>,
    repr_cache: Cell<Option<u64>>,
}

impl Clone for CState {
    fn clone(&self) -> Self {
        Self { n: self.n, weights: self.weights.clone(), repr_cache: Cell::new(None) }
    }
}

impl PartialEq for CState {
    fn eq(&self, other: &Self) -> bool {
        self.n == other.n && self.weights == other.weights
    }
}

impl std::fmt::Debug for CState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CState").field("n", &self.n).field("weights", &self.weights).finish()
    }
}

impl CState {
    pub fn from_weights_unchecked(n: N, weights: BTreeMap<Key, C>) -> Self {
        Self { n, weights, repr_cache: Cell::new(None) }
    }

    pub fn ground(n: N) -> Self {
        let mut weights = BTreeMap::new();
        weights.insert(0, C::new(1.0, 0.0));
        Self::from_weights_unchecked(n, weights)
    }

    /// Lifts a real state into its complex mirror (`spec.md` §4.1: "every
    /// `RState` has a corresponding `CState` with identical support and
    /// zero imaginary parts").
    pub fn from_rstate(r: &super::RState) -> Self {
        let weights = r.weights().iter().map(|(&k, &w)| (k, C::new(w, 0.0))).collect();
        Self::from_weights_unchecked(r.n(), weights)
    }

    pub fn n(&self) -> N {
        self.n
    }

    pub fn weights(&self) -> &BTreeMap<Key, C> {
        &self.weights
    }

    pub fn is_ground(&self) -> bool {
        self.weights.len() == 1 && self.weights.contains_key(&0)
    }

    fn ctrl_match(ctrls: &[(N, bool)], key: Key) -> bool {
        ctrls.iter().all(|&(q, phase)| (key & (1 << q) != 0) == phase)
    }

    pub fn apply(&self, gate: &Gate, inverse: bool) -> Result<CState> {
        let kind = if inverse { gate.kind.dgr() } else { gate.kind };
        let target_bit = 1u32 << gate.target;
        let matrix = Self::matrix(kind);

        let mut out: BTreeMap<Key, C> = BTreeMap::new();
        let mut done: BTreeSet<Key> = BTreeSet::new();
        for (&key, &w) in &self.weights {
            if !Self::ctrl_match(&gate.ctrls, key) {
                *out.entry(key).or_insert(C::new(0.0, 0.0)) += w;
                continue;
            }
            let index0 = key & !target_bit;
            if !done.insert(index0) {
                continue;
            }
            let w0 = self.weights.get(&index0).copied().unwrap_or(C::new(0.0, 0.0));
            let w1 =
                self.weights.get(&(index0 | target_bit)).copied().unwrap_or(C::new(0.0, 0.0));
            let nw0 = matrix[0][0] * w0 + matrix[0][1] * w1;
            let nw1 = matrix[1][0] * w0 + matrix[1][1] * w1;
            if nw0.norm() > EPS {
                *out.entry(index0).or_insert(C::new(0.0, 0.0)) += nw0;
            }
            if nw1.norm() > EPS {
                *out.entry(index0 | target_bit).or_insert(C::new(0.0, 0.0)) += nw1;
            }
        }
        if out.is_empty() {
            return Err(Error::AllZero);
        }
        Ok(Self::from_weights_unchecked(self.n, out))
    }

    fn matrix(kind: Kind) -> [[C; 2]; 2] {
        let re = |x: R| C::new(x, 0.0);
        let im = |x: R| C::new(0.0, x);
        match kind {
            Kind::X => [[re(0.0), re(1.0)], [re(1.0), re(0.0)]],
            Kind::Z => [[re(1.0), re(0.0)], [re(0.0), re(-1.0)]],
            Kind::H => {
                let s = std::f64::consts::FRAC_1_SQRT_2;
                [[re(s), re(s)], [re(s), re(-s)]]
            }
            Kind::S => [[re(1.0), re(0.0)], [re(0.0), im(1.0)]],
            Kind::Sdg => [[re(1.0), re(0.0)], [re(0.0), im(-1.0)]],
            Kind::T => [[re(1.0), re(0.0)], [re(0.0), C::from_polar(1.0, std::f64::consts::FRAC_PI_4)]],
            Kind::Tdg => {
                [[re(1.0), re(0.0)], [re(0.0), C::from_polar(1.0, -std::f64::consts::FRAC_PI_4)]]
            }
            Kind::Ry(theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                [[re(c), re(-s)], [re(s), re(c)]]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_then_tdg_is_identity_on_ground_state() {
        let s = CState::ground(1);
        let s = s.apply(&Gate::t(0), false).unwrap();
        let s = s.apply(&Gate::tdg(0), false).unwrap();
        assert!(s.is_ground());
    }

    #[test]
    fn lifted_real_state_matches_rstate_support() {
        let r = super::super::RState::dicke(3, 1).unwrap();
        let c = CState::from_rstate(&r);
        assert_eq!(c.weights().len(), r.weights().len());
    }
}

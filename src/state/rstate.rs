//! `RState`: the sparse real-amplitude state (`spec.md` §3, §4.1).

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

use crate::error::{Error, Result};
use crate::gate::{Gate, Kind};
use crate::math::{approx_eq, Key, EPS, N, NORM_EPS, R};

/// A sparse real-amplitude state over `n` qubits.
///
/// Invariants held by every live `RState` (`spec.md` §3): every stored
/// weight has magnitude `> EPS`, keys fit in `n` bits, and
/// `sum(weight^2)` is within `NORM_EPS` of 1 at any point the state
/// crosses a public boundary (construction, `prepare`, `simulate`).
pub struct RState {
    n: N,
    weights: BTreeMap<Key, R>,
    repr_cache: Cell<Option<u64>>,
}

impl Clone for RState {
    fn clone(&self) -> Self {
        // A clone gets its own fresh cache; `repr` is cheap enough to redo
        // lazily and two states must never be able to alias this cell.
        Self { n: self.n, weights: self.weights.clone(), repr_cache: Cell::new(None) }
    }
}

impl PartialEq for RState {
    fn eq(&self, other: &Self) -> bool {
        self.n == other.n && self.weights == other.weights
    }
}

impl std::fmt::Debug for RState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RState").field("n", &self.n).field("weights", &self.weights).finish()
    }
}

impl RState {
    fn max_key(n: N) -> Result<()> {
        if n == 0 || n > 31 {
            return Err(Error::InvalidShape { len: n as usize });
        }
        Ok(())
    }

    /// Builds a state from an already-pruned weight map, validating the
    /// normalization and non-emptiness invariants (`spec.md` §7).
    pub fn from_weights(n: N, weights: BTreeMap<Key, R>) -> Result<Self> {
        Self::max_key(n)?;
        let pruned: BTreeMap<Key, R> =
            weights.into_iter().filter(|(_, w)| w.abs() > EPS).collect();
        if pruned.is_empty() {
            return Err(Error::AllZero);
        }
        let norm_sqr: R = pruned.values().map(|w| w * w).sum();
        if !approx_eq(norm_sqr, 1.0, NORM_EPS) {
            return Err(Error::NotNormalized { norm_sqr });
        }
        Ok(Self { n, weights: pruned, repr_cache: Cell::new(None) })
    }

    /// Builds a state without renormalizing or checking the input, for
    /// internal use by gate application and preparation routines that are
    /// already known to preserve the invariant.
    fn from_weights_unchecked(n: N, weights: BTreeMap<Key, R>) -> Self {
        Self { n, weights, repr_cache: Cell::new(None) }
    }

    /// `|0...0>`.
    pub fn ground(n: N) -> Result<Self> {
        Self::max_key(n)?;
        let mut weights = BTreeMap::new();
        weights.insert(0, 1.0);
        Ok(Self::from_weights_unchecked(n, weights))
    }

    /// The symmetric Dicke state `|D(n,k)>`: uniform weight over every
    /// basis key of Hamming weight `k`.
    pub fn dicke(n: N, k: N) -> Result<Self> {
        Self::max_key(n)?;
        if k > n {
            return Err(Error::InvalidShape { len: k });
        }
        let keys: Vec<Key> = (0u32..(1u32 << n)).filter(|key| key.count_ones() as N == k).collect();
        if keys.is_empty() {
            return Err(Error::AllZero);
        }
        let w = 1.0 / (keys.len() as R).sqrt();
        let weights = keys.into_iter().map(|key| (key, w)).collect();
        Ok(Self::from_weights_unchecked(n, weights))
    }

    /// A reproducible random sparse state of the given cardinality, drawn
    /// uniformly over sign and support then renormalized.
    pub fn random(n: N, cardinality: N, seed: u64) -> Result<Self> {
        Self::max_key(n)?;
        let total = 1u32 << n;
        if cardinality == 0 || cardinality as u32 > total {
            return Err(Error::InvalidShape { len: cardinality });
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut keys: BTreeSet<Key> = BTreeSet::new();
        let key_dist = Uniform::new(0u32, total);
        while keys.len() < cardinality {
            keys.insert(key_dist.sample(&mut rng));
        }
        let sign_dist = Uniform::new(0u32, 2);
        let mut weights: BTreeMap<Key, R> = keys
            .into_iter()
            .map(|key| {
                let sign = if sign_dist.sample(&mut rng) == 0 { 1.0 } else { -1.0 };
                let mag = Uniform::new(0.1_f64, 1.0).sample(&mut rng);
                (key, sign * mag)
            })
            .collect();
        let norm: R = weights.values().map(|w| w * w).sum::<R>().sqrt();
        for w in weights.values_mut() {
            *w /= norm;
        }
        Ok(Self::from_weights_unchecked(n, weights))
    }

    pub fn n(&self) -> N {
        self.n
    }

    pub fn weights(&self) -> &BTreeMap<Key, R> {
        &self.weights
    }

    pub fn cardinality(&self) -> usize {
        self.weights.len()
    }

    pub fn is_ground(&self) -> bool {
        self.weights.len() == 1 && self.weights.contains_key(&0)
    }

    fn norm_sqr(&self) -> R {
        self.weights.values().map(|w| w * w).sum()
    }

    /// The set of qubit indices with non-constant value across the support
    /// (`spec.md` §4.4.1 support reduction).
    pub fn supports(&self) -> BTreeSet<N> {
        let mut out = BTreeSet::new();
        for q in 0..self.n {
            let bit = 1u32 << q;
            let mut saw0 = false;
            let mut saw1 = false;
            for &key in self.weights.keys() {
                if key & bit == 0 {
                    saw0 = true;
                } else {
                    saw1 = true;
                }
                if saw0 && saw1 {
                    break;
                }
            }
            if saw0 && saw1 {
                out.insert(q);
            }
        }
        out
    }

    /// For each qubit, the bit it takes across every key in key order
    /// (`spec.md` §4.4.1/§4.4.2: used to detect constant qubits and
    /// correlated pairs).
    pub fn qubit_signatures(&self) -> BTreeMap<N, Vec<bool>> {
        let keys: Vec<Key> = self.weights.keys().copied().collect();
        (0..self.n)
            .map(|q| {
                let bit = 1u32 << q;
                (q, keys.iter().map(|key| key & bit != 0).collect())
            })
            .collect()
    }

    /// For a `target` qubit currently in the support, the rotation angle
    /// needed to produce each surviving `(index0, index1)` partner pair
    /// present in the weight map from a collapsed `(norm, 0)` pair, keyed
    /// by `index0` (`spec.md` §4.4.1, used ahead of a single MCRY call).
    ///
    /// Every key present in `weights()` contributes an entry, not only
    /// those whose `index0` partner is itself stored: a control pattern
    /// can carry weight on the `index1` branch alone (the qubit reads
    /// constant-1 for that pattern but not across the whole support), and
    /// dropping it here would leave that pattern permanently unreduced.
    pub fn ry_table(&self, target: N) -> BTreeMap<Key, R> {
        let bit = 1u32 << target;
        let mut table = BTreeMap::new();
        for &key in self.weights.keys() {
            let index0 = key & !bit;
            if table.contains_key(&index0) {
                continue;
            }
            let theta = match (self.weights.get(&index0), self.weights.get(&(index0 | bit))) {
                (None, _) => std::f64::consts::PI,
                (Some(_), None) => 0.0,
                (Some(&w0), Some(&w1)) => 2.0 * w1.atan2(w0),
            };
            table.insert(index0, theta);
        }
        table
    }

    /// A cheap 64-bit fingerprint, cached per `spec.md`'s requirement that
    /// `repr()` be stable for an unmodified state and recomputed after any
    /// mutation. Quantizes weights to `EPS` so structurally-identical
    /// states compare equal despite float noise.
    pub fn repr(&self) -> u64 {
        if let Some(cached) = self.repr_cache.get() {
            return cached;
        }
        let mut h: u64 = 0xcbf29ce484222325 ^ (self.n as u64);
        for (&key, &w) in &self.weights {
            let q = (w / EPS).round() as i64;
            h ^= key as u64;
            h = h.wrapping_mul(0x100000001b3);
            h ^= q as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        self.repr_cache.set(Some(h));
        h
    }

    fn ctrl_match(ctrls: &[(N, bool)], key: Key) -> bool {
        ctrls.iter().all(|&(q, phase)| (key & (1 << q) != 0) == phase)
    }

    /// Applies `gate` (or its adjoint, if `inverse`) and returns the
    /// resulting state. Returns [`Error::ContractViolation`] for a gate
    /// whose [`Kind`] is not real-orthogonal (`spec.md` §4.1, §7).
    pub fn apply(&self, gate: &Gate, inverse: bool) -> Result<RState> {
        if gate.kind.is_complex_only() {
            return Err(Error::ContractViolation(format!(
                "{:?} cannot act on a real state",
                gate.kind
            )));
        }
        let kind = if inverse { gate.kind.dgr() } else { gate.kind };
        let target_bit = 1u32 << gate.target;
        let matrix = Self::matrix(kind);

        let mut out: BTreeMap<Key, R> = BTreeMap::new();
        let mut done: BTreeSet<Key> = BTreeSet::new();
        for (&key, &w) in &self.weights {
            if !Self::ctrl_match(&gate.ctrls, key) {
                *out.entry(key).or_insert(0.0) += w;
                continue;
            }
            let index0 = key & !target_bit;
            if !done.insert(index0) {
                continue;
            }
            let w0 = self.weights.get(&index0).copied().unwrap_or(0.0);
            let w1 = self.weights.get(&(index0 | target_bit)).copied().unwrap_or(0.0);
            let nw0 = matrix[0][0] * w0 + matrix[0][1] * w1;
            let nw1 = matrix[1][0] * w0 + matrix[1][1] * w1;
            if nw0.abs() > EPS {
                *out.entry(index0).or_insert(0.0) += nw0;
            }
            if nw1.abs() > EPS {
                *out.entry(index0 | target_bit).or_insert(0.0) += nw1;
            }
        }
        if out.is_empty() {
            return Err(Error::AllZero);
        }
        Ok(Self::from_weights_unchecked(self.n, out))
    }

    /// Real 2x2 matrix for a real-orthogonal [`Kind`].
    fn matrix(kind: Kind) -> [[R; 2]; 2] {
        match kind {
            Kind::X => [[0.0, 1.0], [1.0, 0.0]],
            Kind::Z => [[1.0, 0.0], [0.0, -1.0]],
            Kind::H => {
                let s = std::f64::consts::FRAC_1_SQRT_2;
                [[s, s], [s, -s]]
            }
            Kind::Ry(theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                [[c, -s], [s, c]]
            }
            Kind::S | Kind::Sdg | Kind::T | Kind::Tdg => unreachable!("filtered by apply()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_is_all_zero_key() {
        let s = RState::ground(3).unwrap();
        assert!(s.is_ground());
        assert_eq!(s.norm_sqr(), 1.0);
    }

    #[test]
    fn dicke_has_uniform_weight_over_hamming_slice() {
        let s = RState::dicke(4, 2).unwrap();
        assert_eq!(s.cardinality(), 6);
        for &w in s.weights().values() {
            assert!(approx_eq(w, 1.0 / 6f64.sqrt(), 1e-9));
        }
    }

    #[test]
    fn bell_pair_via_h_then_cx() {
        let s = RState::ground(2).unwrap();
        let s = s.apply(&Gate::h(0), false).unwrap();
        let s = s.apply(&Gate::cx(0, true, 1), false).unwrap();
        assert_eq!(s.cardinality(), 2);
        let w00 = s.weights().get(&0b00).copied().unwrap();
        let w11 = s.weights().get(&0b11).copied().unwrap();
        assert!(approx_eq(w00, std::f64::consts::FRAC_1_SQRT_2, 1e-9));
        assert!(approx_eq(w11, std::f64::consts::FRAC_1_SQRT_2, 1e-9));
    }

    #[test]
    fn s_gate_is_rejected_on_real_state() {
        let s = RState::ground(1).unwrap();
        assert!(matches!(s.apply(&Gate::s(0), false), Err(Error::ContractViolation(_))));
    }

    #[test]
    fn repr_is_stable_and_distinguishes_states() {
        let a = RState::ground(2).unwrap();
        let b = RState::ground(2).unwrap();
        assert_eq!(a.repr(), b.repr());
        let c = a.apply(&Gate::x(0), false).unwrap();
        assert_ne!(a.repr(), c.repr());
    }
}

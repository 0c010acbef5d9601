//! Shared numeric aliases and small bit-twiddling helpers.
//!
//! Mirrors the layout of a typical quantum-simulator `math` module: plain
//! type aliases so the rest of the crate never spells out `f64`/`Complex<f64>`
//! directly, plus a couple of const-time bit helpers used by the Gray-code
//! and Walsh-sign-matrix machinery in [`crate::mcry`].

pub use std::f64::consts::*;

pub mod bits_iter;

/// Qubit counts, indices and cardinalities.
pub type N = usize;
/// Signed counterpart, used for modular/differential bit arithmetic.
pub type Z = isize;
/// Real amplitude / angle.
pub type R = f64;
/// Complex amplitude.
pub type C = num_complex::Complex<R>;

/// Basis index as stored in [`crate::state::RState`] / [`crate::state::CState`].
///
/// `spec.md` bounds `n` to 31 so that an index always fits in 32 bits.
pub type Key = u32;

pub const C_ONE: C = C { re: 1., im: 0. };
pub const C_ZERO: C = C { re: 0., im: 0. };
pub const C_IMAG: C = C { re: 0., im: 1. };

/// Minimum magnitude for a weight to be considered nonzero (`spec.md` §3).
pub const EPS: R = 1e-6;

/// Normalization tolerance at the public boundary (`spec.md` §3, §7).
pub const NORM_EPS: R = 1e-4;

#[inline]
pub fn count_bits(n: N) -> N {
    n.count_ones() as N
}

/// Gray code of `i`: `i XOR (i >> 1)`.
#[inline]
pub fn gray(i: u32) -> u32 {
    i ^ (i >> 1)
}

/// `(-1)^popcount(a & b)`, the entry of the Walsh/Gray sign matrix used by
/// the MCRY decomposer (`spec.md` §4.3).
#[inline]
pub fn walsh_sign(a: u32, b: u32) -> R {
    if (a & b).count_ones() & 1 == 1 {
        -1.0
    } else {
        1.0
    }
}

/// Compare two floats for approximate equality, the way every weight
/// comparison in this crate must be done (`spec.md` §9: "never compare
/// floating-point weights with `==`").
#[inline]
pub fn approx_eq(a: R, b: R, eps: R) -> bool {
    (a - b).abs() <= eps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_code_is_single_bit_step() {
        for i in 0..15u32 {
            let a = gray(i);
            let b = gray(i + 1);
            assert_eq!((a ^ b).count_ones(), 1);
        }
    }

    #[test]
    fn walsh_sign_matches_popcount() {
        assert_eq!(walsh_sign(0b11, 0b10), -1.0);
        assert_eq!(walsh_sign(0b11, 0b11), 1.0);
        assert_eq!(walsh_sign(0, 0), 1.0);
    }
}

//! Solovay-Kitaev alternative (`spec.md` §4.6, §5): recursively
//! approximates `RZ(theta)` via balanced group-commutator decomposition
//! (Dawson & Nielsen's construction), bottoming out in a lookup against a
//! precomputed net of short Clifford+T words. The net is a process-wide
//! singleton built once on first use via [`std::sync::OnceLock`] — simpler
//! than pulling in `lazy_static` for a single lazily-initialized table, and
//! consistent with qvnt treating `lazy_static` as optional infrastructure
//! rather than something every lazy-static use must depend on.

use std::sync::OnceLock;

use num_complex::Complex64 as C;

use crate::error::{Error, Result};

use super::mitm;
use super::GateWord;

type Mat2 = [[C; 2]; 2];

const NET_DEPTH: usize = 6;
/// Upper bound on the commutator decomposition's recursion depth; each
/// extra level roughly triples the net's effective precision (`spec.md`
/// §4.6). [`synthesize_rz`] deepens the recursion one level at a time
/// until the achieved word meets the requested `epsilon`, giving up at
/// this depth.
const MAX_SK_RECURSION_DEPTH: usize = 6;

fn mat_mul(a: &Mat2, b: &Mat2) -> Mat2 {
    let mut out = [[C::new(0.0, 0.0); 2]; 2];
    for i in 0..2 {
        for j in 0..2 {
            out[i][j] = a[i][0] * b[0][j] + a[i][1] * b[1][j];
        }
    }
    out
}

fn adjoint(m: &Mat2) -> Mat2 {
    [[m[0][0].conj(), m[1][0].conj()], [m[0][1].conj(), m[1][1].conj()]]
}

fn rz_matrix(theta: f64) -> Mat2 {
    [[C::from_polar(1.0, -theta / 2.0), C::new(0.0, 0.0)], [
        C::new(0.0, 0.0),
        C::from_polar(1.0, theta / 2.0),
    ]]
}

/// Extracts `(theta, axis)` from an `SU(2)` matrix already normalized to
/// `det = 1`, using `U = cos(theta/2) I - i sin(theta/2) (n . sigma)`.
fn axis_angle(u: &Mat2) -> (f64, [f64; 3]) {
    let cos_a = u[0][0].re.clamp(-1.0, 1.0);
    let alpha = cos_a.acos();
    let sin_a = alpha.sin();
    if sin_a.abs() < 1e-12 {
        return (0.0, [1.0, 0.0, 0.0]);
    }
    let nz = -u[0][0].im / sin_a;
    let ny = -u[0][1].re / sin_a;
    let nx = -u[0][1].im / sin_a;
    (2.0 * alpha, [nx, ny, nz])
}

fn rot(axis: [f64; 3], theta: f64) -> Mat2 {
    let (s, c) = (theta / 2.0).sin_cos();
    let [nx, ny, nz] = axis;
    [
        [C::new(c, -s * nz), C::new(-s * ny, -s * nx)],
        [C::new(s * ny, -s * nx), C::new(c, s * nz)],
    ]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[1] * b[2] - a[2] * b[1], a[2] * b[0] - a[0] * b[2], a[0] * b[1] - a[1] * b[0]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let n = dot(v, v).sqrt();
    if n < 1e-12 {
        [1.0, 0.0, 0.0]
    } else {
        [v[0] / n, v[1] / n, v[2] / n]
    }
}

/// Balanced group-commutator decomposition: finds `(v, w)` such that
/// `v w v† w† ~ u`, following Dawson & Nielsen's construction: pick `v`,
/// `w` as equal-angle rotations about the `X`/`Y` axes, then conjugate
/// both by the rotation that carries the commutator's axis onto `u`'s.
fn gc_decompose(u: &Mat2) -> (Mat2, Mat2) {
    let (theta, n_target) = axis_angle(u);
    let phi = 2.0 * (theta / 4.0).sin().abs().sqrt().asin();

    let v = rot([1.0, 0.0, 0.0], phi);
    let w = rot([0.0, 1.0, 0.0], phi);
    let k = mat_mul(&mat_mul(&v, &w), &mat_mul(&adjoint(&v), &adjoint(&w)));
    let (_, n_k) = axis_angle(&k);

    let c = cross(n_k, n_target);
    let axis = normalize(c);
    let angle = dot(n_k, n_target).clamp(-1.0, 1.0).acos();
    let s = if c.iter().all(|x| x.abs() < 1e-9) { rot([1.0, 0.0, 0.0], 0.0) } else { rot(axis, angle) };
    let s_dag = adjoint(&s);

    let v2 = mat_mul(&mat_mul(&s, &v), &s_dag);
    let w2 = mat_mul(&mat_mul(&s, &w), &s_dag);
    (v2, w2)
}

/// The precomputed net of short Clifford+T words (`spec.md` §5), built
/// once per process.
struct Net {
    entries: Vec<(Mat2, GateWord)>,
}

impl Net {
    fn build() -> Self {
        let mut entries = Vec::new();
        for word in mitm::enumerate_all_up_to(NET_DEPTH) {
            let m = mitm::normalize_det(mitm::word_matrix(&word));
            entries.push((m, word));
        }
        Net { entries }
    }

    fn closest(&self, target: &Mat2) -> &GateWord {
        self.entries
            .iter()
            .min_by(|(a, _), (b, _)| {
                mitm::dist(a, target).partial_cmp(&mitm::dist(b, target)).unwrap()
            })
            .map(|(_, w)| w)
            .expect("net is never empty")
    }
}

fn net() -> &'static Net {
    static NET: OnceLock<Net> = OnceLock::new();
    NET.get_or_init(Net::build)
}

fn sk_approx(u: Mat2, depth: usize) -> GateWord {
    if depth == 0 {
        return net().closest(&u).clone();
    }
    let prev = sk_approx(u, depth - 1);
    let prev_matrix = mitm::normalize_det(mitm::word_matrix(&prev));
    let delta = mat_mul(&u, &adjoint(&prev_matrix));

    let (v, w) = gc_decompose(&delta);
    let v_word = sk_approx(v, depth - 1);
    let w_word = sk_approx(w, depth - 1);

    v_word.concat(&w_word).concat(&v_word.inverse()).concat(&w_word.inverse()).concat(&prev)
}

/// Synthesizes a Clifford+T word approximating `RZ(theta)` to within
/// `epsilon` via Solovay-Kitaev recursion (`spec.md` §4.6): deepens the
/// commutator decomposition one level at a time, starting from the bare
/// net lookup, until the achieved word's phase-invariant distance to the
/// target is within `epsilon`. Returns [`Error::BudgetExceeded`] if
/// [`MAX_SK_RECURSION_DEPTH`] is reached without meeting the tolerance.
pub fn synthesize_rz(theta: f64, epsilon: f64) -> Result<GateWord> {
    let target = rz_matrix(theta);
    for depth in 0..=MAX_SK_RECURSION_DEPTH {
        let word = sk_approx(target, depth);
        let m = mitm::normalize_det(mitm::word_matrix(&word));
        if mitm::dist(&m, &target) <= epsilon {
            return Ok(word);
        }
    }
    Err(Error::BudgetExceeded(format!(
        "solovay-kitaev recursion exhausted depth {MAX_SK_RECURSION_DEPTH} without reaching epsilon {epsilon}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sk_approximates_identity_closely() {
        let word = synthesize_rz(0.0, 0.1).unwrap();
        let m = mitm::normalize_det(mitm::word_matrix(&word));
        assert!(mitm::dist(&m, &rz_matrix(0.0)) < 0.5);
    }

    #[test]
    fn depth_zero_matches_net_lookup_directly() {
        let target = rz_matrix(0.3);
        let word = sk_approx(target, 0);
        let m = mitm::normalize_det(mitm::word_matrix(&word));
        assert!(mitm::dist(&m, &target) < 1.0);
    }
}

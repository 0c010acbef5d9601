//! State algebra (`spec.md` §3 Entity **State**, §4.1).
//!
//! Two realizations share one idea — a sparse, key-ordered mapping from
//! basis index to weight — the way qvnt keeps a dense `Vec<Complex<f64>>`
//! register but swaps the backend under a common `Register` facade. Here the
//! backend swap is in the weight type instead: [`RState`] carries real
//! weights and is the one every preparation routine works with, [`CState`]
//! carries complex weights and exists only for the transpiler's
//! axis-alignment helpers and for gates that leave the real subgroup.

pub mod cstate;
pub mod rstate;

pub use cstate::CState;
pub use rstate::RState;

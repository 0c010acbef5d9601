//! State preparation engine (`spec.md` §4.4): turns an arbitrary [`RState`]
//! into a [`Circuit`] that produces it from `|0...0>`.
//!
//! Every strategy here works backward — reduce the target state toward the
//! ground state by applying gates, recording each one — then hands the
//! recorded [`Circuit`] to [`Circuit::reversed`], which is exactly how
//! `lib/prepare_sparse.cpp` and `lib/prepare_bfs.cpp` build their circuits
//! in the original source.

pub mod auto;
pub mod bfs;
pub mod cardinality_reduction;
pub mod presets;
pub mod support_reduction;

use crate::circuit::Circuit;
use crate::error::Result;
use crate::state::RState;

/// Strategy selector for [`prepare`] (`spec.md` §4.4.4 Auto driver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Greedy support/cardinality reduction only, falling back to a single
    /// MCRY whenever reduction stalls.
    Sparse,
    /// Best-first search over the neighborhood generated by
    /// [`bfs::enumerate_gates`].
    Bfs,
    /// Reduction first, then BFS once the state is small enough
    /// (`spec.md` §4.4.4).
    Auto,
}

/// Prepares `state` using `strategy`, returning a circuit that maps
/// `|0...0>` to `state` (`spec.md` §4.4).
pub fn prepare(state: &RState, strategy: Strategy) -> Result<Circuit> {
    match strategy {
        Strategy::Sparse => support_reduction::prepare_sparse(state),
        Strategy::Bfs => bfs::prepare_bfs(state, bfs::Budget::default()),
        Strategy::Auto => auto::prepare_auto(state),
    }
}

//! Circuit simulation (`[SUPPLEMENT]` grounded on `lib/simulator.cpp`):
//! replays a [`Circuit`] from the ground state and reports the resulting
//! amplitudes. Verbosity follows qvnt's own convention of a plain `bool`
//! flag plus `println!`, rather than pulling in a logging crate for a
//! handful of progress lines.

use crate::circuit::Circuit;
use crate::error::Result;
use crate::state::CState;

/// Runs `circuit` from `|0...0>` and returns the final state. When
/// `verbose` is set, prints each gate and the resulting support size as it
/// is applied — the same shape of diagnostic output qvnt's own
/// `Register::apply` prints under its `verbose` flag.
pub fn simulate(circuit: &Circuit, verbose: bool) -> Result<CState> {
    let mut state = CState::ground(circuit.n());
    for (i, gate) in circuit.gates().enumerate() {
        state = state.apply(gate, false)?;
        if verbose {
            println!("[{i}] {gate} -> support {}", state.weights().len());
        }
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Gate;

    #[test]
    fn bell_circuit_simulates_to_two_term_superposition() {
        let mut c = Circuit::new(2);
        c.push(Gate::h(0));
        c.push(Gate::cx(0, true, 1));
        let state = simulate(&c, false).unwrap();
        assert_eq!(state.weights().len(), 2);
    }
}

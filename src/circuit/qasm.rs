//! Textual circuit format (`spec.md` §6).
//!
//! Close to OpenQASM 2.0 but not claimed compatible with it: negative-phase
//! controls (`cx_false`, `cry_false`) and `mcry` are non-standard extensions
//! understood only by this module's own [`parse`].

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::gate::Gate;
use crate::math::N;

use super::Circuit;

pub fn render(circuit: &Circuit) -> String {
    let mut out = String::new();
    out.push_str("OPENQASM 2.0;\n");
    out.push_str(&format!("qreg q[{}];\n", circuit.n()));
    for gate in circuit.gates() {
        out.push_str(&gate.render());
        out.push('\n');
    }
    out
}

fn qubit_index(token: &str) -> Result<N> {
    let token = token.trim();
    let inner = token
        .strip_prefix("q[")
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| Error::IOError(format!("expected q[n], got `{token}`")))?;
    inner.parse::<N>().map_err(|e| Error::IOError(e.to_string()))
}

fn split_head_args(line: &str) -> (&str, &str) {
    match line.find(' ') {
        Some(i) => (&line[..i], line[i + 1..].trim_end_matches(';').trim()),
        None => (line.trim_end_matches(';'), ""),
    }
}

fn expect_arity(head: &str, qubits: &[N], expected: usize) -> Result<()> {
    if qubits.len() != expected {
        return Err(Error::IOError(format!(
            "`{head}` expects {expected} qubit operand(s), got {}",
            qubits.len()
        )));
    }
    Ok(())
}

fn expect_min_arity(head: &str, qubits: &[N], min: usize) -> Result<()> {
    if qubits.len() < min {
        return Err(Error::IOError(format!(
            "`{head}` expects at least {min} qubit operand(s), got {}",
            qubits.len()
        )));
    }
    Ok(())
}

fn parse_theta(head: &str, prefix: &str) -> Result<f64> {
    let inner = head
        .strip_prefix(prefix)
        .and_then(|s| s.strip_prefix('('))
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| Error::IOError(format!("malformed angle gate `{head}`")))?;
    inner.split(',').next().unwrap_or(inner).parse::<f64>().map_err(|e| Error::IOError(e.to_string()))
}

/// Parses the format emitted by [`render`] back into a [`Circuit`].
pub fn parse(text: &str) -> Result<Circuit> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let header = lines.next().ok_or_else(|| Error::IOError("empty input".into()))?;
    if !header.starts_with("OPENQASM") {
        return Err(Error::IOError(format!("expected OPENQASM header, got `{header}`")));
    }

    let qreg_line = lines.next().ok_or_else(|| Error::IOError("missing qreg line".into()))?;
    let n = qreg_line
        .strip_prefix("qreg q[")
        .and_then(|s| s.split(']').next())
        .ok_or_else(|| Error::IOError(format!("malformed qreg line `{qreg_line}`")))?
        .parse::<N>()
        .map_err(|e| Error::IOError(e.to_string()))?;

    let mut gates: VecDeque<Gate> = VecDeque::new();
    for line in lines {
        let (head, args) = split_head_args(line);
        let qubits: Vec<N> =
            args.split(',').filter(|s| !s.is_empty()).map(qubit_index).collect::<Result<_>>()?;
        let gate = match head {
            "x" => {
                expect_arity(head, &qubits, 1)?;
                Gate::x(qubits[0])
            }
            "z" => {
                expect_arity(head, &qubits, 1)?;
                Gate::z(qubits[0])
            }
            "h" => {
                expect_arity(head, &qubits, 1)?;
                Gate::h(qubits[0])
            }
            "s" => {
                expect_arity(head, &qubits, 1)?;
                Gate::s(qubits[0])
            }
            "sdg" => {
                expect_arity(head, &qubits, 1)?;
                Gate::sdg(qubits[0])
            }
            "t" => {
                expect_arity(head, &qubits, 1)?;
                Gate::t(qubits[0])
            }
            "tdg" => {
                expect_arity(head, &qubits, 1)?;
                Gate::tdg(qubits[0])
            }
            "cx" => {
                expect_arity(head, &qubits, 2)?;
                Gate::cx(qubits[0], true, qubits[1])
            }
            "cx_false" => {
                expect_arity(head, &qubits, 2)?;
                Gate::cx(qubits[0], false, qubits[1])
            }
            "ccx" => {
                expect_arity(head, &qubits, 3)?;
                Gate::ccx(qubits[0], qubits[1], qubits[2])
            }
            h if h.starts_with("ry(") => {
                expect_arity(h, &qubits, 1)?;
                Gate::ry(qubits[0], parse_theta(h, "ry")?)
            }
            h if h.starts_with("cry(") => {
                expect_arity(h, &qubits, 2)?;
                Gate::cry(qubits[0], true, parse_theta(h, "cry")?, qubits[1])
            }
            h if h.starts_with("cry_false(") => {
                expect_arity(h, &qubits, 2)?;
                Gate::cry(qubits[0], false, parse_theta(h, "cry_false")?, qubits[1])
            }
            h if h.starts_with("mcry(") => {
                expect_min_arity(h, &qubits, 1)?;
                let theta = parse_theta(h, "mcry")?;
                let phases_str = h
                    .rsplit(',')
                    .next()
                    .and_then(|s| s.strip_suffix(')'))
                    .ok_or_else(|| Error::IOError(format!("malformed mcry phases in `{h}`")))?;
                let n_ctrls = qubits.len() - 1;
                if phases_str.len() != n_ctrls {
                    return Err(Error::IOError(format!(
                        "mcry phase string length {} does not match {n_ctrls} controls",
                        phases_str.len()
                    )));
                }
                let ctrls = qubits[..n_ctrls]
                    .iter()
                    .zip(phases_str.chars())
                    .map(|(&q, p)| (q, p == '1'))
                    .collect();
                Gate::mcry(ctrls, theta, qubits[n_ctrls])
            }
            other => return Err(Error::IOError(format!("unrecognized gate `{other}`"))),
        };
        gates.push_back(gate);
    }

    Ok(Circuit { n, gates })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_small_circuit() {
        let mut c = Circuit::new(2);
        c.push(Gate::h(0));
        c.push(Gate::cx(0, true, 1));
        c.push(Gate::ry(1, 0.75));
        let text = c.render();
        let back = parse(&text).unwrap();
        assert_eq!(c, back);
    }

    #[test]
    fn round_trips_mcry_with_mixed_phases() {
        let mut c = Circuit::new(4);
        c.push(Gate::mcry(vec![(0, true), (1, false), (2, true)], 0.5, 3));
        let text = c.render();
        let back = parse(&text).unwrap();
        assert_eq!(c, back);
    }
}

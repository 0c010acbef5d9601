//! `prepare-state`: reads a sparse target state from JSON and emits a
//! preparation circuit in the textual format of `spec.md` §6.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Deserialize;

use qsynth::prep::{prepare, Strategy};
use qsynth::state::RState;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Sparse,
    Bfs,
    Auto,
}

impl From<StrategyArg> for Strategy {
    fn from(a: StrategyArg) -> Strategy {
        match a {
            StrategyArg::Sparse => Strategy::Sparse,
            StrategyArg::Bfs => Strategy::Bfs,
            StrategyArg::Auto => Strategy::Auto,
        }
    }
}

/// Prepares a sparse real-amplitude state from `|0...0>` and prints the
/// resulting circuit.
#[derive(Debug, Parser)]
#[command(name = "prepare-state", version, about)]
struct Args {
    /// JSON file: `{"n": 3, "weights": {"0": 0.707, "7": 0.707}}`.
    input: PathBuf,

    #[arg(long, value_enum, default_value = "auto")]
    strategy: StrategyArg,

    /// Print the CNOT cost and level alongside the circuit.
    #[arg(long)]
    stats: bool,
}

#[derive(Debug, Deserialize)]
struct TargetFile {
    n: usize,
    weights: BTreeMap<String, f64>,
}

fn run(args: Args) -> qsynth::error::Result<()> {
    let text = fs::read_to_string(&args.input)
        .map_err(|e| qsynth::error::Error::IOError(e.to_string()))?;
    let parsed: TargetFile = serde_json::from_str(&text)
        .map_err(|e| qsynth::error::Error::IOError(e.to_string()))?;

    let mut weights = BTreeMap::new();
    for (key, w) in parsed.weights {
        let key: u32 = key.parse().map_err(|_| {
            qsynth::error::Error::IOError(format!("`{key}` is not a valid basis index"))
        })?;
        weights.insert(key, w);
    }
    let target = RState::from_weights(parsed.n, weights)?;

    let circuit = prepare(&target, args.strategy.into())?;
    print!("{}", circuit.render());
    if args.stats {
        eprintln!("cnot_cost={} level={}", circuit.cnot_cost(), circuit.level());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

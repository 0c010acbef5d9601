//! `transpile`: lowers a circuit to Clifford+T (`spec.md` §4.5, §4.6),
//! reading and writing the textual format from §6.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use qsynth::circuit::qasm;
use qsynth::transpile::{resyn, transpile, RyStrategy};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Mitm,
    Sk,
}

impl From<StrategyArg> for RyStrategy {
    fn from(a: StrategyArg) -> RyStrategy {
        match a {
            StrategyArg::Mitm => RyStrategy::MeetInTheMiddle,
            StrategyArg::Sk => RyStrategy::SolovayKitaev,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "transpile", version, about)]
struct Args {
    /// Circuit file in the textual format `prepare-state`/`prepare-dicke`
    /// emit.
    input: PathBuf,

    /// Per-`RY` approximation tolerance (`spec.md` §4.6).
    #[arg(long, default_value_t = 1e-3)]
    epsilon: f64,

    #[arg(long, value_enum, default_value = "mitm")]
    strategy: StrategyArg,

    /// Run windowed rotation resynthesis before Clifford+T lowering
    /// (`spec.md` §9's `resyn` note).
    #[arg(long)]
    resyn: bool,
}

fn run(args: Args) -> qsynth::error::Result<()> {
    let text =
        fs::read_to_string(&args.input).map_err(|e| qsynth::error::Error::IOError(e.to_string()))?;
    let mut circuit = qasm::parse(&text)?;
    if args.resyn {
        circuit = resyn::resyn(&circuit);
    }
    let lowered = transpile(&circuit, args.epsilon, args.strategy.into())?;
    print!("{}", lowered.render());
    eprintln!("cnot_cost={} gates={}", lowered.cnot_cost(), lowered.len());
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

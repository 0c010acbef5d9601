//! `prepare-dicke`: emits a structured preset circuit for GHZ, W, or Dicke
//! states (`spec.md` §4.4.5) without going through general search.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use qsynth::prep::presets;

#[derive(Debug, Parser)]
#[command(name = "prepare-dicke", version, about)]
struct Args {
    #[command(subcommand)]
    family: Family,
}

#[derive(Debug, Subcommand)]
enum Family {
    /// `|0...0> + |1...1>` over `n` qubits.
    Ghz {
        n: usize,
        /// Binary-tree fan-out (O(log n) CNOT levels) instead of a linear chain.
        #[arg(long)]
        log_depth: bool,
    },
    /// The symmetric `W_n` state.
    W {
        n: usize,
        /// Divide-and-conquer CNOT fan-out instead of a linear chain.
        #[arg(long)]
        log_depth: bool,
        /// Substitute each CRY for an RY/CX/RY expansion.
        #[arg(long)]
        cnot_opt: bool,
    },
    /// The symmetric Dicke state `|D(n,k)>`.
    Dicke { n: usize, k: usize },
}

fn run(args: Args) -> qsynth::error::Result<()> {
    let circuit = match args.family {
        Family::Ghz { n, log_depth } => presets::ghz(n, log_depth)?,
        Family::W { n, log_depth, cnot_opt } => presets::w(n, log_depth, cnot_opt)?,
        Family::Dicke { n, k } => presets::dicke(n, k)?,
    };
    print!("{}", circuit.render());
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

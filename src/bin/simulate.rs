//! `simulate`: replays a circuit from the ground state and prints the
//! resulting amplitudes (`[SUPPLEMENT]`, grounded on `lib/simulator.cpp`).

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use qsynth::circuit::qasm;
use qsynth::sim::simulate;

#[derive(Debug, Parser)]
#[command(name = "simulate", version, about)]
struct Args {
    input: PathBuf,

    #[arg(long)]
    verbose: bool,
}

fn run(args: Args) -> qsynth::error::Result<()> {
    let text =
        fs::read_to_string(&args.input).map_err(|e| qsynth::error::Error::IOError(e.to_string()))?;
    let circuit = qasm::parse(&text)?;
    let state = simulate(&circuit, args.verbose)?;
    for (key, w) in state.weights() {
        println!("{key:#010b}: {:+.6} {:+.6}i", w.re, w.im);
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

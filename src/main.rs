//! wire - W.I.R.E. worksheet solver
//!
//! Solves a series/parallel DC circuit problem and prints every watts,
//! current, resistance and EMF value the givens determine.
//!
//! # Usage
//!
//! ```bash
//! wire led_resistor.wire
//! wire backward.json --format json --target-only
//! ```

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::Level;
use wire_core::{
    dsl,
    error::Result,
    report::{self, OutputFormat},
    solver::{Requirement, DEFAULT_TOLERANCE},
    Solver, SolverConfig,
};

/// W.I.R.E. solver for series/parallel DC circuits
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the problem file (.wire text, or .json)
    #[arg(value_name = "PROBLEM_FILE")]
    problem_file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Relative tolerance when two derivations of one value meet
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Only require the problem's target to resolve
    #[arg(long)]
    target_only: bool,

    /// Log solver passes to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let problem = dsl::load_file(&args.problem_file)?;

    let requirement = if args.target_only {
        Requirement::Target
    } else {
        Requirement::Complete
    };
    let config = SolverConfig::new()
        .with_tolerance(args.tolerance)
        .with_requirement(requirement);

    let solution = Solver::with_config(config).solve(&problem)?;
    println!("{}", report::render(&solution, args.format)?);

    Ok(())
}

//! One-shot solver CLI.
//!
//! Solves a single game and prints the report, or the solution as JSON.
//!
//! Usage:
//!   cargo run --release --bin blotto-solve -- --troops 5 --fields 3 [OPTIONS]

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::LevelFilter;

use blotto::logging;
use blotto::protocol::{format_solution, write_report};
use blotto::solve::{
    AcceptancePolicy, SolveConfig, Solver, SolverError, DEFAULT_MAX_COMPOSITIONS,
};

#[derive(Parser, Debug)]
#[command(name = "blotto-solve", about = "Find the most robust Colonel Blotto allocation")]
struct Args {
    /// Number of identical troop units to allocate
    #[arg(long, allow_hyphen_values = true)]
    troops: i64,

    /// Number of battlefields
    #[arg(long, allow_hyphen_values = true)]
    fields: i64,

    /// Reject the result when no allocation keeps win >= loss against every opponent
    #[arg(long)]
    strict: bool,

    /// Refuse games with more compositions than this
    #[arg(long, default_value_t = DEFAULT_MAX_COMPOSITIONS)]
    max_compositions: u128,

    /// Worker threads (default: available parallelism)
    #[arg(long)]
    threads: Option<usize>,

    /// Print the solution as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Log level for stderr output (overrides BLOTTO_LOG)
    #[arg(long)]
    log_level: Option<LevelFilter>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = args
        .log_level
        .unwrap_or_else(|| logging::level_from_env(LevelFilter::Info));
    if let Err(e) = logging::init(level) {
        eprintln!("failed to initialize logger: {}", e);
    }

    let solver = match Solver::bounded(args.troops, args.fields, args.max_compositions) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    let defaults = SolveConfig::default();
    let config = SolveConfig {
        policy: if args.strict {
            AcceptancePolicy::Strict
        } else {
            AcceptancePolicy::BestEffort
        },
        threads: args.threads.unwrap_or(defaults.threads),
    };
    log::info!(
        "solving {} troops over {} fields: {} compositions, {} classes, {} threads",
        solver.troops(),
        solver.fields(),
        solver.compositions().len(),
        solver.class_count(),
        config.threads
    );

    let start = Instant::now();
    let result = solver.solve_with(&config);
    log::info!("solved in {:.2}s", start.elapsed().as_secs_f64());

    match result {
        Ok(solution) => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let written = if args.json {
                format_solution(&solution)
                    .map_err(io::Error::other)
                    .and_then(|json| writeln!(out, "{}", json))
                    .and_then(|_| out.flush())
            } else {
                write_report(&solution, &mut out)
            };
            match written {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("error: failed to write output: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e @ SolverError::NoRobustAllocation { .. }) => {
            println!("No allocation satisfies win probability >= loss probability against every opponent.");
            eprintln!("{}", e);
            ExitCode::from(3)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

//! Engine session state.
//!
//! Holds the current game's solver and the engine options, and answers the
//! protocol commands. `newgame` replaces the solver wholesale; `solve` only
//! reads it.

use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Instant;

use crate::protocol::parser::SolveParams;
use crate::protocol::report::{format_solution, verdict};
use crate::solve::{
    AcceptancePolicy, SolveConfig, Solver, SolverError, DEFAULT_MAX_COMPOSITIONS, MAX_THREADS,
};

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub solver: Option<Solver>,
    pub options: HashMap<String, String>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// Creates a new engine with no game and no options.
    pub fn new() -> Self {
        Engine {
            solver: None,
            options: HashMap::new(),
        }
    }

    /// Sets an engine option.
    pub fn set_option(&mut self, name: String, value: Option<String>) {
        self.options.insert(name, value.unwrap_or_default());
    }

    /// Replaces the current game. The previous solver is dropped first, so a
    /// rejected game leaves the engine without one.
    pub fn new_game(&mut self, troops: i64, fields: i64) -> Result<(), SolverError> {
        self.solver = None;
        let solver = Solver::bounded(troops, fields, self.max_compositions())?;
        log::debug!(
            "new game: {} troops, {} fields, {} compositions",
            troops,
            fields,
            solver.compositions().len()
        );
        self.solver = Some(solver);
        Ok(())
    }

    fn option<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        let raw = self.options.get(name)?;
        match raw.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!("ignoring invalid {} option '{}'", name, raw);
                None
            }
        }
    }

    /// Returns the configured composition cap, or the default.
    fn max_compositions(&self) -> u128 {
        self.option("MaxCompositions")
            .unwrap_or(DEFAULT_MAX_COMPOSITIONS)
    }

    /// Merges `solve` parameters over the engine options and defaults.
    /// Thread counts are clamped to the advertised `1..=MAX_THREADS`.
    pub fn solve_config(&self, params: &SolveParams) -> SolveConfig {
        let defaults = SolveConfig::default();
        SolveConfig {
            policy: params
                .policy
                .or_else(|| self.option::<AcceptancePolicy>("Policy"))
                .unwrap_or(defaults.policy),
            threads: params
                .threads
                .or_else(|| self.option("Threads"))
                .unwrap_or(defaults.threads)
                .clamp(1, MAX_THREADS),
        }
    }

    /// Handles the handshake: writes id, options, protocol_version, and blottook.
    pub fn handle_blotto<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let threads = SolveConfig::default().threads;
        writeln!(out, "id name blotto")?;
        writeln!(out, "id author polite-betrayal")?;
        writeln!(
            out,
            "option name Threads type spin default {} min 1 max {}",
            threads, MAX_THREADS
        )?;
        writeln!(
            out,
            "option name Policy type combo default besteffort var besteffort var strict"
        )?;
        writeln!(
            out,
            "option name MaxCompositions type spin default {} min 1",
            DEFAULT_MAX_COMPOSITIONS
        )?;
        writeln!(out, "protocol_version 1")?;
        writeln!(out, "blottook")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles `newgame`, reporting rejected parameters as an `error` line.
    pub fn handle_newgame<W: Write>(
        &mut self,
        troops: i64,
        fields: i64,
        out: &mut W,
    ) -> io::Result<()> {
        if let Err(e) = self.new_game(troops, fields) {
            log::warn!("newgame rejected: {}", e);
            writeln!(out, "error {}", e)?;
            out.flush()?;
        }
        Ok(())
    }

    /// Handles the `solve` command. Emits an `info` line, then either
    /// `solution <json>` followed by `verdict <text>`, or `nosolution
    /// <margin>` when a strict solve finds no robust allocation.
    pub fn handle_solve<W: Write>(&self, params: &SolveParams, out: &mut W) -> io::Result<()> {
        let Some(solver) = &self.solver else {
            log::warn!("solve: no game set");
            writeln!(out, "error no game set")?;
            return out.flush();
        };

        let config = self.solve_config(params);
        let start = Instant::now();
        let result = solver.solve_with(&config);
        writeln!(
            out,
            "info compositions {} classes {} comparisons {} time {}",
            solver.compositions().len(),
            solver.class_count(),
            solver.comparisons(),
            start.elapsed().as_millis()
        )?;

        match result {
            Ok(solution) => {
                let json = format_solution(&solution).map_err(io::Error::other)?;
                writeln!(out, "solution {}", json)?;
                writeln!(out, "verdict {}", verdict(&solution))?;
            }
            Err(SolverError::NoRobustAllocation {
                composition,
                worst_case_margin,
            }) => {
                log::info!("strict solve rejected best candidate {}", composition);
                writeln!(out, "nosolution {:.4}", worst_case_margin)?;
            }
            Err(e) => {
                log::warn!("solve failed: {}", e);
                writeln!(out, "error {}", e)?;
            }
        }
        out.flush()
    }
}

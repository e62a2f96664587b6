//! Logger setup shared by the binaries.
//!
//! Logs always go to stderr; stdout is reserved for protocol responses.

use log::{LevelFilter, SetLoggerError};

/// Environment variable that overrides the default log level.
pub const LOG_ENV: &str = "BLOTTO_LOG";

/// Resolves the log level from `BLOTTO_LOG`, falling back to `default`.
pub fn level_from_env(default: LevelFilter) -> LevelFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Installs a terminal logger on stderr. Fails if a logger is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
}

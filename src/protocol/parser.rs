//! Engine command parser.
//!
//! Parses incoming protocol commands from raw text into structured
//! `Command` variants that the engine main loop can dispatch on.

use thiserror::Error;

use crate::solve::AcceptancePolicy;

/// Errors for lines that name a known command but carry bad arguments, or
/// name no known command at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("malformed {command}: expected '{usage}'")]
    Malformed {
        command: &'static str,
        usage: &'static str,
    },

    #[error("invalid {name} value '{value}': expected an integer")]
    InvalidNumber { name: &'static str, value: String },

    #[error("unknown {command} parameter '{param}'")]
    UnknownParameter {
        command: &'static str,
        param: String,
    },
}

/// Settings passed with the `solve` command. Unset fields fall back to the
/// engine options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveParams {
    pub policy: Option<AcceptancePolicy>,
    pub threads: Option<usize>,
}

/// A parsed client-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initialize the protocol handshake.
    Blotto,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Replace the current game: `newgame <troops> <fields>`.
    NewGame { troops: i64, fields: i64 },

    /// Solve the current game.
    Solve(SolveParams),

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = tokens.first() else {
        return Ok(None);
    };

    let cmd = match head {
        "blotto" => Command::Blotto,
        "isready" => Command::IsReady,
        "quit" => Command::Quit,

        "setoption" => parse_setoption(&tokens)?,
        "newgame" => parse_newgame(&tokens)?,
        "solve" => parse_solve(&tokens)?,

        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(cmd))
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Result<Command, ParseError> {
    const USAGE: &str = "setoption name <id> [value <x>]";
    if tokens.len() < 3 || tokens[1] != "name" {
        return Err(ParseError::Malformed {
            command: "setoption",
            usage: USAGE,
        });
    }

    let value_idx = tokens.iter().position(|&t| t == "value");
    let (name_parts, value_parts) = match value_idx {
        Some(vi) => (&tokens[2..vi], &tokens[vi + 1..]),
        None => (&tokens[2..], &tokens[tokens.len()..]),
    };
    if name_parts.is_empty() {
        return Err(ParseError::Malformed {
            command: "setoption",
            usage: USAGE,
        });
    }

    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };
    Ok(Command::SetOption {
        name: name_parts.join(" "),
        value,
    })
}

/// Parses `newgame <troops> <fields>`. Sign checks belong to the solver, so
/// negative numbers parse here.
fn parse_newgame(tokens: &[&str]) -> Result<Command, ParseError> {
    if tokens.len() != 3 {
        return Err(ParseError::Malformed {
            command: "newgame",
            usage: "newgame <troops> <fields>",
        });
    }
    Ok(Command::NewGame {
        troops: parse_number("troops", tokens[1])?,
        fields: parse_number("fields", tokens[2])?,
    })
}

/// Parses `solve [strict|besteffort] [threads <n>]`.
fn parse_solve(tokens: &[&str]) -> Result<Command, ParseError> {
    let mut params = SolveParams::default();
    let mut i = 1;
    while i < tokens.len() {
        match tokens[i] {
            "threads" => {
                i += 1;
                let raw = tokens.get(i).ok_or(ParseError::Malformed {
                    command: "solve",
                    usage: "solve [strict|besteffort] [threads <n>]",
                })?;
                params.threads = Some(parse_number("threads", raw)?);
            }
            other => match other.parse::<AcceptancePolicy>() {
                Ok(policy) => params.policy = Some(policy),
                Err(_) => {
                    return Err(ParseError::UnknownParameter {
                        command: "solve",
                        param: other.to_string(),
                    })
                }
            },
        }
        i += 1;
    }
    Ok(Command::Solve(params))
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ParseError> {
    raw.parse().map_err(|_| ParseError::InvalidNumber {
        name,
        value: raw.to_string(),
    })
}

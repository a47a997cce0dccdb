//! Command-line parsing.

use std::fmt;
use std::str::FromStr;

pub const USAGE: &str =
    "usage: smartpark [--config FILE] [--agent | --map | --simulate N [--seed S]]";

const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Line-oriented operator console on stdin.
    Console,
    /// JSON-lines protocol on stdin/stdout.
    Agent,
    /// Print the initial map and exit.
    Map,
    Simulate { steps: usize, seed: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub config: Option<String>,
    pub mode: RunMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    MissingValue(&'static str),
    InvalidNumber { flag: &'static str, value: String },
    ConflictingModes,
    /// `--seed` without `--simulate`.
    SeedWithoutSimulate,
    Unknown(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::MissingValue(flag) => write!(f, "{flag} needs a value"),
            CliError::InvalidNumber { flag, value } => {
                write!(f, "{flag} expects a number, got '{value}'")
            }
            CliError::ConflictingModes => {
                write!(f, "--agent, --map and --simulate are mutually exclusive")
            }
            CliError::SeedWithoutSimulate => write!(f, "--seed only applies to --simulate"),
            CliError::Unknown(arg) => write!(f, "unknown argument '{arg}'"),
        }
    }
}

impl std::error::Error for CliError {}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliOptions, CliError> {
    let mut args = args.into_iter();
    let mut config = None;
    let mut mode = None;
    let mut steps = None;
    let mut seed = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(args.next().ok_or(CliError::MissingValue("--config"))?);
            }
            "--agent" => set_mode(&mut mode, RunMode::Agent)?,
            "--map" => set_mode(&mut mode, RunMode::Map)?,
            "--simulate" => {
                let value = args.next().ok_or(CliError::MissingValue("--simulate"))?;
                steps = Some(parse_number::<usize>("--simulate", value)?);
                set_mode(&mut mode, RunMode::Simulate { steps: 0, seed: 0 })?;
            }
            "--seed" => {
                let value = args.next().ok_or(CliError::MissingValue("--seed"))?;
                seed = Some(parse_number::<u64>("--seed", value)?);
            }
            _ => return Err(CliError::Unknown(arg)),
        }
    }

    let mode = match (mode, steps) {
        (Some(RunMode::Simulate { .. }), Some(steps)) => RunMode::Simulate {
            steps,
            seed: seed.unwrap_or(DEFAULT_SEED),
        },
        (_, _) if seed.is_some() => return Err(CliError::SeedWithoutSimulate),
        (Some(mode), _) => mode,
        (None, _) => RunMode::Console,
    };
    Ok(CliOptions { config, mode })
}

fn set_mode(current: &mut Option<RunMode>, mode: RunMode) -> Result<(), CliError> {
    if current.is_some() {
        return Err(CliError::ConflictingModes);
    }
    *current = Some(mode);
    Ok(())
}

fn parse_number<T: FromStr>(flag: &'static str, value: String) -> Result<T, CliError> {
    value
        .parse()
        .map_err(|_| CliError::InvalidNumber { flag, value })
}

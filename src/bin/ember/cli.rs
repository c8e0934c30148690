//! # Cli
//!
//! Everything needed for parsing the CLI arguments for the `ember` driver.

use clap::{Parser, ValueEnum};

/// Struct containing the CLI configuration for `ember`.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// The path to the script to run.
    #[arg(index = 1)]
    pub file: std::path::PathBuf,

    /// Specify the log level of the interpreter.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,

    /// Dump the token stream produced by the lexer (for debugging).
    #[arg(long)]
    pub dump_tokens: bool,

    /// Dump the statement list produced by the parser (for debugging).
    #[arg(long)]
    pub dump_ast: bool,

    /// Emit diagnostics as JSON instead of human-readable text.
    #[arg(long)]
    pub json_diagnostics: bool,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

/// Enum for specifying the log level of `ember`.
#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    /// The default log level. Only critical errors will be logged.
    #[default]
    #[value(alias("0"))]
    Error,

    /// Also logs warnings (like unused variables).
    #[value(alias("1"))]
    Warn,

    /// Also logs information about the general state of the interpreter.
    #[value(alias("2"))]
    Info,

    /// Logs everything which happens internally in the interpreter.
    #[value(alias("3"))]
    Debug,

    /// Logs extra information, including per-token and per-node tracing.
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

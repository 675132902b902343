//! CLI surface, exit codes and error rendering.

use clap::{Parser, ValueEnum};
use lockcheck_core::Error;
use miette::Report;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::Level;

/// Exit code for a sweep that found no violations.
pub const EXIT_OK: i32 = 0;
/// Exit code for a completed sweep that reported violations.
pub const EXIT_VIOLATIONS: i32 = 1;
/// Exit code for a fatal error (configuration, I/O, parse).
pub const EXIT_FATAL: i32 = 2;

/// Verify that no package-lock file pins an internal sibling package.
///
/// Walks the workspace members under the repository root, reads each
/// package's package-lock.json and reports any dependency inside the internal
/// namespace. Internal packages must be resolved through workspace linking,
/// not installed from a registry.
#[derive(Parser, Debug)]
#[command(name = "lockcheck")]
#[command(version)]
pub struct Cli {
    /// Repository root to check.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Internal namespace prefix, e.g. '@acme/'.
    ///
    /// Defaults to the scope of the root package.json name.
    #[arg(long, env = "LOCKCHECK_SCOPE")]
    pub scope: Option<String>,

    /// Logging verbosity level.
    #[arg(short = 'L', long, default_value = "warn", value_enum)]
    pub level: LogLevel,
}

/// Parse the command line.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Logging verbosity accepted by `--level`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    /// Trace-level logging.
    Trace,
    /// Debug-level logging.
    Debug,
    /// Info-level logging.
    Info,
    /// Warning-level logging.
    Warn,
    /// Error-level logging.
    Error,
}

impl LogLevel {
    /// The corresponding tracing level.
    #[must_use]
    pub const fn as_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }
}

/// The two ways a completed sweep can end.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Every lock file is clean.
    Clean,
    /// At least one package pins an internal sibling; the report has been
    /// printed.
    ViolationsFound,
}

impl Outcome {
    /// Exit code signalled to CI.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Clean => EXIT_OK,
            Self::ViolationsFound => EXIT_VIOLATIONS,
        }
    }
}

/// Render a fatal error to standard error via miette.
#[allow(clippy::print_stderr)]
pub fn render_error(err: Error) {
    let report = Report::new(err);
    eprintln!("{report:?}");
    // Flush before the process exits so CI captures the diagnostic
    let _ = io::stderr().flush();
}

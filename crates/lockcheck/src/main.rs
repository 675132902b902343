//! lockcheck CLI.
//!
//! A CI gate for monorepos: scan every member package's `package-lock.json`
//! and fail when one of them pins an internal sibling package as an external
//! dependency. The sweep is read-only and idempotent; violations print a
//! fixed report to standard error and exit with a dedicated code so CI can
//! tell "problems found" apart from "the check itself broke".

// CLI binary needs stderr for diagnostics before tracing is initialized
#![allow(clippy::print_stderr)]

mod cli;

use cli::{Cli, EXIT_FATAL, Outcome};
use lockcheck_core::{InternalScope, Result, ViolationReport, check_workspace, discover};

fn main() {
    let cli = cli::parse();
    init_tracing(cli.level);

    // Single-threaded cooperative concurrency: the checker tasks only ever
    // suspend on file I/O, so one OS thread is enough.
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Fatal error: failed to create async runtime: {e}");
            std::process::exit(EXIT_FATAL);
        }
    };

    let exit_code = match rt.block_on(run(&cli)) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            cli::render_error(err);
            EXIT_FATAL
        }
    };
    std::process::exit(exit_code);
}

/// Run the full sweep and fold it into an [`Outcome`].
async fn run(cli: &Cli) -> Result<Outcome> {
    let workspace = discover(&cli.path)?;
    let scope = InternalScope::resolve(cli.scope.as_deref(), &workspace)?;
    tracing::info!(
        root = %workspace.root.display(),
        members = workspace.member_count(),
        scope = %scope,
        "checking package locks"
    );

    let results = check_workspace(&workspace, &scope).await?;
    match ViolationReport::from_results(results) {
        Some(report) => {
            eprint!("{report}");
            Ok(Outcome::ViolationsFound)
        }
        None => {
            tracing::info!("package locks are clean");
            Ok(Outcome::Clean)
        }
    }
}

/// Initialise tracing to standard error, honouring `RUST_LOG` when set.
fn init_tracing(level: cli::LogLevel) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_level().to_string()));
    // Ignore error if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

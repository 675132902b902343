//! Error types for lockcheck operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for lockcheck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while enumerating a workspace or sweeping its lock
/// files.
///
/// Every variant is fatal for the whole run: the sweep either completes over
/// all packages or aborts on the first failure.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Repository root has no workspace configuration.
    #[error("No workspace configuration found at {path}")]
    #[diagnostic(
        code(lockcheck::workspace_not_found),
        help(
            "The repository root needs a package.json with a 'workspaces' field or a lerna.json"
        )
    )]
    WorkspaceNotFound {
        /// The directory that was searched.
        path: PathBuf,
    },

    /// Workspace configuration exists but cannot be used.
    #[error("Invalid workspace configuration at {path}: {message}")]
    #[diagnostic(
        code(lockcheck::invalid_workspace_config),
        help("Check the workspace configuration file for syntax errors or missing fields")
    )]
    InvalidWorkspaceConfig {
        /// Path to the offending configuration file.
        path: PathBuf,
        /// What is invalid about it.
        message: String,
    },

    /// No internal namespace scope was given and none could be derived.
    #[error("No internal scope configured for workspace at {path}")]
    #[diagnostic(
        code(lockcheck::scope_not_configured),
        help(
            "Pass --scope '@your-org/' or give the root package.json a scoped name such as '@your-org/monorepo'"
        )
    )]
    ScopeNotConfigured {
        /// Root of the workspace missing a scope.
        path: PathBuf,
    },

    /// A scope value that does not name an npm-style namespace.
    #[error("Invalid internal scope '{value}'")]
    #[diagnostic(
        code(lockcheck::invalid_scope),
        help("An internal scope is an npm namespace prefix such as '@your-org/'")
    )]
    InvalidScope {
        /// The rejected scope string.
        value: String,
    },

    /// A package's lock file is missing from disk.
    #[error("Lockfile not found at path: {path}")]
    #[diagnostic(
        code(lockcheck::lockfile_not_found),
        help("Run 'npm install' in the package directory to generate its lock file")
    )]
    LockfileNotFound {
        /// The path where the lock file was expected.
        path: PathBuf,
    },

    /// A lock file exists but is not valid JSON.
    #[error("Failed to parse lockfile at {path}: {message}")]
    #[diagnostic(
        code(lockcheck::lockfile_parse_failed),
        help("The lock file may be corrupted. Regenerate it with your package manager")
    )]
    LockfileParseFailed {
        /// Path to the lock file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// I/O error occurred.
    #[error("I/O error during {operation}{}: {source}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(lockcheck::io_error),
        help("Check that the referenced paths exist and that you have permission to read them")
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Optional path where the error occurred.
        path: Option<PathBuf>,
        /// Description of the operation being performed.
        operation: String,
    },

    /// JSON parsing error outside a lock file (manifests, lerna.json).
    #[error("JSON parsing error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(lockcheck::json_error),
        help("Ensure the JSON has valid syntax")
    )]
    Json {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Optional path to the file being parsed.
        path: Option<PathBuf>,
    },
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: None,
            operation: "file operation".to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source, path: None }
    }
}

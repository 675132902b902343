//! The lock-file violation sweep.
//!
//! Each member's `package-lock.json` is read and parsed independently; the
//! driver fires one task per lock file and joins them at a single gather
//! point. A missing or malformed file fails the whole run - the sweep exists
//! to certify the entire repository, so a partial result is not actionable.

use crate::error::{Error, Result};
use crate::workspace::{InternalScope, Workspace};
use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Outcome of checking one package's lock file.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// Lock-file path relative to the repository root.
    pub lock_file: PathBuf,

    /// Internal-scope dependency names found in the lock file, in the order
    /// they appear in the document.
    pub violations: Vec<String>,
}

impl CheckResult {
    /// Whether this package pins internal siblings in its lock file.
    #[must_use]
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }
}

/// The subset of the lock-file document this check consults. Key order of the
/// `dependencies` map is preserved by the parser.
#[derive(Debug, Deserialize)]
struct PackageLock {
    #[serde(default)]
    dependencies: serde_json::Map<String, Value>,
}

/// Checks a single lock file for internal-scope dependencies.
///
/// `lock_file` is relative to `root`. Only the key set of the top-level
/// `"dependencies"` mapping is consulted; an absent or empty mapping yields no
/// violations. Pure read + filter, no side effects.
///
/// # Errors
///
/// Returns [`Error::LockfileNotFound`] when the file is missing and
/// [`Error::LockfileParseFailed`] when it is not valid JSON. Both are fatal
/// for the whole sweep.
pub async fn check_lock_file(
    root: &Path,
    lock_file: &Path,
    scope: &InternalScope,
) -> Result<Vec<String>> {
    let full_path = root.join(lock_file);
    let contents = tokio::fs::read_to_string(&full_path)
        .await
        .map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                Error::LockfileNotFound {
                    path: lock_file.to_path_buf(),
                }
            } else {
                Error::Io {
                    source,
                    path: Some(full_path.clone()),
                    operation: "reading lock file".to_string(),
                }
            }
        })?;

    let lock: PackageLock =
        serde_json::from_str(&contents).map_err(|source| Error::LockfileParseFailed {
            path: lock_file.to_path_buf(),
            message: source.to_string(),
        })?;

    Ok(lock
        .dependencies
        .keys()
        .filter(|name| scope.matches(name))
        .cloned()
        .collect())
}

/// Sweeps every member's lock file concurrently.
///
/// All checks start before any is awaited; `try_join_all` is the single
/// gather point, so the first failing file aborts the run. Results come back
/// in member enumeration order regardless of I/O completion order.
///
/// # Errors
///
/// Propagates the first checker error; see [`check_lock_file`].
pub async fn check_workspace(
    workspace: &Workspace,
    scope: &InternalScope,
) -> Result<Vec<CheckResult>> {
    let root = workspace.root.as_path();
    let lock_files = workspace.lock_files();
    tracing::debug!(
        packages = lock_files.len(),
        scope = %scope,
        "sweeping package locks"
    );

    let checks = lock_files.into_iter().map(|lock_file| async move {
        let violations = check_lock_file(root, &lock_file, scope).await?;
        Ok::<_, Error>(CheckResult {
            lock_file,
            violations,
        })
    });

    try_join_all(checks).await
}

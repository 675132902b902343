//! Rendering the violation report.
//!
//! The format is fixed - CI logs and the operator docs both quote it - so the
//! renderer is byte-exact and covered by a golden test.

use crate::check::CheckResult;
use std::fmt;

/// Command the operator runs to regenerate the offending lock files.
const FIX_COMMAND: &str = "npm run update-package-locks";

/// A non-empty set of packages whose lock files pin internal siblings.
///
/// Constructed from the sweep's results via [`ViolationReport::from_results`],
/// which returns `None` for a clean run. Rendering goes through [`fmt::Display`]:
///
/// ```text
///
/// Invalid package-lock entries found!
///
///   packages/app/package-lock.json
///     -> @acme/util
///
/// Run the following command to fix the problems:
///
///   $ npm run update-package-locks
///
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationReport {
    entries: Vec<CheckResult>,
}

impl ViolationReport {
    /// Filters the sweep results down to the violating packages.
    ///
    /// Returns `None` when every package is clean, preserving enumeration
    /// order otherwise.
    #[must_use]
    pub fn from_results(results: Vec<CheckResult>) -> Option<Self> {
        let entries: Vec<CheckResult> = results
            .into_iter()
            .filter(CheckResult::has_violations)
            .collect();
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    /// Number of packages with violations.
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.entries.len()
    }

    /// The violating packages, in enumeration order.
    #[must_use]
    pub fn entries(&self) -> &[CheckResult] {
        &self.entries
    }
}

impl fmt::Display for ViolationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Invalid package-lock entries found!")?;
        writeln!(f)?;
        for entry in &self.entries {
            writeln!(f, "  {}", entry.lock_file.display())?;
            for violation in &entry.violations {
                writeln!(f, "    -> {violation}")?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Run the following command to fix the problems:")?;
        writeln!(f)?;
        writeln!(f, "  $ {FIX_COMMAND}")?;
        writeln!(f)
    }
}

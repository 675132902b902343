//! Workspace discovery and package-lock verification for monorepos.
//!
//! Packages that live in the same repository must be wired together through
//! local workspace linking. When one of them ends up pinned in a sibling's
//! `package-lock.json` instead, builds stop being reproducible: the lock file
//! fetches a published snapshot while the source tree carries something newer.
//! This crate implements the guard against that drift.
//!
//! The pipeline has three stages:
//!
//! - [`discovery`] - enumerate the workspace members under a repository root
//! - [`check`] - read each member's lock file and collect internal-scope
//!   violations, concurrently with a single fail-fast join point
//! - [`report`] - render the violations in the fixed format CI logs expect
//!
//! # Example
//!
//! ```rust,ignore
//! use lockcheck_core::{InternalScope, ViolationReport, check_workspace, discover};
//!
//! let workspace = discover(Path::new("."))?;
//! let scope = InternalScope::resolve(None, &workspace)?;
//! let results = check_workspace(&workspace, &scope).await?;
//!
//! if let Some(report) = ViolationReport::from_results(results) {
//!     eprint!("{report}");
//! }
//! ```
//!
//! The whole sweep is read-only and idempotent. Any missing or malformed lock
//! file aborts the entire run - a partial correctness sweep is not actionable,
//! so there is no per-file recovery.

pub mod check;
pub mod discovery;
pub mod error;
pub mod report;
pub mod workspace;

pub use check::{CheckResult, check_lock_file, check_workspace};
pub use discovery::discover;
pub use error::{Error, Result};
pub use report::ViolationReport;
pub use workspace::{InternalScope, LOCKFILE_NAME, Workspace, WorkspaceMember};

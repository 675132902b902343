//! Core types for representing a monorepo workspace and its internal scope.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// File name of the per-package lock file this tool inspects.
pub const LOCKFILE_NAME: &str = "package-lock.json";

/// A discovered workspace: the repository root plus its member packages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Absolute path of the repository root.
    pub root: PathBuf,

    /// Name of the root manifest's package, when it has one.
    ///
    /// Used to derive the internal scope when none is given explicitly.
    pub root_name: Option<String>,

    /// Member packages, sorted by name.
    pub members: Vec<WorkspaceMember>,
}

impl Workspace {
    /// Creates an empty workspace rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            root_name: None,
            members: Vec::new(),
        }
    }

    /// Adds a member package.
    pub fn add_member(&mut self, member: WorkspaceMember) {
        self.members.push(member);
    }

    /// Returns the number of member packages.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Finds a member by package name.
    #[must_use]
    pub fn find_member(&self, name: &str) -> Option<&WorkspaceMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Root-relative lock-file paths, one per member, in enumeration order.
    #[must_use]
    pub fn lock_files(&self) -> Vec<PathBuf> {
        self.members.iter().map(|m| m.lock_file()).collect()
    }
}

/// A single package inside the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceMember {
    /// The package name as declared in its manifest.
    pub name: String,

    /// Package directory, relative to the workspace root.
    pub path: PathBuf,

    /// Path to the member's `package.json`, relative to the workspace root.
    pub manifest_path: PathBuf,
}

impl WorkspaceMember {
    /// Root-relative path of this member's lock file.
    #[must_use]
    pub fn lock_file(&self) -> PathBuf {
        self.path.join(LOCKFILE_NAME)
    }
}

/// The reserved npm namespace identifying packages that belong to this
/// monorepo, e.g. `@acme/`.
///
/// Dependency names starting with this prefix must never appear in a member's
/// lock file - siblings are linked through the workspace, not installed from a
/// registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InternalScope(String);

impl InternalScope {
    /// Parses a scope string, normalising a missing trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScope`] unless the value is a bare npm
    /// namespace: it must start with `@` and contain no `/` other than the
    /// trailing one.
    pub fn new(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let body = trimmed.strip_suffix('/').unwrap_or(trimmed);

        let Some(name) = body.strip_prefix('@') else {
            return Err(Error::InvalidScope {
                value: value.to_string(),
            });
        };
        if name.is_empty() || name.contains('/') {
            return Err(Error::InvalidScope {
                value: value.to_string(),
            });
        }

        Ok(Self(format!("@{name}/")))
    }

    /// Derives the scope from a scoped package name such as `@acme/monorepo`.
    #[must_use]
    pub fn from_package_name(name: &str) -> Option<Self> {
        let (scope, _rest) = name.strip_prefix('@')?.split_once('/')?;
        if scope.is_empty() {
            return None;
        }
        Some(Self(format!("@{scope}/")))
    }

    /// Resolves the scope for a run: an explicit value wins, otherwise it is
    /// derived from the workspace's root package name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScope`] for a malformed explicit value, or
    /// [`Error::ScopeNotConfigured`] when nothing explicit was given and the
    /// root manifest has no scoped name to derive from.
    pub fn resolve(explicit: Option<&str>, workspace: &Workspace) -> Result<Self> {
        if let Some(value) = explicit {
            return Self::new(value);
        }

        workspace
            .root_name
            .as_deref()
            .and_then(Self::from_package_name)
            .ok_or_else(|| Error::ScopeNotConfigured {
                path: workspace.root.clone(),
            })
    }

    /// Whether a dependency name falls inside this scope.
    #[must_use]
    pub fn matches(&self, dependency: &str) -> bool {
        dependency.starts_with(&self.0)
    }

    /// The scope as a string prefix, including the trailing slash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InternalScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

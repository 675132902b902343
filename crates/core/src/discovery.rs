//! Workspace discovery: enumerating the member packages of a monorepo.
//!
//! Member patterns come from the root `package.json` `workspaces` field (array
//! form or the `{ "packages": [...] }` object form) or, failing that, from a
//! `lerna.json` `packages` array. A matched directory counts as a member only
//! if it carries a parseable `package.json` with a `name` field; malformed or
//! nameless manifests are silently skipped so that one broken directory does
//! not block the sweep of everything else.

use crate::error::{Error, Result};
use crate::workspace::{Workspace, WorkspaceMember};
use glob::Pattern;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default member patterns when `lerna.json` omits the `packages` field.
const LERNA_DEFAULT_PACKAGES: &[&str] = &["packages/*"];

#[derive(Deserialize)]
struct RootManifest {
    name: Option<String>,
    workspaces: Option<WorkspacesField>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WorkspacesField {
    Array(Vec<String>),
    Object { packages: Vec<String> },
}

#[derive(Deserialize)]
struct LernaConfig {
    packages: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct MemberManifest {
    name: Option<String>,
}

/// Discovers the workspace rooted at `root`.
///
/// Returns the absolute repository root, the root package name (if any) and
/// the member packages sorted by name. Member ordering is deterministic within
/// a run, which keeps report ordering stable.
///
/// # Errors
///
/// Returns [`Error::WorkspaceNotFound`] when the root carries neither a
/// `workspaces` field nor a `lerna.json`, and propagates I/O or JSON errors
/// from the root configuration files.
pub fn discover(root: &Path) -> Result<Workspace> {
    let root = root.canonicalize().map_err(|source| Error::Io {
        source,
        path: Some(root.to_path_buf()),
        operation: "resolving repository root".to_string(),
    })?;

    let manifest_path = root.join("package.json");
    let manifest: Option<RootManifest> = if manifest_path.is_file() {
        Some(read_config(&manifest_path)?)
    } else {
        None
    };

    let patterns = member_patterns(&root, manifest.as_ref())?;
    tracing::debug!(root = %root.display(), ?patterns, "resolved member patterns");

    let mut members = Vec::new();
    for dir in resolve_glob_patterns(&root, &patterns)? {
        if let Some(member) = read_member(&root, &dir)? {
            members.push(member);
        }
    }
    members.sort_by(|a, b| a.name.cmp(&b.name));

    let mut workspace = Workspace::new(root);
    workspace.root_name = manifest.and_then(|m| m.name);
    workspace.members = members;
    Ok(workspace)
}

/// Member glob patterns from the root manifest, falling back to `lerna.json`.
fn member_patterns(root: &Path, manifest: Option<&RootManifest>) -> Result<Vec<String>> {
    match manifest.and_then(|m| m.workspaces.as_ref()) {
        Some(WorkspacesField::Array(patterns)) => return Ok(patterns.clone()),
        Some(WorkspacesField::Object { packages }) => return Ok(packages.clone()),
        None => {}
    }

    let lerna_path = root.join("lerna.json");
    if lerna_path.is_file() {
        let lerna: LernaConfig = read_config(&lerna_path)?;
        return Ok(lerna.packages.unwrap_or_else(|| {
            LERNA_DEFAULT_PACKAGES
                .iter()
                .map(|p| (*p).to_string())
                .collect()
        }));
    }

    Err(Error::WorkspaceNotFound {
        path: root.to_path_buf(),
    })
}

/// Reads one candidate member directory.
///
/// Skips (returns `Ok(None)`) directories without a manifest, with invalid
/// JSON, or without a `name` field. I/O errors propagate.
fn read_member(root: &Path, dir: &Path) -> Result<Option<WorkspaceMember>> {
    let manifest_path = dir.join("package.json");
    if !manifest_path.is_file() {
        return Ok(None);
    }

    let manifest: MemberManifest = match read_json_file(&manifest_path) {
        Ok(manifest) => manifest,
        Err(Error::Json { .. }) => {
            tracing::debug!(path = %manifest_path.display(), "skipping member with invalid manifest");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let Some(name) = manifest.name else {
        return Ok(None);
    };

    let rel = dir.strip_prefix(root).unwrap_or(dir).to_path_buf();
    Ok(Some(WorkspaceMember {
        name,
        manifest_path: rel.join("package.json"),
        path: rel,
    }))
}

/// Resolves glob patterns to member directories under `root`.
///
/// Patterns starting with `!` are treated as exclusions. Heavy directories
/// (`node_modules`, `.git`, `target`, `dist`) are pruned from the walk.
///
/// # Errors
///
/// Returns an error when the directory tree cannot be read. Unparseable glob
/// patterns are ignored.
pub fn resolve_glob_patterns(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut inclusion_patterns = Vec::new();
    let mut exclusion_patterns = Vec::new();

    for p in patterns {
        if let Some(stripped) = p.strip_prefix('!') {
            if let Ok(pat) = Pattern::new(stripped) {
                exclusion_patterns.push(pat);
            }
        } else if let Ok(pat) = Pattern::new(p) {
            inclusion_patterns.push(pat);
        }
    }

    let mut matched_paths = HashSet::new();
    let walker = WalkDir::new(root).follow_links(false);

    for entry in walker
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_str().unwrap_or("");
            !matches!(name, "node_modules" | ".git" | "target" | "dist")
        })
        .filter_map(std::result::Result::ok)
    {
        if !entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        if path == root {
            continue;
        }

        let Ok(rel_path) = path.strip_prefix(root) else {
            continue;
        };

        if exclusion_patterns.iter().any(|p| p.matches_path(rel_path)) {
            continue;
        }
        if inclusion_patterns.iter().any(|p| p.matches_path(rel_path)) {
            matched_paths.insert(path.to_path_buf());
        }
    }

    let mut result: Vec<PathBuf> = matched_paths.into_iter().collect();
    result.sort();
    Ok(result)
}

/// Reads a root configuration file, promoting parse failures to
/// [`Error::InvalidWorkspaceConfig`] - a broken root config means the
/// enumerator cannot resolve the repository at all.
fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    match read_json_file(path) {
        Err(Error::Json {
            source,
            path: Some(p),
        }) => Err(Error::InvalidWorkspaceConfig {
            path: p,
            message: source.to_string(),
        }),
        other => other,
    }
}

/// Reads and parses a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed as valid JSON.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| Error::Io {
        source: e,
        path: Some(path.to_path_buf()),
        operation: "reading json file".to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| Error::Json {
        source: e,
        path: Some(path.to_path_buf()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn discovers_members_from_workspaces_array() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "package.json",
            r#"{"name": "@acme/monorepo", "workspaces": ["packages/*"]}"#,
        );
        write_file(
            tmp.path(),
            "packages/app/package.json",
            r#"{"name": "@acme/app"}"#,
        );
        write_file(
            tmp.path(),
            "packages/cli/package.json",
            r#"{"name": "@acme/cli"}"#,
        );

        let workspace = discover(tmp.path()).unwrap();
        assert_eq!(workspace.root_name.as_deref(), Some("@acme/monorepo"));
        assert_eq!(workspace.member_count(), 2);
        assert_eq!(workspace.members[0].name, "@acme/app");
        assert_eq!(workspace.members[1].name, "@acme/cli");
        assert_eq!(workspace.members[0].path, PathBuf::from("packages/app"));
    }

    #[test]
    fn discovers_members_from_workspaces_object() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "package.json",
            r#"{"name": "monorepo", "workspaces": {"packages": ["libs/*"]}}"#,
        );
        write_file(
            tmp.path(),
            "libs/util/package.json",
            r#"{"name": "@acme/util"}"#,
        );

        let workspace = discover(tmp.path()).unwrap();
        assert_eq!(workspace.member_count(), 1);
        assert_eq!(workspace.members[0].name, "@acme/util");
    }

    #[test]
    fn falls_back_to_lerna_config() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "lerna.json", r#"{"packages": ["modules/*"]}"#);
        write_file(
            tmp.path(),
            "modules/web/package.json",
            r#"{"name": "@acme/web"}"#,
        );

        let workspace = discover(tmp.path()).unwrap();
        assert_eq!(workspace.root_name, None);
        assert_eq!(workspace.member_count(), 1);
        assert_eq!(workspace.members[0].name, "@acme/web");
    }

    #[test]
    fn lerna_config_defaults_to_packages_glob() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "lerna.json", r"{}");
        write_file(
            tmp.path(),
            "packages/app/package.json",
            r#"{"name": "@acme/app"}"#,
        );

        let workspace = discover(tmp.path()).unwrap();
        assert_eq!(workspace.member_count(), 1);
    }

    #[test]
    fn missing_configuration_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "package.json", r#"{"name": "plain-package"}"#);

        let err = discover(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::WorkspaceNotFound { .. }));
    }

    #[test]
    fn broken_root_manifest_is_a_configuration_error() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "package.json", "{ not json");

        let err = discover(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidWorkspaceConfig { .. }));
    }

    #[test]
    fn skips_directories_without_named_manifest() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "package.json",
            r#"{"workspaces": ["packages/*"]}"#,
        );
        write_file(
            tmp.path(),
            "packages/app/package.json",
            r#"{"name": "@acme/app"}"#,
        );
        // No manifest at all
        fs::create_dir_all(tmp.path().join("packages/empty")).unwrap();
        // Manifest without a name
        write_file(tmp.path(), "packages/anon/package.json", r#"{"private": true}"#);
        // Broken manifest
        write_file(tmp.path(), "packages/broken/package.json", "{ not json");

        let workspace = discover(tmp.path()).unwrap();
        assert_eq!(workspace.member_count(), 1);
        assert_eq!(workspace.members[0].name, "@acme/app");
    }

    #[test]
    fn members_are_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "package.json",
            r#"{"workspaces": ["packages/*"]}"#,
        );
        write_file(
            tmp.path(),
            "packages/zebra/package.json",
            r#"{"name": "@acme/zebra"}"#,
        );
        write_file(
            tmp.path(),
            "packages/alpha/package.json",
            r#"{"name": "@acme/alpha"}"#,
        );

        let workspace = discover(tmp.path()).unwrap();
        let names: Vec<_> = workspace.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["@acme/alpha", "@acme/zebra"]);
    }

    #[test]
    fn exclusion_patterns_are_honoured() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "package.json",
            r#"{"workspaces": ["packages/*", "!packages/sandbox"]}"#,
        );
        write_file(
            tmp.path(),
            "packages/app/package.json",
            r#"{"name": "@acme/app"}"#,
        );
        write_file(
            tmp.path(),
            "packages/sandbox/package.json",
            r#"{"name": "@acme/sandbox"}"#,
        );

        let workspace = discover(tmp.path()).unwrap();
        assert_eq!(workspace.member_count(), 1);
        assert_eq!(workspace.members[0].name, "@acme/app");
    }

    #[test]
    fn node_modules_are_never_members() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "package.json",
            r#"{"workspaces": ["**"]}"#,
        );
        write_file(
            tmp.path(),
            "packages/app/package.json",
            r#"{"name": "@acme/app"}"#,
        );
        write_file(
            tmp.path(),
            "node_modules/lodash/package.json",
            r#"{"name": "lodash"}"#,
        );

        let workspace = discover(tmp.path()).unwrap();
        assert!(workspace.find_member("lodash").is_none());
        assert!(workspace.find_member("@acme/app").is_some());
    }
}

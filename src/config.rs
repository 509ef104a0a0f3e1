//! Configuration file support for monodep.
//!
//! Provides YAML-based configuration through `monodep.config.yml` files,
//! including the dependency policy tables (include/exclude/lock scopes),
//! file loading, discovery and starter-file generation.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "monodep.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Package manager providing the lockfile. Only `pnpm` is supported;
    /// anything else degrades to "lockfile resolution skipped".
    pub package_manager: Option<String>,
    /// Directory holding the lockfile, relative paths resolved against the
    /// workspace root. Defaults to the workspace root itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_file_directory_path: Option<String>,
    /// How a default peer-dependency target version is derived when a lock
    /// request does not name one explicitly.
    #[serde(default)]
    pub peer_version_style: PeerVersionStyle,
    /// Include/exclude and manual version-lock policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<DependencyPolicyConfig>,
}

impl WorkspaceConfig {
    /// Resolves the lockfile directory against the workspace root.
    /// A leading relative-path marker (`./`) is resolved against the root.
    pub fn lock_file_directory(&self, workspace_root: &Path) -> PathBuf {
        match self.lock_file_directory_path.as_deref() {
            None => workspace_root.to_path_buf(),
            Some(dir) => {
                let dir = dir.strip_prefix("./").unwrap_or(dir);
                if Path::new(dir).is_absolute() {
                    PathBuf::from(dir)
                } else {
                    workspace_root.join(dir)
                }
            }
        }
    }
}

/// Default policy when a lock request supplies no explicit peer version.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeerVersionStyle {
    /// Bare `<version>`
    #[default]
    Exact,
    /// `^<version>`
    Caret,
}

impl PeerVersionStyle {
    /// Derives the default peer target from a lock target version.
    pub fn default_peer_version(&self, version: &str) -> String {
        match self {
            PeerVersionStyle::Exact => version.to_string(),
            PeerVersionStyle::Caret => format!("^{}", version),
        }
    }
}

/// The `dependencies` policy block: include/exclude rule sets and manual
/// version-lock overrides, each with a common scope and a per-package scope.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct DependencyPolicyConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<RuleScopes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<RuleScopes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock: Option<LockScopes>,
}

/// Include or exclude rules at the two scopes. The per-package scope is
/// keyed by package name or workspace-relative name.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct RuleScopes {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub package: HashMap<String, PackageRule>,
}

impl RuleScopes {
    /// Whether any rule exists at any scope. Absence defaults to "all pass"
    /// for includes and "none dropped" for excludes.
    pub fn has_rules(&self) -> bool {
        !self.common.is_empty() || !self.package.is_empty()
    }
}

/// Per-package rule value: `"*"` applies to every dependency of that
/// package, otherwise an explicit name list.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum PackageRule {
    All(String),
    Names(Vec<String>),
}

impl PackageRule {
    pub fn is_star(&self) -> bool {
        matches!(self, PackageRule::All(s) if s == "*")
    }
}

/// Manual version-lock override tables. Per-package entries take precedence
/// over common entries for the same dependency name.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct LockScopes {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub common: HashMap<String, LockValue>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub package: HashMap<String, HashMap<String, LockValue>>,
}

/// A manual lock value: a single version string (applied to both the
/// dependency and peer-dependency targets) or a `[version, peerVersion]`
/// pair with the second element defaulting to the first.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum LockValue {
    Version(String),
    Pair(Vec<String>),
}

impl LockValue {
    /// The dependency-block target version, if the value is well formed.
    pub fn version(&self) -> Option<&str> {
        match self {
            LockValue::Version(v) => Some(v.as_str()),
            LockValue::Pair(pair) => pair.first().map(String::as_str),
        }
    }

    /// The peer-dependency target version, defaulting to `version()`.
    pub fn peer_version(&self) -> Option<&str> {
        match self {
            LockValue::Version(v) => Some(v.as_str()),
            LockValue::Pair(pair) => pair.get(1).or_else(|| pair.first()).map(String::as_str),
        }
    }
}

/// Load config from an explicit path. Returns an error if the file is not
/// found or malformed.
pub fn load_config_from_path(path: &Path) -> Result<WorkspaceConfig> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: WorkspaceConfig = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    Ok(config)
}

/// Walks up from `start` looking for a directory containing the config
/// file, stopping before the home directory. Returns `None` silently when
/// nothing is found.
pub fn discover_config_directory(start: &Path) -> Option<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILENAME).exists() {
            return Some(current);
        }
        let parent = current.parent()?.to_path_buf();
        if Some(&parent) == home.as_ref() {
            return None;
        }
        current = parent;
    }
}

/// Writes a starter config file into `dir`. A rush-managed workspace keeps
/// its lockfile under `common/config/rush`, which is detected via
/// `rush.json`.
pub fn init_config(dir: &Path, package_manager: &str) -> Result<()> {
    let config = WorkspaceConfig {
        package_manager: Some(package_manager.to_string()),
        lock_file_directory_path: dir
            .join("rush.json")
            .exists()
            .then(|| "./common/config/rush".to_string()),
        peer_version_style: PeerVersionStyle::default(),
        dependencies: None,
    };
    let content = serde_yaml_ng::to_string(&config).context("Failed to serialize config")?;
    let path = dir.join(CONFIG_FILENAME);
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}

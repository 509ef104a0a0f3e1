//! Workspace manifest scanner.
//!
//! Walks the workspace tree for `package.json` files and parses them into
//! domain packages. Directory discovery is synchronous and deterministic;
//! file contents are read as an async batch.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use serde_json::Value;

use crate::consistency::domain::{DependencyKind, DependencyRecord, Package, PackageRef};
use crate::shared::error::ConsistencyError;
use crate::shared::Result;

pub const MANIFEST_NAME: &str = "package.json";

/// Directories that are never part of the workspace source tree.
const SKIPPED_DIRECTORIES: &[&str] = &["node_modules", "temp", "autoinstallers"];

/// Scans a workspace root for package manifests.
pub struct ManifestScanner {
    workspace_root: PathBuf,
}

impl ManifestScanner {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }

    /// Discovers, reads and parses every workspace manifest.
    ///
    /// The root package (if its manifest parses) comes first, the rest in
    /// sorted path order. Manifests that fail to read or parse are skipped;
    /// a workspace root that is not a directory is an error.
    pub async fn scan(&self) -> Result<Vec<Package>> {
        if !self.workspace_root.is_dir() {
            return Err(ConsistencyError::InvalidWorkspacePath {
                path: self.workspace_root.clone(),
                reason: "not a directory".to_string(),
            }
            .into());
        }

        let mut manifest_paths = Vec::new();
        collect_manifest_paths(&self.workspace_root, &mut manifest_paths);
        manifest_paths.sort();

        let reads = manifest_paths
            .iter()
            .map(|path| tokio::fs::read_to_string(path));
        let contents = join_all(reads).await;

        let mut packages = Vec::new();
        for (path, content) in manifest_paths.into_iter().zip(contents) {
            let Ok(content) = content else { continue };
            if let Some(package) = self.parse_manifest(&path, &content) {
                packages.push(package);
            }
        }

        // root manifest leads the scan order
        packages.sort_by_key(|p| !p.is_root);
        Ok(packages)
    }

    fn parse_manifest(&self, path: &Path, content: &str) -> Option<Package> {
        let manifest: Value = serde_json::from_str(content).ok()?;
        let name = manifest.get("name")?.as_str()?.to_string();
        let declared_version = manifest
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let relative_name = relative_directory(&self.workspace_root, path);
        let is_root = relative_name == ".";
        let package_ref = PackageRef {
            path: path.to_path_buf(),
            name: name.clone(),
            relative_name: relative_name.clone(),
            is_root,
        };

        let mut dependencies = Vec::new();
        for kind in [
            DependencyKind::Normal,
            DependencyKind::Dev,
            DependencyKind::Peer,
        ] {
            let Some(block) = manifest.get(kind.block_name()).and_then(Value::as_object) else {
                continue;
            };
            // serde_json's preserve_order keeps manifest declaration order
            for (dep_name, declared) in block {
                let Some(declared) = declared.as_str() else {
                    continue;
                };
                dependencies.push(DependencyRecord::new(
                    dep_name,
                    declared,
                    kind,
                    package_ref.clone(),
                ));
            }
        }

        Some(Package {
            path: path.to_path_buf(),
            name,
            relative_name,
            declared_version,
            is_root,
            dependencies,
        })
    }
}

fn collect_manifest_paths(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_dir() {
            if file_name.starts_with('.') || SKIPPED_DIRECTORIES.contains(&file_name) {
                continue;
            }
            collect_manifest_paths(&path, out);
        } else if file_name == MANIFEST_NAME {
            out.push(path);
        }
    }
}

fn relative_directory(workspace_root: &Path, manifest_path: &Path) -> String {
    let dir = manifest_path.parent().unwrap_or(workspace_root);
    match dir.strip_prefix(workspace_root) {
        Ok(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Ok(relative) => relative.to_string_lossy().replace('\\', "/"),
        Err(_) => dir.to_string_lossy().into_owned(),
    }
}

//! Manifest writer.
//!
//! Applies version locks as structured edits: the manifest is parsed,
//! existing dependency entries are updated in place, and the whole file is
//! rewritten only when something actually changed. Keys that are not
//! already declared are never added.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use serde_json::Value;

use crate::shared::error::ConsistencyError;
use crate::shared::Result;

/// One version lock to apply to one manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct LockTarget {
    pub manifest_path: PathBuf,
    pub dependency_name: String,
    /// Written into `dependencies` and `devDependencies` entries
    pub version: String,
    /// Written into the `peerDependencies` entry
    pub peer_version: String,
}

/// Rewrites package manifests with locked dependency versions.
pub struct ManifestWriter;

impl ManifestWriter {
    pub fn new() -> Self {
        Self
    }

    /// Applies one lock target. Returns whether the manifest was changed;
    /// an untouched manifest is not rewritten, which makes the operation
    /// idempotent.
    pub async fn apply(&self, target: &LockTarget) -> Result<bool> {
        let content = tokio::fs::read_to_string(&target.manifest_path)
            .await
            .map_err(|e| ConsistencyError::ManifestReadError {
                path: target.manifest_path.clone(),
                details: e.to_string(),
            })?;
        let mut manifest: Value =
            serde_json::from_str(&content).map_err(|e| ConsistencyError::ManifestReadError {
                path: target.manifest_path.clone(),
                details: e.to_string(),
            })?;

        let mut changed = false;
        changed |= set_existing(&mut manifest, "dependencies", target, &target.version);
        changed |= set_existing(&mut manifest, "devDependencies", target, &target.version);
        changed |= set_existing(&mut manifest, "peerDependencies", target, &target.peer_version);

        if changed {
            write_manifest(&target.manifest_path, &manifest).await?;
        }
        Ok(changed)
    }

    /// Applies a batch of lock targets concurrently. Each manifest succeeds
    /// or fails on its own; the paths of changed manifests are returned.
    pub async fn apply_all(&self, targets: &[LockTarget]) -> Vec<(PathBuf, Result<bool>)> {
        let writes = targets.iter().map(|target| self.apply(target));
        let results = join_all(writes).await;
        targets
            .iter()
            .map(|target| target.manifest_path.clone())
            .zip(results)
            .collect()
    }
}

impl Default for ManifestWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Updates `block[name]` if, and only if, the key already exists with a
/// different string value.
fn set_existing(manifest: &mut Value, block_name: &str, target: &LockTarget, version: &str) -> bool {
    let Some(block) = manifest.get_mut(block_name).and_then(Value::as_object_mut) else {
        return false;
    };
    match block.get_mut(&target.dependency_name) {
        Some(entry) if entry.as_str() != Some(version) => {
            *entry = Value::String(version.to_string());
            true
        }
        _ => false,
    }
}

async fn write_manifest(path: &Path, manifest: &Value) -> Result<()> {
    let mut content =
        serde_json::to_string_pretty(manifest).map_err(|e| ConsistencyError::ManifestWriteError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
    content.push('\n');
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ConsistencyError::ManifestWriteError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
    Ok(())
}

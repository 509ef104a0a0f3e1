//! Version-lock use case: rewrite workspace manifests to one explicit
//! dependency version.

use std::path::PathBuf;

use crate::adapters::outbound::filesystem::{LockTarget, ManifestScanner, ManifestWriter};
use crate::config::PeerVersionStyle;
use crate::consistency::domain::DependencyRecord;
use crate::consistency::policies::DependencyPolicy;
use crate::consistency::services::DependencyAggregator;
use crate::shared::Result;

/// Input to a lock operation. The version is always explicit; the peer
/// version falls back to the configured style when not given.
#[derive(Debug, Clone)]
pub struct LockRequest {
    pub workspace_root: PathBuf,
    pub dependency_name: String,
    pub version: String,
    pub peer_version: Option<String>,
}

/// What a lock operation did to the workspace.
#[derive(Debug, Default)]
pub struct LockOutcome {
    /// Manifests actually rewritten
    pub changed: Vec<PathBuf>,
    /// Manifests that already carried the requested versions
    pub unchanged: Vec<PathBuf>,
    /// Manifests that could not be written, with the failure
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

impl LockOutcome {
    fn from_write_results(results: Vec<(PathBuf, Result<bool>)>) -> Self {
        let mut outcome = Self::default();
        for (path, result) in results {
            match result {
                Ok(true) => outcome.changed.push(path),
                Ok(false) => outcome.unchanged.push(path),
                Err(error) => outcome.failed.push((path, error)),
            }
        }
        outcome
    }
}

/// LockVersionUseCase - selects the affected dependency records and fans
/// out one structured manifest edit per package. Workspace-protocol links
/// and policy-excluded records are never touched.
pub struct LockVersionUseCase {
    policy: DependencyPolicy,
    peer_version_style: PeerVersionStyle,
    writer: ManifestWriter,
}

impl LockVersionUseCase {
    pub fn new(policy: DependencyPolicy, peer_version_style: PeerVersionStyle) -> Self {
        Self {
            policy,
            peer_version_style,
            writer: ManifestWriter::new(),
        }
    }

    pub async fn execute(&self, request: &LockRequest) -> Result<LockOutcome> {
        let scanner = ManifestScanner::new(&request.workspace_root);
        let packages = scanner.scan().await?;
        let records = DependencyAggregator::aggregate(&packages);

        let affected: Vec<&DependencyRecord> = records
            .iter()
            .filter(|record| {
                record.name == request.dependency_name
                    && !record.is_workspace_link()
                    && self.policy.passes(record)
            })
            .collect();

        let peer_version = request
            .peer_version
            .clone()
            .unwrap_or_else(|| self.peer_version_style.default_peer_version(&request.version));

        let targets: Vec<LockTarget> = DependencyPolicy::group_by_package(affected)
            .into_iter()
            .map(|(package, _)| LockTarget {
                manifest_path: package.path,
                dependency_name: request.dependency_name.clone(),
                version: request.version.clone(),
                peer_version: peer_version.clone(),
            })
            .collect();

        let results = self.writer.apply_all(&targets).await;
        Ok(LockOutcome::from_write_results(results))
    }

    /// Applies already-determined manual-lock targets, one per record that
    /// carries a disagreeing manual lock.
    pub async fn apply_auto_fix(&self, records: &[DependencyRecord]) -> LockOutcome {
        let targets: Vec<LockTarget> = records
            .iter()
            .filter_map(|record| {
                let manual = record.manual_lock.as_ref().filter(|m| m.has_diff())?;
                let version = manual.version.clone()?;
                let peer_version = manual.peer_version.clone().unwrap_or_else(|| {
                    self.peer_version_style.default_peer_version(&version)
                });
                Some(LockTarget {
                    manifest_path: record.package.path.clone(),
                    dependency_name: record.name.clone(),
                    version,
                    peer_version,
                })
            })
            .collect();

        LockOutcome::from_write_results(self.writer.apply_all(&targets).await)
    }
}

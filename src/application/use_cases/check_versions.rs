//! Version-consistency check use case.

use std::path::PathBuf;

use crate::adapters::outbound::filesystem::ManifestScanner;
use crate::config::WorkspaceConfig;
use crate::consistency::domain::DependencyRecord;
use crate::consistency::policies::DependencyPolicy;
use crate::consistency::services::{
    DependencyAggregator, DivergenceClassifier, DivergentDependency, Suggestion, SuggestionEngine,
    VersionGroupingEngine, VersionGroupings,
};
use crate::ports::outbound::LockfileResolver;
use crate::shared::Result;

/// Input to a consistency check.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub workspace_root: PathBuf,
    /// Restrict reporting to these dependency names; empty means all
    pub dependency_names: Vec<String>,
}

/// One divergent dependency with its convergence suggestions.
#[derive(Debug, Clone)]
pub struct Finding {
    pub divergent: DivergentDependency,
    pub suggestions: Vec<Suggestion>,
}

/// Everything a consistency check produced.
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// Unfiltered and policy-filtered groupings, both restricted to the
    /// requested dependency names
    pub groupings: VersionGroupings,
    pub findings: Vec<Finding>,
    /// Records whose convergence target a manual lock already determines
    pub auto_fixable: Vec<DependencyRecord>,
    /// The lockfile was not resolved (unsupported package manager)
    pub lockfile_resolution_skipped: bool,
}

impl CheckReport {
    pub fn is_consistent(&self) -> bool {
        self.findings.is_empty()
    }
}

/// CheckVersionsUseCase - scan, resolve, aggregate, filter, group, classify
/// and suggest, as one pipeline of pure transformations over the scanned
/// packages.
pub struct CheckVersionsUseCase<R: LockfileResolver> {
    /// Absent when the configured package manager has no resolver; the
    /// check then runs on declared versions alone.
    resolver: Option<R>,
    config: WorkspaceConfig,
    policy: DependencyPolicy,
}

impl<R: LockfileResolver> CheckVersionsUseCase<R> {
    pub fn new(resolver: Option<R>, config: WorkspaceConfig, policy: DependencyPolicy) -> Self {
        Self {
            resolver,
            config,
            policy,
        }
    }

    pub async fn execute(&self, request: &CheckRequest) -> Result<CheckReport> {
        let scanner = ManifestScanner::new(&request.workspace_root);
        let mut packages = scanner.scan().await?;

        let lockfile_resolution_skipped = self.resolver.is_none();
        if let Some(resolver) = &self.resolver {
            let lock_dir = self.config.lock_file_directory(&request.workspace_root);
            packages = resolver.resolve(&lock_dir, packages)?;
        }

        let records = DependencyAggregator::aggregate(&packages);
        let records = self.policy.overlay_manual_locks(records);

        let groupings = VersionGroupingEngine::group(&records, &self.policy);
        let groupings = VersionGroupings {
            all: groupings.all.restricted_to(&request.dependency_names),
            filtered: groupings.filtered.restricted_to(&request.dependency_names),
        };

        let report = DivergenceClassifier::classify(&groupings.filtered);
        let findings = report
            .divergent
            .iter()
            .map(|divergent| Finding {
                suggestions: SuggestionEngine::suggest(divergent, &records),
                divergent: divergent.clone(),
            })
            .collect();

        Ok(CheckReport {
            groupings,
            findings,
            auto_fixable: report.auto_fixable,
            lockfile_resolution_skipped,
        })
    }
}

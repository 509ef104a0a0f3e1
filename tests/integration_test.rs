/// Integration tests for the application layer
mod test_utilities;

use monodep::config::DependencyPolicyConfig;
use monodep::prelude::*;
use test_utilities::mocks::MockLockfileResolver;
use test_utilities::workspace::WorkspaceBuilder;

fn check_use_case(
    resolver: MockLockfileResolver,
    policy: DependencyPolicy,
) -> CheckVersionsUseCase<MockLockfileResolver> {
    CheckVersionsUseCase::new(Some(resolver), WorkspaceConfig::default(), policy)
}

fn policy_from_yaml(yaml: &str) -> DependencyPolicy {
    let config: DependencyPolicyConfig = serde_yaml_ng::from_str(yaml).expect("parse policy yaml");
    DependencyPolicy::new(Some(config))
}

#[tokio::test]
async fn test_check_consistent_workspace() {
    let ws = WorkspaceBuilder::new()
        .with_manifest(
            ".",
            r#"{"name": "ws-root", "version": "1.0.0", "dependencies": {"lodash": "^4.17.0"}}"#,
        )
        .with_manifest(
            "packages/a",
            r#"{"name": "pkg-a", "version": "0.1.0", "dependencies": {"lodash": "^4.16.0"}}"#,
        );

    let resolver = MockLockfileResolver::new()
        .with_lock_version(".", "lodash", "4.17.21")
        .with_lock_version("packages/a", "lodash", "4.17.21");

    let report = check_use_case(resolver, DependencyPolicy::default())
        .execute(&CheckRequest {
            workspace_root: ws.path().to_path_buf(),
            dependency_names: vec![],
        })
        .await
        .unwrap();

    assert!(report.is_consistent());
    let group = report.groupings.all.get("lodash").unwrap();
    assert_eq!(group.buckets.len(), 1);
    assert_eq!(group.buckets[0].len(), 2);
}

#[tokio::test]
async fn test_check_divergent_workspace_suggests_min_and_max() {
    let ws = WorkspaceBuilder::new()
        .with_manifest(
            ".",
            r#"{"name": "ws-root", "version": "1.0.0", "dependencies": {"lodash": "^4.17.0"}}"#,
        )
        .with_manifest(
            "packages/a",
            r#"{"name": "pkg-a", "version": "0.1.0", "dependencies": {"lodash": "^4.16.0"}}"#,
        );

    let resolver = MockLockfileResolver::new()
        .with_lock_version(".", "lodash", "4.17.21")
        .with_lock_version("packages/a", "lodash", "4.16.6");

    let report = check_use_case(resolver, DependencyPolicy::default())
        .execute(&CheckRequest {
            workspace_root: ws.path().to_path_buf(),
            dependency_names: vec![],
        })
        .await
        .unwrap();

    assert_eq!(report.findings.len(), 1);
    let finding = &report.findings[0];
    assert_eq!(finding.divergent.name, "lodash");
    assert_eq!(finding.divergent.buckets.len(), 2);
    assert_eq!(finding.suggestions.len(), 1);
    assert_eq!(
        finding.suggestions[0].message,
        "lock \"lodash\" to \"4.16.6\" or \"4.17.21\""
    );
}

#[tokio::test]
async fn test_check_peer_suffix_does_not_split_buckets() {
    let ws = WorkspaceBuilder::new()
        .with_manifest(
            ".",
            r#"{"name": "ws-root", "version": "1.0.0", "dependencies": {"react-dom": "^18.0.0"}}"#,
        )
        .with_manifest(
            "packages/a",
            r#"{"name": "pkg-a", "version": "0.1.0", "dependencies": {"react-dom": "^18.0.0"}}"#,
        );

    let resolver = MockLockfileResolver::new()
        .with_lock_version(".", "react-dom", "18.2.0")
        .with_lock_version("packages/a", "react-dom", "18.2.0(react@18.2.0)");

    let report = check_use_case(resolver, DependencyPolicy::default())
        .execute(&CheckRequest {
            workspace_root: ws.path().to_path_buf(),
            dependency_names: vec![],
        })
        .await
        .unwrap();

    assert!(report.is_consistent());
}

#[tokio::test]
async fn test_check_manual_lock_diff_is_auto_fixable() {
    let ws = WorkspaceBuilder::new()
        .with_manifest(
            ".",
            r#"{"name": "ws-root", "version": "1.0.0", "dependencies": {"lodash": "4.17.21"}}"#,
        )
        .with_manifest(
            "packages/a",
            r#"{"name": "pkg-a", "version": "0.1.0", "dependencies": {"lodash": "^4.16.0"}}"#,
        );

    let resolver = MockLockfileResolver::new()
        .with_lock_version(".", "lodash", "4.17.21")
        .with_lock_version("packages/a", "lodash", "4.17.21");

    let policy = policy_from_yaml(
        r#"
lock:
  common:
    lodash: "4.17.21"
"#,
    );

    let report = check_use_case(resolver, policy.clone())
        .execute(&CheckRequest {
            workspace_root: ws.path().to_path_buf(),
            dependency_names: vec![],
        })
        .await
        .unwrap();

    // one lock-version bucket, but pkg-a's declared range disagrees with
    // the manual lock
    assert_eq!(report.findings.len(), 1);
    assert!(report.findings[0].divergent.any_manual_diff);
    assert_eq!(report.auto_fixable.len(), 1);
    assert_eq!(report.auto_fixable[0].package.name, "pkg-a");

    let lock_use_case = LockVersionUseCase::new(policy, PeerVersionStyle::Exact);
    let outcome = lock_use_case.apply_auto_fix(&report.auto_fixable).await;
    assert_eq!(outcome.changed.len(), 1);
    assert_eq!(
        ws.read_manifest("packages/a")["dependencies"]["lodash"],
        "4.17.21"
    );
}

#[tokio::test]
async fn test_check_excluded_dependency_only_in_unfiltered_grouping() {
    let ws = WorkspaceBuilder::new()
        .with_manifest(
            ".",
            r#"{"name": "ws-root", "version": "1.0.0", "dependencies": {"lodash": "^4.17.0"}}"#,
        )
        .with_manifest(
            "packages/a",
            r#"{"name": "pkg-a", "version": "0.1.0", "dependencies": {"lodash": "^4.16.0"}}"#,
        );

    let resolver = MockLockfileResolver::new()
        .with_lock_version(".", "lodash", "4.17.21")
        .with_lock_version("packages/a", "lodash", "4.16.6");

    let policy = policy_from_yaml(
        r#"
exclude:
  common:
    - lodash
"#,
    );

    let report = check_use_case(resolver, policy)
        .execute(&CheckRequest {
            workspace_root: ws.path().to_path_buf(),
            dependency_names: vec![],
        })
        .await
        .unwrap();

    // the divergence is visible in the full grouping but never reported
    assert!(report.groupings.all.get("lodash").is_some());
    assert!(report.groupings.filtered.get("lodash").is_none());
    assert!(report.is_consistent());
}

#[tokio::test]
async fn test_check_workspace_links_are_ignored() {
    let ws = WorkspaceBuilder::new()
        .with_manifest(
            ".",
            r#"{"name": "ws-root", "version": "1.0.0"}"#,
        )
        .with_manifest(
            "packages/a",
            r#"{"name": "pkg-a", "version": "0.1.0", "dependencies": {"internal-lib": "workspace:*"}}"#,
        )
        .with_manifest(
            "packages/lib",
            r#"{"name": "internal-lib", "version": "0.1.0"}"#,
        );

    let report = check_use_case(MockLockfileResolver::new(), DependencyPolicy::default())
        .execute(&CheckRequest {
            workspace_root: ws.path().to_path_buf(),
            dependency_names: vec![],
        })
        .await
        .unwrap();

    assert!(report.groupings.all.get("internal-lib").is_none());
    assert!(report.is_consistent());
}

#[tokio::test]
async fn test_check_with_real_pnpm_lockfile() {
    let ws = WorkspaceBuilder::new()
        .with_manifest(
            ".",
            r#"{"name": "ws-root", "version": "1.0.0", "dependencies": {"lodash": "^4.17.0"}}"#,
        )
        .with_manifest(
            "packages/a",
            r#"{"name": "pkg-a", "version": "0.1.0", "dependencies": {"lodash": "^4.16.0"}}"#,
        )
        .with_lockfile(
            r#"
lockfileVersion: 5.4
importers:
  .:
    dependencies:
      lodash: 4.17.21
  packages/a:
    dependencies:
      lodash: 4.16.6
packages:
  /lodash/4.17.21:
    dev: false
  /lodash/4.16.6:
    dev: false
"#,
        );

    let use_case = CheckVersionsUseCase::new(
        Some(PnpmLockfileResolver::new()),
        WorkspaceConfig::default(),
        DependencyPolicy::default(),
    );
    let report = use_case
        .execute(&CheckRequest {
            workspace_root: ws.path().to_path_buf(),
            dependency_names: vec![],
        })
        .await
        .unwrap();

    assert!(!report.lockfile_resolution_skipped);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].divergent.name, "lodash");
}

#[tokio::test]
async fn test_lock_rewrites_all_declaring_manifests() {
    let ws = WorkspaceBuilder::new()
        .with_manifest(
            ".",
            r#"{"name": "ws-root", "version": "1.0.0", "dependencies": {"lodash": "^4.17.0"}}"#,
        )
        .with_manifest(
            "packages/a",
            r#"{"name": "pkg-a", "version": "0.1.0", "devDependencies": {"lodash": "^4.16.0"}}"#,
        );

    let use_case = LockVersionUseCase::new(DependencyPolicy::default(), PeerVersionStyle::Exact);
    let outcome = use_case
        .execute(&LockRequest {
            workspace_root: ws.path().to_path_buf(),
            dependency_name: "lodash".to_string(),
            version: "4.17.21".to_string(),
            peer_version: None,
        })
        .await
        .unwrap();

    assert_eq!(outcome.changed.len(), 2);
    assert_eq!(ws.read_manifest(".")["dependencies"]["lodash"], "4.17.21");
    assert_eq!(
        ws.read_manifest("packages/a")["devDependencies"]["lodash"],
        "4.17.21"
    );
}

#[tokio::test]
async fn test_lock_respects_exclude_policy() {
    let ws = WorkspaceBuilder::new()
        .with_manifest(
            ".",
            r#"{"name": "ws-root", "version": "1.0.0", "dependencies": {"lodash": "^4.17.0"}}"#,
        )
        .with_manifest(
            "packages/a",
            r#"{"name": "pkg-a", "version": "0.1.0", "dependencies": {"lodash": "^4.16.0"}}"#,
        );

    let policy = policy_from_yaml(
        r#"
exclude:
  package:
    pkg-a: "*"
"#,
    );

    let use_case = LockVersionUseCase::new(policy, PeerVersionStyle::Exact);
    let outcome = use_case
        .execute(&LockRequest {
            workspace_root: ws.path().to_path_buf(),
            dependency_name: "lodash".to_string(),
            version: "4.17.21".to_string(),
            peer_version: None,
        })
        .await
        .unwrap();

    assert_eq!(outcome.changed.len(), 1);
    assert_eq!(ws.read_manifest(".")["dependencies"]["lodash"], "4.17.21");
    assert_eq!(
        ws.read_manifest("packages/a")["dependencies"]["lodash"],
        "^4.16.0"
    );
}

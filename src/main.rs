use std::path::{Path, PathBuf};
use std::process;

use monodep::adapters::outbound::console::TreeRenderer;
use monodep::adapters::outbound::pnpm::PnpmLockfileResolver;
use monodep::application::use_cases::{
    CheckReport, CheckRequest, CheckVersionsUseCase, LockOutcome, LockRequest, LockVersionUseCase,
};
use monodep::cli::{Args, Command};
use monodep::config::{self, WorkspaceConfig, CONFIG_FILENAME};
use monodep::consistency::policies::DependencyPolicy;
use monodep::consistency::services::SuggestionKind;
use monodep::shared::error::{ConsistencyError, ExitCode};
use monodep::shared::Result;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

async fn run() -> Result<ExitCode> {
    let args = Args::parse_args();

    let (workspace_root, workspace_config) = load_workspace(args.path.as_deref())?;
    let package_manager = args
        .package_manager
        .clone()
        .or_else(|| workspace_config.package_manager.clone())
        .unwrap_or_else(|| "pnpm".to_string());

    match args.command {
        Command::Check {
            dependency_names,
            diff: _,
            no_diff,
            fix,
            include_package,
            exclude_package,
        } => {
            run_check(
                &workspace_root,
                &workspace_config,
                &package_manager,
                dependency_names,
                no_diff,
                fix,
                &include_package,
                &exclude_package,
            )
            .await
        }
        Command::Lock {
            dependency_name,
            version,
            peer_version,
        } => {
            run_lock(
                &workspace_root,
                &workspace_config,
                dependency_name,
                version,
                peer_version,
            )
            .await
        }
        Command::Config { init } => run_config(&workspace_root, &workspace_config, &package_manager, init),
    }
}

/// Resolves the workspace root and its configuration. An explicit path is
/// used as-is; otherwise config discovery walks up from the current
/// directory and its hit becomes the root.
fn load_workspace(path: Option<&str>) -> Result<(PathBuf, WorkspaceConfig)> {
    match path {
        Some(path) => {
            let root = PathBuf::from(path);
            validate_workspace_path(&root)?;
            let config_path = root.join(CONFIG_FILENAME);
            let config = if config_path.exists() {
                config::load_config_from_path(&config_path)?
            } else {
                WorkspaceConfig::default()
            };
            Ok((root, config))
        }
        None => {
            let cwd = std::env::current_dir().map_err(|e| ConsistencyError::InvalidWorkspacePath {
                path: PathBuf::from("."),
                reason: e.to_string(),
            })?;
            match config::discover_config_directory(&cwd) {
                Some(root) => {
                    let config = config::load_config_from_path(&root.join(CONFIG_FILENAME))?;
                    Ok((root, config))
                }
                None => Ok((cwd, WorkspaceConfig::default())),
            }
        }
    }
}

fn validate_workspace_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ConsistencyError::InvalidWorkspacePath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }
    if !path.is_dir() {
        return Err(ConsistencyError::InvalidWorkspacePath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_check(
    workspace_root: &Path,
    workspace_config: &WorkspaceConfig,
    package_manager: &str,
    dependency_names: Vec<String>,
    no_diff: bool,
    fix: bool,
    include_package: &[String],
    exclude_package: &[String],
) -> Result<ExitCode> {
    let policy = DependencyPolicy::new(workspace_config.dependencies.clone())
        .with_cli_package_filters(include_package, exclude_package);

    let resolver = supported_resolver(package_manager);
    let use_case = CheckVersionsUseCase::new(resolver, workspace_config.clone(), policy.clone());
    let report = use_case
        .execute(&CheckRequest {
            workspace_root: workspace_root.to_path_buf(),
            dependency_names,
        })
        .await?;

    if report.lockfile_resolution_skipped {
        eprintln!(
            "⚠️  Package manager \"{}\" has no lockfile support; checking declared versions only.",
            package_manager
        );
    }

    let renderer = TreeRenderer::new();
    if no_diff {
        print!("{}", renderer.render(&report.groupings.all));
    }

    if report.is_consistent() {
        println!("✅ All dependency versions are consistent.");
        return Ok(ExitCode::Success);
    }

    for finding in &report.findings {
        print!(
            "{}",
            renderer.render_buckets(&finding.divergent.name, &finding.divergent.buckets)
        );
        print_suggestions(&finding.suggestions);
        println!();
    }

    if fix {
        let lock_use_case =
            LockVersionUseCase::new(policy, workspace_config.peer_version_style);
        let outcome = lock_use_case.apply_auto_fix(&report.auto_fixable).await;
        report_lock_outcome(&outcome);
        return Ok(fix_exit_code(&report, &outcome));
    }

    Ok(ExitCode::DivergenceDetected)
}

/// Normal suggestions print inline; peer and transitive-peer fallout
/// renders under its own heading.
fn print_suggestions(suggestions: &[monodep::consistency::services::Suggestion]) {
    for suggestion in suggestions {
        if suggestion.kind == SuggestionKind::Normal {
            println!("💡 Hint: {}", suggestion.message);
        }
    }
    for (kind, heading) in [
        (SuggestionKind::DifferentVersionPeer, "PeerDependencies:"),
        (SuggestionKind::TransitivePeer, "TransitivePeerDependencies:"),
    ] {
        let section: Vec<_> = suggestions.iter().filter(|s| s.kind == kind).collect();
        if section.is_empty() {
            continue;
        }
        println!("{}", heading);
        for suggestion in section {
            println!("  💡 {}", suggestion.message);
        }
    }
}

/// Only pnpm ships a lockfile resolver; any other manager degrades to a
/// declared-versions-only check.
fn supported_resolver(package_manager: &str) -> Option<PnpmLockfileResolver> {
    (package_manager == "pnpm").then(PnpmLockfileResolver::new)
}

/// After `--fix`, divergence only counts against the exit code when some
/// finding had no manual lock to apply, or a write failed.
fn fix_exit_code(report: &CheckReport, outcome: &LockOutcome) -> ExitCode {
    if !outcome.failed.is_empty() {
        return ExitCode::ApplicationError;
    }
    let all_fixable = report.findings.iter().all(|finding| {
        report
            .auto_fixable
            .iter()
            .any(|record| record.name == finding.divergent.name)
    });
    if all_fixable {
        ExitCode::Success
    } else {
        ExitCode::DivergenceDetected
    }
}

async fn run_lock(
    workspace_root: &Path,
    workspace_config: &WorkspaceConfig,
    dependency_name: String,
    version: String,
    peer_version: Option<String>,
) -> Result<ExitCode> {
    let policy = DependencyPolicy::new(workspace_config.dependencies.clone());
    let use_case = LockVersionUseCase::new(policy, workspace_config.peer_version_style);
    let outcome = use_case
        .execute(&LockRequest {
            workspace_root: workspace_root.to_path_buf(),
            dependency_name: dependency_name.clone(),
            version: version.clone(),
            peer_version,
        })
        .await?;

    if outcome.changed.is_empty() && outcome.unchanged.is_empty() && outcome.failed.is_empty() {
        println!(
            "⚠️  No package declares \"{}\"; nothing to lock.",
            dependency_name
        );
        return Ok(ExitCode::Success);
    }

    report_lock_outcome(&outcome);
    if outcome.failed.is_empty() {
        println!("✅ Locked \"{}\" to \"{}\".", dependency_name, version);
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::ApplicationError)
    }
}

fn report_lock_outcome(outcome: &LockOutcome) {
    for path in &outcome.changed {
        println!("✅ Updated {}", path.display());
    }
    for path in &outcome.unchanged {
        println!("   Unchanged {}", path.display());
    }
    for (path, error) in &outcome.failed {
        eprintln!("❌ Failed to update {}: {}", path.display(), error);
    }
}

fn run_config(
    workspace_root: &Path,
    workspace_config: &WorkspaceConfig,
    package_manager: &str,
    init: bool,
) -> Result<ExitCode> {
    if init {
        config::init_config(workspace_root, package_manager)?;
        println!(
            "✅ Wrote {} to {}",
            CONFIG_FILENAME,
            workspace_root.display()
        );
        return Ok(ExitCode::Success);
    }

    let rendered = serde_yaml_ng::to_string(workspace_config)
        .map_err(|e| ConsistencyError::ConfigError {
            path: workspace_root.join(CONFIG_FILENAME),
            details: e.to_string(),
        })?;
    print!("{}", rendered);
    Ok(ExitCode::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_workspace_path_valid_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_workspace_path(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_validate_workspace_path_nonexistent() {
        let result = validate_workspace_path(Path::new("/nonexistent/path/that/does/not/exist"));
        assert!(result.is_err());
        assert!(format!("{}", result.unwrap_err()).contains("Directory does not exist"));
    }

    #[test]
    fn test_validate_workspace_path_file_not_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("file.txt");
        fs::write(&file_path, "content").unwrap();

        let result = validate_workspace_path(&file_path);
        assert!(result.is_err());
        assert!(format!("{}", result.unwrap_err()).contains("Not a directory"));
    }

    #[test]
    fn test_load_workspace_with_explicit_path_and_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            "packageManager: pnpm\n",
        )
        .unwrap();

        let (root, config) =
            load_workspace(Some(temp_dir.path().to_str().unwrap())).unwrap();
        assert_eq!(root, temp_dir.path());
        assert_eq!(config.package_manager.as_deref(), Some("pnpm"));
    }

    #[test]
    fn test_load_workspace_without_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let (root, config) =
            load_workspace(Some(temp_dir.path().to_str().unwrap())).unwrap();
        assert_eq!(root, temp_dir.path());
        assert!(config.package_manager.is_none());
    }
}

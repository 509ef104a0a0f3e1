//! pnpm lockfile resolver.
//!
//! Reads `pnpm-lock.yaml` and merges resolved versions, child dependencies
//! and transitive peer names into the scanned packages. Handles the key
//! dialects of lockfile versions 5 (`/name/version`, `_suffix`), 6
//! (`/name@version(...)`) and 9 (`name@version`, snapshots section).

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::consistency::domain::{
    strip_peer_suffix, ChildDependency, DependencyKind, DependencyRecord, Package,
};
use crate::ports::outbound::LockfileResolver;
use crate::shared::error::ConsistencyError;
use crate::shared::Result;

pub const LOCKFILE_NAME: &str = "pnpm-lock.yaml";

#[derive(Debug, Deserialize, Default)]
struct PnpmLockfile {
    #[serde(default)]
    importers: HashMap<String, PnpmImporter>,
    #[serde(default)]
    packages: HashMap<String, PnpmPackageSnapshot>,
    /// pnpm v9 keeps resolved dependency edges here instead of `packages`
    #[serde(default)]
    snapshots: HashMap<String, PnpmPackageSnapshot>,
}

#[derive(Debug, Deserialize, Default)]
struct PnpmImporter {
    #[serde(default)]
    dependencies: HashMap<String, PnpmResolvedDependency>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: HashMap<String, PnpmResolvedDependency>,
}

/// Importer dependency values are plain version strings in v5 lockfiles and
/// `{specifier, version}` tables from v6 on.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PnpmResolvedDependency {
    Version(String),
    Detailed { version: String },
}

impl PnpmResolvedDependency {
    fn version(&self) -> &str {
        match self {
            PnpmResolvedDependency::Version(v) => v,
            PnpmResolvedDependency::Detailed { version } => version,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct PnpmPackageSnapshot {
    #[serde(default)]
    dependencies: HashMap<String, String>,
    #[serde(default, rename = "peerDependencies")]
    peer_dependencies: HashMap<String, String>,
    #[serde(default, rename = "transitivePeerDependencies")]
    transitive_peer_dependencies: Vec<String>,
}

/// Splits a package-snapshot key into (name, version-with-suffix).
///
/// The version starts at the first `/` or `@` that is immediately followed
/// by a digit, which keeps scoped names (`@babel/core`) intact across all
/// three key dialects.
fn parse_snapshot_key(key: &str) -> Option<(&str, &str)> {
    let key = key.strip_prefix('/').unwrap_or(key);
    let bytes = key.as_bytes();
    for (idx, &byte) in bytes.iter().enumerate() {
        if (byte == b'/' || byte == b'@')
            && idx > 0
            && bytes.get(idx + 1).is_some_and(u8::is_ascii_digit)
        {
            return Some((&key[..idx], &key[idx + 1..]));
        }
    }
    None
}

/// Resolves the `pnpm-lock.yaml` of a workspace into the scanned packages.
pub struct PnpmLockfileResolver;

impl PnpmLockfileResolver {
    pub fn new() -> Self {
        Self
    }

    fn find_importer<'a>(
        importers: &'a HashMap<String, PnpmImporter>,
        relative_name: &str,
    ) -> Option<&'a PnpmImporter> {
        if let Some(importer) = importers.get(relative_name) {
            return Some(importer);
        }
        // tolerate prefix/suffix variations in the importer key format
        importers
            .iter()
            .find(|(key, _)| key.contains(relative_name))
            .map(|(_, importer)| importer)
    }

    fn apply_resolved(
        snapshots: &HashMap<(String, String), &PnpmPackageSnapshot>,
        resolved: &HashMap<String, PnpmResolvedDependency>,
        records: &mut [DependencyRecord],
        kind: DependencyKind,
    ) {
        for record in records.iter_mut().filter(|r| r.kind == kind) {
            let Some(version) = resolved.get(&record.name).map(PnpmResolvedDependency::version)
            else {
                continue;
            };
            record.lock_version = Some(version.to_string());

            // children are keyed by name + full lock version; stripped as a
            // fallback for lockfiles that drop the suffix in snapshot keys
            let snapshot = snapshots
                .get(&(record.name.clone(), version.to_string()))
                .or_else(|| {
                    snapshots.get(&(
                        record.name.clone(),
                        strip_peer_suffix(version).to_string(),
                    ))
                });
            let Some(snapshot) = snapshot else { continue };

            let mut children: Vec<ChildDependency> = snapshot
                .dependencies
                .iter()
                .map(|(name, version)| ChildDependency {
                    name: name.clone(),
                    version: version.clone(),
                    kind: DependencyKind::Normal,
                })
                .collect();
            children.extend(
                snapshot
                    .peer_dependencies
                    .iter()
                    .map(|(name, version)| ChildDependency {
                        name: name.clone(),
                        version: version.clone(),
                        kind: DependencyKind::Peer,
                    }),
            );
            record.children = children;
            record.transitive_peer_names = snapshot.transitive_peer_dependencies.clone();
        }
    }
}

impl Default for PnpmLockfileResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LockfileResolver for PnpmLockfileResolver {
    fn package_manager(&self) -> &'static str {
        "pnpm"
    }

    fn resolve(&self, lock_dir: &Path, mut packages: Vec<Package>) -> Result<Vec<Package>> {
        let lockfile_path = lock_dir.join(LOCKFILE_NAME);
        if !lockfile_path.exists() {
            // missing lockfile: every record stays unresolved
            return Ok(packages);
        }

        let content = std::fs::read_to_string(&lockfile_path).map_err(|e| {
            ConsistencyError::LockfileParseError {
                path: lockfile_path.clone(),
                details: e.to_string(),
            }
        })?;
        let lockfile: PnpmLockfile =
            serde_yaml_ng::from_str(&content).map_err(|e| ConsistencyError::LockfileParseError {
                path: lockfile_path.clone(),
                details: e.to_string(),
            })?;

        let mut snapshots: HashMap<(String, String), &PnpmPackageSnapshot> = HashMap::new();
        for (key, snapshot) in lockfile.packages.iter().chain(lockfile.snapshots.iter()) {
            if let Some((name, version)) = parse_snapshot_key(key) {
                snapshots.insert((name.to_string(), version.to_string()), snapshot);
            }
        }

        for package in &mut packages {
            let Some(importer) =
                Self::find_importer(&lockfile.importers, &package.relative_name)
            else {
                continue;
            };
            Self::apply_resolved(
                &snapshots,
                &importer.dependencies,
                &mut package.dependencies,
                DependencyKind::Normal,
            );
            Self::apply_resolved(
                &snapshots,
                &importer.dev_dependencies,
                &mut package.dependencies,
                DependencyKind::Dev,
            );
        }

        Ok(packages)
    }
}

use std::collections::HashMap;
use std::path::Path;

use monodep::prelude::*;

/// Lockfile resolver backed by an in-memory `(package, dependency) ->
/// lock version` table, for exercising the check pipeline without a real
/// lockfile on disk.
pub struct MockLockfileResolver {
    lock_versions: HashMap<(String, String), String>,
}

impl MockLockfileResolver {
    pub fn new() -> Self {
        Self {
            lock_versions: HashMap::new(),
        }
    }

    pub fn with_lock_version(
        mut self,
        package_relative_name: &str,
        dependency_name: &str,
        lock_version: &str,
    ) -> Self {
        self.lock_versions.insert(
            (package_relative_name.to_string(), dependency_name.to_string()),
            lock_version.to_string(),
        );
        self
    }
}

impl LockfileResolver for MockLockfileResolver {
    fn package_manager(&self) -> &'static str {
        "mock"
    }

    fn resolve(&self, _lock_dir: &Path, mut packages: Vec<Package>) -> Result<Vec<Package>> {
        for package in &mut packages {
            for record in &mut package.dependencies {
                let key = (package.relative_name.clone(), record.name.clone());
                if let Some(version) = self.lock_versions.get(&key) {
                    record.lock_version = Some(version.clone());
                }
            }
        }
        Ok(packages)
    }
}

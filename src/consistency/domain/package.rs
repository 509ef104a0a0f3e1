use std::path::PathBuf;

use super::dependency::{DependencyRecord, PackageRef};

/// One workspace package: its manifest location, identity and the
/// dependency records scanned out of the manifest.
///
/// Created once per scan; later pipeline stages (lockfile resolution,
/// aggregation) return new values instead of mutating shared state.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    /// Path to the package's manifest file
    pub path: PathBuf,
    pub name: String,
    /// Workspace-root-relative directory, `"."` for the root package
    pub relative_name: String,
    /// The package's own `version` field
    pub declared_version: String,
    pub is_root: bool,
    pub dependencies: Vec<DependencyRecord>,
}

impl Package {
    /// The package identity without its dependency list, for embedding
    /// into dependency records.
    pub fn package_ref(&self) -> PackageRef {
        PackageRef {
            path: self.path.clone(),
            name: self.name.clone(),
            relative_name: self.relative_name.clone(),
            is_root: self.is_root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_ref() {
        let package = Package {
            path: PathBuf::from("/ws/packages/a/package.json"),
            name: "pkg-a".to_string(),
            relative_name: "packages/a".to_string(),
            declared_version: "1.0.0".to_string(),
            is_root: false,
            dependencies: vec![],
        };
        let package_ref = package.package_ref();
        assert_eq!(package_ref.name, "pkg-a");
        assert_eq!(package_ref.relative_name, "packages/a");
        assert!(!package_ref.is_root);
    }
}

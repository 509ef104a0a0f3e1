use std::path::PathBuf;

/// Where a dependency was declared inside a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// `dependencies` block
    Normal,
    /// `devDependencies` block
    Dev,
    /// `peerDependencies` block
    Peer,
}

impl DependencyKind {
    /// The manifest block name this kind was declared in
    pub fn block_name(&self) -> &'static str {
        match self {
            DependencyKind::Normal => "dependencies",
            DependencyKind::Dev => "devDependencies",
            DependencyKind::Peer => "peerDependencies",
        }
    }
}

/// A dependency declared by a resolved dependency itself, as reported by
/// the lockfile's package snapshot (one level deep).
#[derive(Debug, Clone, PartialEq)]
pub struct ChildDependency {
    pub name: String,
    pub version: String,
    pub kind: DependencyKind,
}

/// A manual version lock from configuration, overlaid on a record by the
/// policy filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualLock {
    pub version: Option<String>,
    pub peer_version: Option<String>,
    /// `version` is present and differs from the manifest's declared version
    pub diff_from_declared: bool,
    /// `peer_version` differs from the declared peer version (only
    /// meaningful when the package also declares the dependency as a peer)
    pub diff_from_peer_declared: bool,
}

impl ManualLock {
    /// True when the manual lock disagrees with the raw manifest in any way.
    pub fn has_diff(&self) -> bool {
        self.diff_from_declared || self.diff_from_peer_declared
    }
}

/// The package a dependency record belongs to, without its dependency list.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageRef {
    /// Path to the package's manifest file
    pub path: PathBuf,
    pub name: String,
    /// Workspace-root-relative directory, `"."` for the root package
    pub relative_name: String,
    pub is_root: bool,
}

impl PackageRef {
    /// Display label used in reports: `root` for the root package,
    /// otherwise the relative directory.
    pub fn display_location(&self) -> &str {
        if self.is_root {
            "root"
        } else {
            &self.relative_name
        }
    }
}

/// One declared dependency of one workspace package.
///
/// Records are created by the manifest scanner and then flow through a
/// pipeline of pure transformations: the lockfile resolver attaches
/// `lock_version`, `children` and `transitive_peer_names`; the aggregator
/// merges normal/dev duplicates and attaches `peer_declared_version`; the
/// policy filter overlays `manual_lock`.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyRecord {
    pub name: String,
    /// Version range as written in the manifest
    pub declared_version: String,
    pub kind: DependencyKind,
    /// Exact version from the lockfile, including any peer-disambiguation
    /// suffix. Absent means "unresolved", which is reported distinctly from
    /// "resolved but divergent".
    pub lock_version: Option<String>,
    /// Declared version of the same dependency in the owning package's
    /// `peerDependencies` block, if any
    pub peer_declared_version: Option<String>,
    /// Set when an equal `devDependencies` declaration was merged into a
    /// normal-kind record
    pub dev_declared_version: Option<String>,
    /// The resolved dependency's own dependencies, from the lockfile snapshot
    pub children: Vec<ChildDependency>,
    /// Lockfile-reported transitive peer dependency names, verbatim
    pub transitive_peer_names: Vec<String>,
    pub manual_lock: Option<ManualLock>,
    pub package: PackageRef,
}

impl DependencyRecord {
    pub fn new(
        name: impl Into<String>,
        declared_version: impl Into<String>,
        kind: DependencyKind,
        package: PackageRef,
    ) -> Self {
        Self {
            name: name.into(),
            declared_version: declared_version.into(),
            kind,
            lock_version: None,
            peer_declared_version: None,
            dev_declared_version: None,
            children: Vec::new(),
            transitive_peer_names: Vec::new(),
            manual_lock: None,
            package,
        }
    }

    /// Lock version with the peer-disambiguation suffix removed, suitable
    /// for version-range comparison. The full string stays available for
    /// display and lockfile key lookups.
    pub fn stripped_lock_version(&self) -> Option<&str> {
        self.lock_version.as_deref().map(strip_peer_suffix)
    }

    /// A self-referential internal package link (`workspace:` protocol).
    /// Never a candidate for lock/version comparison.
    pub fn is_workspace_link(&self) -> bool {
        self.declared_version.starts_with("workspace:")
    }
}

/// Strips the package-manager-specific peer-disambiguation suffix from a
/// lock version string. pnpm appends either `_<peer-or-hash>` (v5 lockfiles)
/// or `(<peer>)` (v6+), so the comparable version is everything before the
/// first `_` or `(`.
pub fn strip_peer_suffix(lock_version: &str) -> &str {
    match lock_version.find(['_', '(']) {
        Some(idx) => &lock_version[..idx],
        None => lock_version,
    }
}

use std::path::Path;

use crate::consistency::domain::Package;
use crate::shared::Result;

/// LockfileResolver port for merging lockfile-resolved versions into the
/// scanned packages.
///
/// One implementation exists per package manager. The contract tolerates a
/// missing lockfile: the operation is then a no-op and every record stays
/// "unresolved", which is not an error.
pub trait LockfileResolver {
    /// Identifier of the package manager this resolver understands
    fn package_manager(&self) -> &'static str;

    /// Looks up each package's lockfile entry by relative name (tolerant of
    /// key-format variations), sets `lock_version` on matching
    /// dependency/devDependency records, and attaches the resolved
    /// dependency's own children and transitive peer names from the
    /// lockfile's package snapshots. Unmatched records are returned
    /// untouched.
    fn resolve(&self, lock_dir: &Path, packages: Vec<Package>) -> Result<Vec<Package>>;
}

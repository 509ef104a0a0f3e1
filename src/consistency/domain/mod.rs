pub mod dependency;
pub mod grouping;
pub mod package;

pub use dependency::{
    strip_peer_suffix, ChildDependency, DependencyKind, DependencyRecord, ManualLock, PackageRef,
};
pub use grouping::{DependencyGroup, GroupedDependencies, VersionKey};
pub use package::Package;

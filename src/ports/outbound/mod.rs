/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses to
/// interact with external systems (lockfiles, the file system).
pub mod lockfile_resolver;

pub use lockfile_resolver::LockfileResolver;

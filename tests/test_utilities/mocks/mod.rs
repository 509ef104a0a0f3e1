mod mock_lockfile_resolver;

pub use mock_lockfile_resolver::MockLockfileResolver;

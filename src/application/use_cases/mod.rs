pub mod check_versions;
pub mod lock_version;

pub use check_versions::{CheckReport, CheckRequest, CheckVersionsUseCase, Finding};
pub use lock_version::{LockOutcome, LockRequest, LockVersionUseCase};

//! monodep - dependency version consistency for pnpm monorepos
//!
//! This library scans every `package.json` in a workspace, resolves declared
//! version ranges against the pnpm lockfile, and reports (or fixes)
//! dependencies whose resolved versions diverge across packages.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`consistency`): Dependency records, version grouping,
//!   policy filtering, divergence classification and suggestions
//! - **Application Layer** (`application`): Use cases wiring the pipeline
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use monodep::prelude::*;
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let use_case = CheckVersionsUseCase::new(
//!     Some(PnpmLockfileResolver::new()),
//!     WorkspaceConfig::default(),
//!     DependencyPolicy::default(),
//! );
//! let report = use_case
//!     .execute(&CheckRequest {
//!         workspace_root: PathBuf::from("."),
//!         dependency_names: vec![],
//!     })
//!     .await?;
//! println!("consistent: {}", report.is_consistent());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod consistency;
pub mod ports;
pub mod shared;

/// Commonly used types, re-exported for library consumers.
pub mod prelude {
    pub use crate::adapters::outbound::console::TreeRenderer;
    pub use crate::adapters::outbound::filesystem::{LockTarget, ManifestScanner, ManifestWriter};
    pub use crate::adapters::outbound::pnpm::PnpmLockfileResolver;
    pub use crate::application::use_cases::{
        CheckReport, CheckRequest, CheckVersionsUseCase, LockOutcome, LockRequest,
        LockVersionUseCase,
    };
    pub use crate::config::{PeerVersionStyle, WorkspaceConfig};
    pub use crate::consistency::domain::{
        DependencyKind, DependencyRecord, GroupedDependencies, Package,
    };
    pub use crate::consistency::policies::DependencyPolicy;
    pub use crate::consistency::services::{
        DivergenceClassifier, DivergenceReport, SuggestionEngine,
    };
    pub use crate::ports::outbound::LockfileResolver;
    pub use crate::shared::error::{ConsistencyError, ExitCode};
    pub use crate::shared::Result;
}

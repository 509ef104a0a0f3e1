pub mod manifest_scanner;
pub mod manifest_writer;

pub use manifest_scanner::ManifestScanner;
pub use manifest_writer::{LockTarget, ManifestWriter};

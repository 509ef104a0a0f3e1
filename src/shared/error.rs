use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between "the workspace is
/// consistent", "drift was found", and actual failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no version divergence found (or output was suppressed)
    Success = 0,
    /// One or more dependencies resolve to different versions
    DivergenceDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (manifest I/O error, lockfile parse error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::DivergenceDetected => write!(f, "Divergence Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for workspace consistency checking.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
#[derive(Debug, Error)]
pub enum ConsistencyError {
    #[error("Invalid workspace path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a valid workspace root directory")]
    InvalidWorkspacePath { path: PathBuf, reason: String },

    #[error("Failed to parse lockfile: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the lockfile was generated by a supported pnpm version")]
    LockfileParseError { path: PathBuf, details: String },

    #[error("Failed to read manifest: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    ManifestReadError { path: PathBuf, details: String },

    #[error("Failed to write manifest: {path}\nDetails: {details}\n\n💡 Hint: Please verify that you have write permissions for the package directory")]
    ManifestWriteError { path: PathBuf, details: String },

    #[error("Failed to load config file: {path}\nDetails: {details}\n\n💡 Hint: Ensure the file contains valid YAML syntax")]
    ConfigError { path: PathBuf, details: String },
}

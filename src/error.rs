/// Error types for til
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for til operations
#[derive(Error, Debug)]
pub enum TilError {
    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Repository inspection errors from libgit2
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed .tilrc
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Workspace is not inside a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(String),

    /// Required executable is not on PATH
    #[error("Executable not found: {0}")]
    BinaryNotFound(String),

    /// External command exited non-zero
    #[error("Command `{command}` failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Schedule time is not a valid HH:MM
    #[error("Invalid time '{0}', expected HH:MM (00:00-23:59)")]
    InvalidTime(String),

    /// Date is not a valid YYYY-MM-DD
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Start of a date range is after its end
    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: String, to: String },

    /// Host OS has no scheduler backend
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Scheduler registration or removal failed
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for til operations
pub type Result<T> = std::result::Result<T, TilError>;

/// Convert TilError to a user-friendly error message
impl TilError {
    pub fn user_message(&self) -> String {
        match self {
            TilError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            TilError::Git(e) => {
                format!("Git operation failed. Details: {}", e)
            }
            TilError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            TilError::ConfigParse(e) => {
                format!("Could not read .tilrc: {}", e)
            }
            TilError::NotARepository(path) => {
                format!("'{}' is not inside a git repository. Run 'git init' first.", path)
            }
            TilError::BinaryNotFound(name) => {
                format!("'{}' is not installed or not on your PATH", name)
            }
            TilError::CommandFailed {
                command, stderr, ..
            } => {
                if stderr.is_empty() {
                    format!("Failed: {}", command)
                } else {
                    format!("Failed: {}\n{}", command, stderr)
                }
            }
            TilError::InvalidTime(time) => {
                format!("Invalid time '{}'. Use HH:MM, e.g. 20:00", time)
            }
            TilError::InvalidDate(date) => {
                format!("Invalid date '{}'. Use YYYY-MM-DD, e.g. 2025-01-20", date)
            }
            TilError::InvalidRange { from, to } => {
                format!("--from ({}) must not be after --to ({})", from, to)
            }
            TilError::UnsupportedPlatform(os) => {
                format!("Scheduling is not supported on '{}'", os)
            }
            TilError::Scheduler(msg) => {
                format!("Could not update the system scheduler: {}", msg)
            }
            TilError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            TilError::Generic(msg) => msg.clone(),
        }
    }
}

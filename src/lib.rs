/// til library
///
/// Today-I-Learned journal: note management, learning streaks and
/// scheduled git backups of the notes directory.

pub mod core;
pub mod error;
pub mod git;
pub mod schedule;
pub mod stats;

// Re-exports for convenience
pub use core::{TilConfig, WorkspaceContext};
pub use error::{Result, TilError};

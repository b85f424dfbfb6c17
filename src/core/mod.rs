/// Core functionality modules
///
/// Contains the journal's everyday features: workspace handling,
/// configuration, note creation, searching, indexing, digests and links.

pub mod config;
pub mod dates;
pub mod digest;
pub mod indexer;
pub mod link_manager;
pub mod note_writer;
pub mod searcher;
pub mod walker;
pub mod workspace;

pub use config::TilConfig;
pub use digest::{Digest, DigestGenerator};
pub use indexer::{IndexGenerator, IndexReport};
pub use link_manager::{LinkManager, LinkOutcome, LinkStatus};
pub use note_writer::{NoteFile, NoteStatus, NoteWriter};
pub use searcher::{highlight_keyword, FindResult, NoteMatch, Searcher};
pub use walker::NoteWalker;
pub use workspace::WorkspaceContext;

/// Markdown file discovery
///
/// Thin wrapper over `ignore::WalkBuilder` so every feature walks the journal
/// with the same directory rules.

use crate::core::workspace::{WorkspaceContext, IGNORED_DIRS};
use ignore::WalkBuilder;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy)]
pub struct NoteWalker {
    respect_gitignore: bool,
    skip_hidden_dirs: bool,
}

impl NoteWalker {
    /// Walk used by search, find and index: honors `.gitignore`
    pub fn gitignore_aware() -> Self {
        Self {
            respect_gitignore: true,
            skip_hidden_dirs: false,
        }
    }

    /// Walk used for dated notes: skips hidden directories, ignores `.gitignore`
    pub fn dated_notes() -> Self {
        Self {
            respect_gitignore: false,
            skip_hidden_dirs: true,
        }
    }

    /// All `.md` files under the workspace, sorted by path
    pub fn markdown_files(&self, ctx: &WorkspaceContext) -> Vec<PathBuf> {
        let skip_hidden = self.skip_hidden_dirs;

        let mut builder = WalkBuilder::new(ctx.root());
        builder
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .git_ignore(self.respect_gitignore)
            .require_git(false)
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                if IGNORED_DIRS.contains(&name.as_ref()) {
                    return false;
                }
                !(skip_hidden && name.starts_with('.'))
            });

        let mut files: Vec<PathBuf> = builder
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("md"))
            .collect();

        files.sort();
        files
    }
}

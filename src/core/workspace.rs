/// Workspace context
///
/// Every operation works relative to one journal root. The context is built
/// once at the entry point and passed by reference, so nothing reads the
/// process working directory behind the caller's back.

use crate::error::{Result, TilError};
use std::path::{Path, PathBuf};

/// Directories that never contain notes
pub const IGNORED_DIRS: &[&str] = &[
    "venv",
    "__pycache__",
    ".pytest_cache",
    ".git",
    ".idea",
    ".mypy_cache",
];

/// State file written by the auto-git scheduler
pub const AUTO_GIT_CONFIG_FILE: &str = ".auto_git_config.json";

/// Generated index file
pub const INDEX_FILE: &str = "README.md";

/// Handle on the journal root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceContext {
    root: PathBuf,
}

impl WorkspaceContext {
    /// Create a context rooted at `root`
    ///
    /// Relative paths are resolved against the current directory. The
    /// directory must exist.
    ///
    /// # Examples
    /// ```no_run
    /// use til_lib::core::WorkspaceContext;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let ctx = WorkspaceContext::new(".")?;
    /// println!("Journal root: {}", ctx.root().display());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();

        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };

        if !absolute.is_dir() {
            return Err(TilError::Config(format!(
                "Workspace '{}' does not exist or is not a directory",
                absolute.display()
            )));
        }

        let root = absolute.canonicalize().unwrap_or(absolute);
        Ok(Self { root })
    }

    /// Context for the current working directory
    pub fn current() -> Result<Self> {
        Self::new(std::env::current_dir()?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a relative path onto the root
    pub fn join<P: AsRef<Path>>(&self, rel: P) -> PathBuf {
        self.root.join(rel)
    }

    /// Path of `path` relative to the root, with `/` separators
    ///
    /// Returns `None` when the path lies outside the workspace.
    pub fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }

    pub fn auto_git_config_path(&self) -> PathBuf {
        self.root.join(AUTO_GIT_CONFIG_FILE)
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Directory name, used as a label in status output
    pub fn name(&self) -> Option<String> {
        self.root
            .file_name()
            .and_then(|name| name.to_str())
            .map(|s| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_new_existing_dir() {
        let temp = TempDir::new().unwrap();
        let ctx = WorkspaceContext::new(temp.path()).unwrap();
        assert_eq!(ctx.root(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_new_missing_dir() {
        let temp = TempDir::new().unwrap();
        let result = WorkspaceContext::new(temp.path().join("nope"));
        assert!(matches!(result, Err(TilError::Config(_))));
    }

    #[test]
    fn test_relative_uses_forward_slashes() {
        let temp = TempDir::new().unwrap();
        let ctx = WorkspaceContext::new(temp.path()).unwrap();
        fs::create_dir_all(ctx.join("rust")).unwrap();

        let rel = ctx.relative(&ctx.join("rust").join("2025-01-01.md")).unwrap();
        assert_eq!(rel, "rust/2025-01-01.md");
        assert!(ctx.relative(Path::new("/definitely/elsewhere")).is_none());
    }

    #[test]
    fn test_fixed_paths() {
        let temp = TempDir::new().unwrap();
        let ctx = WorkspaceContext::new(temp.path()).unwrap();
        assert!(ctx.auto_git_config_path().ends_with(".auto_git_config.json"));
        assert!(ctx.index_path().ends_with("README.md"));
    }
}

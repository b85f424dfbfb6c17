/// Version control client
///
/// Narrow interface over the git binary. Each call returns an explicit
/// `Result` so callers decide whether a failure matters.

use crate::core::WorkspaceContext;
use crate::error::{Result, TilError};
use std::path::PathBuf;
use std::process::Command;

/// Operations the auto-commit workflow needs from version control
pub trait VersionControlClient {
    /// Raw `status --porcelain` output
    fn status(&self) -> Result<String>;

    /// Stage everything (`add .`)
    fn stage_all(&self) -> Result<()>;

    fn commit(&self, message: &str) -> Result<()>;

    fn push(&self, remote: &str, branch: &str) -> Result<()>;

    /// Whether any remote is configured (`remote -v` prints something)
    fn has_remote(&self) -> Result<bool>;
}

/// `VersionControlClient` backed by the `git` executable
pub struct GitCli {
    workdir: PathBuf,
    binary: Option<PathBuf>,
}

impl GitCli {
    /// Create a client for the workspace
    ///
    /// The git binary is looked up once; a missing binary surfaces as
    /// `BinaryNotFound` on the first call rather than here.
    pub fn new(ctx: &WorkspaceContext) -> Self {
        let binary = which::which("git").ok();
        if binary.is_none() {
            tracing::debug!("git executable not found on PATH");
        }

        Self {
            workdir: ctx.root().to_path_buf(),
            binary,
        }
    }

    /// Check that the workspace is inside a repository
    pub fn ensure_repository(&self) -> Result<()> {
        match git2::Repository::discover(&self.workdir) {
            Ok(_) => Ok(()),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Err(TilError::NotARepository(
                self.workdir.display().to_string(),
            )),
            Err(e) => Err(TilError::Git(e)),
        }
    }

    /// Run git with `args`, returning stdout on success
    fn run(&self, args: &[&str]) -> Result<String> {
        let binary = self
            .binary
            .as_ref()
            .ok_or_else(|| TilError::BinaryNotFound("git".to_string()))?;

        let command_line = format!("git {}", args.join(" "));
        tracing::debug!("Running: {}", command_line);

        let output = Command::new(binary)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TilError::BinaryNotFound("git".to_string())
                } else {
                    TilError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(TilError::CommandFailed {
                command: command_line,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControlClient for GitCli {
    fn status(&self) -> Result<String> {
        self.ensure_repository()?;
        // quotePath off keeps non-ASCII note names readable
        self.run(&["-c", "core.quotePath=false", "status", "--porcelain"])
    }

    fn stage_all(&self) -> Result<()> {
        self.run(&["add", "."]).map(|_| ())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message]).map(|_| ())
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, branch]).map(|_| ())
    }

    fn has_remote(&self) -> Result<bool> {
        let stdout = self.run(&["remote", "-v"])?;
        Ok(!stdout.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_not_a_repository() {
        let temp = TempDir::new().unwrap();
        let ctx = WorkspaceContext::new(temp.path()).unwrap();
        let client = GitCli::new(&ctx);

        // Only meaningful when the temp dir is not nested in some repo
        if git2::Repository::discover(temp.path()).is_err() {
            assert!(matches!(client.status(), Err(TilError::NotARepository(_))));
        }
    }

    #[test]
    fn test_missing_binary() {
        let temp = TempDir::new().unwrap();
        let client = GitCli {
            workdir: temp.path().to_path_buf(),
            binary: None,
        };

        assert!(matches!(client.stage_all(), Err(TilError::BinaryNotFound(_))));
        assert!(matches!(client.has_remote(), Err(TilError::BinaryNotFound(_))));
    }

    #[test]
    fn test_ensure_repository() {
        let temp = TempDir::new().unwrap();
        git2::Repository::init(temp.path()).unwrap();
        let ctx = WorkspaceContext::new(temp.path()).unwrap();

        assert!(GitCli::new(&ctx).ensure_repository().is_ok());
    }
}

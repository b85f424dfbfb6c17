/// Git integration
///
/// Change detection, commit message synthesis and the auto-commit workflow,
/// all on top of the `VersionControlClient` trait.

pub mod change_detector;
pub mod client;
pub mod commit_message;
pub mod workflow;

pub use change_detector::{ChangeDetector, ChangeSet};
pub use client::{GitCli, VersionControlClient};
pub use workflow::{AutoCommitWorkflow, GitStep, RunOutcome};

#[cfg(test)]
pub(crate) mod testing {
    use super::VersionControlClient;
    use crate::error::{Result, TilError};
    use std::cell::RefCell;

    /// Scripted client that records every call
    pub struct FakeClient {
        status_output: Option<String>,
        remote: Option<bool>,
        failing: Option<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeClient {
        pub fn new(status_output: &str) -> Self {
            Self {
                status_output: Some(status_output.to_string()),
                remote: Some(false),
                failing: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn failing_status() -> Self {
            Self {
                status_output: None,
                ..Self::new("")
            }
        }

        pub fn with_remote(mut self, remote: bool) -> Self {
            self.remote = Some(remote);
            self
        }

        pub fn with_failing_remote_check(mut self) -> Self {
            self.remote = None;
            self
        }

        /// Make the named operation ("add", "commit", "push") fail
        pub fn with_failing(mut self, op: &'static str) -> Self {
            self.failing = Some(op);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn record(&self, call: String, op: &str, command: &str) -> Result<()> {
            self.calls.borrow_mut().push(call);
            if self.failing == Some(op) {
                return Err(TilError::CommandFailed {
                    command: command.to_string(),
                    code: Some(1),
                    stderr: format!("{} failed", op),
                });
            }
            Ok(())
        }
    }

    impl VersionControlClient for FakeClient {
        fn status(&self) -> Result<String> {
            self.calls.borrow_mut().push("status".to_string());
            self.status_output
                .clone()
                .ok_or_else(|| TilError::NotARepository("/fake".to_string()))
        }

        fn stage_all(&self) -> Result<()> {
            self.record("add".to_string(), "add", "git add .")
        }

        fn commit(&self, message: &str) -> Result<()> {
            self.record(format!("commit:{}", message), "commit", "git commit -m")
        }

        fn push(&self, remote: &str, branch: &str) -> Result<()> {
            self.record(
                format!("push:{}/{}", remote, branch),
                "push",
                "git push",
            )
        }

        fn has_remote(&self) -> Result<bool> {
            self.calls.borrow_mut().push("has_remote".to_string());
            self.remote
                .ok_or_else(|| TilError::BinaryNotFound("git".to_string()))
        }
    }
}

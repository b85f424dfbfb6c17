// Auto-commit workflow
//
// status -> message -> add, commit, push (only when a remote exists).
// Running it with nothing to commit is a no-op that still succeeds.

use crate::core::config::GitConfig;
use crate::core::dates;
use crate::error::Result;
use crate::git::change_detector::ChangeDetector;
use crate::git::commit_message;
use crate::git::VersionControlClient;
use std::fmt;

/// One git invocation in a commit plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitStep {
    StageAll,
    Commit(String),
    Push { remote: String, branch: String },
}

impl fmt::Display for GitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitStep::StageAll => write!(f, "git add ."),
            GitStep::Commit(message) => write!(f, "git commit -m \"{}\"", message),
            GitStep::Push { remote, branch } => write!(f, "git push {} {}", remote, branch),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NothingToCommit,
    Committed {
        message: String,
        files: Vec<String>,
        pushed: bool,
    },
}

pub struct AutoCommitWorkflow<'a> {
    client: &'a dyn VersionControlClient,
    remote: String,
    branch: String,
}

impl<'a> AutoCommitWorkflow<'a> {
    pub fn new(client: &'a dyn VersionControlClient, git: &GitConfig) -> Self {
        Self {
            client,
            remote: git.remote.clone(),
            branch: git.branch.clone(),
        }
    }

    /// Commit (and push, if possible) whatever changed
    ///
    /// A blank or missing `custom_message` falls back to a message built
    /// from the changed topics. The first failing step aborts the rest and
    /// its error is returned; nothing is rolled back.
    pub fn run(&self, custom_message: Option<&str>) -> Result<RunOutcome> {
        let changes = ChangeDetector::detect(self.client);

        if !changes.has_changes() {
            tracing::info!("No changes to commit");
            return Ok(RunOutcome::NothingToCommit);
        }

        let message = match custom_message.filter(|m| !m.trim().is_empty()) {
            Some(message) => message.to_string(),
            None => commit_message::synthesize(changes.files(), dates::today()),
        };

        tracing::info!(
            "Auto-committing {} changed file(s): '{}'",
            changes.len(),
            message
        );

        let mut steps = vec![GitStep::StageAll, GitStep::Commit(message.clone())];

        let push = self.remote_configured();
        if push {
            steps.push(self.push_step());
        }

        self.execute(&steps)?;

        Ok(RunOutcome::Committed {
            message,
            files: changes.into_files(),
            pushed: push,
        })
    }

    /// Manual save: add, commit and push with the given message
    ///
    /// Unlike [`run`](Self::run) this always pushes.
    pub fn save(&self, message: &str) -> Result<Vec<GitStep>> {
        let steps = vec![
            GitStep::StageAll,
            GitStep::Commit(message.to_string()),
            self.push_step(),
        ];
        self.execute(&steps)?;
        Ok(steps)
    }

    fn push_step(&self) -> GitStep {
        GitStep::Push {
            remote: self.remote.clone(),
            branch: self.branch.clone(),
        }
    }

    // A failing remote check counts as "no remote"
    fn remote_configured(&self) -> bool {
        match self.client.has_remote() {
            Ok(has_remote) => has_remote,
            Err(e) => {
                tracing::warn!("Could not list remotes, skipping push: {}", e);
                false
            }
        }
    }

    fn execute(&self, steps: &[GitStep]) -> Result<()> {
        for step in steps {
            let result = match step {
                GitStep::StageAll => self.client.stage_all(),
                GitStep::Commit(message) => self.client.commit(message),
                GitStep::Push { remote, branch } => self.client.push(remote, branch),
            };

            match result {
                Ok(()) => tracing::info!("Completed: {}", step),
                Err(e) => {
                    tracing::error!("Failed: {}: {}", step, e);
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TilError;
    use crate::git::testing::FakeClient;

    fn git() -> GitConfig {
        GitConfig::default()
    }

    #[test]
    fn test_no_changes_is_noop() {
        let client = FakeClient::new("");
        let outcome = AutoCommitWorkflow::new(&client, &git()).run(None).unwrap();

        assert_eq!(outcome, RunOutcome::NothingToCommit);
        assert_eq!(client.calls(), vec!["status"]);
    }

    #[test]
    fn test_commit_and_push_with_remote() {
        let client = FakeClient::new("M  android/2025-01-20.md").with_remote(true);
        let outcome = AutoCommitWorkflow::new(&client, &git()).run(None).unwrap();

        match outcome {
            RunOutcome::Committed {
                message,
                files,
                pushed,
            } => {
                assert!(message.contains("(android)"));
                assert_eq!(files, vec!["android/2025-01-20.md".to_string()]);
                assert!(pushed);
            }
            other => panic!("Expected commit, got {:?}", other),
        }

        let calls = client.calls();
        assert_eq!(calls[0], "status");
        assert_eq!(calls[1], "has_remote");
        assert_eq!(calls[2], "add");
        assert!(calls[3].starts_with("commit:Daily update"));
        assert_eq!(calls[4], "push:origin/main");
        assert_eq!(calls.len(), 5);
    }

    #[test]
    fn test_no_remote_skips_push() {
        let client = FakeClient::new("M  android/2025-01-20.md").with_remote(false);
        let outcome = AutoCommitWorkflow::new(&client, &git()).run(None).unwrap();

        assert!(matches!(outcome, RunOutcome::Committed { pushed: false, .. }));
        assert!(!client.calls().iter().any(|c| c.starts_with("push")));
    }

    #[test]
    fn test_remote_check_failure_skips_push() {
        let client = FakeClient::new("M  android/2025-01-20.md").with_failing_remote_check();
        let outcome = AutoCommitWorkflow::new(&client, &git()).run(None).unwrap();

        assert!(matches!(outcome, RunOutcome::Committed { pushed: false, .. }));
        assert!(client.calls().iter().any(|c| c.starts_with("commit")));
    }

    #[test]
    fn test_custom_message_wins() {
        let client = FakeClient::new("M  android/2025-01-20.md");
        AutoCommitWorkflow::new(&client, &git())
            .run(Some("my own message"))
            .unwrap();

        assert!(client.calls().contains(&"commit:my own message".to_string()));
    }

    #[test]
    fn test_custom_message_is_committed_verbatim() {
        let client = FakeClient::new("M  android/2025-01-20.md");
        let outcome = AutoCommitWorkflow::new(&client, &git())
            .run(Some("  padded message "))
            .unwrap();

        assert!(matches!(
            outcome,
            RunOutcome::Committed { ref message, .. } if message == "  padded message "
        ));
        assert!(client.calls().contains(&"commit:  padded message ".to_string()));
    }

    #[test]
    fn test_blank_custom_message_falls_back() {
        let client = FakeClient::new("M  android/2025-01-20.md");
        AutoCommitWorkflow::new(&client, &git()).run(Some("   ")).unwrap();

        assert!(client
            .calls()
            .iter()
            .any(|c| c.starts_with("commit:Daily update") && c.contains("(android)")));
    }

    #[test]
    fn test_first_failure_stops_sequence() {
        let client = FakeClient::new("M  android/2025-01-20.md")
            .with_remote(true)
            .with_failing("commit");
        let result = AutoCommitWorkflow::new(&client, &git()).run(None);

        match result {
            Err(TilError::CommandFailed { command, .. }) => assert!(command.contains("commit")),
            other => panic!("Expected CommandFailed, got {:?}", other),
        }
        assert!(!client.calls().iter().any(|c| c.starts_with("push")));
    }

    #[test]
    fn test_save_always_pushes() {
        let client = FakeClient::new("").with_remote(false);
        let git = GitConfig {
            remote: "upstream".to_string(),
            branch: "trunk".to_string(),
        };
        let steps = AutoCommitWorkflow::new(&client, &git).save("feat: notes").unwrap();

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2].to_string(), "git push upstream trunk");
        assert_eq!(
            client.calls(),
            vec!["add", "commit:feat: notes", "push:upstream/trunk"]
        );
    }
}

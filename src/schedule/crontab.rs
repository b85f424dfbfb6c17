// Linux cron backend
//
// Keeps exactly one "<min> <hour> * * * cd <dir> && <entrypoint> auto run"
// line per workspace in the user's crontab.

use crate::core::config::ScheduleSettings;
use crate::core::WorkspaceContext;
use crate::error::{Result, TilError};
use crate::schedule::backend::{run_command, run_command_with_stdin, SchedulerBackend};
use crate::schedule::ScheduleTime;
use std::path::PathBuf;

pub struct CrontabBackend {
    workdir: PathBuf,
    entrypoint: String,
}

impl CrontabBackend {
    pub fn new(ctx: &WorkspaceContext, settings: &ScheduleSettings) -> Self {
        Self {
            workdir: ctx.root().to_path_buf(),
            entrypoint: settings.entrypoint.clone(),
        }
    }

    // Identifies our line for this workspace
    fn marker(&self) -> String {
        format!("cd {} && {} auto run", quote_dir(&self.workdir), self.entrypoint)
    }

    pub fn cron_line(&self, time: ScheduleTime) -> String {
        format!("{} {} * * * {}", time.minute(), time.hour(), self.marker())
    }

    fn read_crontab(&self) -> Result<String> {
        existing_crontab(run_command("crontab", &["-l"]))
    }

    fn write_crontab(&self, content: &str) -> Result<()> {
        run_command_with_stdin("crontab", &["-"], Some(content)).map(|_| ())
    }
}

impl SchedulerBackend for CrontabBackend {
    fn name(&self) -> &str {
        "cron"
    }

    fn register(&self, time: ScheduleTime) -> Result<()> {
        let current = self.read_crontab()?;
        let updated = merge_crontab(&current, &self.cron_line(time), &self.marker());

        if updated != current {
            self.write_crontab(&updated)?;
            tracing::info!("Installed crontab entry for {}", self.workdir.display());
        }
        Ok(())
    }

    fn deregister(&self) -> Result<()> {
        let current = self.read_crontab()?;
        if let Some(updated) = strip_crontab(&current, &self.marker()) {
            self.write_crontab(&updated)?;
        }
        Ok(())
    }
}

/// Result of `crontab -l`, with "no crontab for <user>" read as empty.
/// Any other failure is returned so an unreadable crontab is never
/// overwritten.
fn existing_crontab(listing: Result<String>) -> Result<String> {
    match listing {
        Ok(current) => Ok(current),
        Err(TilError::CommandFailed { ref stderr, .. })
            if stderr.to_lowercase().contains("no crontab") =>
        {
            Ok(String::new())
        }
        Err(e) => Err(e),
    }
}

/// Crontab with `line` as the only entry containing `marker`
pub fn merge_crontab(current: &str, line: &str, marker: &str) -> String {
    let mut lines: Vec<&str> = current
        .lines()
        .filter(|l| !l.contains(marker))
        .collect();

    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines.push(line);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Crontab without lines containing `marker`; `None` if nothing matched
pub fn strip_crontab(current: &str, marker: &str) -> Option<String> {
    if !current.lines().any(|l| l.contains(marker)) {
        return None;
    }

    let kept: Vec<&str> = current.lines().filter(|l| !l.contains(marker)).collect();
    if kept.iter().all(|l| l.trim().is_empty()) {
        return Some(String::new());
    }

    let mut out = kept.join("\n");
    out.push('\n');
    Some(out)
}

fn quote_dir(dir: &std::path::Path) -> String {
    let dir = dir.display().to_string();
    if dir.chars().any(|c| c.is_whitespace() || "'\"$&;|".contains(c)) {
        format!("'{}'", dir.replace('\'', r"'\''"))
    } else {
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(dir: &str) -> CrontabBackend {
        CrontabBackend {
            workdir: PathBuf::from(dir),
            entrypoint: "til".to_string(),
        }
    }

    #[test]
    fn test_cron_line() {
        let line = backend("/home/me/TIL").cron_line("20:05".parse().unwrap());
        assert_eq!(line, "5 20 * * * cd /home/me/TIL && til auto run");
    }

    #[test]
    fn test_cron_line_quotes_spaces() {
        let line = backend("/home/me/my notes").cron_line("08:00".parse().unwrap());
        assert_eq!(line, "0 8 * * * cd '/home/me/my notes' && til auto run");
    }

    #[test]
    fn test_merge_into_empty() {
        let b = backend("/home/me/TIL");
        let merged = merge_crontab("", &b.cron_line("20:00".parse().unwrap()), &b.marker());
        assert_eq!(merged, "0 20 * * * cd /home/me/TIL && til auto run\n");
    }

    #[test]
    fn test_merge_does_not_duplicate() {
        let b = backend("/home/me/TIL");
        let marker = b.marker();
        let existing = "MAILTO=me\n0 20 * * * cd /home/me/TIL && til auto run\n";

        let merged = merge_crontab(existing, &b.cron_line("20:00".parse().unwrap()), &marker);
        assert_eq!(merged, existing);

        let rescheduled = merge_crontab(existing, &b.cron_line("07:30".parse().unwrap()), &marker);
        assert_eq!(rescheduled, "MAILTO=me\n30 7 * * * cd /home/me/TIL && til auto run\n");
        assert_eq!(rescheduled.matches("til auto run").count(), 1);
    }

    #[test]
    fn test_other_workspaces_untouched() {
        let b = backend("/home/me/TIL");
        let existing = "0 9 * * * cd /home/me/work && til auto run\n";

        let merged = merge_crontab(existing, &b.cron_line("20:00".parse().unwrap()), &b.marker());
        assert!(merged.contains("/home/me/work"));
        assert!(merged.contains("/home/me/TIL"));
    }

    fn listing_failure(stderr: &str) -> Result<String> {
        Err(TilError::CommandFailed {
            command: "crontab -l".to_string(),
            code: Some(1),
            stderr: stderr.to_string(),
        })
    }

    #[test]
    fn test_missing_crontab_reads_as_empty() {
        let current = existing_crontab(listing_failure("no crontab for alice")).unwrap();
        assert_eq!(current, "");

        let current = existing_crontab(Ok("MAILTO=me\n".to_string())).unwrap();
        assert_eq!(current, "MAILTO=me\n");
    }

    #[test]
    fn test_other_listing_failures_are_errors() {
        let result = existing_crontab(listing_failure("crontab: Permission denied"));
        assert!(matches!(result, Err(TilError::CommandFailed { .. })));

        let result = existing_crontab(Err(TilError::BinaryNotFound("crontab".to_string())));
        assert!(matches!(result, Err(TilError::BinaryNotFound(_))));
    }

    #[test]
    fn test_strip_crontab() {
        let marker = backend("/home/me/TIL").marker();
        let existing = "MAILTO=me\n0 20 * * * cd /home/me/TIL && til auto run\n";

        assert_eq!(strip_crontab(existing, &marker).as_deref(), Some("MAILTO=me\n"));
        assert_eq!(strip_crontab("MAILTO=me\n", &marker), None);
        assert_eq!(
            strip_crontab("0 20 * * * cd /home/me/TIL && til auto run\n", &marker).as_deref(),
            Some("")
        );
    }
}

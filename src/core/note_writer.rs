// Creates dated notes under topic folders
//
// Opening an editor is left to the user; we only make sure the file exists.

use crate::core::dates::DATE_FORMAT;
use crate::core::WorkspaceContext;
use crate::error::{Result, TilError};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteStatus {
    Created,
    Existing,
}

#[derive(Debug, Clone)]
pub struct NoteFile {
    pub path: PathBuf,
    pub status: NoteStatus,
}

pub struct NoteWriter<'a> {
    ctx: &'a WorkspaceContext,
}

impl<'a> NoteWriter<'a> {
    pub fn new(ctx: &'a WorkspaceContext) -> Self {
        Self { ctx }
    }

    // Make sure <topic>/<date>.md exists. Never overwrites.
    pub fn create_or_open(&self, topic: &str, date: NaiveDate) -> Result<NoteFile> {
        let topic = Self::validate_topic(topic)?;

        let folder = self.ctx.join(topic);
        fs::create_dir_all(&folder)?;

        let date_str = date.format(DATE_FORMAT).to_string();
        let path = folder.join(format!("{}.md", date_str));

        if path.exists() {
            return Ok(NoteFile {
                path,
                status: NoteStatus::Existing,
            });
        }

        fs::write(&path, Self::template(&date_str))?;
        tracing::info!("Created note {}", path.display());

        Ok(NoteFile {
            path,
            status: NoteStatus::Created,
        })
    }

    pub fn template(date: &str) -> String {
        format!("# TIL - {}\n\n- ", date)
    }

    // A topic is a single folder name, nothing that escapes the workspace
    fn validate_topic(topic: &str) -> Result<&str> {
        let trimmed = topic.trim();
        if trimmed.is_empty()
            || trimmed == "."
            || trimmed == ".."
            || trimmed.contains('/')
            || trimmed.contains('\\')
        {
            return Err(TilError::Config(format!("Invalid topic name: '{}'", topic)));
        }
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    #[test]
    fn test_create_new_note() {
        let temp = TempDir::new().unwrap();
        let ctx = WorkspaceContext::new(temp.path()).unwrap();

        let note = NoteWriter::new(&ctx).create_or_open("android", date()).unwrap();

        assert_eq!(note.status, NoteStatus::Created);
        assert!(note.path.ends_with("android/2025-07-01.md"));
        assert_eq!(
            fs::read_to_string(&note.path).unwrap(),
            "# TIL - 2025-07-01\n\n- "
        );
    }

    #[test]
    fn test_existing_note_untouched() {
        let temp = TempDir::new().unwrap();
        let ctx = WorkspaceContext::new(temp.path()).unwrap();
        fs::create_dir_all(ctx.join("android")).unwrap();
        fs::write(ctx.join("android/2025-07-01.md"), "my notes").unwrap();

        let note = NoteWriter::new(&ctx).create_or_open("android", date()).unwrap();

        assert_eq!(note.status, NoteStatus::Existing);
        assert_eq!(fs::read_to_string(&note.path).unwrap(), "my notes");
    }

    #[test]
    fn test_rejects_path_like_topics() {
        let temp = TempDir::new().unwrap();
        let ctx = WorkspaceContext::new(temp.path()).unwrap();
        let writer = NoteWriter::new(&ctx);

        assert!(writer.create_or_open("", date()).is_err());
        assert!(writer.create_or_open("../escape", date()).is_err());
        assert!(writer.create_or_open("a/b", date()).is_err());
    }
}

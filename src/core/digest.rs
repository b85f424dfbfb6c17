// Bundles dated notes into a single markdown digest (the "zip" command)

use crate::core::dates::{note_date_from_path, DATE_FORMAT};
use crate::core::walker::NoteWalker;
use crate::core::WorkspaceContext;
use crate::error::{Result, TilError};
use chrono::{Datelike, NaiveDate};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DigestEntry {
    pub date: NaiveDate,
    pub topic: String,
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct Digest {
    pub path: PathBuf,
    pub entry_count: usize,
}

pub struct DigestGenerator<'a> {
    ctx: &'a WorkspaceContext,
}

impl<'a> DigestGenerator<'a> {
    pub fn new(ctx: &'a WorkspaceContext) -> Self {
        Self { ctx }
    }

    /// Digest every note dated within `from..=to`
    ///
    /// Returns `Ok(None)` and writes nothing when no note falls in range.
    pub fn digest_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Option<Digest>> {
        if from > to {
            return Err(TilError::InvalidRange {
                from: from.format(DATE_FORMAT).to_string(),
                to: to.format(DATE_FORMAT).to_string(),
            });
        }

        let from_str = from.format(DATE_FORMAT).to_string();
        let to_str = to.format(DATE_FORMAT).to_string();

        let entries = self.collect(|date| from <= date && date <= to)?;
        self.write(
            &format!("zip-{}_to_{}.md", from_str, to_str),
            &format!("{} → {}", from_str, to_str),
            entries,
        )
    }

    /// Digest every note dated within the given month
    pub fn digest_month(&self, year: i32, month: u32) -> Result<Option<Digest>> {
        let label = format!("{}-{:02}", year, month);
        let entries = self.collect(|date| date.year() == year && date.month() == month)?;
        self.write(&format!("zip-{}.md", label), &label, entries)
    }

    fn collect<F>(&self, in_range: F) -> Result<Vec<DigestEntry>>
    where
        F: Fn(NaiveDate) -> bool,
    {
        let mut entries = Vec::new();

        for path in NoteWalker::dated_notes().markdown_files(self.ctx) {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name == "README.md" || name.contains("Links") || name.contains("zip-") {
                continue;
            }
            let Some(date) = note_date_from_path(&path) else {
                continue;
            };
            if !in_range(date) {
                continue;
            }
            let Some(rel_path) = self.ctx.relative(&path) else {
                continue;
            };

            let topic = path
                .parent()
                .filter(|parent| *parent != self.ctx.root())
                .and_then(|parent| parent.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let content = fs::read_to_string(&path)?.trim().to_string();

            entries.push(DigestEntry {
                date,
                topic,
                path: rel_path,
                content,
            });
        }

        entries.sort();
        Ok(entries)
    }

    fn write(
        &self,
        filename: &str,
        title: &str,
        entries: Vec<DigestEntry>,
    ) -> Result<Option<Digest>> {
        if entries.is_empty() {
            tracing::info!("No notes in range for {}", filename);
            return Ok(None);
        }

        let mut out = format!("# 📦 TIL ZIP: {}\n\n", title);
        for entry in &entries {
            out.push_str(&format!(
                "## 📁 {} / {}\n",
                entry.topic,
                entry.date.format(DATE_FORMAT)
            ));
            out.push_str(&format!("*File: `{}`*\n\n", entry.path));
            out.push_str(&entry.content);
            out.push_str("\n\n---\n\n");
        }

        let path = self.ctx.join(filename);
        fs::write(&path, out)?;

        Ok(Some(Digest {
            path,
            entry_count: entries.len(),
        }))
    }
}

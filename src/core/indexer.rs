/// Index generator
///
/// Rewrites README.md with links to every note, grouped by topic, followed
/// by the monthly link files.

use crate::core::walker::NoteWalker;
use crate::core::WorkspaceContext;
use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;

/// Topics with more entries than this collapse into a <details> block
const COLLAPSE_THRESHOLD: usize = 10;

const LINKS_SUFFIX: &str = "-Links.md";

const HEADER: &[&str] = &[
    "# 📝 TIL Index",
    "",
    "This is an automatically generated index of all your TIL files.",
    "",
    "## 🛠 Features",
    "",
    "- `til note [topic] [--date YYYY-MM-DD]` → create a note for a topic",
    "- `til link \"url\" [--title] [--tag] [--date]` → collect links in monthly Links.md files",
    "- `til search <keyword>` → full-text search across notes",
    "- `til find <query>` → fuzzy-find note files",
    "- `til zip [--from --to]` → bundle this month (or a range) into one file",
    "- `til save \"commit msg\"` → git add + commit + push",
    "- `til streak` → learning streaks and activity grass",
    "- `til auto setup --time 20:00` → commit and push automatically every day",
    "- `til index` → regenerate this file 😄",
    "",
    "---",
];

/// (file name, path relative to root)
type Entry = (String, String);

#[derive(Debug, Clone)]
pub struct IndexReport {
    pub line_count: usize,
    pub topic_count: usize,
    pub link_file_count: usize,
}

pub struct IndexGenerator<'a> {
    ctx: &'a WorkspaceContext,
}

impl<'a> IndexGenerator<'a> {
    pub fn new(ctx: &'a WorkspaceContext) -> Self {
        Self { ctx }
    }

    /// Build the index and write it to README.md
    pub fn update(&self) -> Result<IndexReport> {
        let (lines, topic_count, link_file_count) = self.build()?;

        fs::write(self.ctx.index_path(), lines.join("\n"))?;
        tracing::info!("Wrote {} index lines", lines.len());

        Ok(IndexReport {
            line_count: lines.len(),
            topic_count,
            link_file_count,
        })
    }

    fn build(&self) -> Result<(Vec<String>, usize, usize)> {
        let mut lines: Vec<String> = HEADER.iter().map(|s| s.to_string()).collect();

        let mut categorized: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
        let mut uncategorized: Vec<Entry> = Vec::new();

        for path in NoteWalker::gitignore_aware().markdown_files(self.ctx) {
            let Some(rel_path) = self.ctx.relative(&path) else {
                continue;
            };
            let parts: Vec<&str> = rel_path.split('/').collect();

            match parts.as_slice() {
                [topic, filename] => {
                    categorized
                        .entry(topic.to_string())
                        .or_default()
                        .push((filename.to_string(), rel_path.clone()));
                }
                [first, .., filename] if parts.len() >= 3 && is_numeric(first) => {
                    uncategorized.push((filename.to_string(), rel_path.clone()));
                }
                _ => {}
            }
        }

        for (topic, entries) in &categorized {
            lines.extend(render_entries(topic, entries));
        }
        if !uncategorized.is_empty() {
            lines.extend(render_entries("uncategorized", &uncategorized));
        }

        let link_files = self.link_files()?;
        if !link_files.is_empty() {
            lines.push("\n## 🔗 Links".to_string());
            for file in &link_files {
                let label = file.trim_end_matches(LINKS_SUFFIX);
                lines.push(format!("- [{}]({})", label, file));
            }
        }

        Ok((lines, categorized.len(), link_files.len()))
    }

    // Monthly link files live at the root only
    fn link_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(self.ctx.root())? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(LINKS_SUFFIX) {
                files.push(name);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}

fn render_entries(topic: &str, entries: &[Entry]) -> Vec<String> {
    let mut sorted = entries.to_vec();
    sorted.sort();

    let mut lines = Vec::new();
    let collapse = sorted.len() > COLLAPSE_THRESHOLD;

    if collapse {
        lines.push(format!(
            "\n<details>\n<summary>📁 {} ({} entries)</summary>\n",
            topic,
            sorted.len()
        ));
        lines.push(String::new());
    } else {
        lines.push(format!("\n## 📁 {}", topic));
    }

    for (filename, rel_path) in &sorted {
        let label = filename.trim_end_matches(".md");
        lines.push(format!("- [{}]({})", label, rel_path));
    }

    if collapse {
        lines.push("\n</details>".to_string());
    }
    lines
}

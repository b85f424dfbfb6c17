// Monthly link collection
//
// Links go into <root>/<YYYY-MM>-Links.md under a "#### <date>" header per
// day. A URL already listed under that day is not added twice.

use crate::core::dates::DATE_FORMAT;
use crate::core::WorkspaceContext;
use crate::error::{Result, TilError};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    CreatedFile,
    Added,
    AlreadyExists,
}

#[derive(Debug, Clone)]
pub struct LinkOutcome {
    pub path: PathBuf,
    pub status: LinkStatus,
}

pub struct LinkManager<'a> {
    ctx: &'a WorkspaceContext,
}

impl<'a> LinkManager<'a> {
    pub fn new(ctx: &'a WorkspaceContext) -> Self {
        Self { ctx }
    }

    pub fn links_path(&self, date: NaiveDate) -> PathBuf {
        self.ctx
            .join(format!("{}-Links.md", date.format("%Y-%m")))
    }

    pub fn add_link(
        &self,
        url: &str,
        date: NaiveDate,
        tag: Option<&str>,
        title: Option<&str>,
    ) -> Result<LinkOutcome> {
        let url = url.trim();
        if url.is_empty() {
            return Err(TilError::Generic("No URL provided".to_string()));
        }

        let path = self.links_path(date);
        let header = format!("#### {}", date.format(DATE_FORMAT));
        let entry = format_entry(url, tag, title);

        if !path.exists() {
            fs::write(&path, format!("{}\n{}\n", header, entry))?;
            return Ok(LinkOutcome {
                path,
                status: LinkStatus::CreatedFile,
            });
        }

        let existing = fs::read_to_string(&path)?;
        let (updated, status) = insert_entry(&existing, &header, &entry, url);

        if status != LinkStatus::AlreadyExists {
            fs::write(&path, updated)?;
        }

        Ok(LinkOutcome { path, status })
    }
}

pub fn format_entry(url: &str, tag: Option<&str>, title: Option<&str>) -> String {
    let mut text = match title.filter(|t| !t.trim().is_empty()) {
        Some(title) => format!("[{}]({})", title.trim(), url),
        None => url.to_string(),
    };
    if let Some(tag) = tag.filter(|t| !t.trim().is_empty()) {
        text.push_str(&format!(" `#{}`", tag.trim()));
    }
    format!("- [ ] {}", text)
}

// Insert `entry` at the end of the `header` section, or append a new section
fn insert_entry(existing: &str, header: &str, entry: &str, url: &str) -> (String, LinkStatus) {
    let lines: Vec<&str> = existing.lines().collect();

    let Some(start) = lines.iter().position(|line| line.trim() == header) else {
        let mut out = existing.to_string();
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(header);
        out.push('\n');
        out.push_str(entry);
        out.push('\n');
        return (out, LinkStatus::Added);
    };

    let end = lines[start + 1..]
        .iter()
        .position(|line| line.trim().starts_with("#### "))
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());

    if lines[start + 1..end].iter().any(|line| line.contains(url)) {
        return (existing.to_string(), LinkStatus::AlreadyExists);
    }

    // Keep trailing blank lines of the section after the new entry
    let mut insert_at = end;
    while insert_at > start + 1 && lines[insert_at - 1].trim().is_empty() {
        insert_at -= 1;
    }

    let mut out_lines: Vec<&str> = Vec::with_capacity(lines.len() + 1);
    out_lines.extend_from_slice(&lines[..insert_at]);
    out_lines.push(entry);
    out_lines.extend_from_slice(&lines[insert_at..]);

    let mut out = out_lines.join("\n");
    out.push('\n');
    (out, LinkStatus::Added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn test_format_entry() {
        assert_eq!(
            format_entry("https://example.com", Some("rust"), Some("Example")),
            "- [ ] [Example](https://example.com) `#rust`"
        );
        assert_eq!(format_entry("https://example.com", None, None), "- [ ] https://example.com");
    }

    #[test]
    fn test_creates_monthly_file() {
        let temp = TempDir::new().unwrap();
        let ctx = WorkspaceContext::new(temp.path()).unwrap();

        let outcome = LinkManager::new(&ctx)
            .add_link("https://a.dev", d(20), None, None)
            .unwrap();

        assert_eq!(outcome.status, LinkStatus::CreatedFile);
        assert!(outcome.path.ends_with("2025-01-Links.md"));
        assert_eq!(
            fs::read_to_string(&outcome.path).unwrap(),
            "#### 2025-01-20\n- [ ] https://a.dev\n"
        );
    }

    #[test]
    fn test_adds_to_existing_section_and_dedups() {
        let temp = TempDir::new().unwrap();
        let ctx = WorkspaceContext::new(temp.path()).unwrap();
        let manager = LinkManager::new(&ctx);

        manager.add_link("https://a.dev", d(20), None, None).unwrap();
        manager.add_link("https://b.dev", d(21), None, None).unwrap();
        let outcome = manager.add_link("https://c.dev", d(20), Some("tips"), None).unwrap();
        assert_eq!(outcome.status, LinkStatus::Added);

        let dup = manager.add_link("https://a.dev", d(20), None, None).unwrap();
        assert_eq!(dup.status, LinkStatus::AlreadyExists);

        assert_eq!(
            fs::read_to_string(&outcome.path).unwrap(),
            "#### 2025-01-20\n- [ ] https://a.dev\n- [ ] https://c.dev `#tips`\n#### 2025-01-21\n- [ ] https://b.dev\n"
        );
    }

    #[test]
    fn test_same_url_on_another_day_is_added() {
        let temp = TempDir::new().unwrap();
        let ctx = WorkspaceContext::new(temp.path()).unwrap();
        let manager = LinkManager::new(&ctx);

        manager.add_link("https://a.dev", d(20), None, None).unwrap();
        let outcome = manager.add_link("https://a.dev", d(22), None, None).unwrap();

        assert_eq!(outcome.status, LinkStatus::Added);
        let content = fs::read_to_string(&outcome.path).unwrap();
        assert_eq!(content.matches("https://a.dev").count(), 2);
    }
}

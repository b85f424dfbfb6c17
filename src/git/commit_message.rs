// Builds commit messages from the topics that changed

use crate::core::dates::DATE_FORMAT;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Commit message for an automatic commit on `today`
///
/// Lists the touched topic folders when there are any, otherwise the
/// number of changed files.
pub fn synthesize(changed_files: &[String], today: NaiveDate) -> String {
    let date = today.format(DATE_FORMAT);

    if changed_files.is_empty() {
        return format!("Daily update — {} (no changes)", date);
    }

    let topics = topics(changed_files);
    if topics.is_empty() {
        format!("Daily update — {} ({} files changed)", date, changed_files.len())
    } else {
        let list: Vec<&str> = topics.iter().map(String::as_str).collect();
        format!("Daily update — {} ({})", date, list.join(", "))
    }
}

/// Sorted, unique first path segments that are folders and not hidden
pub fn topics(changed_files: &[String]) -> BTreeSet<String> {
    changed_files
        .iter()
        .filter_map(|path| {
            let mut parts = path.split('/');
            let first = parts.next()?;
            parts.next()?;
            if first.is_empty() || first.starts_with('.') {
                None
            } else {
                Some(first.to_string())
            }
        })
        .collect()
}

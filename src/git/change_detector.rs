// Detects which files changed since the last commit
//
// Status failures never escape: not being a repository or missing git just
// means there is nothing to commit.

use crate::core::workspace::AUTO_GIT_CONFIG_FILE;
use crate::git::VersionControlClient;

// Substring rules, case-sensitive
const IGNORE_PATTERNS: &[&str] = &[AUTO_GIT_CONFIG_FILE, ".DS_Store", "__pycache__/", ".git/"];

const IGNORE_SUFFIXES: &[&str] = &[".log"];

/// Ordered list of changed paths, relative to the repository root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    files: Vec<String>,
}

impl ChangeSet {
    pub fn new(files: Vec<String>) -> Self {
        Self { files }
    }

    pub fn has_changes(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<String> {
        self.files
    }
}

pub struct ChangeDetector;

impl ChangeDetector {
    pub fn detect(client: &dyn VersionControlClient) -> ChangeSet {
        match client.status() {
            Ok(output) => ChangeSet::new(parse_porcelain(&output)),
            Err(e) => {
                tracing::warn!("Could not read git status, assuming no changes: {}", e);
                ChangeSet::default()
            }
        }
    }
}

/// Paths from `status --porcelain` output, ignorable ones removed
pub fn parse_porcelain(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_line)
        .filter(|path| !should_ignore(path))
        .collect()
}

// "XY PATH" or "XY OLD -> NEW"
fn parse_line(line: &str) -> Option<String> {
    let path = line.get(3..)?.trim();
    let path = match path.rsplit_once(" -> ") {
        Some((_, new)) => new,
        None => path,
    };
    let path = path.trim_matches('"');

    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

pub fn should_ignore(path: &str) -> bool {
    IGNORE_PATTERNS.iter().any(|pattern| path.contains(pattern))
        || IGNORE_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testing::FakeClient;

    #[test]
    fn test_should_ignore() {
        assert!(should_ignore(".auto_git_config.json"));
        assert!(should_ignore(".DS_Store"));
        assert!(should_ignore("android/.DS_Store"));
        assert!(should_ignore("test.log"));
        assert!(should_ignore("__pycache__/test.pyc"));
        assert!(should_ignore(".git/config"));

        assert!(!should_ignore("android/2025-01-20.md"));
        assert!(!should_ignore("python/README.md"));
        assert!(!should_ignore("changelog.md"));
    }

    #[test]
    fn test_parse_porcelain_filters_ignored() {
        let output = "?? .auto_git_config.json\n?? .DS_Store\n?? test.log\n?? __pycache__/x.pyc\n?? topic/2025-01-01.md\n";
        assert_eq!(parse_porcelain(output), vec!["topic/2025-01-01.md".to_string()]);
    }

    #[test]
    fn test_parse_porcelain_status_codes() {
        let output = " M android/2025-01-20.md\nA  kotlin/2025-01-20.md\nR  old.md -> rust/2025-01-21.md\n D gone.md\n";
        assert_eq!(
            parse_porcelain(output),
            vec![
                "android/2025-01-20.md".to_string(),
                "kotlin/2025-01-20.md".to_string(),
                "rust/2025-01-21.md".to_string(),
                "gone.md".to_string(),
            ]
        );
    }

    #[test]
    fn test_detect_no_changes() {
        let client = FakeClient::new("");
        let changes = ChangeDetector::detect(&client);

        assert!(!changes.has_changes());
        assert!(changes.files().is_empty());
    }

    #[test]
    fn test_detect_with_changes() {
        let client = FakeClient::new("M  android/2025-01-20.md\nA  kotlin/2025-01-20.md");
        let changes = ChangeDetector::detect(&client);

        assert!(changes.has_changes());
        assert_eq!(changes.len(), 2);
        assert!(changes.files().contains(&"android/2025-01-20.md".to_string()));
        assert!(changes.files().contains(&"kotlin/2025-01-20.md".to_string()));
    }

    #[test]
    fn test_detect_fails_soft() {
        let client = FakeClient::failing_status();
        let changes = ChangeDetector::detect(&client);

        assert_eq!(changes, ChangeSet::default());
    }
}

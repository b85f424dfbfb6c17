/// Note searcher
///
/// Keyword search over note contents, plus fuzzy matching over note paths.

use crate::core::walker::NoteWalker;
use crate::core::workspace::{WorkspaceContext, INDEX_FILE};
use crate::error::{Result, TilError};
use colored::Colorize;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use regex::{Captures, RegexBuilder};
use std::fs;

/// One line that matched a keyword search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteMatch {
    /// Path relative to the workspace root
    pub path: String,
    pub line_number: usize,
    /// Matched line with surrounding whitespace trimmed
    pub line: String,
}

/// Note path ranked by fuzzy score
#[derive(Debug, Clone)]
pub struct FindResult {
    pub path: String,
    pub score: i64,
}

/// Handles note searching
pub struct Searcher<'a> {
    ctx: &'a WorkspaceContext,
    matcher: SkimMatcherV2,
}

impl<'a> Searcher<'a> {
    /// Create a new searcher instance
    pub fn new(ctx: &'a WorkspaceContext) -> Self {
        Self {
            ctx,
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Case-insensitive keyword search across all notes
    ///
    /// Files excluded by `.gitignore` are skipped. Results come back in
    /// path order, then line order.
    pub fn search(&self, keyword: &str) -> Result<Vec<NoteMatch>> {
        if keyword.trim().is_empty() {
            return Err(TilError::Generic("No search keyword provided".to_string()));
        }

        let needle = keyword.to_lowercase();
        let mut matches = Vec::new();

        for path in NoteWalker::gitignore_aware().markdown_files(self.ctx) {
            let Some(rel_path) = self.ctx.relative(&path) else {
                continue;
            };

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", rel_path, e);
                    continue;
                }
            };

            for (idx, line) in content.lines().enumerate() {
                if line.to_lowercase().contains(&needle) {
                    matches.push(NoteMatch {
                        path: rel_path.clone(),
                        line_number: idx + 1,
                        line: line.trim().to_string(),
                    });
                }
            }
        }

        Ok(matches)
    }

    /// Rank note files by fuzzy match against `query`
    ///
    /// `README.md` files are never candidates. An empty query returns
    /// every note in path order.
    pub fn find(&self, query: &str, limit: usize) -> Vec<FindResult> {
        let candidates: Vec<String> = NoteWalker::gitignore_aware()
            .markdown_files(self.ctx)
            .iter()
            .filter(|path| {
                path.file_name().and_then(|n| n.to_str()) != Some(INDEX_FILE)
            })
            .filter_map(|path| self.ctx.relative(path))
            .collect();

        let mut results: Vec<FindResult> = if query.trim().is_empty() {
            candidates
                .into_iter()
                .map(|path| FindResult { path, score: 0 })
                .collect()
        } else {
            candidates
                .into_iter()
                .filter_map(|path| {
                    self.matcher
                        .fuzzy_match(&path, query)
                        .map(|score| FindResult { path, score })
                })
                .collect()
        };

        // Highest score first, path as tie breaker
        results.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.path.cmp(&b.path)));
        results.truncate(limit);

        results
    }
}

/// Wrap every case-insensitive occurrence of `keyword` in bold yellow
pub fn highlight_keyword(line: &str, keyword: &str) -> String {
    if keyword.is_empty() {
        return line.to_string();
    }

    match RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re
            .replace_all(line, |caps: &Captures| {
                caps[0].yellow().bold().to_string()
            })
            .into_owned(),
        Err(_) => line.to_string(),
    }
}

//! Workspace search engine: BM25 ranking with filename and substring bonuses.
//!
//! The pipeline is stateless between queries. Every call re-enumerates the
//! workspace, reads eligible file contents, computes corpus statistics,
//! scores each file, and excerpts matching lines — then throws it all away.
//! For the tens-to-hundreds of files a workspace holds, a fresh read is
//! cheaper to keep correct than an index that can go stale.

pub mod bm25;
pub mod snippet;
pub mod tokenize;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::search::bm25::CorpusStats;
use crate::workspace::{FileEntry, Workspace};

/// File extensions whose content is read and tokenized. Other files still
/// participate in filename matching.
pub const CONTENT_EXTENSIONS: &[&str] = &["md", "txt", "log", "json", "jsonl"];

/// Maximum number of files returned per query.
pub const MAX_FILES: usize = 20;

/// Maximum matching-line snippets per file.
pub const MAX_MATCHES_PER_FILE: usize = 3;

/// Queries shorter than this many codepoints (after trimming) return nothing.
pub const MIN_QUERY_LEN: usize = 2;

/// Codepoints of context kept on each side of a snippet match.
pub const CONTEXT_CHARS: usize = 80;

/// Added to the score when the query appears in the file's relative path.
pub const FILENAME_BONUS: f64 = 5.0;

/// Added to the score when the raw query appears verbatim in the content.
pub const SUBSTRING_BONUS: f64 = 3.0;

/// Results scoring below this fraction of the top score are dropped.
const SCORE_TAIL_RATIO: f64 = 0.35;

/// Fraction of distinct query tokens a file must contain when it has
/// neither a substring nor a filename match.
const MIN_OVERLAP_RATIO: f64 = 0.6;

/// One matching line within a result file.
#[derive(Debug, Clone, Serialize)]
pub struct LineMatch {
    /// 1-based line number.
    pub line: usize,
    /// Excerpt around the match, with `…` marking truncation.
    pub text: String,
}

/// A ranked search result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Path relative to the workspace root.
    pub path: String,
    /// File name only.
    pub name: String,
    /// Enumeration group the file belongs to.
    pub group: String,
    /// BM25 score plus bonuses, rounded to 2 decimals.
    pub score: f64,
    /// Matching-line excerpts, in line order.
    pub matches: Vec<LineMatch>,
}

/// A workspace file with content loaded for the current query.
///
/// `lines` and `tokens` stay empty when the extension is not content-indexable
/// or the read fails; the file then matches by filename only.
struct IndexedFile {
    entry: FileEntry,
    lines: Vec<String>,
    tokens: Vec<String>,
}

/// BM25 search over one workspace.
pub struct SearchEngine {
    workspace: Workspace,
}

impl SearchEngine {
    #[must_use]
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    /// Run a query and return results in non-increasing score order.
    ///
    /// Never fails: unreadable files degrade to filename-only matching, and
    /// an empty or missing workspace yields an empty list.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }
        let q = trimmed.to_lowercase();
        let query_tokens = tokenize::tokenize(trimmed);

        let files = self.read_corpus();
        if files.is_empty() {
            return Vec::new();
        }

        let stats = CorpusStats::from_documents(files.iter().map(|f| f.tokens.as_slice()));

        let distinct_query: HashSet<&String> = query_tokens.iter().collect();
        let min_overlap = if distinct_query.len() > 1 {
            (distinct_query.len() as f64 * MIN_OVERLAP_RATIO).ceil() as usize
        } else {
            1
        };

        let mut scored: Vec<(f64, SearchResult)> = Vec::new();
        for file in &files {
            let has_filename = file.entry.path.to_lowercase().contains(&q);
            let has_substring = if file.lines.is_empty() {
                false
            } else {
                file.lines.join("\n").to_lowercase().contains(&q)
            };

            // Token overlap gate; an exact substring or filename hit is
            // relevant by construction and bypasses it.
            if !has_substring && !has_filename {
                let file_tokens: HashSet<&String> = file.tokens.iter().collect();
                let overlap = distinct_query
                    .iter()
                    .filter(|token| file_tokens.contains(*token))
                    .count();
                if overlap < min_overlap {
                    continue;
                }
            }

            let mut score = stats.score(&query_tokens, &file.tokens);
            if has_filename {
                score += FILENAME_BONUS;
            }
            if has_substring {
                score += SUBSTRING_BONUS;
            }
            if score <= 0.0 {
                continue;
            }

            let matches = snippet::extract_matches(&file.lines, &q, &query_tokens);
            scored.push((
                score,
                SearchResult {
                    path: file.entry.path.clone(),
                    name: file.entry.name.clone(),
                    group: file.entry.group.clone(),
                    score: (score * 100.0).round() / 100.0,
                    matches,
                },
            ));
        }

        // Stable sort: ties keep enumeration order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        if let Some(threshold) = scored.first().map(|(top, _)| top * SCORE_TAIL_RATIO) {
            scored.retain(|(score, _)| *score >= threshold);
        }

        scored.truncate(MAX_FILES);
        scored.into_iter().map(|(_, result)| result).collect()
    }

    /// Read the full corpus snapshot. This is the authoritative read; there
    /// is no cache to invalidate.
    fn read_corpus(&self) -> Vec<IndexedFile> {
        self.workspace
            .scan()
            .into_iter()
            .map(|entry| {
                let (lines, tokens) = self.read_entry(&entry);
                IndexedFile {
                    entry,
                    lines,
                    tokens,
                }
            })
            .collect()
    }

    /// Load and tokenize one file's content, or empty vectors when the file
    /// is not content-indexable or cannot be read.
    fn read_entry(&self, entry: &FileEntry) -> (Vec<String>, Vec<String>) {
        let indexable = Path::new(&entry.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                CONTENT_EXTENSIONS.contains(&ext.as_str())
            });
        if !indexable {
            return (Vec::new(), Vec::new());
        }

        let path = self.workspace.root().join(&entry.path);
        match fs::read(&path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                let lines = text.lines().map(ToOwned::to_owned).collect();
                let tokens = tokenize::tokenize(&text);
                (lines, tokens)
            }
            Err(err) => {
                debug!(path = %path.display(), %err, "content read failed; filename-only match");
                (Vec::new(), Vec::new())
            }
        }
    }
}

//! Matching-line snippet extraction.
//!
//! All offsets here are codepoint indices, not byte offsets; windows must
//! never split a multi-byte character.

use crate::search::{CONTEXT_CHARS, LineMatch, MAX_MATCHES_PER_FILE};

/// Scan a file's lines for the query and excerpt up to
/// [`MAX_MATCHES_PER_FILE`] matching lines, in line order.
///
/// A line matches at the first occurrence of the verbatim lowercased query;
/// for multi-token queries, a line containing any single query token matches
/// at that token's position as a fallback. `query` must already be trimmed
/// and lowercased.
pub(crate) fn extract_matches(
    lines: &[String],
    query: &str,
    query_tokens: &[String],
) -> Vec<LineMatch> {
    let query_chars: Vec<char> = query.chars().collect();
    let mut matches = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let chars: Vec<char> = line.chars().collect();
        let lower = lower_chars(&chars);

        let idx = if let Some(idx) = find_chars(&lower, &query_chars) {
            idx
        } else if query_tokens.len() > 1 {
            match first_token_position(&lower, query_tokens) {
                Some(idx) => idx,
                None => continue,
            }
        } else {
            continue;
        };

        let start = idx.saturating_sub(CONTEXT_CHARS);
        let end = (idx + query_chars.len() + CONTEXT_CHARS).min(chars.len());

        let mut text = String::new();
        if start > 0 {
            text.push('…');
        }
        text.extend(&chars[start..end]);
        if end < chars.len() {
            text.push('…');
        }

        matches.push(LineMatch { line: i + 1, text });
        if matches.len() >= MAX_MATCHES_PER_FILE {
            break;
        }
    }

    matches
}

/// Per-character lowercase fold, keeping a 1:1 index mapping to the input.
fn lower_chars(chars: &[char]) -> Vec<char> {
    chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect()
}

/// First position of `needle` within `haystack`, by codepoint.
fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Position of the first query token (in query order) present in the line.
fn first_token_position(lower: &[char], query_tokens: &[String]) -> Option<usize> {
    query_tokens.iter().find_map(|token| {
        let token_chars: Vec<char> = token.chars().collect();
        find_chars(lower, &token_chars)
    })
}

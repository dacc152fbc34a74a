//! CJK-aware tokenizer.
//!
//! ASCII words and identifiers are kept whole; CJK ideographs are emitted as
//! single-character tokens because the scripts have no orthographic word
//! boundaries. "微信" therefore matches inside "微信读书". No stop words, no
//! stemming, no casing beyond lowercasing.

/// True for CJK Unified Ideographs, Extension A and the compatibility block.
pub(crate) fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4e00}'..='\u{9fff}' | '\u{3400}'..='\u{4dbf}' | '\u{f900}'..='\u{faff}')
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Tokenize text into lowercase terms.
///
/// `"hello微信读书world"` → `["hello", "微", "信", "读", "书", "world"]`
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in text.to_lowercase().chars() {
        if is_word_char(c) {
            word.push(c);
        } else if !word.is_empty() {
            split_word(&word, &mut tokens);
            word.clear();
        }
    }
    if !word.is_empty() {
        split_word(&word, &mut tokens);
    }

    tokens
}

/// Emit one candidate word, splitting out individual CJK characters.
///
/// Within a mixed word, ASCII runs stay whole and codepoints that are
/// neither ASCII word characters nor CJK are dropped.
fn split_word(word: &str, out: &mut Vec<String>) {
    if !word.chars().any(is_cjk) {
        out.push(word.to_string());
        return;
    }

    let mut run = String::new();
    for c in word.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            run.push(c);
        } else {
            if !run.is_empty() {
                out.push(std::mem::take(&mut run));
            }
            if is_cjk(c) {
                out.push(c.to_string());
            }
        }
    }
    if !run.is_empty() {
        out.push(run);
    }
}

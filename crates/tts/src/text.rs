//! Text preparation for synthesis

use std::sync::LazyLock;

use regex::Regex;

/// Filler words dropped before synthesis, matched case-insensitively as whole words
static FILLER_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:very|really|just|quite|so|basically|actually)\b").expect("filler pattern is a valid regex")
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is a valid regex"));

/// Drop filler words and collapse whitespace
///
/// Shorter text means fewer synthesized characters. Punctuation next to a
/// removed word stays in place.
pub fn shorten(text: &str) -> String {
    let without_fillers = FILLER_WORDS.replace_all(text, "");
    WHITESPACE.replace_all(&without_fillers, " ").trim().to_string()
}

/// Split text into pieces of at most `max_chars` characters
///
/// Pieces end at the last whitespace inside the window when the window would
/// otherwise cut a word. A single word longer than `max_chars` has no such
/// whitespace and is cut at the window edge. Pieces are trimmed; empty input
/// yields no pieces.
pub fn chunk(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        let window_end = rest.char_indices().nth(max_chars).map_or(rest.len(), |(index, _)| index);
        let mut end = window_end;

        let cuts_word = window_end < rest.len() && !rest[window_end..].starts_with(char::is_whitespace);

        if cuts_word
            && let Some(space) = rest[..window_end]
                .rfind(char::is_whitespace)
                .filter(|&index| index > 0)
        {
            end = space;
        }

        chunks.push(rest[..end].trim_end().to_string());
        rest = rest[end..].trim_start();
    }

    chunks
}

//! Text truncation helpers
//!
//! A character-count cut serves the alert setter; byte-budget cuts fit an
//! alert into a size-limited frame, either by raw UTF-8 length or by the
//! length the text takes once escaped inside a JSON string. All of them append
//! a suffix and never split a UTF-8 sequence.

/// Suffix appended to every truncated alert
pub const ELLIPSIS: &str = "...";

/// Cut `text` to at most `limit` characters, ending with `suffix` when cut.
///
/// Text that already fits is returned unchanged. When the text is cut, the
/// kept prefix leaves room for the suffix so the result is exactly `limit`
/// characters long (or just the suffix if `limit` is smaller than it).
pub fn truncate_chars(text: &str, limit: usize, suffix: &str) -> String {
    if text.chars().count() <= limit {
        return text.to_owned();
    }

    let keep = limit.saturating_sub(suffix.chars().count());
    let end = text
        .char_indices()
        .nth(keep)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    let mut out = String::with_capacity(end + suffix.len());
    out.push_str(&text[..end]);
    out.push_str(suffix);
    out
}

/// Cut `text` so that the kept prefix plus `suffix` takes at most `max_bytes`.
///
/// The suffix is always appended. A character straddling the budget is
/// dropped whole. If the budget cannot even hold the suffix, the result is
/// the suffix alone and callers must re-check the size.
pub fn truncate_bytes(text: &str, max_bytes: usize, suffix: &str) -> String {
    let budget = max_bytes.saturating_sub(suffix.len());
    let end = floor_char_boundary(text, budget);

    let mut out = String::with_capacity(end + suffix.len());
    out.push_str(&text[..end]);
    out.push_str(suffix);
    out
}

/// Like [`truncate_bytes`], but sizes every character by its width inside a
/// JSON string literal, so `"`, `\\` and control characters count as their
/// escape sequences.
pub fn truncate_escaped(text: &str, max_bytes: usize, suffix: &str) -> String {
    let budget = max_bytes.saturating_sub(escaped_len(suffix));

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in text.char_indices() {
        used += escaped_char_len(c);
        if used > budget {
            break;
        }
        end = idx + c.len_utf8();
    }

    let mut out = String::with_capacity(end + suffix.len());
    out.push_str(&text[..end]);
    out.push_str(suffix);
    out
}

/// Bytes `text` takes once serialized as a JSON string, quotes excluded
pub fn escaped_len(text: &str) -> usize {
    text.chars().map(escaped_char_len).sum()
}

/// Bytes `c` takes inside a JSON string literal
pub fn escaped_char_len(c: char) -> usize {
    match c {
        '"' | '\\' | '\u{08}' | '\u{0C}' | '\n' | '\r' | '\t' => 2,
        '\u{00}'..='\u{1F}' => 6,
        _ => c.len_utf8(),
    }
}

/// Largest char boundary in `text` that is `<= index`
pub fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }

    let mut idx = index;
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

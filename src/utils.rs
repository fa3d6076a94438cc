//! Utility functions.

/// Convert a "character index" to a "byte index" in a UTF‑8 string.
///
/// Rust strings are UTF‑8, so you cannot safely slice with `s[a..b]` unless `a` and `b` are
/// **byte offsets** that lie on UTF‑8 character boundaries. Indexes past the end map to `s.len()`.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(bi, _)| bi)
}

/// Cut `s` down to at most `max_chars` characters, in place.
pub fn truncate_chars(s: &mut String, max_chars: usize) {
    let bi = char_to_byte_index(s, max_chars);
    s.truncate(bi);
}

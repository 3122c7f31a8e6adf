//! Char-offset helpers.
//!
//! Every offset this crate hands out counts Unicode scalar values, not bytes,
//! so slicing has to walk the string.

/// Number of chars in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The substring covering chars `[start, end)`, clamped to the text.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let begin = byte_index(text, start);
    let finish = byte_index(text, end);
    &text[begin..finish]
}

/// Convert a byte offset (as returned by `str::find`) into a char offset.
pub fn char_offset(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

//! # Char-offset string helpers
//!
//! Every offset the engine exposes counts Unicode scalar values (`char`s),
//! which is what a text field reports for its caret. Rust strings index by
//! byte, so these helpers translate and clamp before slicing.
//!
//! Out-of-range offsets never panic: they clamp to the string's char length,
//! because caret values coming from a host field are best-effort and can run
//! past the end of the value while a composition is in flight.

/// Number of chars in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the char at `char_index`, clamped to `s.len()`.
pub fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map_or(s.len(), |(byte, _)| byte)
}

/// Returns the chars in `start..end`.
///
/// Both bounds clamp to the string length; an inverted range yields `""`.
pub fn slice(s: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let start = byte_index(s, start);
    let end = byte_index(s, end);
    &s[start..end]
}

/// Returns the chars from `start` to the end of `s`.
pub fn slice_from(s: &str, start: usize) -> &str {
    &s[byte_index(s, start)..]
}

/// Replaces the chars in `start..end` with `insert`.
///
/// An `end` before `start` is treated as an empty range at `start`.
pub fn splice(s: &str, start: usize, end: usize, insert: &str) -> String {
    let start_byte = byte_index(s, start);
    let end_byte = byte_index(s, end).max(start_byte);

    let mut out = String::with_capacity(s.len() - (end_byte - start_byte) + insert.len());
    out.push_str(&s[..start_byte]);
    out.push_str(insert);
    out.push_str(&s[end_byte..]);
    out
}

/// Length in chars of the longest common prefix of `a` and `b`.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

/// Char offset of the rightmost occurrence of `needle` in `haystack`.
///
/// An empty needle matches at the end of the haystack.
pub fn rfind(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .rfind(needle)
        .map(|byte| char_len(&haystack[..byte]))
}

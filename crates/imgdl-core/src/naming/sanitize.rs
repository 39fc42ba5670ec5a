//! Title normalization for filenames.

/// Normalizes a title into a filename stem.
///
/// - Trims surrounding whitespace
/// - Collapses each internal whitespace run into a single `-`
/// - Drops every character that is not an ASCII letter, digit, or `-`
/// - Lowercases the result
///
/// Already-normalized input is returned unchanged. May return an empty string
/// or dashes only; callers decide whether such a stem is usable.
pub fn sanitize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

//! Free-text sanitization for user-supplied fields.
//!
//! Everything stored from a form body passes through [`sanitize`] first.
//! The output is safe to embed in JSON responses and in the admin UI:
//! no markup characters, no control characters, bounded length.

/// Truncate to `max_len` characters, trim whitespace, escape HTML entities,
/// then strip any literal markup characters and C0/C1 controls that remain.
///
/// Pure and infallible. Empty or whitespace-only input yields an empty string.
pub fn sanitize(text: &str, max_len: usize) -> String {
    let truncated: String = text.chars().take(max_len).collect();
    let trimmed = truncated.trim();

    let mut escaped = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }

    // Escaping handles well-formed input; stripping is the backstop for
    // anything that still reads as markup or a control character. The final
    // take enforces the cap even after entity expansion.
    escaped
        .chars()
        .filter(|c| !matches!(*c, '<' | '>' | '"' | '\''))
        .filter(|c| !c.is_control() && !('\u{80}'..='\u{9f}').contains(c))
        .take(max_len)
        .collect()
}

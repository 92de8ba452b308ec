//! Character-based text utilities.
//!
//! Conversation content is Arabic-heavy, so truncation limits are counted in
//! characters rather than bytes: slicing `&str[..n]` would panic inside a
//! multi-byte character, and byte budgets would cut Arabic titles to a third
//! of their Latin length.

/// Truncate a string to at most `max_chars` characters.
///
/// Returns a borrowed prefix when the string already fits.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate `s` to `max_chars` characters, appending `suffix` when truncated.
///
/// The suffix does not count against the budget: a 100-char limit with a
/// `"..."` suffix yields up to 103 chars. This matches how the conversation
/// summary titles and previews have always been rendered.
pub fn truncate_with_suffix(s: &str, max_chars: usize, suffix: &str) -> String {
    if s.chars().count() <= max_chars {
        return s.to_owned();
    }
    let mut out = truncate_chars(s, max_chars).to_owned();
    out.push_str(suffix);
    out
}

/// Whether `s` contains any Arabic-script characters.
///
/// Covers the main Arabic block plus supplement, extended-A, and the
/// presentation-form blocks, the same ranges the speech pipeline has always
/// used for language fallback detection.
pub fn contains_arabic(s: &str) -> bool {
    s.chars().any(|c| {
        matches!(c,
            '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}')
    })
}

/// Normalize an identifier for comparison: strip leading/trailing whitespace.
///
/// Returns `None` when the trimmed value is empty. User and conversation ids
/// arrive from several sources (JSON strings, numbers cast to strings, form
/// fields) and are compared after this normalization everywhere.
pub fn normalize_id(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── truncate_chars ───────────────────────────────────────────────────

    #[test]
    fn ascii_within_limit() {
        assert_eq!(truncate_chars("hello", 10), "hello");
    }

    #[test]
    fn ascii_truncated() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
    }

    #[test]
    fn empty_string() {
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn zero_max() {
        assert_eq!(truncate_chars("hello", 0), "");
    }

    #[test]
    fn arabic_counted_in_chars() {
        // "مرحبا" is 5 chars but 10 bytes
        assert_eq!(truncate_chars("مرحبا بالعالم", 5), "مرحبا");
    }

    #[test]
    fn emoji_counted_as_one() {
        assert_eq!(truncate_chars("hi🦀bye", 3), "hi🦀");
    }

    // ── truncate_with_suffix ─────────────────────────────────────────────

    #[test]
    fn suffix_not_added_when_fits() {
        assert_eq!(truncate_with_suffix("hello", 10, "..."), "hello");
    }

    #[test]
    fn suffix_added_when_truncated() {
        assert_eq!(truncate_with_suffix("hello world", 5, "..."), "hello...");
    }

    #[test]
    fn suffix_exact_fit_untouched() {
        assert_eq!(truncate_with_suffix("abc", 3, "..."), "abc");
    }

    #[test]
    fn suffix_arabic() {
        assert_eq!(truncate_with_suffix("مرحبا بالعالم", 5, "..."), "مرحبا...");
    }

    // ── contains_arabic ──────────────────────────────────────────────────

    #[test]
    fn detects_arabic_text() {
        assert!(contains_arabic("ما هي السعرات الحرارية؟"));
    }

    #[test]
    fn detects_mixed_text() {
        assert!(contains_arabic("calories في الكبسة"));
    }

    #[test]
    fn latin_only_is_not_arabic() {
        assert!(!contains_arabic("how many calories in kabsa?"));
        assert!(!contains_arabic(""));
    }

    // ── normalize_id ─────────────────────────────────────────────────────

    #[test]
    fn trims_whitespace() {
        assert_eq!(normalize_id(" 42 "), Some("42"));
    }

    #[test]
    fn empty_and_blank_are_none() {
        assert_eq!(normalize_id(""), None);
        assert_eq!(normalize_id("   "), None);
    }
}

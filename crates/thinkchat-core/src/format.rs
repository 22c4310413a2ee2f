//! Lightweight markdown formatting over sanitized text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::sanitize::escape_html;

// `.` never crosses a newline, so spans stay on one line.
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").unwrap());

/// Turn raw response text into a trusted HTML fragment.
///
/// The text is escaped first, then `**bold**`, `*italic*`, `` `code` `` and
/// newlines are substituted in that order. Bold has to run before italic,
/// otherwise the italic pattern would eat the `**` pairs.
pub fn format_content(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let escaped = escape_html(content);
    let formatted = BOLD_RE.replace_all(&escaped, "<strong>${1}</strong>");
    let formatted = ITALIC_RE.replace_all(&formatted, "<em>${1}</em>");
    let formatted = CODE_RE.replace_all(&formatted, "<code>${1}</code>");

    formatted.replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold() {
        assert_eq!(format_content("**bold**"), "<strong>bold</strong>");
    }

    #[test]
    fn test_italic() {
        assert_eq!(format_content("*it*"), "<em>it</em>");
    }

    #[test]
    fn test_bold_matched_before_italic() {
        assert_eq!(
            format_content("**a** *b*"),
            "<strong>a</strong> <em>b</em>"
        );
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(
            format_content("run `cargo test` now"),
            "run <code>cargo test</code> now"
        );
    }

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(format_content("a\nb"), "a<br>b");
    }

    #[test]
    fn test_non_greedy_matching() {
        assert_eq!(
            format_content("**one** and **two**"),
            "<strong>one</strong> and <strong>two</strong>"
        );
    }

    #[test]
    fn test_markup_is_escaped_before_formatting() {
        assert_eq!(
            format_content("**<script>**"),
            "<strong>&lt;script&gt;</strong>"
        );
    }

    #[test]
    fn test_emphasis_does_not_span_lines() {
        assert_eq!(format_content("*a\nb*"), "*a<br>b*");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_content(""), "");
    }
}

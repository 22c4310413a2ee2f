//! HTML escaping for any text that ends up inside rendered markup.

/// Escape the five markup-significant characters.
///
/// `&` is replaced first so the entities inserted afterwards are not
/// escaped again. Running this twice on the same text double-escapes.
pub fn escape_html(unsafe_text: &str) -> String {
    unsafe_text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_all_five_characters() {
        let escaped = escape_html(r#"<a href="x">Tom & Jerry's</a>"#);
        assert_eq!(
            escaped,
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
        for raw in ['<', '>', '"', '\''] {
            assert!(!escaped.contains(raw));
        }
    }

    #[test]
    fn test_ampersand_escaped_first() {
        assert_eq!(escape_html("<"), "&lt;");
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_applying_twice_double_escapes() {
        let once = escape_html("a & b");
        let twice = escape_html(&once);
        assert_eq!(once, "a &amp; b");
        assert_eq!(twice, "a &amp;amp; b");
    }

    #[test]
    fn test_plain_and_empty_text_unchanged() {
        assert_eq!(escape_html(""), "");
        assert_eq!(escape_html("hello world\n*bold*"), "hello world\n*bold*");
    }
}

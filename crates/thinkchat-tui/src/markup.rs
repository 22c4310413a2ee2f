//! Reads the trusted HTML fragments built by `thinkchat_core::format` back
//! into styled text runs for the terminal.
//!
//! Only the tags the formatter emits are recognized; every other `<` in a
//! fragment has already been escaped, so there is nothing else to parse.

use once_cell::sync::Lazy;
use regex::Regex;
use thinkchat_core::render::ERROR_HINT;
use thinkchat_core::Block;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(/?)(strong|em|code)>|<br>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub code: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SegmentStyle,
}

/// Split a fragment into lines (on `<br>`) of styled segments.
pub fn parse_fragment(html: &str) -> Vec<Vec<Segment>> {
    let mut lines: Vec<Vec<Segment>> = vec![Vec::new()];
    let mut style = SegmentStyle::default();
    let mut last_end = 0;

    for caps in TAG_RE.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut lines, &html[last_end..whole.start()], style);
        last_end = whole.end();

        let Some(tag) = caps.get(2) else {
            lines.push(Vec::new());
            continue;
        };
        let opening = caps.get(1).map_or(true, |slash| slash.as_str().is_empty());
        match tag.as_str() {
            "strong" => style.strong = opening,
            "em" => style.emphasis = opening,
            _ => style.code = opening,
        }
    }
    push_text(&mut lines, &html[last_end..], style);

    lines
}

/// Undo `escape_html`. `&amp;` goes last so `&amp;lt;` stays `&lt;`.
pub fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}

/// Flatten a fragment into plain text with newlines.
pub fn to_plain_text(html: &str) -> String {
    parse_fragment(html)
        .iter()
        .map(|line| line.iter().map(|s| s.text.as_str()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain-text rendering of one block, used by `thinkchat ask`.
pub fn block_to_plain_text(block: &Block) -> String {
    match block {
        Block::Text(text) => text.clone(),
        Block::Unstructured { html } => to_plain_text(html),
        Block::Step { number, title, html } => format!(
            "Step {}: {}\n{}",
            number,
            decode_entities(title),
            to_plain_text(html)
        ),
        Block::FinalAnswer { html } => format!("Final answer: {}", to_plain_text(html)),
        Block::Error { message } => format!("Error: {}\n{}", decode_entities(message), ERROR_HINT),
    }
}

fn push_text(lines: &mut [Vec<Segment>], raw: &str, style: SegmentStyle) {
    if raw.is_empty() {
        return;
    }
    if let Some(line) = lines.last_mut() {
        line.push(Segment {
            text: decode_entities(raw),
            style,
        });
    }
}

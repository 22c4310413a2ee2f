//! UI-agnostic chat transcript
//!
//! The transcript is shared by every front end (the TUI, the one-shot CLI and
//! the HTML export) and doesn't depend on any specific UI framework.

use crate::render::Block;
use crate::settings::Theme;

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// A rendered chat message. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub blocks: Vec<Block>,
}

impl ChatMessage {
    /// User input is kept as literal text and escaped on output.
    pub fn user(query: &str) -> Self {
        Self {
            role: ChatRole::User,
            blocks: vec![Block::Text(query.to_string())],
        }
    }

    pub fn assistant(blocks: Vec<Block>) -> Self {
        Self {
            role: ChatRole::Assistant,
            blocks,
        }
    }

    pub fn is_error(&self) -> bool {
        self.blocks.iter().any(Block::is_error)
    }

    pub fn css_class(&self) -> String {
        let mut class = format!("message {}-message", self.role.as_str());
        if self.is_error() {
            class.push_str(" error");
        }
        class
    }

    pub fn to_html(&self) -> String {
        let inner: String = self.blocks.iter().map(Block::to_html).collect();
        format!(r#"<div class="{}">{}</div>"#, self.css_class(), inner)
    }
}

/// Append-only, ordered list of messages.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    scroll_requested: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and ask the view to scroll to it.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.scroll_requested = true;
    }

    pub fn request_scroll(&mut self) {
        self.scroll_requested = true;
    }

    /// Returns true once per pending scroll-to-bottom request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// A standalone HTML page with every message, for saving a conversation.
    pub fn to_html_document(&self, theme: Theme) -> String {
        let mut page = String::new();
        page.push_str("<!DOCTYPE html>\n");
        page.push_str(&format!(r#"<html lang="en" data-theme="{}">"#, theme.as_str()));
        page.push_str("\n<head>\n<meta charset=\"utf-8\">\n<title>thinkchat transcript</title>\n");
        page.push_str("<style>\n");
        page.push_str(EXPORT_STYLE);
        page.push_str("</style>\n</head>\n<body>\n<div id=\"chat-messages\">\n");
        for message in &self.messages {
            page.push_str(&message.to_html());
            page.push('\n');
        }
        page.push_str("</div>\n</body>\n</html>\n");
        page
    }
}

const EXPORT_STYLE: &str = r#"body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }
[data-theme="dark"] body { background: #1e1e1e; color: #e0e0e0; }
.message { padding: 0.75rem 1rem; margin: 0.5rem 0; border-radius: 0.5rem; }
.user-message { background: rgba(80, 140, 255, 0.15); }
.assistant-message { background: rgba(128, 128, 128, 0.1); }
.error .error-message { color: #d33; font-weight: bold; }
.step { margin-bottom: 0.75rem; }
.step-title { font-weight: bold; }
.final-answer { border-top: 1px solid #888; padding-top: 0.5rem; }
code { font-family: monospace; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_error;

    #[test]
    fn test_user_message_html_is_escaped() {
        let message = ChatMessage::user("<b>hi</b>");
        assert_eq!(
            message.to_html(),
            r#"<div class="message user-message">&lt;b&gt;hi&lt;/b&gt;</div>"#
        );
    }

    #[test]
    fn test_error_message_class() {
        let message = ChatMessage::assistant(vec![render_error("boom")]);
        assert!(message.is_error());
        assert_eq!(message.css_class(), "message assistant-message error");
    }

    #[test]
    fn test_push_requests_scroll_once() {
        let mut transcript = Transcript::new();
        assert!(!transcript.take_scroll_request());

        transcript.push(ChatMessage::user("one"));
        transcript.push(ChatMessage::user("two"));
        assert!(transcript.take_scroll_request());
        assert!(!transcript.take_scroll_request());
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0], ChatMessage::user("one"));
    }

    #[test]
    fn test_html_document_carries_theme_and_messages() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("how many apples"));
        transcript.push(ChatMessage::assistant(vec![Block::Text("six apples".to_string())]));

        let page = transcript.to_html_document(Theme::Dark);
        assert!(page.contains(r#"data-theme="dark""#));
        let user_at = page.find("how many apples").unwrap();
        let answer_at = page.find("six apples").unwrap();
        assert!(user_at < answer_at);
    }
}

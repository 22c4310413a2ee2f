//! Turns decoded responses and failures into message blocks.

use crate::format::format_content;
use crate::response::ReasoningResult;
use crate::sanitize::escape_html;

/// Shown when a successful response matches none of the known shapes.
pub const UNEXPECTED_FORMAT: &str = "Received an unexpected response format.";

/// Appended under every error block.
pub const ERROR_HINT: &str = "Please try again or adjust your settings.";

/// A rendered piece of a chat message.
///
/// Every variant except `Text` holds trusted HTML built from escaped input.
/// `Text` holds literal text and is escaped whenever it is written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(String),
    Unstructured { html: String },
    Step { number: usize, title: String, html: String },
    FinalAnswer { html: String },
    Error { message: String },
}

impl Block {
    pub fn to_html(&self) -> String {
        match self {
            Block::Text(text) => escape_html(text),
            Block::Unstructured { html } => {
                format!(r#"<div class="unstructured-content">{}</div>"#, html)
            }
            Block::Step { number, title, html } => format!(
                r#"<div class="step"><div class="step-title">Step {}: {}</div><div class="step-content">{}</div></div>"#,
                number, title, html
            ),
            Block::FinalAnswer { html } => {
                format!(r#"<div class="final-answer">{}</div>"#, html)
            }
            Block::Error { message } => format!(
                r#"<div class="error-message"><span>Error: {}</span></div><div>{}</div>"#,
                message, ERROR_HINT
            ),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Block::Error { .. })
    }
}

/// Render a decoded result into the blocks of one assistant message.
pub fn render_result(result: &ReasoningResult) -> Vec<Block> {
    match result {
        ReasoningResult::Unstructured { content } | ReasoningResult::Fallback { content } => {
            vec![Block::Unstructured {
                html: format_content(content),
            }]
        }
        ReasoningResult::Steps { steps, final_answer } => {
            let mut blocks: Vec<Block> = steps
                .iter()
                .enumerate()
                .map(|(index, step)| Block::Step {
                    number: index + 1,
                    title: escape_html(&step.title),
                    html: format_content(&step.content),
                })
                .collect();

            if let Some(answer) = final_answer {
                blocks.push(Block::FinalAnswer {
                    html: format_content(answer),
                });
            }

            blocks
        }
        ReasoningResult::Unknown => vec![Block::Text(UNEXPECTED_FORMAT.to_string())],
    }
}

/// Render a request failure. The message is escaped here.
pub fn render_error(message: &str) -> Block {
    Block::Error {
        message: escape_html(message),
    }
}

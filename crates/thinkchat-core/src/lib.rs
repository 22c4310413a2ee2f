pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod render;
pub mod response;
pub mod sanitize;
pub mod session;
pub mod settings;
pub mod transcript;

// Re-export main types for convenience
pub use client::{HealthStatus, ReasonClient, ReasonRequest};
pub use config::Config;
pub use error::RequestFailure;
pub use format::format_content;
pub use render::{render_error, render_result, Block};
pub use response::{ReasoningResult, ReasoningStep};
pub use sanitize::escape_html;
pub use session::{ChatSession, RequestState};
pub use settings::{Settings, Theme};
pub use transcript::{ChatMessage, ChatRole, Transcript};

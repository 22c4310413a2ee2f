//! One chat session: the transcript plus the idle/sending request lifecycle.

use serde_json::Value;
use tracing::{info, warn};

use crate::client::{ReasonClient, ReasonRequest};
use crate::error::RequestFailure;
use crate::render::{render_error, render_result};
use crate::response::ReasoningResult;
use crate::settings::Settings;
use crate::transcript::{ChatMessage, Transcript};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Sending,
}

#[derive(Debug, Default)]
pub struct ChatSession {
    pub transcript: Transcript,
    state: RequestState,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Submission controls are disabled while this is true.
    pub fn is_busy(&self) -> bool {
        self.state == RequestState::Sending
    }

    /// Start a submit cycle.
    ///
    /// Returns `None` without touching the transcript when the trimmed query
    /// is empty or a request is already in flight. Otherwise the user message
    /// is appended, `input` is cleared and the session switches to sending.
    pub fn begin_submit(&mut self, input: &mut String, settings: &Settings) -> Option<ReasonRequest> {
        if self.is_busy() {
            return None;
        }

        let query = input.trim();
        if query.is_empty() {
            return None;
        }

        let request = ReasonRequest::new(query, settings);
        self.transcript.push(ChatMessage::user(query));
        input.clear();
        self.state = RequestState::Sending;

        info!(query_len = request.query.len(), "submitting query");
        Some(request)
    }

    /// Finish the in-flight request. Always returns the session to idle.
    pub fn complete(&mut self, outcome: Result<Value, RequestFailure>) {
        self.state = RequestState::Idle;

        let message = match outcome {
            Ok(payload) => {
                let result = ReasoningResult::from_value(&payload);
                info!(kind = result.kind(), "rendering response");
                ChatMessage::assistant(render_result(&result))
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "request failed");
                ChatMessage::assistant(vec![render_error(&err.to_string())])
            }
        };

        self.transcript.push(message);
    }

    /// Run a whole submit cycle inline. Returns false if nothing was sent.
    pub async fn submit(&mut self, client: &ReasonClient, input: &mut String, settings: &Settings) -> bool {
        let Some(request) = self.begin_submit(input, settings) else {
            return false;
        };

        let outcome = client.reason(&request).await;
        self.complete(outcome);
        true
    }
}

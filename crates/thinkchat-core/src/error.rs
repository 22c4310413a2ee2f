use thiserror::Error;

/// Everything that can go wrong during one `/api/reason` round trip.
///
/// The UI shows every variant the same way; the split only matters for logs.
#[derive(Debug, Error)]
pub enum RequestFailure {
    #[error("Server responded with status: {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("Invalid response from server: {0}")]
    Decode(String),
    #[error("Request was interrupted: {0}")]
    Interrupted(String),
}

impl RequestFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            RequestFailure::Status(_) => "status",
            RequestFailure::Transport(_) => "transport",
            RequestFailure::Decode(_) => "decode",
            RequestFailure::Interrupted(_) => "interrupted",
        }
    }
}

impl From<reqwest::Error> for RequestFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RequestFailure::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            RequestFailure::Status(status.as_u16())
        } else {
            RequestFailure::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RequestFailure {
    fn from(err: serde_json::Error) -> Self {
        RequestFailure::Decode(err.to_string())
    }
}

impl From<tokio::task::JoinError> for RequestFailure {
    fn from(err: tokio::task::JoinError) -> Self {
        RequestFailure::Interrupted(err.to_string())
    }
}

//! Error types for the chat client.

use std::time::Duration;

/// Errors from talking to the remote chat service.
///
/// None of these escape [`ChatSession::send`](crate::ChatSession::send); the
/// session turns them into a failure turn in the history.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("service returned HTTP {0}")]
    Status(u16),
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ChatError::Status(status.as_u16())
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Please enter a video URL.")]
    EmptyUrl,

    #[error("Please select a format first.")]
    NoSelection,

    /// Reported by the server; the text is shown to the user as-is
    #[error("{}", .0.as_deref().unwrap_or("request rejected"))]
    Rejected(Option<String>),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected { message } => AppError::Rejected(message),
            other => AppError::Transport(other.to_string()),
        }
    }
}

impl AppError {
    /// Status text for this failure, given the operation's fallbacks
    pub fn status_text(&self, rejected_fallback: &str, transport_fallback: &str) -> String {
        match self {
            AppError::Rejected(Some(message)) if !message.is_empty() => message.clone(),
            AppError::Rejected(_) => rejected_fallback.to_string(),
            AppError::Transport(_) | AppError::Io(_) => transport_fallback.to_string(),
            local => local.to_string(),
        }
    }
}

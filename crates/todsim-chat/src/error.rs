use thiserror::Error;

/// Local precondition failures; never reach the network
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("This conversation has ended.")]
    Inactive,
    #[error("Please wait for the current response.")]
    RequestPending,
    #[error("Please enter a message.")]
    Empty,
    #[error("Message is too long (max {max} characters).")]
    TooLong { len: usize, max: usize },
    #[error("There is no message to retry.")]
    NothingToRetry,
}

/// Failure of a call to the conversation service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Transport(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("application error: {0}")]
    Application(String),
}

impl RequestError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RequestError::Timeout)
    }

    /// Transport failures, as opposed to a well-formed failure reply
    pub fn is_transport(&self) -> bool {
        !matches!(self, RequestError::Application(_))
    }

    /// Copy shown to the user
    pub fn user_message(&self) -> String {
        match self {
            RequestError::Timeout => "Request timed out. Please try again.".to_string(),
            RequestError::Transport(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            RequestError::Status(code) => format!("Server error ({}). Please try again.", code),
            RequestError::Malformed(_) => {
                "Received an invalid response from the server. Please try again.".to_string()
            }
            RequestError::Application(msg) if !msg.trim().is_empty() => msg.clone(),
            RequestError::Application(_) => {
                "The assistant could not process your message. Please try again.".to_string()
            }
        }
    }
}

/// Local storage unavailable or full; logged, never shown
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },
    #[error("stored value for '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

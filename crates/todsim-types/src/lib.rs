//! Core types and structures for the TOD simulator client
//!
//! This crate provides the foundational types shared by the chat controller,
//! the HTTP client and the terminal/browser front-ends.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod domain;
pub mod feedback;
pub mod protocol;
pub mod start;

pub use domain::{Domain, DomainInfo, ModelKind};
pub use feedback::{FeedbackForm, RatingField, RATING_RANGE};
pub use protocol::{ChatReply, ChatRequest, EndRequest, FeedbackReply};
pub use start::{AssignmentMethod, StartError, StartRequest};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length of a user message, in characters
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Maximum number of offered retries for one message
pub const MAX_RETRIES: u32 = 3;

/// Upper bound for a single conversation request
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Countdown before the automatic feedback hand-off
pub const HANDOFF_COUNTDOWN_SECS: u32 = 3;

/// How long transient notices stay visible
pub const NOTICE_DISPLAY_MS: u64 = 5000;

/// Interval of the background state snapshot while a conversation is active
pub const SNAPSHOT_INTERVAL_SECS: u64 = 30;

const MESSAGES_KEY_PREFIX: &str = "tod_messages_";
const STATE_KEY_PREFIX: &str = "tod_state_";

/// Storage key holding the transcript of a session
pub fn messages_key(session_id: &str) -> String {
    format!("{}{}", MESSAGES_KEY_PREFIX, session_id)
}

/// Storage key holding the lifecycle snapshot of a session
pub fn state_key(session_id: &str) -> String {
    format!("{}{}", STATE_KEY_PREFIX, session_id)
}

/// Current time as an RFC 3339 / ISO-8601 string
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================================
// Session
// ============================================================================

/// Identity of a chat session, fixed for the lifetime of the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub domain: String,
    pub model_type: String,
}

/// Raised when the page context does not carry a complete session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session is missing required field(s): {}", missing.join(", "))]
pub struct SessionError {
    pub missing: Vec<&'static str>,
}

/// Raw session fields as read from hidden inputs, query parameters or flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFields {
    pub session_id: Option<String>,
    pub domain: Option<String>,
    pub model_type: Option<String>,
    /// Opening bot message rendered by the page, if any
    pub greeting: Option<String>,
}

impl SessionFields {
    pub fn new(session_id: &str, domain: &str, model_type: &str) -> Self {
        Self {
            session_id: Some(session_id.to_string()),
            domain: Some(domain.to_string()),
            model_type: Some(model_type.to_string()),
            greeting: None,
        }
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    /// Build a session, treating absent and blank values alike
    pub fn to_session(&self) -> Result<Session, SessionError> {
        fn present(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        let session_id = present(&self.session_id);
        let domain = present(&self.domain);
        let model_type = present(&self.model_type);

        let mut missing = Vec::new();
        if session_id.is_none() {
            missing.push("session_id");
        }
        if domain.is_none() {
            missing.push("domain");
        }
        if model_type.is_none() {
            missing.push("model_type");
        }

        match (session_id, domain, model_type) {
            (Some(session_id), Some(domain), Some(model_type)) => Ok(Session {
                session_id,
                domain,
                model_type,
            }),
            _ => Err(SessionError { missing }),
        }
    }
}

// ============================================================================
// Transcript
// ============================================================================

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    System,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
            Sender::System => "system",
        }
    }
}

/// One message of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub turn_number: Option<u32>,
    pub sender: Sender,
    pub content: String,
    pub timestamp: String,
}

impl Turn {
    pub fn user(turn_number: u32, content: impl Into<String>) -> Self {
        Self::numbered(Sender::User, turn_number, content)
    }

    pub fn bot(turn_number: u32, content: impl Into<String>) -> Self {
        Self::numbered(Sender::Bot, turn_number, content)
    }

    /// Bot message outside the numbered round-trips (the opening greeting)
    pub fn greeting(content: impl Into<String>) -> Self {
        Self {
            turn_number: None,
            sender: Sender::Bot,
            content: content.into(),
            timestamp: now_timestamp(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            turn_number: None,
            sender: Sender::System,
            content: content.into(),
            timestamp: now_timestamp(),
        }
    }

    fn numbered(sender: Sender, turn_number: u32, content: impl Into<String>) -> Self {
        Self {
            turn_number: Some(turn_number),
            sender,
            content: content.into(),
            timestamp: now_timestamp(),
        }
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Client-observed state of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Active,
    Ended,
}

impl Lifecycle {
    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }
}

/// State persisted for the feedback step and for reload recovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub domain: String,
    pub model_type: String,
    /// Completed user→bot round-trips
    pub turn_count: u32,
    pub lifecycle: Lifecycle,
    pub saved_at: String,
}

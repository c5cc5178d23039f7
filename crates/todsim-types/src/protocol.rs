use serde::{Deserialize, Serialize};

/// Status value the server uses for a successful reply
pub const STATUS_SUCCESS: &str = "success";

/// Body of a conversation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

/// Reply of the conversation endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub conversation_ended: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub turn_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub domain: Option<String>,
}

impl ChatReply {
    pub fn success(message: impl Into<String>, conversation_ended: bool) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: Some(message.into()),
            conversation_ended: Some(conversation_ended),
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    pub fn ends_conversation(&self) -> bool {
        self.conversation_ended.unwrap_or(false)
    }
}

/// Body of the end-of-conversation notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndRequest {
    pub session_id: String,
}

/// Reply of the feedback submission endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedbackReply {
    #[serde(default)]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub redirect: Option<String>,
}

impl FeedbackReply {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

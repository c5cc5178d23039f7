use std::time::Duration;

use todsim_types::REQUEST_TIMEOUT_SECS;

/// Server used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

pub const MESSAGE_PATH: &str = "/tod_chat_message";
pub const END_PATH: &str = "/end_tod_conversation";
pub const FEEDBACK_FORM_PATH: &str = "/feedback_form";
pub const FEEDBACK_SUBMIT_PATH: &str = "/submit_feedback";

/// Where and how to reach the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn message_url(&self) -> String {
        self.endpoint(MESSAGE_PATH)
    }

    pub fn end_url(&self) -> String {
        self.endpoint(END_PATH)
    }

    /// Base of the feedback page; the controller appends the session id
    pub fn feedback_form_url(&self) -> String {
        self.endpoint(FEEDBACK_FORM_PATH)
    }

    pub fn feedback_submit_url(&self) -> String {
        self.endpoint(FEEDBACK_SUBMIT_PATH)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Trim whitespace and trailing slashes, and default the scheme to http
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() {
        return DEFAULT_BASE_URL.to_string();
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

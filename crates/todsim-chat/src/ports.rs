//! Seams between the controller and its environment.
//!
//! The traits are `?Send` so one controller runs unchanged on a tokio
//! current-thread runtime and on the browser event loop.

use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use todsim_types::{ChatReply, ChatRequest, EndRequest, Turn};

use crate::error::{RequestError, StoreError};

/// Remote conversation service
#[async_trait(?Send)]
pub trait ConversationApi {
    /// Send one user message; implementations enforce the request timeout
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply, RequestError>;

    /// Tell the server the user ended the conversation
    async fn end_conversation(&self, request: &EndRequest) -> Result<(), RequestError>;
}

#[async_trait(?Send)]
impl<T: ConversationApi + ?Sized> ConversationApi for Rc<T> {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply, RequestError> {
        (**self).send_message(request).await
    }

    async fn end_conversation(&self, request: &EndRequest) -> Result<(), RequestError> {
        (**self).end_conversation(request).await
    }
}

/// Rendering surface driven by the controller
pub trait ChatView {
    fn append_turn(&self, turn: &Turn);

    fn set_input_enabled(&self, enabled: bool);

    fn clear_input(&self);

    /// Show or hide the "bot is composing" indicator
    fn set_composing(&self, visible: bool);

    fn show_notice(&self, notice: &Notice);

    fn offer_retry(&self, offer: &RetryOffer);

    fn clear_retry_offer(&self);

    /// Offer the feedback step; the countdown is reported separately
    fn offer_handoff(&self, url: &str);

    /// Seconds left before the automatic hand-off, `None` hides the countdown
    fn update_countdown(&self, seconds_left: Option<u32>);

    fn navigate(&self, url: &str);
}

/// Local key-value persistence
pub trait KeyValueStore {
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
}

impl<T: ChatView + ?Sized> ChatView for Rc<T> {
    fn append_turn(&self, turn: &Turn) {
        (**self).append_turn(turn)
    }

    fn set_input_enabled(&self, enabled: bool) {
        (**self).set_input_enabled(enabled)
    }

    fn clear_input(&self) {
        (**self).clear_input()
    }

    fn set_composing(&self, visible: bool) {
        (**self).set_composing(visible)
    }

    fn show_notice(&self, notice: &Notice) {
        (**self).show_notice(notice)
    }

    fn offer_retry(&self, offer: &RetryOffer) {
        (**self).offer_retry(offer)
    }

    fn clear_retry_offer(&self) {
        (**self).clear_retry_offer()
    }

    fn offer_handoff(&self, url: &str) {
        (**self).offer_handoff(url)
    }

    fn update_countdown(&self, seconds_left: Option<u32>) {
        (**self).update_countdown(seconds_left)
    }

    fn navigate(&self, url: &str) {
        (**self).navigate(url)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).save(key, value)
    }

    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// User-facing message; dismisses itself after `duration` unless sticky
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub duration: Option<Duration>,
}

impl Notice {
    pub fn transient(kind: NoticeKind, text: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind,
            text: text.into(),
            duration: Some(duration),
        }
    }

    pub fn sticky(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            duration: None,
        }
    }

    pub fn is_sticky(&self) -> bool {
        self.duration.is_none()
    }
}

/// Retry-or-cancel choice offered after a failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOffer {
    pub attempt: u32,
    pub max_attempts: u32,
    pub reason: String,
}

impl RetryOffer {
    pub fn label(&self) -> String {
        format!("attempt {} of {}", self.attempt, self.max_attempts)
    }
}

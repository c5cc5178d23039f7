//! Chat session controller for the task-oriented dialogue simulator
//!
//! This crate owns the conversation state machine: session identity, the
//! ordered transcript, the active/ended lifecycle, the single in-flight
//! request with its retry policy, local persistence and the hand-off to the
//! feedback step. Network, rendering and storage sit behind the traits in
//! [`ports`] so the terminal and browser front-ends share one controller.

pub mod controller;
pub mod error;
pub mod handoff;
pub mod ports;
pub mod store;

pub use controller::{
    ChatController, ControllerConfig, EndReason, HandoffStep, ResponseOutcome,
    CONVERSATION_ENDED_MESSAGE, INVALID_SESSION_MESSAGE, MAX_RETRIES_MESSAGE,
};
pub use error::{RequestError, StoreError, ValidationError};
pub use handoff::{Countdown, Tick};
pub use ports::{ChatView, ConversationApi, KeyValueStore, Notice, NoticeKind, RetryOffer};
pub use store::{MemoryStore, Persistence};

#[cfg(test)]
mod tests;

//! # todsim-api
//!
//! HTTP access to the TOD simulator server:
//! - `POST {base}/tod_chat_message` for one conversation turn
//! - `POST {base}/end_tod_conversation` when the user ends the chat
//! - `POST {base}/submit_feedback` for the post-conversation questionnaire
//!
//! [`HttpConversationClient`] implements [`todsim_chat::ConversationApi`], so
//! the chat controller can drive it directly. Every call is bounded by the
//! configured timeout (30 seconds unless overridden).
//!
//! ## Example
//!
//! ```rust,no_run
//! use todsim_api::{ClientConfig, HttpConversationClient};
//! use todsim_chat::ConversationApi;
//! use todsim_types::ChatRequest;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let client = HttpConversationClient::new(ClientConfig::new("http://localhost:5000"))?;
//!     let reply = client
//!         .send_message(&ChatRequest {
//!             message: "I need a hotel in Paris".to_string(),
//!             session_id: "abc123".to_string(),
//!         })
//!         .await?;
//!     println!("{:?}", reply.message);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;

#[cfg(test)]
mod tests;

pub use client::{ClientError, HttpConversationClient};
pub use config::{
    normalize_base_url, ClientConfig, DEFAULT_BASE_URL, END_PATH, FEEDBACK_FORM_PATH, FEEDBACK_SUBMIT_PATH,
    MESSAGE_PATH,
};

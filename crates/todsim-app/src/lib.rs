//! TOD simulator terminal client
//!
//! Binds the chat controller to a terminal: a rustyline prompt for input, a
//! colored transcript, a file-backed store for reload recovery and an
//! in-terminal feedback questionnaire for the hand-off.

pub use todsim_api as api;
pub use todsim_chat as chat;
pub use todsim_types as types;

pub mod app;
pub mod cli;
pub mod file_store;
pub mod view;

pub use app::{list_domains, run_chat_mode, run_feedback_mode};
pub use cli::{ChatArgs, Cli, Commands, FeedbackArgs};
pub use file_store::FileStore;
pub use view::TerminalView;

pub mod domains;
pub mod feedback;
pub mod input;
pub mod repl;

pub use domains::list_domains;
pub use feedback::run_feedback_mode;
pub use repl::run_chat_mode;

use std::time::Duration;

use todsim_api::ClientConfig;

use crate::cli::Cli;

/// HTTP settings derived from CLI flags and environment
pub fn client_config(cli: &Cli) -> ClientConfig {
    ClientConfig::new(&cli.base_url).with_timeout(Duration::from_secs(cli.timeout_secs.max(1)))
}

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::LevelFilter;

use todsim::{list_domains, run_chat_mode, run_feedback_mode, ChatArgs, Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    if let Some(shell) = cli.generate {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    match &cli.command {
        Some(Commands::Chat(args)) => run_chat_mode(&cli, args).await,
        Some(Commands::Feedback(args)) => run_feedback_mode(&cli, args).await,
        Some(Commands::Domains { domain }) => list_domains(domain.as_deref()),
        // Bare invocation chats using the environment (TOD_SESSION_ID etc.)
        None => {
            let args = ChatArgs {
                session_id: std::env::var("TOD_SESSION_ID").ok(),
                domain: std::env::var("TOD_DOMAIN").ok(),
                model_type: std::env::var("TOD_MODEL_TYPE").ok(),
                greeting: None,
                no_feedback: false,
            };
            run_chat_mode(&cli, &args).await
        }
    }
}

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use todsim_types::{RatingField, RATING_RANGE};

/// CLI arguments for todsim-cli
#[derive(Parser)]
#[command(name = "todsim-cli")]
#[command(about = "Terminal client for the TOD user simulator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the simulator server
    #[arg(long, value_name = "URL", env = "TOD_BASE_URL", default_value = todsim_api::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory holding saved transcripts and session state
    #[arg(long, value_name = "DIR", env = "TOD_STORE_DIR", default_value = "~/.todsim")]
    pub store_dir: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", env = "TOD_TIMEOUT_SECS", default_value_t = todsim_types::REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Enable verbose debug output (HTTP calls, persistence, state changes)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub generate: Option<Shell>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chat with the assistant in an existing session
    Chat(ChatArgs),
    /// Fill in and submit the feedback questionnaire for a session
    Feedback(FeedbackArgs),
    /// List the task domains and dialogue models
    Domains {
        /// Show intents, slots and actions of one domain
        domain: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// Session id issued by the server's start page
    #[arg(long, env = "TOD_SESSION_ID")]
    pub session_id: Option<String>,

    /// Task domain of the session (hotel, restaurant, flight)
    #[arg(long, env = "TOD_DOMAIN")]
    pub domain: Option<String>,

    /// Dialogue model serving the session
    #[arg(long, env = "TOD_MODEL_TYPE")]
    pub model_type: Option<String>,

    /// Opening message; defaults to the domain's greeting
    #[arg(long)]
    pub greeting: Option<String>,

    /// Skip the questionnaire when the conversation ends
    #[arg(long)]
    pub no_feedback: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FeedbackArgs {
    #[arg(long, env = "TOD_SESSION_ID")]
    pub session_id: String,

    /// Rating given up front, as `field=value` (e.g. `coherence=4`); the rest are asked for
    #[arg(long = "rating", value_name = "FIELD=VALUE", value_parser = parse_rating)]
    pub ratings: Vec<(RatingField, u8)>,

    /// Free-text comments; asked for when omitted
    #[arg(long)]
    pub comments: Option<String>,
}

/// Parse `field=value` into a rating
pub fn parse_rating(s: &str) -> Result<(RatingField, u8), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", s))?;
    let field = RatingField::from_key(key.trim()).ok_or_else(|| {
        let known: Vec<&str> = RatingField::ALL.iter().map(|f| f.key()).collect();
        format!("unknown rating '{}' (expected one of: {})", key.trim(), known.join(", "))
    })?;
    let value: u8 = value
        .trim()
        .parse()
        .map_err(|_| format!("rating '{}' is not a number", value.trim()))?;
    if !RATING_RANGE.contains(&value) {
        return Err(format!("Field {} must be between 1 and 5", field.key()));
    }
    Ok((field, value))
}

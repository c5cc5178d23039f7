use anyhow::{bail, Context, Result};
use colored::Colorize;

use todsim_api::HttpConversationClient;
use todsim_types::{FeedbackForm, RatingField, RATING_RANGE};

use super::client_config;
use super::input::{Input, LineReader};
use crate::cli::{Cli, FeedbackArgs};

const PROGRESS_WIDTH: usize = 20;

/// Run the feedback questionnaire on its own
pub async fn run_feedback_mode(cli: &Cli, args: &FeedbackArgs) -> Result<()> {
    let client = HttpConversationClient::new(client_config(cli))?;
    let mut reader = LineReader::spawn()?;

    let mut form = FeedbackForm::new(args.session_id.clone());
    for (field, value) in &args.ratings {
        form.rate(*field, *value);
    }

    collect_and_submit(&client, &mut reader, form, args.comments.clone()).await
}

/// Ask for whatever the form still lacks, validate, then submit
pub async fn collect_and_submit(
    client: &HttpConversationClient,
    reader: &mut LineReader,
    mut form: FeedbackForm,
    comments: Option<String>,
) -> Result<()> {
    println!("\n{}", "📝 Conversation feedback".bright_cyan().bold());
    println!("{}", format!("Session {}", form.session_id).bright_black());

    for field in RatingField::ALL {
        if form.rating(field).is_some() {
            continue;
        }

        println!("\n{} {}", progress_bar(form.completion()).bright_black(), field.label().bold());
        println!("{}", field.question());
        match field.scale_labels() {
            Some(labels) => {
                for (i, label) in labels.iter().enumerate() {
                    println!("  {} = {}", i + 1, label);
                }
            }
            None => println!("  1 = poor ... 5 = excellent"),
        }

        loop {
            match reader.read("Rating (1-5): ").await? {
                Input::Line(line) => match parse_score(&line) {
                    Some(score) => {
                        form.rate(field, score);
                        break;
                    }
                    None => eprintln!("{} Please enter a number from 1 to 5.", "⚠️".yellow()),
                },
                Input::Interrupted | Input::Eof => bail!("Feedback cancelled"),
            }
        }
    }

    form.comments = match comments {
        Some(comments) => comments,
        None => match reader.read("Additional comments (optional): ").await? {
            Input::Line(line) => line,
            Input::Interrupted | Input::Eof => String::new(),
        },
    };

    let errors = form.validate();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("{} {}", "❌".bright_red(), error);
        }
        bail!("Feedback form is incomplete");
    }

    let reply = client
        .submit_feedback(&form)
        .await
        .context("Failed to submit feedback")?;
    if !reply.is_success() {
        bail!(
            "Feedback was rejected: {}",
            reply.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }

    println!("{} {}", "✅".bright_green(), "Thank you for your feedback!".bright_green());
    Ok(())
}

/// A rating typed by the user, if it is within the scale
pub fn parse_score(input: &str) -> Option<u8> {
    input
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|score| RATING_RANGE.contains(score))
}

/// Text progress bar for the fraction of ratings given
pub fn progress_bar(fraction: f32) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let filled = ((fraction * PROGRESS_WIDTH as f32).round() as usize).min(PROGRESS_WIDTH);
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        (fraction * 100.0).round() as u32
    )
}

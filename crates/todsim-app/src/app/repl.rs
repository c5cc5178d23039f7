use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use todsim_api::HttpConversationClient;
use todsim_chat::{ChatController, ControllerConfig};
use todsim_types::domain::greeting_for;
use todsim_types::{FeedbackForm, SessionFields, SNAPSHOT_INTERVAL_SECS};

use super::client_config;
use super::feedback::collect_and_submit;
use super::input::{Input, LineReader};
use crate::cli::{ChatArgs, Cli};
use crate::file_store::FileStore;
use crate::view::TerminalView;

type TerminalController = ChatController<HttpConversationClient, Rc<TerminalView>, FileStore>;

enum Flow {
    Continue,
    Quit,
}

/// Session fields from flags; the greeting falls back to the domain's
pub fn session_fields(args: &ChatArgs) -> SessionFields {
    let greeting = args.greeting.clone().or_else(|| {
        args.domain
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(greeting_for)
    });
    SessionFields {
        session_id: args.session_id.clone(),
        domain: args.domain.clone(),
        model_type: args.model_type.clone(),
        greeting,
    }
}

/// Run interactive chat mode
pub async fn run_chat_mode(cli: &Cli, args: &ChatArgs) -> Result<()> {
    let config = client_config(cli);
    let client = HttpConversationClient::new(config.clone())?;
    let store = FileStore::new(&cli.store_dir)?;
    let view = Rc::new(TerminalView::new());
    let controller_config = ControllerConfig::default().with_feedback_path(config.feedback_form_url());
    let mut ctrl = ChatController::new(client.clone(), Rc::clone(&view), store, controller_config);

    println!("{}", "🤖 TOD Simulator Chat".bright_cyan().bold());
    println!("{}", format!("Server: {}", config.base_url).bright_black());

    view.set_echo_user(true);
    let started = ctrl.initialize(&session_fields(args));
    view.set_echo_user(false);
    started.context("Cannot start chat")?;

    if let Some(session) = ctrl.session() {
        println!(
            "{}",
            format!(
                "Session {} • domain: {} • model: {}",
                session.session_id, session.domain, session.model_type
            )
            .bright_black()
        );
    }
    println!("{}", "Type /help for commands.\n".bright_black());

    let mut reader = LineReader::spawn()?;

    if ctrl.is_active() {
        if let Flow::Quit = chat_loop(&mut ctrl, &view, &mut reader).await? {
            ctrl.before_unload();
            println!(
                "{}",
                "Session saved. Run again with the same --session-id to continue.".bright_black()
            );
            return Ok(());
        }
    }

    let navigated = handoff(&mut ctrl, &view, &mut reader).await?;
    ctrl.before_unload();

    if navigated && !args.no_feedback {
        if let Some(session) = ctrl.session() {
            let form = FeedbackForm::new(session.session_id.clone());
            collect_and_submit(&client, &mut reader, form, None).await?;
        }
    }
    Ok(())
}

enum Event {
    Input(Input),
    Snapshot,
}

async fn chat_loop(ctrl: &mut TerminalController, view: &TerminalView, reader: &mut LineReader) -> Result<Flow> {
    let mut snapshots = tokio::time::interval(Duration::from_secs(SNAPSHOT_INTERVAL_SECS));
    snapshots.set_missed_tick_behavior(MissedTickBehavior::Delay);
    snapshots.tick().await;

    while ctrl.is_active() {
        reader.request(&prompt(view))?;

        let event = tokio::select! {
            input = reader.next() => Event::Input(input?),
            _ = snapshots.tick() => Event::Snapshot,
        };

        match event {
            Event::Snapshot => {
                ctrl.periodic_snapshot();
            }
            Event::Input(Input::Line(line)) => {
                if let Flow::Quit = handle_line(ctrl, reader, line.trim()).await? {
                    return Ok(Flow::Quit);
                }
            }
            Event::Input(Input::Interrupted | Input::Eof) => return Ok(Flow::Quit),
        }
    }
    Ok(Flow::Continue)
}

fn prompt(view: &TerminalView) -> String {
    if view.retry_offered() {
        format!("{} {} ", "[retry?]".yellow(), "You:".bright_green().bold())
    } else {
        format!("{} ", "You:".bright_green().bold())
    }
}

async fn handle_line(ctrl: &mut TerminalController, reader: &mut LineReader, line: &str) -> Result<Flow> {
    match line {
        "/help" => print_help(),
        "/quit" | "/exit" => return Ok(Flow::Quit),
        "/status" => {
            println!(
                "{} Turn {} • {:?} • retries used: {}",
                "ℹ️".bright_blue(),
                ctrl.turn_number(),
                ctrl.lifecycle(),
                ctrl.retry_count()
            );
        }
        "/retry" => {
            if let Err(e) = ctrl.retry().await {
                debug!("Retry not sent: {}", e);
            }
        }
        "/cancel" => {
            if ctrl.cancel_retry() {
                println!("{}", "Message dropped.".bright_black());
            } else {
                println!("{}", "Nothing to cancel.".bright_black());
            }
        }
        "/end" => {
            if confirm(reader, "Are you sure you want to end this conversation? [y/N] ").await? {
                ctrl.end_conversation().await;
            }
        }
        command if command.starts_with('/') => {
            eprintln!("{} Unknown command: {} (try /help)", "❌".bright_red(), command);
        }
        text => {
            if let Err(e) = ctrl.submit_user_message(text).await {
                debug!("Message not sent: {}", e);
            }
        }
    }
    Ok(Flow::Continue)
}

async fn confirm(reader: &mut LineReader, question: &str) -> Result<bool> {
    Ok(match reader.read(question).await? {
        Input::Line(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Input::Interrupted | Input::Eof => false,
    })
}

fn print_help() {
    println!("{} Commands:", "💡".bright_yellow());
    println!("  /retry    - Resend the message that failed");
    println!("  /cancel   - Drop the message that failed");
    println!("  /end      - End the conversation and go to feedback");
    println!("  /status   - Show turn and retry counters");
    println!("  /quit     - Leave; the session can be resumed later");
    println!("  /help     - Show this help");
}

/// Countdown to the feedback step; true once the hand-off happened
async fn handoff(ctrl: &mut TerminalController, view: &TerminalView, reader: &mut LineReader) -> Result<bool> {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.tick().await;

    loop {
        if view.navigated_to().is_some() {
            return Ok(true);
        }

        let running = ctrl.countdown().is_running();
        let prompt = if running {
            "> ".to_string()
        } else {
            format!(
                "{} ",
                "Press Enter to open the feedback form, or /quit to leave:".bright_cyan()
            )
        };
        reader.request(&prompt)?;

        let input = tokio::select! {
            input = reader.next() => Some(input?),
            _ = ticker.tick(), if running => None,
        };

        match input {
            None => {
                ctrl.handoff_tick();
            }
            Some(Input::Line(line)) => match line.trim() {
                "" | "go" | "/feedback" => {
                    ctrl.handoff_now();
                }
                "stay" | "/stay" => {
                    if ctrl.cancel_handoff() {
                        println!("{}", "Staying here. Press Enter when you're ready to give feedback.".bright_black());
                    }
                }
                "/quit" | "/exit" => return Ok(false),
                other => {
                    println!(
                        "{}",
                        format!("The conversation has ended; '{}' was not sent.", other).bright_black()
                    );
                }
            },
            Some(Input::Interrupted | Input::Eof) => return Ok(false),
        }
    }
}

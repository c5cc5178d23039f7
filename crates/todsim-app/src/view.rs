//! Colored terminal rendering of the chat.

use std::cell::{Cell, RefCell};

use colored::{ColoredString, Colorize};
use log::debug;
use todsim_chat::{ChatView, Notice, NoticeKind, RetryOffer};
use todsim_types::{Sender, Turn};

/// Prints what the controller reports and remembers the state the prompt loop needs
#[derive(Debug, Default)]
pub struct TerminalView {
    echo_user: Cell<bool>,
    input_enabled: Cell<bool>,
    retry_offered: Cell<bool>,
    handoff_url: RefCell<Option<String>>,
    navigated_to: RefCell<Option<String>>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print user turns too; the prompt already shows what the user typed
    pub fn set_echo_user(&self, echo: bool) {
        self.echo_user.set(echo);
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled.get()
    }

    pub fn retry_offered(&self) -> bool {
        self.retry_offered.get()
    }

    pub fn handoff_url(&self) -> Option<String> {
        self.handoff_url.borrow().clone()
    }

    pub fn navigated_to(&self) -> Option<String> {
        self.navigated_to.borrow().clone()
    }
}

/// One transcript line
pub fn render_turn(turn: &Turn) -> String {
    match turn.sender {
        Sender::User => format!("{} {}", "You:".bright_green().bold(), turn.content),
        Sender::Bot => format!("{} {}", "Assistant:".bright_cyan().bold(), turn.content),
        Sender::System => format!("{}", format!("[{}]", turn.content).bright_black()),
    }
}

pub fn render_notice(notice: &Notice) -> String {
    let text: ColoredString = match notice.kind {
        NoticeKind::Info => notice.text.bright_blue(),
        NoticeKind::Warning => notice.text.yellow(),
        NoticeKind::Error => notice.text.bright_red(),
    };
    let icon = match notice.kind {
        NoticeKind::Info => "ℹ️",
        NoticeKind::Warning => "⚠️",
        NoticeKind::Error => "❌",
    };
    format!("{} {}", icon, text)
}

impl ChatView for TerminalView {
    fn append_turn(&self, turn: &Turn) {
        if turn.sender == Sender::User && !self.echo_user.get() {
            return;
        }
        println!("{}", render_turn(turn));
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.input_enabled.set(enabled);
    }

    fn clear_input(&self) {
        // rustyline hands over a fresh line on every read
    }

    fn set_composing(&self, visible: bool) {
        if visible {
            println!("{}", "Assistant is typing...".bright_black().italic());
        }
    }

    fn show_notice(&self, notice: &Notice) {
        if let Some(duration) = notice.duration {
            debug!("Notice shown for {:?}", duration);
        }
        eprintln!("{}", render_notice(notice));
    }

    fn offer_retry(&self, offer: &RetryOffer) {
        self.retry_offered.set(true);
        println!(
            "{} {}",
            "↻".bright_yellow(),
            format!("Type /retry to resend or /cancel to drop the message ({}).", offer.label())
                .yellow()
        );
    }

    fn clear_retry_offer(&self) {
        self.retry_offered.set(false);
    }

    fn offer_handoff(&self, url: &str) {
        *self.handoff_url.borrow_mut() = Some(url.to_string());
        println!(
            "{} {}",
            "📝".bright_cyan(),
            "Please share your feedback about this conversation.".bright_cyan()
        );
    }

    fn update_countdown(&self, seconds_left: Option<u32>) {
        if let Some(seconds) = seconds_left {
            println!(
                "{}",
                format!(
                    "Opening the feedback form in {}... (Enter to go now, 'stay' to remain here)",
                    seconds
                )
                .bright_black()
            );
        }
    }

    fn navigate(&self, url: &str) {
        debug!("Hand-off to {}", url);
        *self.navigated_to.borrow_mut() = Some(url.to_string());
    }
}

//! Chat session controller: transcript, lifecycle, retry policy and hand-off.

use std::cell::Cell;
use std::time::Duration;

use log::{debug, error, info, warn};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use todsim_types::{
    now_timestamp, ChatReply, ChatRequest, EndRequest, Lifecycle, Sender, Session, SessionError,
    SessionFields, SessionSnapshot, Turn, HANDOFF_COUNTDOWN_SECS, MAX_MESSAGE_CHARS, MAX_RETRIES,
    NOTICE_DISPLAY_MS,
};

use crate::error::{RequestError, ValidationError};
use crate::handoff::{Countdown, Tick};
use crate::ports::{ChatView, ConversationApi, KeyValueStore, Notice, NoticeKind, RetryOffer};
use crate::store::Persistence;

pub const CONVERSATION_ENDED_MESSAGE: &str =
    "The conversation has ended. Thank you for participating!";
pub const MAX_RETRIES_MESSAGE: &str =
    "Unable to reach the assistant after several attempts. Please start a new session.";
pub const INVALID_SESSION_MESSAGE: &str =
    "Session information is missing. Please start a new session.";

/// Tunables of the controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub max_retries: u32,
    pub max_message_chars: usize,
    pub notice_duration: Duration,
    pub handoff_countdown_secs: u32,
    /// Feedback page; the session id is appended as a query parameter
    pub feedback_path: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            max_message_chars: MAX_MESSAGE_CHARS,
            notice_duration: Duration::from_millis(NOTICE_DISPLAY_MS),
            handoff_countdown_secs: HANDOFF_COUNTDOWN_SECS,
            feedback_path: "/feedback_form".to_string(),
        }
    }
}

impl ControllerConfig {
    pub fn with_feedback_path(mut self, path: impl Into<String>) -> Self {
        self.feedback_path = path.into();
        self
    }

    pub fn feedback_url(&self, session_id: &str) -> String {
        format!(
            "{}?session_id={}",
            self.feedback_path,
            utf8_percent_encode(session_id, NON_ALPHANUMERIC)
        )
    }
}

/// What a completed request did to the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    Replied { conversation_ended: bool },
    RetryOffered { offer: RetryOffer, error: RequestError },
    /// Retry budget exhausted; the message was dropped
    GaveUp(RequestError),
    /// No request was waiting for this response, or the conversation ended meanwhile
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    User,
    Server,
}

/// Effect of one countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffStep {
    Idle,
    Counting(u32),
    Navigated,
}

/// Releases the input surface if a request future is dropped mid-flight
struct InFlightGuard<'a, V: ChatView> {
    pending: &'a Cell<bool>,
    view: &'a V,
    armed: bool,
}

impl<'a, V: ChatView> InFlightGuard<'a, V> {
    fn arm(pending: &'a Cell<bool>, view: &'a V) -> Self {
        Self {
            pending,
            view,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<V: ChatView> Drop for InFlightGuard<'_, V> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Request abandoned before completion; releasing input");
            self.pending.set(false);
            self.view.set_composing(false);
            self.view.set_input_enabled(true);
        }
    }
}

pub struct ChatController<A, V, S> {
    api: A,
    view: V,
    persistence: Persistence<S>,
    config: ControllerConfig,
    session: Option<Session>,
    lifecycle: Lifecycle,
    init: Option<Result<(), SessionError>>,
    pending: Cell<bool>,
    in_flight: Option<String>,
    awaiting_retry: Option<String>,
    retry_count: u32,
    turn_number: u32,
    transcript: Vec<Turn>,
    handoff: Countdown,
    recovered: bool,
}

impl<A, V, S> ChatController<A, V, S>
where
    A: ConversationApi,
    V: ChatView,
    S: KeyValueStore,
{
    pub fn new(api: A, view: V, store: S, config: ControllerConfig) -> Self {
        Self {
            api,
            view,
            persistence: Persistence::new(store),
            config,
            session: None,
            lifecycle: Lifecycle::Active,
            init: None,
            pending: Cell::new(false),
            in_flight: None,
            awaiting_retry: None,
            retry_count: 0,
            turn_number: 1,
            transcript: Vec::new(),
            handoff: Countdown::default(),
            recovered: false,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// `Ended` until a valid session has been loaded
    pub fn lifecycle(&self) -> Lifecycle {
        if self.session.is_some() {
            self.lifecycle
        } else {
            Lifecycle::Ended
        }
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle().is_active()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn has_retry_offer(&self) -> bool {
        self.awaiting_retry.is_some()
    }

    /// Number the next user/bot round-trip will carry
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn countdown(&self) -> Countdown {
        self.handoff
    }

    pub fn feedback_url(&self) -> String {
        let session_id = self
            .session
            .as_ref()
            .map(|s| s.session_id.as_str())
            .unwrap_or_default();
        self.config.feedback_url(session_id)
    }

    // ------------------------------------------------------------------
    // Start-up
    // ------------------------------------------------------------------

    /// Load the session identity; only the first call has an effect
    pub fn initialize(&mut self, fields: &SessionFields) -> Result<(), SessionError> {
        if let Some(result) = &self.init {
            warn!("Chat controller already initialized; ignoring");
            return result.clone();
        }

        let result = match fields.to_session() {
            Ok(session) => {
                info!(
                    "Chat session {} (domain: {}, model: {})",
                    session.session_id, session.domain, session.model_type
                );
                self.session = Some(session);

                let replayed = self.recover();
                if replayed == 0 && self.is_active() {
                    if let Some(greeting) = fields.greeting.as_deref().filter(|g| !g.trim().is_empty()) {
                        self.push_turn(Turn::greeting(greeting));
                    }
                }
                self.view.set_input_enabled(self.is_active());
                Ok(())
            }
            Err(e) => {
                error!("Cannot start chat: {}", e);
                self.lifecycle = Lifecycle::Ended;
                self.view.set_input_enabled(false);
                self.view
                    .show_notice(&Notice::sticky(NoticeKind::Error, INVALID_SESSION_MESSAGE));
                Err(e)
            }
        };

        self.init = Some(result.clone());
        result
    }

    /// Replay a stored transcript into the view; returns the number of turns replayed
    pub fn recover(&mut self) -> usize {
        if self.recovered {
            return 0;
        }
        let Some(session_id) = self.session.as_ref().map(|s| s.session_id.clone()) else {
            return 0;
        };
        self.recovered = true;

        let mut snapshot = self.persistence.load_snapshot(&session_id);
        let turns = self.persistence.load_transcript(&session_id);

        for turn in &turns {
            self.view.append_turn(turn);
        }

        let answered = turns
            .iter()
            .filter(|t| t.sender == Sender::Bot)
            .filter_map(|t| t.turn_number)
            .max()
            .unwrap_or(0);
        let stored = snapshot.as_ref().map(|s| s.turn_count).unwrap_or(0);
        if stored.checked_add(1).is_none() {
            warn!(
                "Ignoring stored state for {}: turn count {} out of range",
                session_id, stored
            );
            snapshot = None;
        }
        let stored = snapshot.as_ref().map(|s| s.turn_count).unwrap_or(0);
        self.turn_number = answered.max(stored).checked_add(1).unwrap_or_else(|| {
            warn!("Stored turn numbers for {} out of range; numbering from 1", session_id);
            1
        });

        let replayed = turns.len();
        self.transcript = turns;
        if replayed > 0 {
            info!(
                "Recovered {} turn(s) for session {}, next turn {}",
                replayed, session_id, self.turn_number
            );
        }

        if snapshot.map(|s| s.lifecycle) == Some(Lifecycle::Ended) {
            info!("Session {} was already ended", session_id);
            self.lifecycle = Lifecycle::Ended;
            self.view.set_input_enabled(false);
            self.view.offer_handoff(&self.feedback_url());
        }

        replayed
    }

    // ------------------------------------------------------------------
    // Messaging
    // ------------------------------------------------------------------

    /// Validate and send a user message, then apply the reply
    pub async fn submit_user_message(&mut self, text: &str) -> Result<ResponseOutcome, ValidationError> {
        let request = self.begin_submit(text)?;
        let result = self.dispatch(&request).await;
        Ok(self.handle_response(result))
    }

    /// Resend the message under a retry offer
    pub async fn retry(&mut self) -> Result<ResponseOutcome, ValidationError> {
        let request = self.begin_retry()?;
        let result = self.dispatch(&request).await;
        Ok(self.handle_response(result))
    }

    /// First half of a submission, for bindings that issue the call themselves
    pub fn begin_submit(&mut self, text: &str) -> Result<ChatRequest, ValidationError> {
        let Some(session_id) = self.active_session_id() else {
            return Err(self.reject(ValidationError::Inactive));
        };
        if self.pending.get() {
            return Err(self.reject(ValidationError::RequestPending));
        }

        let message = text.trim();
        if message.is_empty() {
            return Err(self.reject(ValidationError::Empty));
        }
        let len = message.chars().count();
        if len > self.config.max_message_chars {
            return Err(self.reject(ValidationError::TooLong {
                len,
                max: self.config.max_message_chars,
            }));
        }

        if self.awaiting_retry.take().is_some() {
            debug!("New message supersedes the pending retry offer");
            self.retry_count = 0;
            self.view.clear_retry_offer();
        }

        self.push_turn(Turn::user(self.turn_number, message));
        self.view.clear_input();
        Ok(self.start_request(message.to_string(), session_id))
    }

    pub fn begin_retry(&mut self) -> Result<ChatRequest, ValidationError> {
        let Some(session_id) = self.active_session_id() else {
            return Err(self.reject(ValidationError::Inactive));
        };
        if self.pending.get() {
            return Err(self.reject(ValidationError::RequestPending));
        }
        let Some(message) = self.awaiting_retry.take() else {
            return Err(self.reject(ValidationError::NothingToRetry));
        };

        self.view.clear_retry_offer();
        info!(
            "Retrying message (attempt {} of {})",
            self.retry_count, self.config.max_retries
        );
        Ok(self.start_request(message, session_id))
    }

    /// Drop the message under a retry offer
    pub fn cancel_retry(&mut self) -> bool {
        if self.awaiting_retry.take().is_none() {
            return false;
        }
        debug!("Retry cancelled after {} failure(s)", self.retry_count);
        self.retry_count = 0;
        self.view.clear_retry_offer();
        true
    }

    /// Apply the outcome of the in-flight request
    pub fn handle_response(&mut self, result: Result<ChatReply, RequestError>) -> ResponseOutcome {
        if !self.pending.get() {
            warn!("Dropping response with no request in flight");
            return ResponseOutcome::Ignored;
        }

        self.view.set_composing(false);
        let outcome = if !self.is_active() {
            debug!("Conversation ended while waiting; discarding reply");
            ResponseOutcome::Ignored
        } else {
            match Self::classify(result) {
                Ok((message, ended)) => self.complete_round_trip(message, ended),
                Err(error) => self.fail_request(error),
            }
        };
        self.finish_request();
        outcome
    }

    fn classify(result: Result<ChatReply, RequestError>) -> Result<(String, bool), RequestError> {
        let reply = result?;
        if !reply.is_success() {
            return Err(RequestError::Application(
                reply
                    .error
                    .unwrap_or_else(|| format!("unexpected status '{}'", reply.status)),
            ));
        }
        let ended = reply.ends_conversation();
        match reply.message {
            Some(message) => Ok((message, ended)),
            None => Err(RequestError::Malformed(
                "success reply without a message".to_string(),
            )),
        }
    }

    fn complete_round_trip(&mut self, message: String, ended: bool) -> ResponseOutcome {
        self.push_turn(Turn::bot(self.turn_number, message));
        self.turn_number = self.turn_number.saturating_add(1);
        self.retry_count = 0;
        self.awaiting_retry = None;
        debug!("Round-trip complete, next turn {}", self.turn_number);

        if ended {
            self.enter_ended(EndReason::Server);
        }
        ResponseOutcome::Replied {
            conversation_ended: ended,
        }
    }

    fn fail_request(&mut self, error: RequestError) -> ResponseOutcome {
        let message = self.in_flight.take();
        warn!("Request failed: {}", error);
        let text = error.user_message();

        if self.retry_count < self.config.max_retries {
            self.retry_count += 1;
            let offer = RetryOffer {
                attempt: self.retry_count,
                max_attempts: self.config.max_retries,
                reason: text.clone(),
            };
            self.awaiting_retry = message;
            self.notify(NoticeKind::Error, &text);
            self.view.offer_retry(&offer);
            ResponseOutcome::RetryOffered { offer, error }
        } else {
            error!("Giving up after {} retries", self.retry_count);
            self.retry_count = 0;
            self.awaiting_retry = None;
            self.view
                .show_notice(&Notice::sticky(NoticeKind::Error, MAX_RETRIES_MESSAGE));
            ResponseOutcome::GaveUp(error)
        }
    }

    fn start_request(&mut self, message: String, session_id: String) -> ChatRequest {
        self.pending.set(true);
        self.in_flight = Some(message.clone());
        self.view.set_input_enabled(false);
        self.view.set_composing(true);
        debug!("Sending turn {} for session {}", self.turn_number, session_id);
        ChatRequest {
            message,
            session_id,
        }
    }

    fn finish_request(&mut self) {
        self.pending.set(false);
        self.in_flight = None;
        self.view.set_input_enabled(self.is_active());
    }

    async fn dispatch(&self, request: &ChatRequest) -> Result<ChatReply, RequestError> {
        let guard = InFlightGuard::arm(&self.pending, &self.view);
        let result = self.api.send_message(request).await;
        guard.disarm();
        result
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// User-confirmed end; the returned notification is the caller's to send
    pub fn begin_end(&mut self) -> Option<EndRequest> {
        let session_id = self.active_session_id()?;
        self.enter_ended(EndReason::User);
        Some(EndRequest { session_id })
    }

    /// User-confirmed end, notifying the server best-effort
    pub async fn end_conversation(&mut self) -> bool {
        let Some(request) = self.begin_end() else {
            return false;
        };
        match self.api.end_conversation(&request).await {
            Ok(()) => debug!("Server notified of end of session {}", request.session_id),
            Err(e) => warn!("End notification failed (ignored): {}", e),
        }
        true
    }

    fn enter_ended(&mut self, reason: EndReason) {
        if !self.is_active() {
            return;
        }
        info!(
            "Conversation {} ended ({:?})",
            self.session.as_ref().map(|s| s.session_id.as_str()).unwrap_or_default(),
            reason
        );

        self.lifecycle = Lifecycle::Ended;
        if self.awaiting_retry.take().is_some() {
            self.view.clear_retry_offer();
        }
        self.retry_count = 0;
        self.view.set_input_enabled(false);
        self.push_turn(Turn::system(CONVERSATION_ENDED_MESSAGE));
        self.save_snapshot();

        self.view.offer_handoff(&self.feedback_url());
        if self.handoff.start(self.config.handoff_countdown_secs) {
            self.view.update_countdown(self.handoff.remaining());
        }
    }

    /// Advance the hand-off countdown by one second
    pub fn handoff_tick(&mut self) -> HandoffStep {
        match self.handoff.tick() {
            Tick::Inactive => HandoffStep::Idle,
            Tick::Remaining(seconds) => {
                self.view.update_countdown(Some(seconds));
                HandoffStep::Counting(seconds)
            }
            Tick::Elapsed => {
                self.navigate_to_feedback();
                HandoffStep::Navigated
            }
        }
    }

    /// Go to the feedback step without waiting
    pub fn handoff_now(&mut self) -> bool {
        if self.session.is_none() || self.lifecycle().is_active() {
            return false;
        }
        if !self.handoff.complete() {
            return false;
        }
        self.navigate_to_feedback();
        true
    }

    /// Stop the countdown; the hand-off offer stays available
    pub fn cancel_handoff(&mut self) -> bool {
        if !self.handoff.cancel() {
            return false;
        }
        info!("Automatic hand-off cancelled");
        self.view.update_countdown(None);
        true
    }

    fn navigate_to_feedback(&mut self) {
        self.save_snapshot();
        self.view.update_countdown(None);
        let url = self.feedback_url();
        info!("Handing off to {}", url);
        self.view.navigate(&url);
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Background snapshot; only while the conversation is active
    pub fn periodic_snapshot(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.save_snapshot();
        true
    }

    /// Snapshot before the page goes away, in either state
    pub fn before_unload(&self) {
        self.save_snapshot();
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.session.as_ref().map(|s| SessionSnapshot {
            session_id: s.session_id.clone(),
            domain: s.domain.clone(),
            model_type: s.model_type.clone(),
            turn_count: self.turn_number.saturating_sub(1),
            lifecycle: self.lifecycle(),
            saved_at: now_timestamp(),
        })
    }

    fn save_snapshot(&self) {
        if let Some(snapshot) = self.snapshot() {
            self.persistence.save_snapshot(&snapshot);
        }
    }

    fn push_turn(&mut self, turn: Turn) {
        self.view.append_turn(&turn);
        self.transcript.push(turn);
        if let Some(session) = &self.session {
            self.persistence
                .save_transcript(&session.session_id, &self.transcript);
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn active_session_id(&self) -> Option<String> {
        if !self.lifecycle.is_active() {
            return None;
        }
        self.session.as_ref().map(|s| s.session_id.clone())
    }

    fn reject(&self, error: ValidationError) -> ValidationError {
        debug!("Rejected locally: {:?}", error);
        self.notify(NoticeKind::Warning, &error.to_string());
        error
    }

    fn notify(&self, kind: NoticeKind, text: &str) {
        self.view
            .show_notice(&Notice::transient(kind, text, self.config.notice_duration));
    }
}

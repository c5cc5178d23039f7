use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use todsim_types::{ChatReply, Lifecycle, Sender, SessionFields, SessionSnapshot};

use super::fakes::{controller, fields, started, HangingApi, RecordingView, ScriptedApi, ViewEvent};
use crate::controller::{
    ChatController, ControllerConfig, HandoffStep, ResponseOutcome, CONVERSATION_ENDED_MESSAGE,
    INVALID_SESSION_MESSAGE, MAX_RETRIES_MESSAGE,
};
use crate::error::{RequestError, ValidationError};
use crate::handoff::Countdown;
use crate::ports::{KeyValueStore, NoticeKind, RetryOffer};
use crate::store::{MemoryStore, Persistence};

fn ok(message: &str) -> Result<ChatReply, RequestError> {
    Ok(ChatReply::success(message, false))
}

fn ending(message: &str) -> Result<ChatReply, RequestError> {
    Ok(ChatReply::success(message, true))
}

fn shape(turns: &[todsim_types::Turn]) -> Vec<(Option<u32>, Sender, String)> {
    turns
        .iter()
        .map(|t| (t.turn_number, t.sender, t.content.clone()))
        .collect()
}

// ----------------------------------------------------------------------
// Start-up
// ----------------------------------------------------------------------

#[test]
fn valid_session_starts_active_with_greeting() {
    let api = Rc::new(ScriptedApi::new(vec![]));
    let view = Rc::new(RecordingView::default());
    let store = Rc::new(MemoryStore::new());
    let mut ctrl = controller(&api, &view, &store);

    ctrl.initialize(&fields().with_greeting("Welcome to the hotel booking assistant."))
        .unwrap();

    assert_eq!(ctrl.lifecycle(), Lifecycle::Active);
    assert_eq!(ctrl.turn_number(), 1);
    assert_eq!(
        shape(ctrl.transcript()),
        vec![(None, Sender::Bot, "Welcome to the hotel booking assistant.".to_string())]
    );
    assert_eq!(view.input_enabled(), Some(true));
}

#[test]
fn missing_session_field_disables_chat() {
    let api = Rc::new(ScriptedApi::new(vec![ok("unused")]));
    let view = Rc::new(RecordingView::default());
    let store = Rc::new(MemoryStore::new());
    let mut ctrl = controller(&api, &view, &store);

    let fields = SessionFields {
        session_id: Some("abc123".to_string()),
        domain: Some("  ".to_string()),
        model_type: Some("bedrock".to_string()),
        greeting: None,
    };
    let err = ctrl.initialize(&fields).unwrap_err();

    assert_eq!(err.missing, vec!["domain"]);
    assert_eq!(ctrl.lifecycle(), Lifecycle::Ended);
    assert_eq!(view.input_enabled(), Some(false));
    let notice = view.notices().pop().unwrap();
    assert_eq!(notice.text, INVALID_SESSION_MESSAGE);
    assert!(notice.is_sticky());

    assert_eq!(ctrl.begin_submit("hello"), Err(ValidationError::Inactive));
    assert_eq!(api.calls(), 0);
    assert!(ctrl.transcript().is_empty());
    assert!(!ctrl.handoff_now());
}

#[test]
fn second_initialize_is_ignored() {
    let (mut ctrl, _api, _view, _store) = started(vec![]);
    let other = SessionFields::new("zzz", "flight", "grpotod");
    assert!(ctrl.initialize(&other).is_ok());
    assert_eq!(ctrl.session().unwrap().session_id, "abc123");
}

// ----------------------------------------------------------------------
// Round-trips
// ----------------------------------------------------------------------

#[tokio::test]
async fn successful_round_trip_appends_user_and_bot_turns() {
    let (mut ctrl, api, view, store) = started(vec![ok("Which city?")]);

    let outcome = ctrl.submit_user_message("Book a room for Friday").await.unwrap();

    assert_eq!(outcome, ResponseOutcome::Replied { conversation_ended: false });
    assert_eq!(
        api.sent.borrow()[0],
        todsim_types::ChatRequest {
            message: "Book a room for Friday".to_string(),
            session_id: "abc123".to_string(),
        }
    );
    assert_eq!(
        shape(ctrl.transcript()),
        vec![
            (Some(1), Sender::User, "Book a room for Friday".to_string()),
            (Some(1), Sender::Bot, "Which city?".to_string()),
        ]
    );
    assert_eq!(ctrl.turn_number(), 2);
    assert!(!ctrl.is_pending());
    assert_eq!(view.input_enabled(), Some(true));
    assert_eq!(view.composing(), Some(false));
    assert!(view.has(&ViewEvent::ClearInput));

    let stored = Persistence::new(Rc::clone(&store)).load_transcript("abc123");
    assert_eq!(stored, ctrl.transcript().to_vec());
}

#[tokio::test]
async fn message_is_trimmed_before_sending() {
    let (mut ctrl, api, _view, _store) = started(vec![ok("Sure.")]);
    ctrl.submit_user_message("  two nights \n").await.unwrap();
    assert_eq!(api.sent.borrow()[0].message, "two nights");
    assert_eq!(ctrl.transcript()[0].content, "two nights");
}

#[tokio::test]
async fn turn_numbers_increase_per_round_trip() {
    let (mut ctrl, _api, _view, _store) = started(vec![ok("a"), ok("b"), ok("c")]);
    for text in ["one", "two", "three"] {
        ctrl.submit_user_message(text).await.unwrap();
    }
    let numbers: Vec<_> = ctrl.transcript().iter().map(|t| t.turn_number).collect();
    assert_eq!(
        numbers,
        vec![Some(1), Some(1), Some(2), Some(2), Some(3), Some(3)]
    );
    assert_eq!(ctrl.turn_number(), 4);
}

#[tokio::test]
async fn empty_message_never_reaches_the_network() {
    let (mut ctrl, api, view, _store) = started(vec![ok("unused")]);

    for text in ["", "   ", "\n\t"] {
        assert_eq!(
            ctrl.submit_user_message(text).await,
            Err(ValidationError::Empty)
        );
    }

    assert_eq!(api.calls(), 0);
    assert!(ctrl.transcript().is_empty());
    let notice = view.notices().pop().unwrap();
    assert_eq!(notice.text, "Please enter a message.");
    assert_eq!(notice.kind, NoticeKind::Warning);
    assert!(!notice.is_sticky());
}

#[tokio::test]
async fn overlong_message_is_rejected() {
    let (mut ctrl, api, view, _store) = started(vec![ok("fine")]);

    let long = "x".repeat(1001);
    assert_eq!(
        ctrl.submit_user_message(&long).await,
        Err(ValidationError::TooLong { len: 1001, max: 1000 })
    );
    assert_eq!(api.calls(), 0);
    assert_eq!(
        view.last_notice_text().unwrap(),
        "Message is too long (max 1000 characters)."
    );

    let limit = "é".repeat(1000);
    assert!(ctrl.submit_user_message(&limit).await.is_ok());
    assert_eq!(api.calls(), 1);
}

#[test]
fn second_submit_while_pending_is_rejected() {
    let (mut ctrl, api, view, _store) = started(vec![]);

    let request = ctrl.begin_submit("first").unwrap();
    assert_eq!(request.message, "first");
    assert!(ctrl.is_pending());
    assert_eq!(view.input_enabled(), Some(false));
    assert_eq!(view.composing(), Some(true));

    assert_eq!(ctrl.begin_submit("second"), Err(ValidationError::RequestPending));
    assert_eq!(ctrl.transcript().len(), 1);
    assert_eq!(api.calls(), 0);

    ctrl.handle_response(ok("reply"));
    assert!(!ctrl.is_pending());
    assert!(ctrl.begin_submit("second").is_ok());
}

#[test]
fn stray_response_is_ignored() {
    let (mut ctrl, _api, _view, _store) = started(vec![]);
    assert_eq!(ctrl.handle_response(ok("late")), ResponseOutcome::Ignored);
    assert!(ctrl.transcript().is_empty());
}

// ----------------------------------------------------------------------
// Failures and retries
// ----------------------------------------------------------------------

#[tokio::test]
async fn timeout_offers_retry_without_consuming_turn() {
    let (mut ctrl, _api, view, _store) = started(vec![Err(RequestError::Timeout)]);

    let outcome = ctrl.submit_user_message("hello").await.unwrap();

    let offer = RetryOffer {
        attempt: 1,
        max_attempts: 3,
        reason: "Request timed out. Please try again.".to_string(),
    };
    assert_eq!(
        outcome,
        ResponseOutcome::RetryOffered {
            offer: offer.clone(),
            error: RequestError::Timeout,
        }
    );
    assert_eq!(offer.label(), "attempt 1 of 3");
    assert!(view.has(&ViewEvent::Retry(offer)));
    assert_eq!(
        view.last_notice_text().unwrap(),
        "Request timed out. Please try again."
    );
    assert_eq!(ctrl.turn_number(), 1);
    assert_eq!(ctrl.retry_count(), 1);
    assert!(ctrl.has_retry_offer());
    assert!(!ctrl.is_pending());
    assert_eq!(view.input_enabled(), Some(true));
    assert_eq!(shape(ctrl.transcript()), vec![(Some(1), Sender::User, "hello".to_string())]);
}

#[tokio::test]
async fn retry_resends_the_same_message() {
    let (mut ctrl, api, view, _store) =
        started(vec![Err(RequestError::Status(502)), ok("Got it.")]);

    ctrl.submit_user_message("hello").await.unwrap();
    let outcome = ctrl.retry().await.unwrap();

    assert_eq!(outcome, ResponseOutcome::Replied { conversation_ended: false });
    assert_eq!(api.calls(), 2);
    assert_eq!(api.sent.borrow()[1].message, "hello");
    assert!(view.has(&ViewEvent::ClearRetry));
    assert_eq!(
        shape(ctrl.transcript()),
        vec![
            (Some(1), Sender::User, "hello".to_string()),
            (Some(1), Sender::Bot, "Got it.".to_string()),
        ]
    );
    assert_eq!(ctrl.retry_count(), 0);
    assert_eq!(ctrl.turn_number(), 2);
}

#[tokio::test]
async fn gives_up_after_three_retries() {
    let failures = (0..4)
        .map(|_| Err(RequestError::Transport("connection refused".to_string())))
        .collect();
    let (mut ctrl, api, view, _store) = started(failures);

    let first = ctrl.submit_user_message("hello").await.unwrap();
    assert!(matches!(first, ResponseOutcome::RetryOffered { ref offer, .. } if offer.attempt == 1));
    for attempt in 2..=3 {
        let outcome = ctrl.retry().await.unwrap();
        assert!(
            matches!(outcome, ResponseOutcome::RetryOffered { ref offer, .. } if offer.attempt == attempt)
        );
    }

    let last = ctrl.retry().await.unwrap();
    assert!(matches!(last, ResponseOutcome::GaveUp(RequestError::Transport(_))));
    let notice = view.notices().pop().unwrap();
    assert_eq!(notice.text, MAX_RETRIES_MESSAGE);
    assert!(notice.is_sticky());

    assert_eq!(ctrl.retry().await, Err(ValidationError::NothingToRetry));
    assert_eq!(api.calls(), 4);
    assert_eq!(ctrl.retry_count(), 0);
    assert_eq!(ctrl.transcript().len(), 1);
    assert_eq!(ctrl.lifecycle(), Lifecycle::Active);
    assert_eq!(view.input_enabled(), Some(true));
}

#[tokio::test]
async fn application_error_uses_server_text() {
    let (mut ctrl, _api, view, _store) =
        started(vec![Ok(ChatReply::failure("Session not found or expired"))]);

    let outcome = ctrl.submit_user_message("hello").await.unwrap();

    assert!(matches!(
        outcome,
        ResponseOutcome::RetryOffered { error: RequestError::Application(ref msg), .. }
            if msg == "Session not found or expired"
    ));
    assert_eq!(
        view.last_notice_text().unwrap(),
        "Session not found or expired"
    );
}

#[tokio::test]
async fn success_without_message_is_malformed() {
    let reply = ChatReply {
        status: "success".to_string(),
        ..Default::default()
    };
    let (mut ctrl, _api, _view, _store) = started(vec![Ok(reply)]);

    let outcome = ctrl.submit_user_message("hello").await.unwrap();

    assert!(matches!(
        outcome,
        ResponseOutcome::RetryOffered { error: RequestError::Malformed(_), .. }
    ));
    assert_eq!(ctrl.turn_number(), 1);
}

#[tokio::test]
async fn cancel_retry_resets_the_budget() {
    let (mut ctrl, _api, view, _store) = started(vec![Err(RequestError::Timeout)]);

    ctrl.submit_user_message("hello").await.unwrap();
    assert!(ctrl.cancel_retry());
    assert!(!ctrl.cancel_retry());

    assert_eq!(ctrl.retry_count(), 0);
    assert!(view.has(&ViewEvent::ClearRetry));
    assert_eq!(ctrl.begin_retry(), Err(ValidationError::NothingToRetry));
}

#[tokio::test]
async fn new_message_supersedes_retry_offer() {
    let (mut ctrl, api, _view, _store) = started(vec![Err(RequestError::Timeout), ok("Yes.")]);

    ctrl.submit_user_message("first").await.unwrap();
    ctrl.submit_user_message("second").await.unwrap();

    assert_eq!(api.sent.borrow()[1].message, "second");
    assert!(!ctrl.has_retry_offer());
    assert_eq!(ctrl.retry_count(), 0);
    assert_eq!(
        shape(ctrl.transcript()),
        vec![
            (Some(1), Sender::User, "first".to_string()),
            (Some(1), Sender::User, "second".to_string()),
            (Some(1), Sender::Bot, "Yes.".to_string()),
        ]
    );
}

#[tokio::test]
async fn abandoned_request_releases_input() {
    let view = Rc::new(RecordingView::default());
    let mut ctrl = ChatController::new(
        HangingApi,
        Rc::clone(&view),
        MemoryStore::new(),
        ControllerConfig::default(),
    );
    ctrl.initialize(&fields()).unwrap();

    let result = tokio::time::timeout(
        Duration::from_millis(20),
        ctrl.submit_user_message("hello"),
    )
    .await;

    assert!(result.is_err());
    assert!(!ctrl.is_pending());
    assert_eq!(view.input_enabled(), Some(true));
    assert_eq!(view.composing(), Some(false));
}

// ----------------------------------------------------------------------
// Ending and hand-off
// ----------------------------------------------------------------------

#[tokio::test]
async fn server_end_starts_countdown_and_hands_off() {
    let (mut ctrl, _api, view, store) =
        started(vec![ok("Which city?"), ending("Your booking is confirmed.")]);

    ctrl.submit_user_message("Book a room").await.unwrap();
    let outcome = ctrl.submit_user_message("Paris, Friday").await.unwrap();

    assert_eq!(outcome, ResponseOutcome::Replied { conversation_ended: true });
    assert_eq!(ctrl.lifecycle(), Lifecycle::Ended);
    let last = ctrl.transcript().last().unwrap();
    assert_eq!(last.sender, Sender::System);
    assert_eq!(last.content, CONVERSATION_ENDED_MESSAGE);
    assert_eq!(view.input_enabled(), Some(false));
    assert!(view.has(&ViewEvent::Handoff("/feedback_form?session_id=abc123".to_string())));
    assert_eq!(ctrl.countdown(), Countdown::Running { remaining: 3 });

    assert_eq!(ctrl.handoff_tick(), HandoffStep::Counting(2));
    assert_eq!(ctrl.handoff_tick(), HandoffStep::Counting(1));
    assert_eq!(ctrl.handoff_tick(), HandoffStep::Navigated);
    assert_eq!(ctrl.handoff_tick(), HandoffStep::Idle);

    assert_eq!(view.countdowns(), vec![Some(3), Some(2), Some(1), None]);
    assert_eq!(view.navigations(), vec!["/feedback_form?session_id=abc123".to_string()]);

    let snapshot: SessionSnapshot =
        serde_json::from_str(&store.get("tod_state_abc123").unwrap()).unwrap();
    assert_eq!(snapshot.lifecycle, Lifecycle::Ended);
    assert_eq!(snapshot.turn_count, 2);
    assert_eq!(snapshot.domain, "hotel");
}

#[tokio::test]
async fn cancelled_countdown_never_navigates() {
    let (mut ctrl, _api, view, _store) = started(vec![ending("Goodbye.")]);
    ctrl.submit_user_message("that's all").await.unwrap();

    ctrl.handoff_tick();
    assert!(ctrl.cancel_handoff());
    for _ in 0..5 {
        assert_eq!(ctrl.handoff_tick(), HandoffStep::Idle);
    }
    assert!(view.navigations().is_empty());

    assert!(ctrl.handoff_now());
    assert!(!ctrl.handoff_now());
    assert_eq!(view.navigations().len(), 1);
}

#[tokio::test]
async fn unrelated_input_leaves_countdown_running() {
    let (mut ctrl, _api, _view, _store) = started(vec![ending("Goodbye.")]);
    ctrl.submit_user_message("done").await.unwrap();

    assert_eq!(ctrl.submit_user_message("wait").await, Err(ValidationError::Inactive));
    assert_eq!(ctrl.begin_retry(), Err(ValidationError::Inactive));
    assert!(!ctrl.cancel_retry());

    assert_eq!(ctrl.countdown(), Countdown::Running { remaining: 3 });
}

#[tokio::test]
async fn user_end_notifies_server() {
    let (mut ctrl, api, view, _store) = started(vec![ok("Hi!")]);
    ctrl.submit_user_message("hello").await.unwrap();

    assert!(ctrl.end_conversation().await);

    assert_eq!(api.ended.borrow()[0].session_id, "abc123");
    assert_eq!(ctrl.lifecycle(), Lifecycle::Ended);
    assert_eq!(view.input_enabled(), Some(false));
    assert_eq!(ctrl.countdown(), Countdown::Running { remaining: 3 });

    assert!(!ctrl.end_conversation().await);
    assert_eq!(api.ended.borrow().len(), 1);
}

#[tokio::test]
async fn failed_end_notification_still_ends() {
    let (mut ctrl, api, _view, _store) = started(vec![]);
    api.end_fails.set(true);

    assert!(ctrl.end_conversation().await);
    assert_eq!(ctrl.lifecycle(), Lifecycle::Ended);
}

#[test]
fn reply_after_user_end_is_discarded() {
    let (mut ctrl, _api, view, _store) = started(vec![]);

    ctrl.begin_submit("hello").unwrap();
    let end = ctrl.begin_end().unwrap();
    assert_eq!(end.session_id, "abc123");

    assert_eq!(ctrl.handle_response(ok("too late")), ResponseOutcome::Ignored);
    assert!(!ctrl.is_pending());
    assert!(ctrl.transcript().iter().all(|t| t.content != "too late"));
    assert_eq!(view.input_enabled(), Some(false));
    assert_eq!(ctrl.lifecycle(), Lifecycle::Ended);
}

#[tokio::test]
async fn ended_conversation_never_reactivates() {
    let (mut ctrl, _api, _view, _store) = started(vec![ending("Bye."), ok("unused")]);
    ctrl.submit_user_message("bye").await.unwrap();

    assert!(ctrl.initialize(&fields()).is_ok());
    assert_eq!(ctrl.recover(), 0);
    assert!(ctrl.begin_end().is_none());
    assert!(ctrl.submit_user_message("again").await.is_err());
    assert_eq!(ctrl.lifecycle(), Lifecycle::Ended);
}

#[test]
fn feedback_url_encodes_session_id() {
    let config = ControllerConfig::default().with_feedback_path("https://tod.example/feedback_form");
    assert_eq!(
        config.feedback_url("a b/c"),
        "https://tod.example/feedback_form?session_id=a%20b%2Fc"
    );
}

// ----------------------------------------------------------------------
// Persistence and recovery
// ----------------------------------------------------------------------

#[tokio::test]
async fn reload_restores_transcript_and_turn_counter() {
    let (mut first, _api, _view, store) = started(vec![ok("Which city?")]);
    first.submit_user_message("Book a room").await.unwrap();
    let saved = first.transcript().to_vec();
    drop(first);

    let api = Rc::new(ScriptedApi::new(vec![ok("Paris it is.")]));
    let view = Rc::new(RecordingView::default());
    let mut second = controller(&api, &view, &store);
    second
        .initialize(&fields().with_greeting("Welcome!"))
        .unwrap();

    assert_eq!(view.turns(), saved);
    assert_eq!(second.transcript(), saved.as_slice());
    assert_eq!(second.turn_number(), 2);
    assert_eq!(second.recover(), 0);
    assert_eq!(view.turns().len(), 2);

    second.submit_user_message("Paris").await.unwrap();
    assert_eq!(second.transcript()[2].turn_number, Some(2));
}

#[tokio::test]
async fn reload_of_ended_session_stays_ended() {
    let (mut first, _api, _view, store) = started(vec![ending("Goodbye.")]);
    first.submit_user_message("done").await.unwrap();
    drop(first);

    let api = Rc::new(ScriptedApi::new(vec![]));
    let view = Rc::new(RecordingView::default());
    let mut second = controller(&api, &view, &store);
    second.initialize(&fields()).unwrap();

    assert_eq!(second.lifecycle(), Lifecycle::Ended);
    assert_eq!(view.input_enabled(), Some(false));
    assert!(view.has(&ViewEvent::Handoff("/feedback_form?session_id=abc123".to_string())));
    assert!(view.navigations().is_empty());
    assert!(second.handoff_now());
}

#[test]
fn corrupt_storage_starts_fresh() {
    let store = Rc::new(MemoryStore::new());
    store.insert("tod_messages_abc123", "not json");
    let api = Rc::new(ScriptedApi::new(vec![]));
    let view = Rc::new(RecordingView::default());
    let mut ctrl = controller(&api, &view, &store);

    ctrl.initialize(&fields()).unwrap();

    assert!(ctrl.transcript().is_empty());
    assert_eq!(ctrl.turn_number(), 1);
    assert_eq!(ctrl.lifecycle(), Lifecycle::Active);
}

#[test]
fn out_of_range_turn_count_is_ignored() {
    let store = Rc::new(MemoryStore::new());
    store.insert(
        "tod_state_abc123",
        r#"{"session_id":"abc123","domain":"hotel","model_type":"bedrock","turn_count":4294967295,"lifecycle":"ended","saved_at":"2024-05-01T10:00:00.000Z"}"#,
    );
    let api = Rc::new(ScriptedApi::new(vec![]));
    let view = Rc::new(RecordingView::default());
    let mut ctrl = controller(&api, &view, &store);

    ctrl.initialize(&fields()).unwrap();

    assert_eq!(ctrl.turn_number(), 1);
    assert_eq!(ctrl.lifecycle(), Lifecycle::Active);
}

#[test]
fn out_of_range_bot_turn_number_restarts_numbering() {
    let store = Rc::new(MemoryStore::new());
    store.insert(
        "tod_messages_abc123",
        r#"[{"turn_number":4294967295,"sender":"bot","content":"hi","timestamp":"2024-05-01T10:00:00.000Z"}]"#,
    );
    let api = Rc::new(ScriptedApi::new(vec![]));
    let view = Rc::new(RecordingView::default());
    let mut ctrl = controller(&api, &view, &store);

    ctrl.initialize(&fields()).unwrap();

    assert_eq!(ctrl.transcript().len(), 1);
    assert_eq!(ctrl.turn_number(), 1);
}

#[test]
fn periodic_snapshot_only_while_active() {
    let (mut ctrl, _api, _view, store) = started(vec![]);

    assert!(ctrl.periodic_snapshot());
    let snapshot: SessionSnapshot =
        serde_json::from_str(&store.load("tod_state_abc123").unwrap().unwrap()).unwrap();
    assert_eq!(snapshot.lifecycle, Lifecycle::Active);
    assert_eq!(snapshot.turn_count, 0);

    ctrl.begin_end();
    assert!(!ctrl.periodic_snapshot());
    ctrl.before_unload();
    let snapshot = ctrl.snapshot().unwrap();
    assert_eq!(snapshot.lifecycle, Lifecycle::Ended);
}

#[tokio::test]
async fn storage_failure_does_not_interrupt_chat() {
    struct FullStore;

    impl KeyValueStore for FullStore {
        fn save(&self, _key: &str, _value: &str) -> Result<(), crate::error::StoreError> {
            Err(crate::error::StoreError::QuotaExceeded)
        }

        fn load(&self, _key: &str) -> Result<Option<String>, crate::error::StoreError> {
            Ok(None)
        }
    }

    let api = Rc::new(ScriptedApi::new(vec![ok("Hello!")]));
    let view = Rc::new(RecordingView::default());
    let mut ctrl = ChatController::new(api, Rc::clone(&view), FullStore, ControllerConfig::default());
    ctrl.initialize(&fields()).unwrap();

    let outcome = ctrl.submit_user_message("hi").await.unwrap();

    assert_eq!(outcome, ResponseOutcome::Replied { conversation_ended: false });
    assert_eq!(ctrl.transcript().len(), 2);
    assert!(view.notices().is_empty());
}

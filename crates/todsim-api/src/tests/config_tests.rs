use std::time::Duration;

use pretty_assertions::assert_eq;

use crate::config::{normalize_base_url, ClientConfig, DEFAULT_BASE_URL};

#[test]
fn test_normalize_strips_trailing_slashes() {
    assert_eq!(normalize_base_url("https://tod.example.org//"), "https://tod.example.org");
    assert_eq!(normalize_base_url("  http://localhost:5000/ "), "http://localhost:5000");
}

#[test]
fn test_normalize_adds_scheme() {
    assert_eq!(normalize_base_url("localhost:8080"), "http://localhost:8080");
}

#[test]
fn test_normalize_empty_falls_back_to_default() {
    assert_eq!(normalize_base_url(""), DEFAULT_BASE_URL);
    assert_eq!(normalize_base_url("/"), DEFAULT_BASE_URL);
}

#[test]
fn test_endpoint_urls() {
    let config = ClientConfig::new("https://tod.example.org/");
    assert_eq!(config.message_url(), "https://tod.example.org/tod_chat_message");
    assert_eq!(config.end_url(), "https://tod.example.org/end_tod_conversation");
    assert_eq!(config.feedback_form_url(), "https://tod.example.org/feedback_form");
    assert_eq!(config.feedback_submit_url(), "https://tod.example.org/submit_feedback");
}

#[test]
fn test_default_timeout_is_thirty_seconds() {
    assert_eq!(ClientConfig::default().timeout, Duration::from_secs(30));
    let short = ClientConfig::default().with_timeout(Duration::from_millis(200));
    assert_eq!(short.timeout, Duration::from_millis(200));
}

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock TOD server for exercising the HTTP client
pub struct TodMockServer {
    server: MockServer,
}

impl TodMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Reply to a specific message with a successful bot turn
    pub async fn mock_reply(&self, session_id: &str, message: &str, reply: &str, ended: bool) {
        Mock::given(method("POST"))
            .and(path("/tod_chat_message"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "message": message,
                "session_id": session_id
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "message": reply,
                "conversation_ended": ended,
                "turn_count": 1,
                "model_type": "bedrock",
                "domain": "hotel"
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_message_response(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/tod_chat_message"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_raw_message_body(&self, body: &str) {
        Mock::given(method("POST"))
            .and(path("/tod_chat_message"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_slow_reply(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/tod_chat_message"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "success", "message": "too late"}))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mock_end(&self, session_id: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path("/end_tod_conversation"))
            .and(body_json(json!({ "session_id": session_id })))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_feedback(&self, expected_fields: &[&str], body: Value) {
        let mut mock = Mock::given(method("POST"))
            .and(path("/submit_feedback"))
            .and(header("content-type", "application/x-www-form-urlencoded"));
        for field in expected_fields {
            mock = mock.and(body_string_contains(*field));
        }
        mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }
}

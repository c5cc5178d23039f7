use std::future::Future;

use async_trait::async_trait;
use futures::future::{select, Either};
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use todsim_chat::{ConversationApi, RequestError};
use todsim_types::{ChatReply, ChatRequest, EndRequest, FeedbackForm, FeedbackReply, REQUEST_TIMEOUT_SECS};
use web_sys::AbortController;

use crate::utils;

const MESSAGE_PATH: &str = "/tod_chat_message";
const END_PATH: &str = "/end_tod_conversation";
const FEEDBACK_SUBMIT_PATH: &str = "/submit_feedback";

enum Body {
    Json(String),
    Form(String),
}

/// A fully read response
struct Reply {
    status: u16,
    ok: bool,
    body: String,
}

impl Reply {
    fn success(&self) -> Result<(), RequestError> {
        if !self.ok {
            log::debug!("HTTP {} body: {}", self.status, self.body);
            return Err(RequestError::Status(self.status));
        }
        Ok(())
    }

    fn json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        self.success()?;
        serde_json::from_str(&self.body).map_err(|e| RequestError::Malformed(e.to_string()))
    }
}

/// fetch-backed client; every request is aborted after `timeout_ms`
#[derive(Debug, Clone)]
pub struct FetchClient {
    base_url: String,
    timeout_ms: u32,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new("")
    }
}

impl FetchClient {
    /// Empty `base_url` targets the page's own origin
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms: (REQUEST_TIMEOUT_SECS * 1000) as u32,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn submit_feedback(&self, form: &FeedbackForm) -> Result<FeedbackReply, RequestError> {
        let body = utils::form_encode(&form.form_fields());
        self.post(&self.url(FEEDBACK_SUBMIT_PATH), Body::Form(body))
            .await?
            .json()
    }

    /// Send and read the whole body; the timeout covers both
    async fn post(&self, url: &str, body: Body) -> Result<Reply, RequestError> {
        log::debug!("POST {}", url);
        let controller = AbortController::new().map_err(js_error)?;
        let builder = Request::post(url).abort_signal(Some(&controller.signal()));
        let request = match body {
            Body::Json(json) => with_body(builder, "application/json", json),
            Body::Form(form) => with_body(builder, "application/x-www-form-urlencoded", form),
        }?;

        let exchange = async move {
            let response = request
                .send()
                .await
                .map_err(|e| RequestError::Transport(e.to_string()))?;
            read_reply(response).await
        };
        let result = within(exchange, TimeoutFuture::new(self.timeout_ms)).await;
        if matches!(result, Err(RequestError::Timeout)) {
            log::warn!("Request to {} timed out after {} ms", url, self.timeout_ms);
            controller.abort();
        }
        result
    }

    async fn post_json<T: serde::Serialize>(&self, path: &str, body: &T) -> Result<Reply, RequestError> {
        let json = serde_json::to_string(body).map_err(|e| RequestError::Transport(e.to_string()))?;
        self.post(&self.url(path), Body::Json(json)).await
    }
}

#[async_trait(?Send)]
impl ConversationApi for FetchClient {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply, RequestError> {
        self.post_json(MESSAGE_PATH, request).await?.json()
    }

    async fn end_conversation(&self, request: &EndRequest) -> Result<(), RequestError> {
        self.post_json(END_PATH, request).await?.success()
    }
}

fn with_body(builder: RequestBuilder, content_type: &str, body: String) -> Result<Request, RequestError> {
    builder
        .header("Content-Type", content_type)
        .body(body)
        .map_err(|e| RequestError::Transport(e.to_string()))
}

async fn read_reply(response: Response) -> Result<Reply, RequestError> {
    let status = response.status();
    let ok = response.ok();
    let body = response
        .text()
        .await
        .map_err(|e| RequestError::Transport(e.to_string()))?;
    Ok(Reply { status, ok, body })
}

/// Run `exchange` unless `deadline` fires first
async fn within<T, E, D>(exchange: E, deadline: D) -> Result<T, RequestError>
where
    E: Future<Output = Result<T, RequestError>>,
    D: Future<Output = ()>,
{
    match select(Box::pin(exchange), Box::pin(deadline)).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(RequestError::Timeout),
    }
}

fn js_error(e: wasm_bindgen::JsValue) -> RequestError {
    RequestError::Transport(format!("{:?}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future::{pending, ready};

    #[test]
    fn deadline_covers_a_stalled_body() {
        let exchange = async {
            // headers arrive, the body never does
            ready(()).await;
            pending::<Result<Reply, RequestError>>().await
        };
        let result = block_on(within(exchange, ready(())));
        assert!(matches!(result, Err(RequestError::Timeout)));
    }

    #[test]
    fn completed_exchange_wins() {
        let exchange = async {
            Ok(Reply {
                status: 200,
                ok: true,
                body: r#"{"status":"success","message":"Hi"}"#.to_string(),
            })
        };
        let reply = block_on(within(exchange, pending::<()>())).unwrap();
        let chat: ChatReply = reply.json().unwrap();
        assert_eq!(chat.message.as_deref(), Some("Hi"));
    }

    #[test]
    fn error_status_is_reported_before_parsing() {
        let reply = Reply {
            status: 503,
            ok: false,
            body: "<html>busy</html>".to_string(),
        };
        assert_eq!(reply.json::<ChatReply>().unwrap_err(), RequestError::Status(503));
        assert!(matches!(
            Reply { status: 200, ok: true, body: "nope".to_string() }.json::<ChatReply>(),
            Err(RequestError::Malformed(_))
        ));
    }
}

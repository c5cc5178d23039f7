use async_trait::async_trait;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use todsim_chat::{ConversationApi, RequestError};
use todsim_types::{ChatReply, ChatRequest, EndRequest, FeedbackForm, FeedbackReply};

use crate::config::ClientConfig;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// reqwest-backed client for the conversation, end and feedback endpoints
#[derive(Debug, Clone)]
pub struct HttpConversationClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HttpConversationClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit the questionnaire as a form post
    pub async fn submit_feedback(&self, form: &FeedbackForm) -> Result<FeedbackReply, RequestError> {
        let response = self
            .client
            .post(self.config.feedback_submit_url())
            .form(&form.form_fields())
            .send()
            .await
            .map_err(transport_error)?;

        let reply: FeedbackReply = read_json(response).await?;
        if !reply.is_success() {
            warn!(
                "Feedback for {} rejected: {}",
                form.session_id,
                reply.error.as_deref().unwrap_or("no reason given")
            );
        }
        Ok(reply)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, url: String, body: &B) -> Result<reqwest::Response, RequestError> {
        debug!("POST {}", url);
        self.client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(transport_error)
    }
}

#[async_trait(?Send)]
impl ConversationApi for HttpConversationClient {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply, RequestError> {
        let response = self.post_json(self.config.message_url(), request).await?;
        read_json(response).await
    }

    async fn end_conversation(&self, request: &EndRequest) -> Result<(), RequestError> {
        let response = self.post_json(self.config.end_url(), request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status(status.as_u16()));
        }
        Ok(())
    }
}

fn transport_error(e: reqwest::Error) -> RequestError {
    if e.is_timeout() {
        RequestError::Timeout
    } else {
        RequestError::Transport(e.to_string())
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RequestError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;
    if !status.is_success() {
        debug!("HTTP {} body: {}", status, body);
        return Err(RequestError::Status(status.as_u16()));
    }
    serde_json::from_str(&body).map_err(|e| RequestError::Malformed(e.to_string()))
}

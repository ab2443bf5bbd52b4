//! Remote chat service client.
//!
//! The service contract is a single `POST {"message": <string>}` returning a
//! loosely-typed JSON object. Bodies are handed back untyped; the
//! [`ReplyNormalizer`](crate::ReplyNormalizer) decides what is usable.

use std::time::Duration;

use async_trait::async_trait;
use parley_core::config::ServiceConfig;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;

use crate::error::ChatError;

/// A backend that answers chat messages.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send one message and return the raw response body.
    async fn send_message(&self, message: &str) -> Result<Value, ChatError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// [`ChatService`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpChatService {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpChatService {
    /// Build a client for the configured endpoint.
    ///
    /// Only `http://` and `https://` endpoints are accepted.
    pub fn new(config: &ServiceConfig) -> Result<Self, ChatError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| ChatError::InvalidEndpoint(format!("{}: {}", config.endpoint, e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ChatError::InvalidEndpoint(format!(
                "unsupported scheme, only http:// and https:// are allowed, got: {}",
                config.endpoint
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint,
            timeout: config.timeout(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn map_error(&self, err: reqwest::Error) -> ChatError {
        if err.is_timeout() {
            ChatError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn send_message(&self, message: &str) -> Result<Value, ChatError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| self.map_error(e))?
            .error_for_status()
            .map_err(|e| self.map_error(e))?;

        let bytes = response.bytes().await.map_err(|e| self.map_error(e))?;

        // A non-JSON body is a malformed reply, not a transport failure.
        Ok(serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::debug!(error = %e, len = bytes.len(), "response body is not JSON");
            Value::Null
        }))
    }
}

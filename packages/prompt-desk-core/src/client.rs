//! HTTP client for the chat backend

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::attachment::Attachment;
use crate::transport::ChatTransport;
use crate::types::{ChatResponse, NewChatResponse, PromptRequest};
use crate::{Error, Result};

/// Why a request failed. Only ever logged; callers see [`Error`].
#[derive(Debug, thiserror::Error)]
enum TransportError {
    #[error("could not build request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

type TransportResult<T> = std::result::Result<T, TransportError>;

/// HTTP client for the chat backend
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
    client: Client,
}

impl ChatClient {
    /// Create a new client with the given base URL
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Internal HTTP Methods
    // ========================================================================

    /// Send a request and decode a JSON body from a successful response
    async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> TransportResult<T> {
        let response = request.send().await.map_err(TransportError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Api(
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.as_str().to_string()),
            ));
        }

        response.json().await.map_err(TransportError::Decode)
    }

    async fn post_prompt(&self, content: &str) -> TransportResult<ChatResponse> {
        let body = PromptRequest {
            message: content.to_string(),
        };
        Self::execute(self.client.post(self.url("/api/chat/prompt")).json(&body)).await
    }

    async fn post_prompt_with_file(
        &self,
        content: &str,
        attachment: Attachment,
        user_id: Option<&str>,
        session_id: Option<&str>,
    ) -> TransportResult<ChatResponse> {
        let part = Part::bytes(attachment.bytes)
            .file_name(attachment.file_name)
            .mime_str(&attachment.mime_type)
            .map_err(TransportError::Request)?;
        let form = Form::new().text("message", content.to_string()).part("file", part);

        let mut request = self.client.post(self.url("/api/chat/prompt-with-file"));
        let query = file_prompt_query(user_id, session_id);
        if !query.is_empty() {
            request = request.query(&query);
        }

        Self::execute(request.multipart(form)).await
    }

    async fn post_new_chat(&self) -> TransportResult<NewChatResponse> {
        Self::execute(self.client.post(self.url("/api/chat/new"))).await
    }

    // ========================================================================
    // Health API
    // ========================================================================

    /// Check if the backend is reachable and healthy
    pub async fn health(&self) -> bool {
        match self.client.get(self.url("/api/chat/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Health check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl ChatTransport for ChatClient {
    async fn send_text(&self, content: &str) -> Result<ChatResponse> {
        self.post_prompt(content).await.map_err(|e| {
            tracing::error!("Error sending message: {}", e);
            Error::SendFailed
        })
    }

    async fn send_with_attachment(
        &self,
        content: &str,
        attachment: Attachment,
        user_id: Option<&str>,
        session_id: Option<&str>,
    ) -> Result<ChatResponse> {
        let file_name = attachment.file_name.clone();
        self.post_prompt_with_file(content, attachment, user_id, session_id)
            .await
            .map_err(|e| {
                tracing::error!("Error sending message with file {}: {}", file_name, e);
                Error::SendWithFileFailed
            })
    }

    async fn create_session(&self) -> Result<NewChatResponse> {
        self.post_new_chat().await.map_err(|e| {
            tracing::error!("Error creating new chat: {}", e);
            Error::NewChatFailed
        })
    }
}

/// Query pairs for the file prompt endpoint: `userId` then `conversationId`,
/// each only when non-empty.
fn file_prompt_query<'a>(
    user_id: Option<&'a str>,
    session_id: Option<&'a str>,
) -> Vec<(&'static str, &'a str)> {
    [("userId", user_id), ("conversationId", session_id)]
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ChatClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api/chat/new"), "http://localhost:8080/api/chat/new");
    }

    #[test]
    fn test_query_order_and_presence() {
        assert_eq!(
            file_prompt_query(Some("u1"), Some("c1")),
            vec![("userId", "u1"), ("conversationId", "c1")]
        );
        assert_eq!(file_prompt_query(None, Some("c1")), vec![("conversationId", "c1")]);
        assert_eq!(file_prompt_query(Some(""), None), Vec::<(&str, &str)>::new());
    }
}

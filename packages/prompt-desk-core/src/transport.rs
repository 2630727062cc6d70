//! The seam between the conversation and the chat backend.

use async_trait::async_trait;

use crate::attachment::Attachment;
use crate::types::{ChatResponse, NewChatResponse};
use crate::Result;

/// The three calls the conversation makes to the chat backend.
///
/// Implementations must collapse every failure into the fixed, per-operation
/// [`crate::Error`] variant and log the underlying cause themselves.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a plain text prompt.
    async fn send_text(&self, content: &str) -> Result<ChatResponse>;

    /// Send a prompt with exactly one file. `user_id` and `session_id` are
    /// forwarded only when present.
    async fn send_with_attachment(
        &self,
        content: &str,
        attachment: Attachment,
        user_id: Option<&str>,
        session_id: Option<&str>,
    ) -> Result<ChatResponse>;

    /// Ask the backend for a new conversation.
    async fn create_session(&self) -> Result<NewChatResponse>;
}

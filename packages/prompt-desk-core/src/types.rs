//! Core data types for the conversation and the chat API wire format.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::generate_message_id;

/// Who authored a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn in the conversation.
///
/// Fields are private: once built, a message never changes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Message {
    id: String,
    content: String,
    sender: Sender,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message with an explicit id and timestamp.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        sender: Sender,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            sender,
            timestamp,
        }
    }

    /// A user message with a fresh client-side id, stamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(generate_message_id(), content, Sender::User, Utc::now())
    }

    /// A synthetic assistant message reporting a failed send.
    pub fn error(text: &str) -> Self {
        Self::new(
            generate_message_id(),
            format!("Error: {}", text),
            Sender::Assistant,
            Utc::now(),
        )
    }

    /// The assistant reply described by a server response.
    ///
    /// Only `messageId`, `content` and `timestamp` are used.
    pub fn from_response(response: &ChatResponse) -> Self {
        Self::new(
            response.message_id.clone(),
            response.content.clone(),
            Sender::Assistant,
            parse_server_timestamp(&response.timestamp),
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Body of `POST /api/chat/prompt`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptRequest {
    pub message: String,
}

/// Response body of both prompt endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub conversation_id: String,
    pub user_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,
    pub error: Option<String>,
}

/// The backend writes unset fields as `null`; read those as the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response body of `POST /api/chat/new`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewChatResponse {
    pub chat_id: String,
}

/// JSON envelope printed by the command line tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Parse the server's timestamp.
///
/// The backend emits either an RFC 3339 instant or a local date-time with no
/// offset; the latter is read as UTC. Anything else falls back to now.
pub fn parse_server_timestamp(raw: &str) -> DateTime<Utc> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc();
    }
    tracing::warn!("Unparseable server timestamp {:?}, using receive time", raw);
    Utc::now()
}

//! Prompt Desk Core - conversation state and backend transport.
//!
//! This crate holds everything the Prompt Desk chat client does apart from
//! drawing pixels:
//!
//! - **Message store**: the ordered, append-only conversation history
//! - **Transport**: the three chat API calls, with failures collapsed into
//!   fixed user-facing messages
//! - **Conversation**: the Idle/Sending state machine that drives a send and
//!   records its outcome
//! - **Configuration**: base URL and user id resolution
//!
//! # Example
//!
//! ```rust,no_run
//! use prompt_desk_core::{ChatClient, Config, Conversation};
//!
//! # async fn run() -> prompt_desk_core::Result<()> {
//! let config = Config::load()?;
//! let client = ChatClient::new(&config.base_url);
//! let mut conversation = Conversation::new(Some(config.user_id.clone()));
//!
//! conversation.send(&client, "Hello", None).await;
//! for message in conversation.messages() {
//!     println!("{}: {}", message.sender(), message.content());
//! }
//! # Ok(())
//! # }
//! ```

pub mod attachment;
pub mod client;
pub mod config;
pub mod conversation;
pub mod ids;
pub mod store;
pub mod transport;
pub mod types;

pub use attachment::{Attachment, PendingAttachment};
pub use client::ChatClient;
pub use config::Config;
pub use conversation::{
    Conversation, ConversationState, OutgoingMessage, SendOutcome, SendRejected, Session,
};
pub use ids::generate_message_id;
pub use store::MessageStore;
pub use transport::ChatTransport;
pub use types::{ApiResponse, ChatResponse, Message, NewChatResponse, PromptRequest, Sender};

/// Fixed user-facing text for a failed text send.
pub const SEND_FAILED: &str = "Failed to send message. Please try again.";
/// Fixed user-facing text for a failed send with an attachment.
pub const SEND_WITH_FILE_FAILED: &str = "Failed to send message with file. Please try again.";
/// Fixed user-facing text for a failed session creation.
pub const NEW_CHAT_FAILED: &str = "Failed to create new chat. Please try again.";
/// Fixed user-facing text for an attachment that could not be read.
pub const ATTACHMENT_FAILED: &str = "Failed to read attachment. Please try again.";

/// Error types for prompt-desk-core operations.
///
/// The `Display` text of the transport variants is the exact message shown
/// to the user; the underlying cause is logged where it happens and dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{}", SEND_FAILED)]
    SendFailed,

    #[error("{}", SEND_WITH_FILE_FAILED)]
    SendWithFileFailed,

    #[error("{}", NEW_CHAT_FAILED)]
    NewChatFailed,

    #[error("{}", ATTACHMENT_FAILED)]
    Attachment,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for prompt-desk-core operations.
pub type Result<T> = std::result::Result<T, Error>;

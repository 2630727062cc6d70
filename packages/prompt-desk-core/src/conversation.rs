//! Conversation controller: the send state machine and its history.
//!
//! A send goes through three steps:
//!
//! 1. [`Conversation::begin_send`] validates the text, appends the user
//!    message and moves to [`ConversationState::Sending`].
//! 2. [`OutgoingMessage::dispatch`] performs the network call. It borrows
//!    nothing from the conversation, so it can run on another executor.
//! 3. [`Conversation::finish_send`] appends the reply (or the error) and
//!    returns to [`ConversationState::Idle`].
//!
//! [`Conversation::send`] runs all three in one call.

use crate::attachment::Attachment;
use crate::store::MessageStore;
use crate::transport::ChatTransport;
use crate::types::{ChatResponse, Message, NewChatResponse};
use crate::{Error, Result};

/// Whether a send is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    Sending,
}

/// Why a send request was dropped without touching any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendRejected {
    #[error("message is blank")]
    Blank,

    #[error("a message is already being sent")]
    Busy,
}

/// Backend conversation context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub conversation_id: Option<String>,
    pub user_id: Option<String>,
}

/// Result of a complete send cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Nothing happened.
    Rejected(SendRejected),
    /// The assistant replied; carries the appended reply.
    Delivered(Message),
    /// The call failed; carries the error now shown in the banner.
    Failed(Error),
}

/// A send that has been accepted and is waiting for the network.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    content: String,
    user_id: Option<String>,
    session_id: Option<String>,
}

impl OutgoingMessage {
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Perform the call: with an attachment the file endpoint is used,
    /// otherwise the plain text one.
    pub async fn dispatch<T>(
        &self,
        transport: &T,
        attachment: Option<Attachment>,
    ) -> Result<ChatResponse>
    where
        T: ChatTransport + ?Sized,
    {
        match attachment {
            Some(attachment) => {
                transport
                    .send_with_attachment(
                        &self.content,
                        attachment,
                        self.user_id.as_deref(),
                        self.session_id.as_deref(),
                    )
                    .await
            }
            None => transport.send_text(&self.content).await,
        }
    }
}

/// The single conversation shown in the window.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    store: MessageStore,
    state: ConversationState,
    error: Option<String>,
    session: Session,
}

impl Conversation {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            session: Session {
                conversation_id: None,
                user_id,
            },
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.state == ConversationState::Sending
    }

    /// Text of the error banner, if one is showing.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_session_id(&mut self, conversation_id: Option<String>) {
        self.session.conversation_id = conversation_id;
    }

    // ========================================================================
    // Send protocol
    // ========================================================================

    /// Accept a send: append the user message and enter `Sending`.
    ///
    /// Blankness is judged on the trimmed text but the message keeps the
    /// text exactly as typed.
    pub fn begin_send(&mut self, text: &str) -> std::result::Result<OutgoingMessage, SendRejected> {
        if text.trim().is_empty() {
            return Err(SendRejected::Blank);
        }
        if self.is_sending() {
            tracing::debug!("Dropping send while another is in flight");
            return Err(SendRejected::Busy);
        }

        self.error = None;
        self.store.append(Message::user(text));
        self.state = ConversationState::Sending;

        Ok(OutgoingMessage {
            content: text.to_string(),
            user_id: self.session.user_id.clone(),
            session_id: self.session.conversation_id.clone(),
        })
    }

    /// Record the result of a dispatched send and return to `Idle`.
    pub fn finish_send(&mut self, result: Result<ChatResponse>) -> SendOutcome {
        if !self.is_sending() {
            tracing::warn!("Send completed while idle");
        }

        let outcome = match result {
            Ok(response) => {
                if self.session.conversation_id.is_none() && !response.conversation_id.is_empty() {
                    tracing::debug!("Conversation id assigned: {}", response.conversation_id);
                    self.session.conversation_id = Some(response.conversation_id.clone());
                }

                let reply = Message::from_response(&response);
                self.store.append(reply.clone());
                SendOutcome::Delivered(reply)
            }
            Err(error) => {
                let text = error.to_string();
                self.error = Some(text.clone());
                self.store.append(Message::error(&text));
                SendOutcome::Failed(error)
            }
        };

        self.state = ConversationState::Idle;
        outcome
    }

    /// Run a full send cycle against `transport`.
    pub async fn send<T>(
        &mut self,
        transport: &T,
        text: &str,
        attachment: Option<Attachment>,
    ) -> SendOutcome
    where
        T: ChatTransport + ?Sized,
    {
        let outgoing = match self.begin_send(text) {
            Ok(outgoing) => outgoing,
            Err(rejected) => return SendOutcome::Rejected(rejected),
        };
        let result = outgoing.dispatch(transport, attachment).await;
        self.finish_send(result)
    }

    // ========================================================================
    // Conversation lifecycle
    // ========================================================================

    /// Start over: empty history, no banner. The session id is kept.
    pub fn new_chat(&mut self) {
        self.store.clear();
        self.error = None;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Apply the result of a session creation call. On success the new chat
    /// id replaces the recorded conversation id; on failure the banner shows
    /// the error.
    pub fn record_session(&mut self, result: Result<NewChatResponse>) -> Result<String> {
        match result {
            Ok(response) => {
                self.session.conversation_id = Some(response.chat_id.clone());
                Ok(response.chat_id)
            }
            Err(error) => {
                self.error = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Ask the backend for a fresh conversation id.
    pub async fn create_session<T>(&mut self, transport: &T) -> Result<String>
    where
        T: ChatTransport + ?Sized,
    {
        let result = transport.create_session().await;
        self.record_session(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sender;
    use crate::{SEND_FAILED, SEND_WITH_FILE_FAILED};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Text(String),
        File {
            content: String,
            file_name: String,
            user_id: Option<String>,
            session_id: Option<String>,
        },
        NewChat,
    }

    /// Replies with a canned response (or error) and records every call.
    struct FakeTransport {
        reply: Result<ChatResponse>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeTransport {
        fn replying(message_id: &str, content: &str) -> Self {
            Self {
                reply: Ok(ChatResponse {
                    message_id: message_id.into(),
                    content: content.into(),
                    conversation_id: "conv-1".into(),
                    timestamp: "2024-01-01T00:00:00Z".into(),
                    success: true,
                    ..Default::default()
                }),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: Error) -> Self {
            Self {
                reply: Err(error),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatTransport for FakeTransport {
        async fn send_text(&self, content: &str) -> Result<ChatResponse> {
            self.calls.lock().unwrap().push(Call::Text(content.to_string()));
            self.reply.clone()
        }

        async fn send_with_attachment(
            &self,
            content: &str,
            attachment: Attachment,
            user_id: Option<&str>,
            session_id: Option<&str>,
        ) -> Result<ChatResponse> {
            self.calls.lock().unwrap().push(Call::File {
                content: content.to_string(),
                file_name: attachment.file_name,
                user_id: user_id.map(str::to_string),
                session_id: session_id.map(str::to_string),
            });
            self.reply.clone().map_err(|_| Error::SendWithFileFailed)
        }

        async fn create_session(&self) -> Result<NewChatResponse> {
            self.calls.lock().unwrap().push(Call::NewChat);
            match &self.reply {
                Ok(_) => Ok(NewChatResponse {
                    chat_id: "chat-42".into(),
                }),
                Err(_) => Err(Error::NewChatFailed),
            }
        }
    }

    #[tokio::test]
    async fn test_send_hello_scenario() {
        let transport = FakeTransport::replying("m1", "Hi there");
        let mut conversation = Conversation::new(None);

        let outcome = conversation.send(&transport, "Hello", None).await;

        assert!(matches!(outcome, SendOutcome::Delivered(ref m) if m.id() == "m1"));
        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender(), Sender::User);
        assert_eq!(messages[0].content(), "Hello");
        assert_eq!(messages[1].sender(), Sender::Assistant);
        assert_eq!(messages[1].content(), "Hi there");
        assert_eq!(messages[1].id(), "m1");
        assert_eq!(conversation.state(), ConversationState::Idle);
        assert!(conversation.error().is_none());
        assert_eq!(transport.calls(), vec![Call::Text("Hello".into())]);
    }

    #[test]
    fn test_user_message_appended_before_dispatch() {
        let mut conversation = Conversation::new(None);

        let outgoing = conversation.begin_send("  Hello  ").unwrap();

        assert_eq!(conversation.state(), ConversationState::Sending);
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].content(), "  Hello  ");
        assert_eq!(outgoing.content(), "  Hello  ");
    }

    #[test]
    fn test_blank_text_rejected() {
        let mut conversation = Conversation::new(None);

        assert_eq!(conversation.begin_send("   \n\t").unwrap_err(), SendRejected::Blank);
        assert!(conversation.messages().is_empty());
        assert_eq!(conversation.state(), ConversationState::Idle);
    }

    #[test]
    fn test_send_while_sending_is_noop() {
        let mut conversation = Conversation::new(None);
        conversation.begin_send("first").unwrap();
        conversation.error = Some("previous".into());

        let result = conversation.begin_send("second");

        assert_eq!(result.unwrap_err(), SendRejected::Busy);
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.error(), Some("previous"));
        assert_eq!(conversation.state(), ConversationState::Sending);
    }

    #[tokio::test]
    async fn test_failure_surfaces_banner_and_history_entry() {
        let transport = FakeTransport::failing(Error::SendFailed);
        let mut conversation = Conversation::new(None);

        let outcome = conversation.send(&transport, "Hello", None).await;

        assert_eq!(outcome, SendOutcome::Failed(Error::SendFailed));
        assert_eq!(conversation.error(), Some(SEND_FAILED));
        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].sender(), Sender::Assistant);
        assert_eq!(
            messages[1].content(),
            "Error: Failed to send message. Please try again."
        );
        assert_eq!(conversation.state(), ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_failure_replaces_previous_banner() {
        let transport = FakeTransport::failing(Error::SendFailed);
        let mut conversation = Conversation::new(None);
        conversation.error = Some("stale".into());

        conversation.send(&transport, "again", None).await;

        assert_eq!(conversation.error(), Some(SEND_FAILED));
    }

    #[tokio::test]
    async fn test_success_after_failure_clears_banner() {
        let mut conversation = Conversation::new(None);

        let failing = FakeTransport::failing(Error::SendFailed);
        conversation.send(&failing, "Hello", None).await;
        assert_eq!(conversation.error(), Some(SEND_FAILED));

        conversation.begin_send("Hello again").unwrap();
        assert!(conversation.error().is_none());
        conversation.finish_send(Err(Error::SendFailed));

        let replying = FakeTransport::replying("m2", "Hi");
        let outcome = conversation.send(&replying, "One more", None).await;

        assert!(matches!(outcome, SendOutcome::Delivered(_)));
        assert!(conversation.error().is_none());
        assert_eq!(conversation.messages().len(), 6);
        assert_eq!(
            conversation.messages()[1].content(),
            "Error: Failed to send message. Please try again."
        );
    }

    #[tokio::test]
    async fn test_user_id_stays_as_configured() {
        let transport = FakeTransport {
            reply: Ok(ChatResponse {
                message_id: "m1".into(),
                content: "Hi".into(),
                user_id: Some("server-user".into()),
                ..Default::default()
            }),
            calls: Mutex::new(Vec::new()),
        };

        let mut anonymous = Conversation::new(None);
        anonymous.send(&transport, "Hello", None).await;
        assert!(anonymous.session().user_id.is_none());

        let mut configured = Conversation::new(Some("default-user".into()));
        configured.send(&transport, "Hello", None).await;
        assert_eq!(configured.session().user_id.as_deref(), Some("default-user"));
    }

    #[tokio::test]
    async fn test_attachment_uses_file_endpoint_with_session() {
        let transport = FakeTransport::replying("m1", "Got it");
        let mut conversation = Conversation::new(Some("default-user".into()));
        conversation.set_session_id(Some("conv-9".into()));

        let attachment = Attachment::from_bytes("a.txt", b"alpha".to_vec());
        conversation.send(&transport, "Summarize", Some(attachment)).await;

        assert_eq!(
            transport.calls(),
            vec![Call::File {
                content: "Summarize".into(),
                file_name: "a.txt".into(),
                user_id: Some("default-user".into()),
                session_id: Some("conv-9".into()),
            }]
        );
    }

    #[tokio::test]
    async fn test_attachment_failure_text() {
        let transport = FakeTransport::failing(Error::SendFailed);
        let mut conversation = Conversation::new(None);

        let attachment = Attachment::from_bytes("a.txt", Vec::new());
        conversation.send(&transport, "Hello", Some(attachment)).await;

        assert_eq!(conversation.error(), Some(SEND_WITH_FILE_FAILED));
    }

    #[tokio::test]
    async fn test_conversation_id_recorded_from_first_reply() {
        let transport = FakeTransport::replying("m1", "Hi");
        let mut conversation = Conversation::new(None);
        assert!(conversation.session().conversation_id.is_none());

        conversation.send(&transport, "Hello", None).await;

        assert_eq!(conversation.session().conversation_id.as_deref(), Some("conv-1"));
    }

    #[tokio::test]
    async fn test_new_chat_clears_history_and_banner() {
        let transport = FakeTransport::failing(Error::SendFailed);
        let mut conversation = Conversation::new(None);
        conversation.send(&transport, "Hello", None).await;
        assert!(conversation.error().is_some());

        conversation.new_chat();
        assert!(conversation.messages().is_empty());
        assert!(conversation.error().is_none());

        conversation.new_chat();
        assert!(conversation.messages().is_empty());
        assert!(conversation.error().is_none());

        let transport = FakeTransport::replying("m2", "Fresh");
        conversation.send(&transport, "Again", None).await;
        assert_eq!(conversation.messages().len(), 2);
        assert_eq!(conversation.messages()[0].content(), "Again");
    }

    #[test]
    fn test_dismiss_error_keeps_history() {
        let mut conversation = Conversation::new(None);
        conversation.begin_send("Hello").unwrap();
        conversation.finish_send(Err(Error::SendFailed));

        conversation.dismiss_error();

        assert!(conversation.error().is_none());
        assert_eq!(conversation.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_create_session_records_chat_id() {
        let transport = FakeTransport::replying("m1", "Hi");
        let mut conversation = Conversation::new(None);

        let chat_id = conversation.create_session(&transport).await.unwrap();

        assert_eq!(chat_id, "chat-42");
        assert_eq!(conversation.session().conversation_id.as_deref(), Some("chat-42"));
        assert_eq!(transport.calls(), vec![Call::NewChat]);
    }

    #[tokio::test]
    async fn test_create_session_failure_shows_banner() {
        let transport = FakeTransport::failing(Error::SendFailed);
        let mut conversation = Conversation::new(None);

        let result = conversation.create_session(&transport).await;

        assert_eq!(result, Err(Error::NewChatFailed));
        assert_eq!(conversation.error(), Some(crate::NEW_CHAT_FAILED));
        assert!(conversation.messages().is_empty());
    }
}

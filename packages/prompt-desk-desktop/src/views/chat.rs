//! Chat view: the message list above the input row
//!
//! Sending is split around the network call. The user message is appended on
//! the foreground, the request runs on the Tokio runtime, and the reply (or
//! the failure) is recorded back on the foreground.

use gpui::prelude::*;
use gpui::*;
use prompt_desk_core::{
    Attachment, ChatClient, ChatResponse, Error, OutgoingMessage, SendOutcome,
};
use std::path::PathBuf;

use crate::api;
use crate::components::message::render_message;
use crate::components::prompt_input::{PromptInput, SendMessage};
use crate::i18n::I18n;
use crate::state::{self, AppState};
use crate::theme::Theme;

pub struct ChatView {
    prompt_input: Entity<PromptInput>,
    scroll_handle: ScrollHandle,
    rendered_count: usize,
}

impl ChatView {
    pub fn new(cx: &mut Context<Self>) -> Self {
        let prompt_input = cx.new(|cx| PromptInput::new(cx));

        cx.subscribe(&prompt_input, |this, _input, event: &SendMessage, cx| {
            this.send(event.content.clone(), event.attachment.clone(), cx);
        })
        .detach();

        cx.observe_global::<AppState>(|_this, cx| cx.notify()).detach();

        Self {
            prompt_input,
            scroll_handle: ScrollHandle::new(),
            rendered_count: 0,
        }
    }

    pub fn prompt_input(&self) -> &Entity<PromptInput> {
        &self.prompt_input
    }

    fn send(&mut self, content: String, attachment: Option<PathBuf>, cx: &mut Context<Self>) {
        let outgoing = match state::with_state(cx, |s| s.conversation.begin_send(&content)) {
            Ok(outgoing) => outgoing,
            Err(rejected) => {
                tracing::debug!("Send rejected: {}", rejected);
                return;
            }
        };

        self.prompt_input.update(cx, |input, cx| input.set_loading(true, cx));
        cx.notify();

        let (client, runtime) = api::handles(cx);
        let with_file = attachment.is_some();

        cx.spawn(async move |this, cx| {
            let result = runtime
                .spawn(deliver(client, outgoing, attachment))
                .await
                .unwrap_or_else(|e| {
                    tracing::error!("Send task failed: {}", e);
                    Err(if with_file { Error::SendWithFileFailed } else { Error::SendFailed })
                });

            let _ = cx.update(|cx| {
                match state::with_state(cx, |s| s.conversation.finish_send(result)) {
                    SendOutcome::Delivered(reply) => {
                        tracing::debug!("Reply received: {}", reply.id());
                    }
                    SendOutcome::Failed(error) => {
                        tracing::warn!("Send failed: {}", error);
                    }
                    SendOutcome::Rejected(_) => {}
                }
            });

            let _ = this.update(cx, |this, cx| {
                this.prompt_input.update(cx, |input, cx| {
                    input.clear(cx);
                    input.set_loading(false, cx);
                });
                cx.notify();
            });
        })
        .detach();
    }

    fn render_empty(&self, theme: &Theme, cx: &Context<Self>) -> impl IntoElement {
        div()
            .flex_1()
            .flex()
            .items_center()
            .justify_center()
            .text_color(theme.text_muted)
            .child(cx.global::<I18n>().t("chat.empty"))
    }
}

/// Read the attachment, if any, and make the call. Runs on the Tokio runtime.
async fn deliver(
    client: ChatClient,
    outgoing: OutgoingMessage,
    attachment: Option<PathBuf>,
) -> prompt_desk_core::Result<ChatResponse> {
    let attachment = match attachment {
        Some(path) => Some(Attachment::from_path(&path).await?),
        None => None,
    };
    outgoing.dispatch(&client, attachment).await
}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>().clone();
        let messages = cx.global::<AppState>().conversation.messages().to_vec();

        if messages.len() > self.rendered_count {
            self.scroll_handle.scroll_to_bottom();
        }
        self.rendered_count = messages.len();

        div()
            .flex()
            .flex_col()
            .flex_1()
            .min_h_0()
            .bg(theme.background_panel)
            .child(if messages.is_empty() {
                self.render_empty(&theme, cx).into_any_element()
            } else {
                div()
                    .id("messages-scroll")
                    .flex_1()
                    .overflow_y_scroll()
                    .track_scroll(&self.scroll_handle)
                    .p(px(20.0))
                    .flex()
                    .flex_col()
                    .gap(px(12.0))
                    .children(messages.iter().map(|msg| render_message(msg, &theme)))
                    .into_any_element()
            })
            .child(self.prompt_input.clone())
    }
}

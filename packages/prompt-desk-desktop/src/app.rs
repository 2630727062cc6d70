//! Root view: header, error banner and the chat view

use gpui::prelude::*;
use gpui::*;
use prompt_desk_core::{ChatTransport, Error};
use std::time::Duration;

use crate::api;
use crate::i18n::I18n;
use crate::keyboard::{DismissError, NewChat, ToggleTheme};
use crate::state::{self, AppState};
use crate::theme::{self, Theme};
use crate::views::chat::ChatView;

const HEALTH_INTERVAL: Duration = Duration::from_secs(30);

pub struct AppRoot {
    chat_view: Entity<ChatView>,
}

impl AppRoot {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let chat_view = cx.new(|cx| ChatView::new(cx));

        let prompt_focus = chat_view.read(cx).prompt_input().read(cx).focus_handle(cx);
        prompt_focus.focus(window, cx);

        cx.observe_global::<AppState>(|_this, cx| cx.notify()).detach();
        cx.observe_global::<Theme>(|_this, cx| cx.notify()).detach();

        Self::start_health_check(cx);

        Self { chat_view }
    }

    /// Poll the backend so the header can show whether it is reachable
    fn start_health_check(cx: &mut Context<Self>) {
        let (client, runtime) = api::handles(cx);

        cx.spawn(async move |this, cx| loop {
            let probe = client.clone();
            let healthy = runtime
                .spawn(async move { probe.health().await })
                .await
                .unwrap_or(false);

            if this.upgrade().is_none() {
                break;
            }
            let _ = cx.update(|cx| {
                state::with_state(cx, |s| s.set_connected(healthy));
            });

            cx.background_executor().timer(HEALTH_INTERVAL).await;
        })
        .detach();
    }

    fn new_chat(&mut self, cx: &mut Context<Self>) {
        tracing::info!("Starting a new chat");
        state::with_state(cx, |s| s.conversation.new_chat());
        cx.notify();

        let (client, runtime) = api::handles(cx);
        cx.spawn(async move |_this, cx| {
            let result = runtime
                .spawn(async move { client.create_session().await })
                .await
                .unwrap_or_else(|e| {
                    tracing::error!("New chat task failed: {}", e);
                    Err(Error::NewChatFailed)
                });

            let _ = cx.update(|cx| {
                let recorded = state::with_state(cx, |s| s.conversation.record_session(result));
                if let Ok(chat_id) = recorded {
                    tracing::debug!("New chat id: {}", chat_id);
                }
            });
        })
        .detach();
    }

    fn dismiss_error(&mut self, cx: &mut Context<Self>) {
        state::with_state(cx, |s| s.conversation.dismiss_error());
        cx.notify();
    }

    fn render_header(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>().clone();
        let i18n = cx.global::<I18n>();
        let connected = cx.global::<AppState>().connected;

        let (status_label, status_color) = if connected {
            (i18n.t("status.connected"), theme.success)
        } else {
            (i18n.t("status.disconnected"), theme.error)
        };
        let title = i18n.t("app.title");
        let new_chat_label = i18n.t("header.new_chat");
        let new_chat_hint = i18n.t("header.new_chat_hint");

        div()
            .h(px(56.0))
            .px(px(16.0))
            .flex()
            .items_center()
            .justify_between()
            .border_b_1()
            .border_color(theme.border)
            .bg(theme.background_panel)
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap(px(12.0))
                    .child(
                        div()
                            .text_lg()
                            .font_weight(FontWeight::BOLD)
                            .text_color(theme.text)
                            .child(title),
                    )
                    .child(
                        div()
                            .flex()
                            .items_center()
                            .gap(px(6.0))
                            .child(div().w(px(8.0)).h(px(8.0)).rounded_full().bg(status_color))
                            .child(
                                div()
                                    .text_xs()
                                    .text_color(theme.text_muted)
                                    .child(status_label),
                            ),
                    ),
            )
            .child(
                div()
                    .id("new-chat-button")
                    .px(px(12.0))
                    .py(px(6.0))
                    .rounded(px(8.0))
                    .bg(theme.primary)
                    .text_sm()
                    .text_color(theme.text_on_primary)
                    .cursor_pointer()
                    .hover(|s| s.opacity(0.9))
                    .tooltip(move |_window, cx| {
                        cx.new(|_| Hint(new_chat_hint.clone().into())).into()
                    })
                    .on_click(cx.listener(|this, _event, _window, cx| {
                        this.new_chat(cx);
                    }))
                    .child(new_chat_label),
            )
    }

    fn render_banner(&self, cx: &mut Context<Self>) -> Option<impl IntoElement> {
        let error = cx.global::<AppState>().conversation.error()?.to_string();
        let theme = cx.global::<Theme>().clone();
        let dismiss = cx.global::<I18n>().t("banner.dismiss");

        Some(
            div()
                .px(px(16.0))
                .py(px(10.0))
                .flex()
                .items_center()
                .justify_between()
                .bg(theme.error_surface())
                .border_b_1()
                .border_color(theme.error)
                .child(div().text_sm().text_color(theme.error).child(error))
                .child(
                    div()
                        .id("dismiss-error")
                        .text_sm()
                        .text_color(theme.error)
                        .cursor_pointer()
                        .hover(|s| s.opacity(0.8))
                        .on_click(cx.listener(|this, _event, _window, cx| {
                            this.dismiss_error(cx);
                        }))
                        .child(dismiss),
                ),
        )
    }
}

impl Render for AppRoot {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>().clone();

        div()
            .size_full()
            .flex()
            .flex_col()
            .bg(theme.background)
            .text_color(theme.text)
            .on_action(cx.listener(|this, _: &NewChat, _window, cx| {
                this.new_chat(cx);
            }))
            .on_action(cx.listener(|this, _: &DismissError, _window, cx| {
                this.dismiss_error(cx);
            }))
            .on_action(cx.listener(|_this, _: &ToggleTheme, _window, cx| {
                theme::toggle_theme_mode(cx);
                cx.notify();
            }))
            .child(self.render_header(cx))
            .children(self.render_banner(cx))
            .child(self.chat_view.clone())
    }
}

/// Plain text tooltip
struct Hint(SharedString);

impl Render for Hint {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();
        div()
            .px(px(8.0))
            .py(px(4.0))
            .rounded(px(6.0))
            .bg(theme.background_element)
            .border_1()
            .border_color(theme.border)
            .text_xs()
            .text_color(theme.text)
            .child(self.0.clone())
    }
}

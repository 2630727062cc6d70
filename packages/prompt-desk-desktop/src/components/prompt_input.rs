//! Input row: attachment picker, multi-line text entry and send button
//!
//! Enter submits, Shift+Enter inserts a newline. The component only emits
//! [`SendMessage`]; the chat view decides whether the send is accepted and
//! clears the row once the attempt has finished.

use gpui::prelude::*;
use gpui::*;
use prompt_desk_core::PendingAttachment;
use std::path::PathBuf;

use crate::i18n::I18n;
use crate::theme::Theme;

/// Emitted when the user submits the row
#[derive(Clone, Debug)]
pub struct SendMessage {
    pub content: String,
    pub attachment: Option<PathBuf>,
}

/// Text plus a byte cursor that always sits on a char boundary
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    fn insert(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.text.len())
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.prev_boundary();
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    fn delete(&mut self) {
        if self.cursor >= self.text.len() {
            return;
        }
        let end = self.next_boundary();
        self.text.replace_range(self.cursor..end, "");
    }

    fn left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    fn right(&mut self) {
        self.cursor = self.next_boundary();
    }

    fn home(&mut self) {
        self.cursor = 0;
    }

    fn end(&mut self) {
        self.cursor = self.text.len();
    }

    fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

pub struct PromptInput {
    focus_handle: FocusHandle,
    buffer: TextBuffer,
    attachment: PendingAttachment,
    placeholder: String,
    loading: bool,
}

impl PromptInput {
    pub fn new(cx: &mut Context<Self>) -> Self {
        let placeholder = cx.global::<I18n>().t("prompt.placeholder");
        Self {
            focus_handle: cx.focus_handle(),
            buffer: TextBuffer::default(),
            attachment: PendingAttachment::new(),
            placeholder,
            loading: false,
        }
    }

    pub fn set_loading(&mut self, loading: bool, cx: &mut Context<Self>) {
        self.loading = loading;
        cx.notify();
    }

    /// Drop both the text and the chosen file
    pub fn clear(&mut self, cx: &mut Context<Self>) {
        self.buffer.clear();
        self.attachment.clear();
        cx.notify();
    }

    fn can_send(&self) -> bool {
        !self.loading && !self.buffer.is_blank()
    }

    fn submit(&mut self, cx: &mut Context<Self>) {
        if !self.can_send() {
            return;
        }
        cx.emit(SendMessage {
            content: self.buffer.text.clone(),
            attachment: self.attachment.path().map(|p| p.to_path_buf()),
        });
    }

    fn pick_attachment(&mut self, cx: &mut Context<Self>) {
        let paths = cx.prompt_for_paths(PathPromptOptions {
            files: true,
            directories: false,
            multiple: true,
            prompt: None,
        });

        cx.spawn(async move |this, cx| {
            match paths.await {
                Ok(Ok(Some(paths))) => {
                    let _ = this.update(cx, |this, cx| {
                        this.attachment.select(paths);
                        cx.notify();
                    });
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) => tracing::warn!("File picker failed: {}", e),
                Err(_) => tracing::debug!("File picker closed"),
            }
        })
        .detach();
    }

    fn remove_attachment(&mut self, cx: &mut Context<Self>) {
        self.attachment.clear();
        cx.notify();
    }

    fn handle_key_down(&mut self, event: &KeyDownEvent, cx: &mut Context<Self>) {
        if self.loading {
            return;
        }

        let modifiers = event.keystroke.modifiers;
        match event.keystroke.key.as_str() {
            "enter" if modifiers.shift => self.buffer.insert("\n"),
            "enter" => {
                self.submit(cx);
                return;
            }
            "backspace" => self.buffer.backspace(),
            "delete" => self.buffer.delete(),
            "left" => self.buffer.left(),
            "right" => self.buffer.right(),
            "home" => self.buffer.home(),
            "end" => self.buffer.end(),
            "a" if modifiers.control => self.buffer.home(),
            "e" if modifiers.control => self.buffer.end(),
            _ if modifiers.control || modifiers.alt || modifiers.platform => return,
            "space" => self.buffer.insert(" "),
            key => match &event.keystroke.key_char {
                Some(ch) => self.buffer.insert(ch),
                None if key.chars().count() == 1 => self.buffer.insert(key),
                None => return,
            },
        }
        cx.notify();
    }

    fn render_text(&self, is_focused: bool, theme: &Theme) -> AnyElement {
        if self.buffer.text.is_empty() {
            return div()
                .text_color(theme.text_muted)
                .child(self.placeholder.clone())
                .into_any_element();
        }

        let (before, after) = self.buffer.text.split_at(self.buffer.cursor);
        div()
            .flex()
            .flex_wrap()
            .text_color(theme.text)
            .child(before.to_string())
            .when(is_focused, |el| {
                el.child(div().w(px(2.0)).h(px(18.0)).bg(theme.primary))
            })
            .child(after.to_string())
            .into_any_element()
    }

    fn render_attachment_chip(
        &self,
        theme: &Theme,
        cx: &mut Context<Self>,
    ) -> Option<impl IntoElement> {
        let name = self.attachment.name()?;
        let remove_label = cx.global::<I18n>().t("prompt.remove_attachment");

        Some(
            div()
                .flex()
                .items_center()
                .gap(px(8.0))
                .px(px(10.0))
                .py(px(4.0))
                .rounded(px(8.0))
                .bg(theme.background_element)
                .text_sm()
                .child(div().text_color(theme.text).child(name))
                .child(
                    div()
                        .id("remove-attachment")
                        .cursor_pointer()
                        .text_color(theme.text_muted)
                        .hover(|s| s.text_color(theme.error))
                        .on_click(cx.listener(|this, _event, _window, cx| {
                            this.remove_attachment(cx);
                        }))
                        .child(remove_label),
                ),
        )
    }
}

impl EventEmitter<SendMessage> for PromptInput {}

impl Focusable for PromptInput {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for PromptInput {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>().clone();
        let i18n = cx.global::<I18n>();
        let attach_label = i18n.t("prompt.attach");
        let send_label = if self.loading {
            i18n.t("prompt.sending")
        } else {
            i18n.t("prompt.send")
        };

        let is_focused = self.focus_handle.is_focused(window);
        let can_send = self.can_send();
        let border_color = if is_focused { theme.primary } else { theme.border };

        div()
            .p(px(16.0))
            .border_t_1()
            .border_color(theme.border)
            .bg(theme.background_panel)
            .flex()
            .flex_col()
            .gap(px(8.0))
            .children(self.render_attachment_chip(&theme, cx))
            .child(
                div()
                    .flex()
                    .items_end()
                    .gap(px(12.0))
                    .child(
                        div()
                            .id("attach-button")
                            .h(px(44.0))
                            .px(px(12.0))
                            .rounded(px(8.0))
                            .bg(theme.background_element)
                            .flex()
                            .items_center()
                            .text_sm()
                            .text_color(theme.text_muted)
                            .when(!self.loading, |el| {
                                el.cursor_pointer()
                                    .hover(|s| s.bg(theme.background))
                                    .on_click(cx.listener(|this, _event, _window, cx| {
                                        this.pick_attachment(cx);
                                    }))
                            })
                            .child(attach_label),
                    )
                    .child(
                        div()
                            .id("prompt-input")
                            .track_focus(&self.focus_handle)
                            .flex_1()
                            .min_h(px(44.0))
                            .max_h(px(200.0))
                            .overflow_y_scroll()
                            .px(px(14.0))
                            .py(px(10.0))
                            .rounded(px(8.0))
                            .bg(theme.background_element)
                            .border_1()
                            .border_color(border_color)
                            .cursor_text()
                            .on_key_down(cx.listener(|this, event, _window, cx| {
                                this.handle_key_down(event, cx);
                            }))
                            .child(self.render_text(is_focused, &theme)),
                    )
                    .child(
                        div()
                            .id("send-button")
                            .h(px(44.0))
                            .px(px(16.0))
                            .rounded(px(8.0))
                            .flex()
                            .items_center()
                            .map(|el| {
                                if can_send {
                                    el.bg(theme.primary).text_color(theme.text_on_primary)
                                } else {
                                    el.bg(theme.background_element).text_color(theme.text_muted)
                                }
                            })
                            .when(can_send, |el| {
                                el.cursor_pointer()
                                    .hover(|s| s.opacity(0.9))
                                    .on_click(cx.listener(|this, _event, _window, cx| {
                                        this.submit(cx);
                                    }))
                            })
                            .child(send_label),
                    ),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> TextBuffer {
        TextBuffer {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    #[test]
    fn test_insert_and_backspace_multibyte() {
        let mut buf = buffer("héllo");
        buf.left();
        buf.left();
        buf.left();
        buf.left();
        assert_eq!(buf.cursor, 1);
        buf.right();
        buf.backspace();
        assert_eq!(buf.text, "hllo");
        buf.insert("é");
        assert_eq!(buf.text, "héllo");
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut buf = buffer("ab");
        buf.home();
        buf.delete();
        assert_eq!(buf.text, "b");
        buf.end();
        buf.delete();
        assert_eq!(buf.text, "b");
    }

    #[test]
    fn test_newline_counts_as_blank() {
        let mut buf = TextBuffer::default();
        buf.insert("\n  ");
        assert!(buf.is_blank());
        buf.insert("x");
        assert!(!buf.is_blank());
        buf.clear();
        assert_eq!(buf, TextBuffer::default());
    }
}

//! Chat bubble
//!
//! User bubbles sit on the right, assistant bubbles on the left. Each shows
//! the time it was created in the local time zone.

use chrono::{DateTime, Local, TimeZone, Utc};
use gpui::prelude::*;
use gpui::*;
use prompt_desk_core::Message;

use crate::theme::Theme;

const ERROR_PREFIX: &str = "Error: ";

pub fn render_message(message: &Message, theme: &Theme) -> impl IntoElement {
    let is_user = message.is_user();
    let is_error = !is_user && message.content().starts_with(ERROR_PREFIX);

    let (bg, fg, stamp) = if is_user {
        (theme.primary, theme.text_on_primary, theme.text_on_primary.opacity(0.7))
    } else if is_error {
        (theme.error_surface(), theme.error, theme.text_muted)
    } else {
        (theme.background_element, theme.text, theme.text_muted)
    };

    div()
        .w_full()
        .flex()
        .when(is_user, |el| el.justify_end())
        .when(!is_user, |el| el.justify_start())
        .child(
            div()
                .max_w(rems(40.0))
                .px(px(16.0))
                .py(px(10.0))
                .rounded(px(12.0))
                .bg(bg)
                .flex()
                .flex_col()
                .gap(px(4.0))
                .child(div().text_color(fg).child(message.content().to_string()))
                .child(
                    div()
                        .text_xs()
                        .text_color(stamp)
                        .child(format_time(message.timestamp())),
                ),
        )
}

/// Local wall-clock time of a message
pub fn format_time(timestamp: DateTime<Utc>) -> String {
    format_time_in(timestamp, &Local)
}

fn format_time_in<Tz: TimeZone>(timestamp: DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(zone).format("%H:%M").to_string()
}

//! Keyboard bindings for the chat window

use gpui::*;

actions!(prompt_desk, [NewChat, DismissError, ToggleTheme]);

/// Initialize keyboard bindings
pub fn init(cx: &mut App) {
    cx.bind_keys([
        KeyBinding::new("ctrl-n", NewChat, None),
        KeyBinding::new("cmd-n", NewChat, None),
        KeyBinding::new("escape", DismissError, None),
        KeyBinding::new("ctrl-shift-t", ToggleTheme, None),
    ]);

    tracing::debug!("Keyboard bindings initialized");
}

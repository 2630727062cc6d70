//! Application state shared by every view

use gpui::*;
use prompt_desk_core::{Config, Conversation};

/// The conversation plus whatever the header needs to know about the backend
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub conversation: Conversation,
    pub connected: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            conversation: Conversation::new(Some(config.user_id.clone())),
            connected: false,
        }
    }

    pub fn set_connected(&mut self, connected: bool) {
        if self.connected != connected {
            tracing::info!(
                "Backend {}",
                if connected { "reachable" } else { "unreachable" }
            );
        }
        self.connected = connected;
    }
}

impl Global for AppState {}

pub fn init(cx: &mut App, config: &Config) {
    cx.set_global(AppState::new(config));
    tracing::debug!("Application state initialized");
}

/// Mutable access to the app state from callbacks
pub fn with_state<R>(cx: &mut App, f: impl FnOnce(&mut AppState) -> R) -> R {
    f(cx.global_mut::<AppState>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_seeds_user_id() {
        let config = Config {
            base_url: "http://localhost:8080".into(),
            user_id: "alice".into(),
        };
        let state = AppState::new(&config);
        assert_eq!(state.conversation.session().user_id.as_deref(), Some("alice"));
        assert!(state.conversation.session().conversation_id.is_none());
        assert!(!state.connected);
    }
}

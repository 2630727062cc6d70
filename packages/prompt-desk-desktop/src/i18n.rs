use gpui::Global;
use serde_json::Value;
use std::collections::HashMap;
use std::env;

#[derive(Clone, Debug)]
pub struct I18n {
    locale: String,
    messages: HashMap<String, String>,
}

impl I18n {
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Look up a string, falling back to the key itself.
    pub fn t(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

impl Global for I18n {}

fn detect_locale() -> String {
    let candidates = ["LC_ALL", "LC_MESSAGES", "LANG"];
    for key in candidates {
        if let Ok(value) = env::var(key) {
            let normalized = normalize_locale(&value);
            if !normalized.is_empty() {
                return normalized;
            }
        }
    }
    "en".to_string()
}

fn normalize_locale(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .split('.')
        .next()
        .unwrap_or(trimmed)
        .replace('-', "_")
        .to_lowercase()
}

// Only English ships for now; every locale resolves to it.
fn load_messages(_locale: &str) -> HashMap<String, String> {
    parse_messages(include_str!("../i18n/en.json"))
}

fn parse_messages(raw: &str) -> HashMap<String, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
            .collect(),
        _ => HashMap::new(),
    }
}

pub fn init(cx: &mut gpui::App) {
    let locale = detect_locale();
    let messages = load_messages(&locale);
    tracing::debug!("Loaded {} strings for locale {}", messages.len(), locale);
    cx.set_global(I18n { locale, messages });
}

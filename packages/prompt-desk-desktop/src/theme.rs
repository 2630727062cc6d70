//! Colors for the chat window
//!
//! Two built-in palettes, dark and light, switchable at runtime.

use gpui::*;

/// Palette used by every view
#[derive(Debug, Clone)]
pub struct Theme {
    pub id: &'static str,
    pub is_dark: bool,

    pub primary: Hsla,
    pub text_on_primary: Hsla,
    pub error: Hsla,
    pub success: Hsla,

    pub text: Hsla,
    pub text_muted: Hsla,

    pub background: Hsla,
    pub background_panel: Hsla,
    pub background_element: Hsla,

    pub border: Hsla,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            id: "dark",
            is_dark: true,
            primary: hex("#3b82f6"),
            text_on_primary: hex("#ffffff"),
            error: hex("#f87171"),
            success: hex("#4ade80"),
            text: hex("#f3f4f6"),
            text_muted: hex("#9ca3af"),
            background: hex("#030712"),
            background_panel: hex("#111827"),
            background_element: hex("#1f2937"),
            border: hex("#374151"),
        }
    }

    pub fn light() -> Self {
        Self {
            id: "light",
            is_dark: false,
            primary: hex("#3b82f6"),
            text_on_primary: hex("#ffffff"),
            error: hex("#b91c1c"),
            success: hex("#16a34a"),
            text: hex("#111827"),
            text_muted: hex("#6b7280"),
            background: hex("#f9fafb"),
            background_panel: hex("#ffffff"),
            background_element: hex("#f3f4f6"),
            border: hex("#e5e7eb"),
        }
    }

    /// Background of the error banner
    pub fn error_surface(&self) -> Hsla {
        self.error.opacity(if self.is_dark { 0.25 } else { 0.12 })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Global for Theme {}

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`. Malformed input yields opaque black.
pub fn hex(color: &str) -> Hsla {
    let digits = color.trim_start_matches('#');
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };

    let value = match expanded.len() {
        6 => u32::from_str_radix(&expanded, 16).map(|v| (v << 8) | 0xff),
        8 => u32::from_str_radix(&expanded, 16),
        _ => Ok(0x0000_00ff),
    }
    .unwrap_or(0x0000_00ff);

    Hsla::from(Rgba {
        r: ((value >> 24) & 0xff) as f32 / 255.0,
        g: ((value >> 16) & 0xff) as f32 / 255.0,
        b: ((value >> 8) & 0xff) as f32 / 255.0,
        a: (value & 0xff) as f32 / 255.0,
    })
}

pub fn init(cx: &mut App) {
    let theme = match std::env::var("PROMPT_DESK_THEME").as_deref() {
        Ok("light") => Theme::light(),
        _ => Theme::dark(),
    };
    tracing::debug!("Theme initialized: {}", theme.id);
    cx.set_global(theme);
}

/// Switch between the dark and light palettes
pub fn toggle_theme_mode(cx: &mut App) {
    let next = if cx.global::<Theme>().is_dark {
        Theme::light()
    } else {
        Theme::dark()
    };
    tracing::info!("Theme changed to: {}", next.id);
    cx.set_global(next);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        let white = hex("#ffffff");
        assert!((white.l - 1.0).abs() < 0.01);

        let black = hex("#000000");
        assert!(black.l.abs() < 0.01);

        let red = hex("#ff0000");
        assert!(red.h.abs() < 0.01);
        assert!((red.s - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_short_and_alpha_hex() {
        assert!((hex("#fff").l - 1.0).abs() < 0.01);
        assert!((hex("#00000080").a - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_malformed_hex_is_black() {
        let color = hex("#zz");
        assert!(color.l.abs() < 0.01);
        assert!((color.a - 1.0).abs() < 0.01);
    }
}

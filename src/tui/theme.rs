use ratatui::style::Color;

use crate::config::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub error: Color,
    pub done: Color,
    pub selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x14, 0x18),
            text: Color::Rgb(0xC8, 0xD2, 0xDC),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x2E, 0xC4, 0xB6),
            dim: Color::Rgb(0x5C, 0x6A, 0x78),
            error: Color::Rgb(0xFF, 0x5C, 0x5C),
            done: Color::Rgb(0x7F, 0xB0, 0x69),
            selection_bg: Color::Rgb(0x20, 0x32, 0x3C),
        }
    }
}

impl Theme {
    /// Default palette with any `[ui]` overrides applied.
    pub fn from_config(ui: &UiConfig) -> Theme {
        let mut theme = Theme::default();
        apply(&mut theme.background, ui.background.as_deref());
        apply(&mut theme.text, ui.text.as_deref());
        apply(&mut theme.highlight, ui.accent.as_deref());
        apply(&mut theme.dim, ui.dim.as_deref());
        apply(&mut theme.error, ui.error.as_deref());
        theme
    }
}

fn apply(slot: &mut Color, hex: Option<&str>) {
    if let Some(color) = hex.and_then(parse_color) {
        *slot = color;
    }
}

/// Parse a `#RRGGBB` hex string.
fn parse_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#FF0080"), Some(Color::Rgb(0xFF, 0x00, 0x80)));
        assert_eq!(parse_color("FF0080"), None);
        assert_eq!(parse_color("#FF008"), None);
        assert_eq!(parse_color("#GGGGGG"), None);
    }

    #[test]
    fn test_from_config_overrides() {
        let ui = UiConfig {
            accent: Some("#123456".into()),
            ..UiConfig::default()
        };
        let theme = Theme::from_config(&ui);
        assert_eq!(theme.highlight, Color::Rgb(0x12, 0x34, 0x56));
        // untouched slots keep the default
        assert_eq!(theme.background, Theme::default().background);
    }
}

//! Terminal palettes for the two theme preferences.

use ratatui::style::Color;

use crate::internal::theme_store::ThemePreference;

#[derive(Debug, Clone, PartialEq)]
pub struct TuiTheme {
    pub background: Color,
    pub foreground: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub border: Color,
    pub link: Color,
    pub accent: Color,
    pub muted: Color,
    pub upvote: Color,
    pub downvote: Color,
    pub error: Color,
}

impl TuiTheme {
    pub fn for_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Light => Self::light(),
            ThemePreference::Dark => Self::dark(),
        }
    }

    /// Flexoki light.
    pub fn light() -> Self {
        Self {
            background: parse_color("#FFFCF0"),
            foreground: parse_color("#100F0F"),
            selection_bg: parse_color("#E6E4D9"),
            selection_fg: parse_color("#100F0F"),
            border: parse_color("#B7B5AC"),
            link: parse_color("#205EA6"),
            accent: parse_color("#BC5215"),
            muted: parse_color("#6F6E69"),
            upvote: parse_color("#66800B"),
            downvote: parse_color("#AF3029"),
            error: parse_color("#AF3029"),
        }
    }

    /// Flexoki dark.
    pub fn dark() -> Self {
        Self {
            background: parse_color("#100F0F"),
            foreground: parse_color("#CECDC3"),
            selection_bg: parse_color("#343331"),
            selection_fg: parse_color("#FFFCF0"),
            border: parse_color("#575653"),
            link: parse_color("#4385BE"),
            accent: parse_color("#DA702C"),
            muted: parse_color("#878580"),
            upvote: parse_color("#879A39"),
            downvote: parse_color("#D14D41"),
            error: parse_color("#D14D41"),
        }
    }
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self::light()
    }
}

fn parse_color(hex: &str) -> Color {
    if let Ok(c) = hex.parse::<Color>() {
        return c;
    }

    let hex = hex.trim_start_matches('#');
    match hex.len() {
        6 | 8 => {
            // For 8-char hex (with alpha), ignore the alpha and use the RGB components.
            let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
            let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
            let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
            Color::Rgb(r, g, b)
        }
        _ => Color::Reset,
    }
}

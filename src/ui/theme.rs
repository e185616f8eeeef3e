use ratatui::style::{Color, Modifier, Style};

use crate::core::routing::RoutingCategory;

#[derive(Debug, Clone)]
pub struct Theme {
    // Transcript entries
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub ai_prefix_style: Style,
    pub ai_text_style: Style,
    pub placeholder_style: Style,
    pub error_text_style: Style,

    // Metadata fragment under each answer
    pub local_route_style: Style,
    pub remote_route_style: Style,
    pub meta_style: Style,

    // Chrome
    pub title_style: Style,
    pub status_style: Style,
    pub notice_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_cursor_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            ai_prefix_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            ai_text_style: Style::default().fg(Color::White),
            placeholder_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            error_text_style: Style::default().fg(Color::Red),

            local_route_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            remote_route_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            meta_style: Style::default().fg(Color::DarkGray),

            title_style: Style::default().fg(Color::Gray),
            status_style: Style::default().fg(Color::Gray),
            notice_style: Style::default().fg(Color::Yellow),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),

            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    /// Attribute-only styling for terminals that asked for no color.
    pub fn monochrome() -> Self {
        let plain = Style::default();
        let bold = plain.add_modifier(Modifier::BOLD);
        Theme {
            user_prefix_style: bold,
            user_text_style: plain,
            ai_prefix_style: bold,
            ai_text_style: plain,
            placeholder_style: plain.add_modifier(Modifier::ITALIC),
            error_text_style: bold,

            local_route_style: bold,
            remote_route_style: bold.add_modifier(Modifier::UNDERLINED),
            meta_style: plain.add_modifier(Modifier::DIM),

            title_style: plain,
            status_style: plain,
            notice_style: bold,
            input_border_style: plain,
            input_title_style: plain,

            input_text_style: plain,
            input_cursor_style: plain.add_modifier(Modifier::REVERSED),
        }
    }

    /// Honors the `NO_COLOR` convention: any non-empty value selects
    /// [`Theme::monochrome`].
    pub fn from_env_value(no_color: Option<&str>) -> Self {
        match no_color {
            Some(value) if !value.is_empty() => Self::monochrome(),
            _ => Self::dark_default(),
        }
    }

    pub fn route_style(&self, category: RoutingCategory) -> Style {
        match category {
            RoutingCategory::Local => self.local_route_style,
            RoutingCategory::Remote => self.remote_route_style,
        }
    }
}

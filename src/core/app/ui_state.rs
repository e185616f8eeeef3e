use ratatui::style::Style;
use tui_textarea::TextArea;

use crate::ui::theme::Theme;

pub const INPUT_PLACEHOLDER: &str = "Type a prompt and press Enter";

pub struct UiState {
    textarea: TextArea<'static>,
    pub theme: Theme,
    pub status: Option<String>,
    pub exit_requested: bool,
}

impl UiState {
    pub fn new(theme: Theme) -> Self {
        let mut ui = Self {
            textarea: TextArea::default(),
            theme,
            status: None,
            exit_requested: false,
        };
        ui.configure_textarea();
        ui
    }

    pub(crate) fn configure_textarea(&mut self) {
        self.textarea.set_style(self.theme.input_text_style);
        self.textarea.set_cursor_style(self.theme.input_cursor_style);
        self.textarea.set_cursor_line_style(Style::default());
        self.textarea.set_placeholder_text(INPUT_PLACEHOLDER);
        self.textarea
            .set_placeholder_style(self.theme.placeholder_style);
    }

    /// Current contents of the prompt field, lines joined with `\n`.
    pub fn get_input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn clear_input(&mut self) {
        self.textarea = TextArea::default();
        self.configure_textarea();
    }

    pub fn insert_into_input(&mut self, text: &str) {
        if !text.is_empty() {
            self.textarea.insert_str(text);
        }
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}

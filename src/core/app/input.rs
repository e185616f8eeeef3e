use super::actions::AppCommand;
use super::App;
use crate::core::message::TranscriptEntry;

impl App {
    /// Takes whatever is in the prompt field and starts a turn for it.
    ///
    /// Blank or whitespace-only input is ignored outright: the field, the
    /// transcript and the network are all left untouched.
    pub fn submit_input(&mut self) -> Option<AppCommand> {
        let raw = self.ui.get_input_text();
        let prompt = raw.trim();
        if prompt.is_empty() {
            return None;
        }
        let prompt = prompt.to_string();

        self.ui.clear_input();
        self.push_entry(TranscriptEntry::user(prompt.clone()));
        Some(self.run_turn(prompt))
    }
}

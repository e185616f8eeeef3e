//! Chat session state and the transitions that drive it.
//!
//! [`App`] owns the transcript, the running metrics and every turn that has
//! been submitted. All mutation happens on the event loop through
//! [`apply_actions`]; network work is handed back as [`AppCommand`]s so the
//! state here never waits on I/O.

use std::collections::BTreeMap;

use tracing::warn;

use crate::core::message::TranscriptEntry;
use crate::core::metrics::SessionMetrics;
use crate::core::transcript::{EntryHandle, Transcript};
use crate::core::turn_service::TurnId;

pub mod actions;
mod input;
pub mod session;
mod turns;
pub mod ui_state;

#[cfg(test)]
mod tests;

pub use actions::{apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand};
pub use session::SessionContext;
pub use turns::{ConversationTurn, TurnState};
pub use ui_state::UiState;

pub struct App {
    pub session: SessionContext,
    pub ui: UiState,
    pub transcript: Transcript,
    pub metrics: SessionMetrics,
    turns: BTreeMap<TurnId, ConversationTurn>,
}

impl App {
    pub fn new(session: SessionContext, ui: UiState) -> Self {
        Self {
            session,
            ui,
            transcript: Transcript::new(),
            metrics: SessionMetrics::new(),
            turns: BTreeMap::new(),
        }
    }

    pub fn turn(&self, turn_id: TurnId) -> Option<&ConversationTurn> {
        self.turns.get(&turn_id)
    }

    pub fn pending_turn_count(&self) -> usize {
        self.turns
            .values()
            .filter(|turn| turn.state == TurnState::Pending)
            .count()
    }

    /// Appends to the transcript and mirrors the entry into the transcript
    /// log. A log failure turns the log off and says so in the status line.
    pub(crate) fn push_entry(&mut self, entry: TranscriptEntry) -> EntryHandle {
        if let Err(err) = self.session.logging.record_entry(&entry) {
            warn!(
                error = %err,
                sender = entry.sender.as_str(),
                "transcript log write failed, disabling it"
            );
            self.session.logging.disable();
            self.ui.set_status(format!("Transcript log disabled: {err}"));
        }
        self.transcript.append(entry)
    }
}

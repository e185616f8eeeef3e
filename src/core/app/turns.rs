use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::actions::AppCommand;
use super::App;
use crate::api::TurnError;
use crate::core::message::TranscriptEntry;
use crate::core::routing::{GenerationResult, TurnMetadata};
use crate::core::transcript::EntryHandle;
use crate::core::turn_service::{TurnId, TurnParams};
use crate::utils::input::sanitize_text_input;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Pending,
    Fulfilled,
    Failed,
}

/// One submitted prompt and the placeholder standing in for its answer.
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub prompt_text: String,
    pub state: TurnState,
    pub placeholder: EntryHandle,
}

impl App {
    /// Shows the "Thinking..." placeholder and returns the command that
    /// starts the request. The caller gets control back immediately.
    pub fn run_turn(&mut self, prompt_text: String) -> AppCommand {
        let placeholder = self.push_entry(TranscriptEntry::placeholder());
        let turn_id = self.session.allocate_turn_id();
        self.turns.insert(
            turn_id,
            ConversationTurn {
                prompt_text: prompt_text.clone(),
                state: TurnState::Pending,
                placeholder,
            },
        );
        debug!(
            turn = turn_id.get(),
            placeholder = placeholder.get(),
            "turn submitted"
        );

        AppCommand::SpawnTurn(TurnParams {
            backend: Arc::clone(&self.session.backend),
            prompt: prompt_text,
            turn_id,
            started_at: Instant::now(),
        })
    }

    /// Replaces the turn's placeholder with the answer and feeds the session
    /// metrics. Returns `false` when the turn is unknown or already settled.
    pub fn complete_turn(&mut self, turn_id: TurnId, result: GenerationResult) -> bool {
        let Some(placeholder) = self.settle_turn(turn_id, TurnState::Fulfilled) else {
            return false;
        };
        self.transcript.remove(placeholder);

        let metadata = TurnMetadata::from_result(&result);
        self.metrics.record_cost(result.cost);
        self.metrics.record_latency(result.latency);
        info!(
            turn = turn_id.get(),
            route = %metadata.route_label,
            category = metadata.category.as_str(),
            cost = result.cost,
            cached = result.cached,
            "turn fulfilled"
        );

        self.push_entry(TranscriptEntry::answer(
            sanitize_text_input(&result.text),
            metadata,
        ));
        true
    }

    /// Replaces the turn's placeholder with an error entry. Metrics are left
    /// alone.
    pub fn fail_turn(&mut self, turn_id: TurnId, error: TurnError) -> bool {
        let Some(placeholder) = self.settle_turn(turn_id, TurnState::Failed) else {
            return false;
        };
        self.transcript.remove(placeholder);

        warn!(turn = turn_id.get(), error = %error, "turn failed");
        self.push_entry(TranscriptEntry::error(sanitize_text_input(
            &error.to_string(),
        )));
        true
    }

    fn settle_turn(&mut self, turn_id: TurnId, next: TurnState) -> Option<EntryHandle> {
        let turn = self.turns.get_mut(&turn_id)?;
        if turn.state != TurnState::Pending {
            debug!(turn = turn_id.get(), state = ?turn.state, "ignoring late completion");
            return None;
        }
        turn.state = next;
        Some(turn.placeholder)
    }
}

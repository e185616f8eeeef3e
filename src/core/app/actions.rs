use tokio::sync::mpsc;

use super::App;
use crate::api::TurnError;
use crate::core::routing::GenerationResult;
use crate::core::turn_service::{TurnId, TurnParams};

pub enum AppAction {
    SubmitInput,
    TurnFulfilled {
        turn_id: TurnId,
        result: GenerationResult,
    },
    TurnFailed {
        turn_id: TurnId,
        error: TurnError,
    },
    InsertIntoInput {
        text: String,
    },
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }

    pub fn dispatch_many<I>(&self, actions: I)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions {
            self.dispatch(action);
        }
    }
}

pub enum AppCommand {
    SpawnTurn(TurnParams),
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) -> Vec<AppCommand> {
    actions
        .into_iter()
        .filter_map(|action| apply_action(app, action))
        .collect()
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitInput => app.submit_input(),
        AppAction::TurnFulfilled { turn_id, result } => {
            app.complete_turn(turn_id, result);
            None
        }
        AppAction::TurnFailed { turn_id, error } => {
            app.fail_turn(turn_id, error);
            None
        }
        AppAction::InsertIntoInput { text } => {
            app.ui.insert_into_input(&text);
            None
        }
    }
}

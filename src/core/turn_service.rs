use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{GenerateRequest, GenerationBackend, TurnError};
use crate::core::routing::{latency_millis, GenerationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(u64);

impl TurnId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Outcome reported by a finished turn task.
#[derive(Debug, Clone)]
pub enum TurnMessage {
    Fulfilled(GenerationResult),
    Failed(TurnError),
}

pub struct TurnParams {
    pub backend: Arc<dyn GenerationBackend>,
    pub prompt: String,
    pub turn_id: TurnId,
    pub started_at: Instant,
}

/// Runs each turn's request on its own task and funnels the outcomes back
/// to a single receiver owned by the event loop.
#[derive(Clone)]
pub struct TurnService {
    tx: mpsc::UnboundedSender<(TurnMessage, TurnId)>,
}

impl TurnService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(TurnMessage, TurnId)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_turn(&self, params: TurnParams) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let TurnParams {
                backend,
                prompt,
                turn_id,
                started_at,
            } = params;

            let message = run_request(backend.as_ref(), prompt, turn_id, started_at).await;
            let _ = tx.send((message, turn_id));
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: TurnMessage, turn_id: TurnId) {
        let _ = self.tx.send((message, turn_id));
    }
}

async fn run_request(
    backend: &dyn GenerationBackend,
    prompt: String,
    turn_id: TurnId,
    started_at: Instant,
) -> TurnMessage {
    let outcome = backend.generate(GenerateRequest::for_prompt(prompt)).await;
    let local_ms = started_at.elapsed().as_millis() as u64;

    match outcome {
        Ok(result) => {
            debug!(
                turn = turn_id.get(),
                local_ms,
                server_ms = latency_millis(result.latency),
                "generation request finished"
            );
            TurnMessage::Fulfilled(result)
        }
        Err(err) => {
            debug!(turn = turn_id.get(), local_ms, error = %err, "generation request failed");
            TurnMessage::Failed(err)
        }
    }
}

use std::sync::Arc;

use crate::api::GenerationBackend;
use crate::core::turn_service::TurnId;
use crate::utils::logging::TranscriptLog;

/// Everything a chat session needs beyond what is on screen.
pub struct SessionContext {
    pub backend: Arc<dyn GenerationBackend>,
    pub base_url: String,
    pub logging: TranscriptLog,
    next_turn_id: u64,
}

impl SessionContext {
    pub fn new(backend: Arc<dyn GenerationBackend>, base_url: String, logging: TranscriptLog) -> Self {
        Self {
            backend,
            base_url,
            logging,
            next_turn_id: 1,
        }
    }

    /// Hands out turn ids in submission order; ids are never reused.
    pub fn allocate_turn_id(&mut self) -> TurnId {
        let id = TurnId::new(self.next_turn_id);
        self.next_turn_id += 1;
        id
    }
}

use crate::core::routing::TurnMetadata;

/// Label shown while a turn is waiting for the server.
pub const PLACEHOLDER_LABEL: &str = "Thinking...";

pub const ERROR_PREFIX: &str = "Error: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    /// A prompt typed by the user.
    Prompt,
    /// Provisional "thinking" entry for an in-flight turn.
    Pending,
    /// A model answer followed by its metadata fragment.
    Answer(TurnMetadata),
    /// A failed turn. The text already carries the `Error: ` prefix.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub sender: Sender,
    pub text: String,
    pub kind: EntryKind,
}

impl TranscriptEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            kind: EntryKind::Prompt,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            sender: Sender::Ai,
            text: PLACEHOLDER_LABEL.to_string(),
            kind: EntryKind::Pending,
        }
    }

    pub fn answer(text: impl Into<String>, metadata: TurnMetadata) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            kind: EntryKind::Answer(metadata),
        }
    }

    pub fn error(description: impl std::fmt::Display) -> Self {
        Self {
            sender: Sender::Ai,
            text: format!("{ERROR_PREFIX}{description}"),
            kind: EntryKind::Error,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.kind, EntryKind::Pending)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, EntryKind::Error)
    }

    pub fn metadata(&self) -> Option<&TurnMetadata> {
        match &self.kind {
            EntryKind::Answer(metadata) => Some(metadata),
            _ => None,
        }
    }
}

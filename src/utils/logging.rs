use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use tracing_subscriber::EnvFilter;

use crate::core::message::{EntryKind, Sender, TranscriptEntry};

/// Environment variable holding the tracing filter directive.
pub const LOG_FILTER_ENV: &str = "OPTIROUTE_LOG";

/// Append-only plain-text record of a chat session.
///
/// Only settled entries are written; "Thinking..." placeholders never reach
/// the file. A failed write disables the log for the rest of the session.
pub struct TranscriptLog {
    file_path: Option<String>,
    is_active: bool,
}

impl TranscriptLog {
    pub fn new(log_file: Option<String>) -> io::Result<Self> {
        let mut logging = TranscriptLog {
            file_path: None,
            is_active: false,
        };
        if let Some(path) = log_file {
            Self::test_file_access(&path)?;
            logging.file_path = Some(path);
            logging.is_active = true;
        }
        Ok(logging)
    }

    pub fn disabled() -> Self {
        TranscriptLog {
            file_path: None,
            is_active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn disable(&mut self) {
        self.is_active = false;
    }

    pub fn write_session_header(&self, base_url: &str) -> io::Result<()> {
        let started = Local::now().format("%Y-%m-%d %H:%M:%S");
        self.log_message(&format!("## Session started {started} against {base_url}"))
    }

    pub fn record_entry(&self, entry: &TranscriptEntry) -> io::Result<()> {
        match format_entry(entry) {
            Some(content) => self.log_message(&content),
            None => Ok(()),
        }
    }

    pub fn log_message(&self, content: &str) -> io::Result<()> {
        let Some(file_path) = self.file_path.as_deref().filter(|_| self.is_active) else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer)?;
        writer.flush()
    }

    pub fn get_status_string(&self) -> String {
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), active) => format!(
                "{} ({})",
                if active { "active" } else { "stopped" },
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
        }
    }

    fn test_file_access(path: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.flush()
    }
}

fn format_entry(entry: &TranscriptEntry) -> Option<String> {
    let prefix = match entry.sender {
        Sender::User => "You",
        Sender::Ai => "AI",
    };
    match &entry.kind {
        EntryKind::Pending => None,
        EntryKind::Prompt | EntryKind::Error => Some(format!("{prefix}: {}", entry.text)),
        EntryKind::Answer(metadata) => Some(format!(
            "{prefix}: {}\n[{}]",
            entry.text,
            metadata.summary()
        )),
    }
}

/// Where diagnostic tracing output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TracingTarget {
    Stderr,
    File(PathBuf),
}

/// Installs the global tracing subscriber. The filter comes from
/// [`LOG_FILTER_ENV`] and falls back to `info`. Calling this twice keeps the
/// first subscriber.
pub fn init_tracing(target: TracingTarget) -> io::Result<()> {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // A subscriber installed earlier wins; that is not an error here.
    let _ = match target {
        TracingTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        TracingTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    Ok(())
}

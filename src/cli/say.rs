//! TUI-less "say" command

use std::error::Error;
use std::sync::Arc;
use std::time::Instant;

use crate::api::{GenerationBackend, HttpGenerationBackend};
use crate::cli::open_transcript_log;
use crate::core::message::TranscriptEntry;
use crate::core::routing::TurnMetadata;
use crate::core::turn_service::{TurnId, TurnMessage, TurnParams, TurnService};
use crate::utils::input::sanitize_text_input;

/// What a finished `say` run prints and how the process exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SayOutput {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub exit_code: i32,
}

impl SayOutput {
    pub fn from_entry(entry: &TranscriptEntry) -> Self {
        match entry.metadata() {
            Some(metadata) => Self {
                stdout: vec![entry.text.clone(), format!("[{}]", metadata.summary())],
                stderr: Vec::new(),
                exit_code: 0,
            },
            None => Self {
                stdout: Vec::new(),
                stderr: vec![format!("❌ {}", entry.text)],
                exit_code: 1,
            },
        }
    }
}

pub async fn run_say(
    prompt: Vec<String>,
    client: reqwest::Client,
    base_url: String,
    log_file: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ").trim().to_string();
    if prompt.is_empty() {
        eprintln!("Usage: optiroute say <prompt>");
        std::process::exit(1);
    }

    let logging = open_transcript_log(log_file, &base_url)?;
    logging.record_entry(&TranscriptEntry::user(prompt.clone()))?;

    let backend = Arc::new(HttpGenerationBackend::new(client, base_url));
    let entry = ask_once(backend, prompt).await;
    logging.record_entry(&entry)?;

    let output = SayOutput::from_entry(&entry);
    for line in &output.stdout {
        println!("{line}");
    }
    for line in &output.stderr {
        eprintln!("{line}");
    }
    if output.exit_code != 0 {
        std::process::exit(output.exit_code);
    }
    Ok(())
}

/// Runs a single turn through the turn service and returns the entry that
/// would have replaced its placeholder.
pub async fn ask_once(backend: Arc<dyn GenerationBackend>, prompt: String) -> TranscriptEntry {
    let (turn_service, mut rx) = TurnService::new();
    turn_service.spawn_turn(TurnParams {
        backend,
        prompt,
        turn_id: TurnId::new(1),
        started_at: Instant::now(),
    });

    match rx.recv().await {
        Some((TurnMessage::Fulfilled(result), _)) => {
            let metadata = TurnMetadata::from_result(&result);
            TranscriptEntry::answer(sanitize_text_input(&result.text), metadata)
        }
        Some((TurnMessage::Failed(err), _)) => {
            TranscriptEntry::error(sanitize_text_input(&err.to_string()))
        }
        None => TranscriptEntry::error("request task ended without a result"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{json_response, spawn_http_stub};

    async fn say_against(response: String) -> SayOutput {
        let (base_url, server) = spawn_http_stub(response).await;
        let backend = Arc::new(HttpGenerationBackend::new(reqwest::Client::new(), base_url));
        let entry = ask_once(backend, "hello".to_string()).await;
        let captured = server.await.expect("join").expect("request captured");
        assert!(captured.request_line.starts_with("POST /generate"));
        SayOutput::from_entry(&entry)
    }

    #[tokio::test]
    async fn answer_prints_text_and_metadata() {
        let output = say_against(json_response(
            200,
            r#"{"text":"hi there","routed_to":"local","cost":0.00002,"latency":0.15}"#,
        ))
        .await;

        assert_eq!(
            output,
            SayOutput {
                stdout: vec!["hi there".into(), "[LOCAL | $0.000020 | 150ms]".into()],
                stderr: Vec::new(),
                exit_code: 0,
            }
        );
    }

    #[tokio::test]
    async fn server_error_goes_to_stderr_and_exits_nonzero() {
        let output = say_against(json_response(500, r#"{"detail":"provider exploded"}"#)).await;

        assert!(output.stdout.is_empty());
        assert_eq!(output.exit_code, 1);
        assert_eq!(
            output.stderr,
            vec![
                "❌ Error: Server responded with 500 Internal Server Error: provider exploded"
                    .to_string()
            ]
        );
    }
}

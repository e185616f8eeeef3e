use std::sync::Arc;

use super::*;
use crate::api::TurnError;
use crate::core::message::{EntryKind, Sender, TranscriptEntry, PLACEHOLDER_LABEL};
use crate::core::routing::{GenerationResult, RoutingCategory};
use crate::core::turn_service::{TurnId, TurnParams};
use crate::utils::logging::TranscriptLog;
use crate::utils::test_utils::{create_test_app, create_test_app_with_backend, ScriptedBackend};

fn type_and_submit(app: &mut App, text: &str) -> Option<TurnParams> {
    app.ui.insert_into_input(text);
    apply_actions(app, [AppAction::SubmitInput])
        .into_iter()
        .next()
        .map(|command| match command {
            AppCommand::SpawnTurn(params) => params,
        })
}

fn texts(app: &App) -> Vec<String> {
    app.transcript.entries().map(|e| e.text.clone()).collect()
}

fn result(text: &str, routed_to: &str, cost: f64, latency: f64) -> GenerationResult {
    GenerationResult {
        text: text.to_string(),
        routed_to: Some(routed_to.to_string()),
        cost,
        latency,
        cached: false,
    }
}

#[test]
fn blank_input_changes_nothing() {
    let mut app = create_test_app();
    assert!(type_and_submit(&mut app, "").is_none());
    assert!(type_and_submit(&mut app, "    ").is_none());

    assert!(app.transcript.is_empty());
    assert_eq!(app.pending_turn_count(), 0);
    assert_eq!(app.metrics.current_total(), 0.0);
    // Whitespace stays in the field; only real submissions clear it.
    assert_eq!(app.ui.get_input_text(), "    ");
}

#[test]
fn pasted_text_then_submit_spawns_exactly_one_turn() {
    let mut app = create_test_app();
    let commands = apply_actions(
        &mut app,
        [
            AppAction::InsertIntoInput {
                text: "pasted prompt".into(),
            },
            AppAction::SubmitInput,
            AppAction::SubmitInput,
        ],
    );

    assert_eq!(commands.len(), 1, "second submit sees an empty field");
    let AppCommand::SpawnTurn(params) = &commands[0];
    assert_eq!(params.prompt, "pasted prompt");
    assert_eq!(app.pending_turn_count(), 1);
}

#[test]
fn submit_shows_prompt_and_placeholder_immediately() {
    let mut app = create_test_app();
    let params = type_and_submit(&mut app, "  hello  ").expect("turn spawned");

    assert_eq!(params.prompt, "hello");
    assert_eq!(app.ui.get_input_text(), "");
    let entries: Vec<&TranscriptEntry> = app.transcript.entries().collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].sender, Sender::User);
    assert_eq!(entries[0].text, "hello");
    assert!(entries[1].is_pending());
    assert_eq!(entries[1].text, PLACEHOLDER_LABEL);

    let turn = app.turn(params.turn_id).expect("turn tracked");
    assert_eq!(turn.state, TurnState::Pending);
    assert_eq!(turn.prompt_text, "hello");
}

#[test]
fn successful_turn_replaces_placeholder_with_answer() {
    let mut app = create_test_app();
    let params = type_and_submit(&mut app, "hello").expect("turn spawned");

    apply_actions(
        &mut app,
        [AppAction::TurnFulfilled {
            turn_id: params.turn_id,
            result: result("hi", "local", 0.00002, 0.15),
        }],
    );

    assert_eq!(texts(&app), vec!["hello", "hi"]);
    assert_eq!(app.transcript.pending_count(), 0);
    let metadata = app
        .transcript
        .last()
        .and_then(TranscriptEntry::metadata)
        .expect("answer metadata");
    assert_eq!(metadata.category, RoutingCategory::Local);
    assert_eq!(metadata.summary(), "LOCAL | $0.000020 | 150ms");

    assert_eq!(app.metrics.current_total(), 0.00002);
    assert_eq!(app.metrics.last_latency(), Some(0.15));
    assert_eq!(
        app.turn(params.turn_id).map(|t| t.state),
        Some(TurnState::Fulfilled)
    );
}

#[test]
fn failed_turn_shows_error_and_leaves_cost_alone() {
    let mut app = create_test_app();
    let params = type_and_submit(&mut app, "hello").expect("turn spawned");

    apply_actions(
        &mut app,
        [AppAction::TurnFailed {
            turn_id: params.turn_id,
            error: TurnError::transport("Connection refused"),
        }],
    );

    assert_eq!(texts(&app), vec!["hello", "Error: Connection refused"]);
    assert!(matches!(
        app.transcript.last().map(|e| &e.kind),
        Some(EntryKind::Error)
    ));
    assert_eq!(app.metrics.current_total(), 0.0);
    assert_eq!(app.metrics.last_latency(), None);
    assert_eq!(
        app.turn(params.turn_id).map(|t| t.state),
        Some(TurnState::Failed)
    );
}

#[test]
fn concurrent_turns_resolve_independently() {
    let mut app = create_test_app();
    let first = type_and_submit(&mut app, "first").expect("first turn");
    let second = type_and_submit(&mut app, "second").expect("second turn");
    assert_ne!(first.turn_id, second.turn_id);
    assert_eq!(app.transcript.pending_count(), 2);

    // The later request finishes first.
    app.complete_turn(second.turn_id, result("two", "gpt4", 0.001, 0.9));
    assert_eq!(texts(&app), vec!["first", PLACEHOLDER_LABEL, "second", "two"]);
    assert_eq!(app.pending_turn_count(), 1);

    app.fail_turn(first.turn_id, TurnError::decode("missing field `text`"));
    assert_eq!(
        texts(&app),
        vec![
            "first",
            "second",
            "two",
            "Error: Malformed response: missing field `text`"
        ]
    );
    assert_eq!(app.transcript.pending_count(), 0);
    assert_eq!(app.metrics.current_total(), 0.001);
}

#[test]
fn session_cost_is_the_sum_of_fulfilled_turns() {
    let mut app = create_test_app();
    let costs = [0.00002, 0.0, 0.0015, 0.00031];
    let mut expected = 0.0;
    let mut previous = 0.0;

    for (index, cost) in costs.iter().enumerate() {
        let params = type_and_submit(&mut app, &format!("prompt {index}")).expect("turn");
        app.complete_turn(params.turn_id, result("ok", "huggingface", *cost, 0.2));
        expected += cost;
        assert!(app.metrics.current_total() >= previous);
        previous = app.metrics.current_total();
    }
    let failed = type_and_submit(&mut app, "doomed").expect("turn");
    app.fail_turn(failed.turn_id, TurnError::transport("timeout"));

    assert_eq!(app.metrics.current_total(), expected);
}

#[test]
fn late_or_duplicate_completions_are_ignored() {
    let mut app = create_test_app();
    let params = type_and_submit(&mut app, "hello").expect("turn spawned");

    assert!(app.complete_turn(params.turn_id, result("hi", "local", 0.5, 0.1)));
    assert!(!app.complete_turn(params.turn_id, result("again", "local", 0.5, 0.1)));
    assert!(!app.fail_turn(params.turn_id, TurnError::transport("late")));
    assert!(!app.complete_turn(TurnId::new(99), result("ghost", "local", 1.0, 0.1)));

    assert_eq!(texts(&app), vec!["hello", "hi"]);
    assert_eq!(app.metrics.current_total(), 0.5);
}

#[test]
fn answer_text_is_cleaned_before_display() {
    let mut app = create_test_app();
    let params = type_and_submit(&mut app, "hello").expect("turn spawned");
    app.complete_turn(
        params.turn_id,
        result("\x1b[2Jline one\r\nline\ttwo", "local", 0.0, 0.0),
    );

    assert_eq!(
        app.transcript.last().map(|e| e.text.as_str()),
        Some("[2Jline one\nline    two")
    );
}

#[tokio::test]
async fn spawned_request_uses_the_session_backend() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.respond_to("hello", Ok(ScriptedBackend::local_result("hi")));
    let mut app = create_test_app_with_backend(backend.clone());

    let params = type_and_submit(&mut app, "hello").expect("turn spawned");
    let outcome = params
        .backend
        .generate(crate::api::GenerateRequest::for_prompt(params.prompt.clone()))
        .await
        .expect("scripted answer");
    app.complete_turn(params.turn_id, outcome);

    assert_eq!(texts(&app), vec!["hello", "hi"]);
    assert_eq!(backend.requests().len(), 1);
}

#[test]
fn transcript_log_mirrors_settled_entries() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = dir.path().join("session.log");
    let mut app = create_test_app();
    app.session.logging =
        TranscriptLog::new(Some(path.to_string_lossy().into_owned())).expect("log");

    let params = type_and_submit(&mut app, "hello").expect("turn spawned");
    app.complete_turn(params.turn_id, result("hi", "local", 0.00002, 0.15));

    let contents = std::fs::read_to_string(&path).expect("read log");
    assert_eq!(
        contents,
        "You: hello\n\nAI: hi\n[LOCAL | $0.000020 | 150ms]\n\n"
    );
}

#[test]
fn failing_transcript_log_is_disabled_with_a_status_message() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = dir.path().join("session.log");
    let mut app = create_test_app();
    app.session.logging =
        TranscriptLog::new(Some(path.to_string_lossy().into_owned())).expect("log");
    // Replace the file with a directory so the next append fails.
    std::fs::remove_file(&path).expect("remove log");
    std::fs::create_dir(&path).expect("dir in its place");

    let params = type_and_submit(&mut app, "hello");
    assert!(params.is_some());
    assert!(!app.session.logging.is_active());
    assert!(app
        .ui
        .status
        .as_deref()
        .is_some_and(|status| status.starts_with("Transcript log disabled")));
    assert_eq!(app.transcript.len(), 2);
}

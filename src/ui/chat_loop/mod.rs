//! Main chat event loop.
//!
//! Terminal events, finished turns and queued actions arrive on three
//! channels. Each pass of the loop drains all of them, applies the resulting
//! actions to the shared [`App`], starts any requested turns and redraws when
//! something changed.

mod keybindings;
mod lifecycle;

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::prelude::Size;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use self::keybindings::{handle_key, KeyLoopAction};
use self::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use crate::core::app::{apply_actions, App, AppAction, AppActionDispatcher, AppCommand};
use crate::core::turn_service::{TurnId, TurnMessage, TurnService};
use crate::ui::renderer::ui;
use crate::utils::input::sanitize_paste;

const MAX_FPS: u64 = 60;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

/// Shared, lockable access to the [`App`] from the loop and its helpers.
#[derive(Clone)]
pub struct AppHandle {
    inner: Arc<Mutex<App>>,
}

impl AppHandle {
    pub fn new(inner: Arc<Mutex<App>>) -> Self {
        Self { inner }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&App) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}

async fn current_terminal_size(terminal: &SharedTerminal) -> Size {
    let terminal_guard = terminal.lock().await;
    terminal_guard.size().unwrap_or_default()
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let mut terminal_guard = terminal.lock().await;
    app.read(|app| terminal_guard.draw(|f| ui(f, app)).map(|_| ()))
        .await?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

struct EventProcessingOutcome {
    events_processed: bool,
    exit_requested: bool,
}

async fn process_ui_events(
    app: &AppHandle,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
    term_size: Size,
) -> EventProcessingOutcome {
    let mut outcome = EventProcessingOutcome {
        events_processed: false,
        exit_requested: false,
    };

    while let Ok(ev) = event_rx.try_recv() {
        outcome.events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                let action = app
                    .update(|app| {
                        handle_key(app, dispatcher, &key, term_size.width, term_size.height)
                    })
                    .await;
                if action == KeyLoopAction::Exit {
                    outcome.exit_requested = true;
                    break;
                }
            }
            UiEvent::Crossterm(Event::Paste(text)) => handle_paste_event(dispatcher, &text),
            UiEvent::Crossterm(_) => {}
        }
    }

    outcome
}

pub(crate) fn handle_paste_event(dispatcher: &AppActionDispatcher, text: &str) {
    let sanitized_text = sanitize_paste(text);
    if sanitized_text.is_empty() {
        return;
    }
    dispatcher.dispatch(AppAction::InsertIntoInput {
        text: sanitized_text,
    });
}

/// Turns finished requests into actions. Whether a result still matters is
/// decided when the action is applied.
fn process_turn_updates(
    dispatcher: &AppActionDispatcher,
    rx: &mut mpsc::UnboundedReceiver<(TurnMessage, TurnId)>,
) -> bool {
    let mut actions = Vec::new();
    while let Ok((message, turn_id)) = rx.try_recv() {
        actions.push(match message {
            TurnMessage::Fulfilled(result) => AppAction::TurnFulfilled { turn_id, result },
            TurnMessage::Failed(error) => AppAction::TurnFailed { turn_id, error },
        });
    }

    if actions.is_empty() {
        return false;
    }
    dispatcher.dispatch_many(actions);
    true
}

async fn drain_action_queue(
    app: &AppHandle,
    turn_service: &TurnService,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(action) = action_rx.try_recv() {
        pending.push(action);
    }

    if pending.is_empty() {
        return false;
    }

    let commands = app.update(|app| apply_actions(app, pending)).await;
    for cmd in commands {
        match cmd {
            AppCommand::SpawnTurn(params) => turn_service.spawn_turn(params),
        }
    }
    true
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

pub async fn run_chat(app: App) -> Result<(), Box<dyn Error>> {
    let base_url = app.session.base_url.clone();
    let app = AppHandle::new(Arc::new(Mutex::new(app)));

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let (turn_service, mut turn_rx) = TurnService::new();

    let terminal = setup_terminal()?;
    info!(base_url = %base_url, "chat session started");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if app.read(|app| app.ui.exit_requested).await {
            break 'main_loop Ok(());
        }

        if let Err(err) = try_draw_frame(
            &app,
            &terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )
        .await
        {
            break 'main_loop Err(err.into());
        }

        let term_size = current_terminal_size(&terminal).await;
        let event_outcome = process_ui_events(&app, &mut event_rx, &dispatcher, term_size).await;
        if event_outcome.exit_requested {
            break 'main_loop Ok(());
        }
        if event_outcome.events_processed {
            request_redraw = true;
        }

        let received_any = process_turn_updates(&dispatcher, &mut turn_rx);
        if received_any {
            request_redraw = true;
        }

        if drain_action_queue(&app, &turn_service, &mut action_rx).await {
            request_redraw = true;
        }

        let idle = !event_outcome.events_processed && !received_any && !request_redraw;
        if idle {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    event_reader_handle.abort();
    restore_terminal(&terminal).await?;

    let (total, pending) = app
        .read(|app| (app.metrics.current_total(), app.pending_turn_count()))
        .await;
    debug!(total_cost = total, abandoned_turns = pending, "chat session ended");

    result
}

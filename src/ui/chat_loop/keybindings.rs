//! Key handling for the chat screen.
//!
//! Submission goes through the action queue so it shares the same path as
//! every other state change. Scrolling and line editing act on the app
//! directly since they never start background work.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::Input as TAInput;

use crate::core::app::{App, AppAction, AppActionDispatcher};
use crate::ui::renderer::{chat_areas, transcript_max_offset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLoopAction {
    Continue,
    Redraw,
    Exit,
}

pub fn handle_key(
    app: &mut App,
    dispatcher: &AppActionDispatcher,
    key: &KeyEvent,
    term_width: u16,
    term_height: u16,
) -> KeyLoopAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => {
            app.ui.exit_requested = true;
            KeyLoopAction::Exit
        }
        KeyCode::Esc => {
            app.ui.exit_requested = true;
            KeyLoopAction::Exit
        }
        KeyCode::Enter => {
            dispatcher.dispatch(AppAction::SubmitInput);
            KeyLoopAction::Redraw
        }
        KeyCode::Char('s') if ctrl => {
            dispatcher.dispatch(AppAction::SubmitInput);
            KeyLoopAction::Redraw
        }
        // tui-textarea treats these as newline shortcuts; the prompt is one line.
        KeyCode::Char('m' | 'j') if ctrl => KeyLoopAction::Continue,
        KeyCode::Tab | KeyCode::BackTab => KeyLoopAction::Continue,
        _ => {
            if handle_navigation_keys(app, key.code, term_width, term_height) {
                return KeyLoopAction::Redraw;
            }
            if app.ui.textarea_mut().input(TAInput::from(*key)) {
                app.ui.clear_status();
            }
            KeyLoopAction::Redraw
        }
    }
}

/// Handles Up/Down/PageUp/PageDown/Home/End against the transcript.
pub fn handle_navigation_keys(
    app: &mut App,
    key_code: KeyCode,
    term_width: u16,
    term_height: u16,
) -> bool {
    let max_offset = transcript_max_offset(app, term_width, term_height);
    let page = chat_areas(ratatui::layout::Rect::new(0, 0, term_width, term_height))
        .transcript
        .height
        .saturating_sub(1)
        .max(1);

    match key_code {
        KeyCode::Up => app.transcript.scroll_up(1, max_offset),
        KeyCode::Down => app.transcript.scroll_down(1, max_offset),
        KeyCode::PageUp => app.transcript.scroll_up(page, max_offset),
        KeyCode::PageDown => app.transcript.scroll_down(page, max_offset),
        KeyCode::Home => app.transcript.scroll_to_top(),
        KeyCode::End => app.transcript.pin_to_bottom(),
        _ => return false,
    }
    true
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::layout::{build_transcript_lines, max_scroll_offset, wrap_lines};
use crate::core::app::App;
use crate::core::routing::{format_cost, latency_millis};

const INPUT_TITLE: &str = "Prompt (Enter or Ctrl+S to send, Esc or Ctrl+C to quit)";

/// Screen regions, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatAreas {
    pub title: Rect,
    pub transcript: Rect,
    pub status: Rect,
    pub input: Rect,
}

pub fn chat_areas(area: Rect) -> ChatAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(3), // one text row plus borders
        ])
        .split(area);

    ChatAreas {
        title: chunks[0],
        transcript: chunks[1],
        status: chunks[2],
        input: chunks[3],
    }
}

/// Wrapped transcript rows for `area` and the largest valid scroll offset.
pub fn transcript_view(app: &App, area: Rect) -> (Vec<Line<'static>>, u16) {
    let lines = build_transcript_lines(&app.transcript, &app.ui.theme);
    let wrapped = wrap_lines(&lines, area.width);
    let max_offset = max_scroll_offset(&wrapped, area.height);
    (wrapped, max_offset)
}

/// Max scroll offset for a terminal of the given size.
pub fn transcript_max_offset(app: &App, term_width: u16, term_height: u16) -> u16 {
    let areas = chat_areas(Rect::new(0, 0, term_width, term_height));
    transcript_view(app, areas.transcript).1
}

/// `Session cost: $0.000020 | Last latency: 150 ms`, plus the number of turns
/// still waiting when there are any.
pub fn status_text(app: &App) -> String {
    let latency = app
        .metrics
        .last_latency()
        .map(|secs| format!("{} ms", latency_millis(secs)))
        .unwrap_or_else(|| "--".to_string());
    let mut status = format!(
        "Session cost: {} | Last latency: {}",
        format_cost(app.metrics.current_total()),
        latency
    );
    let in_flight = app.pending_turn_count();
    if in_flight > 0 {
        status.push_str(&format!(" | In flight: {in_flight}"));
    }
    status
}

pub fn title_text(app: &App) -> String {
    format!(
        "OptiRoute Chat v{} • {} • Logging: {}",
        env!("CARGO_PKG_VERSION"),
        app.session.base_url,
        app.session.logging.get_status_string()
    )
}

pub fn ui(f: &mut Frame, app: &App) {
    let theme = &app.ui.theme;
    let areas = chat_areas(f.area());

    f.render_widget(
        Paragraph::new(title_text(app)).style(theme.title_style),
        areas.title,
    );

    let (lines, max_offset) = transcript_view(app, areas.transcript);
    let scroll_offset = app.transcript.scroll_offset(max_offset);
    f.render_widget(
        Paragraph::new(lines).scroll((scroll_offset, 0)),
        areas.transcript,
    );

    let mut status_spans = vec![Span::styled(status_text(app), theme.status_style)];
    if let Some(notice) = &app.ui.status {
        status_spans.push(Span::styled(format!(" • {notice}"), theme.notice_style));
    }
    f.render_widget(Paragraph::new(Line::from(status_spans)), areas.status);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(INPUT_TITLE, theme.input_title_style));
    let input_inner = input_block.inner(areas.input);
    f.render_widget(input_block, areas.input);
    f.render_widget(app.ui.textarea(), input_inner);
}

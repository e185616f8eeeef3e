//! Turns the transcript into styled lines and measures how many terminal rows
//! they occupy once wrapped.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::Theme;
use crate::core::message::{EntryKind, Sender, TranscriptEntry};
use crate::core::routing::TurnMetadata;
use crate::core::transcript::Transcript;

const USER_PREFIX: &str = "You: ";
const AI_PREFIX: &str = "AI: ";
const CONTINUATION_INDENT: &str = "    ";

pub fn build_transcript_lines(transcript: &Transcript, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in transcript.entries() {
        push_entry_lines(&mut lines, entry, theme);
        lines.push(Line::default());
    }
    lines
}

fn push_entry_lines(lines: &mut Vec<Line<'static>>, entry: &TranscriptEntry, theme: &Theme) {
    let (prefix, prefix_style) = match entry.sender {
        Sender::User => (USER_PREFIX, theme.user_prefix_style),
        Sender::Ai => (AI_PREFIX, theme.ai_prefix_style),
    };
    let text_style = match entry.kind {
        EntryKind::Prompt => theme.user_text_style,
        EntryKind::Pending => theme.placeholder_style,
        EntryKind::Answer(_) => theme.ai_text_style,
        EntryKind::Error => theme.error_text_style,
    };

    for (index, text_line) in entry.text.split('\n').enumerate() {
        let lead = if index == 0 {
            Span::styled(prefix, prefix_style)
        } else {
            Span::raw(CONTINUATION_INDENT)
        };
        lines.push(Line::from(vec![
            lead,
            Span::styled(text_line.to_string(), text_style),
        ]));
    }

    if let Some(metadata) = entry.metadata() {
        lines.push(metadata_line(metadata, theme));
    }
}

/// `LOCAL | $0.000020 | 150ms` with the route tag colored by category.
pub fn metadata_line(metadata: &TurnMetadata, theme: &Theme) -> Line<'static> {
    let mut spans = vec![
        Span::raw(CONTINUATION_INDENT),
        Span::styled(
            metadata.route_label.clone(),
            theme.route_style(metadata.category),
        ),
        Span::styled(
            format!(" | {} | {}", metadata.cost_text(), metadata.latency_text()),
            theme.meta_style,
        ),
    ];
    if metadata.cached {
        spans.push(Span::styled(" | cached", theme.meta_style));
    }
    Line::from(spans)
}

/// Word-wraps `line` to `width` columns, measuring with display width.
/// Words longer than a whole row are split between characters. Whitespace at
/// a break point is dropped.
pub fn wrap_line(line: &Line<'static>, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut rows: Vec<Vec<Span<'static>>> = vec![Vec::new()];
    let mut row_width = 0usize;

    for span in &line.spans {
        for token in split_words(&span.content) {
            let token_width = UnicodeWidthStr::width(token);
            if row_width + token_width <= width {
                push_text(&mut rows, token, span.style);
                row_width += token_width;
            } else if token.chars().all(char::is_whitespace) {
                if row_width > 0 {
                    rows.push(Vec::new());
                    row_width = 0;
                }
            } else if token_width <= width {
                rows.push(Vec::new());
                push_text(&mut rows, token, span.style);
                row_width = token_width;
            } else {
                for ch in token.chars() {
                    let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
                    if row_width + ch_width > width && row_width > 0 {
                        rows.push(Vec::new());
                        row_width = 0;
                    }
                    let mut buf = [0u8; 4];
                    push_text(&mut rows, ch.encode_utf8(&mut buf), span.style);
                    row_width += ch_width;
                }
            }
        }
    }

    rows.into_iter().map(Line::from).collect()
}

pub fn wrap_lines(lines: &[Line<'static>], width: u16) -> Vec<Line<'static>> {
    lines.iter().flat_map(|line| wrap_line(line, width)).collect()
}

/// Largest scroll offset that still fills a `height`-row viewport.
pub fn max_scroll_offset(wrapped: &[Line<'_>], height: u16) -> u16 {
    u16::try_from(wrapped.len())
        .unwrap_or(u16::MAX)
        .saturating_sub(height)
}

/// Splits into alternating runs of whitespace and non-whitespace.
fn split_words(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (index, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        if in_space.is_some_and(|previous| previous != is_space) {
            tokens.push(&text[start..index]);
            start = index;
        }
        in_space = Some(is_space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

fn push_text(rows: &mut [Vec<Span<'static>>], text: &str, style: Style) {
    let Some(row) = rows.last_mut() else {
        return;
    };
    match row.last_mut() {
        Some(last) if last.style == style => last.content.to_mut().push_str(text),
        _ => row.push(Span::styled(text.to_string(), style)),
    }
}

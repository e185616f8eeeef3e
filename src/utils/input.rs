//! Text cleanup applied before anything reaches the terminal.
//!
//! Model output and pasted text can carry escape sequences or stray control
//! bytes that would corrupt the TUI, so both pass through here first.

/// Cleans text for display in the transcript.
///
/// Tabs become four spaces, `\r\n` and lone `\r` become `\n`, and every other
/// control character is dropped. Newlines survive so multi-line answers keep
/// their shape.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                sanitized.push('\n');
            }
            '\n' => sanitized.push(c),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}

/// Cleans pasted text for the single-line prompt field: same rules as
/// [`sanitize_text_input`], with line breaks folded into single spaces.
pub fn sanitize_paste(text: &str) -> String {
    sanitize_text_input(text)
        .split('\n')
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

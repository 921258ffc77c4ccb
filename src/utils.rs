// Text helpers for prompt assembly and log output

/// Marker appended when refinement context is cut short
pub const TRUNCATION_MARKER: &str = "...[truncated]";

/// First `max_chars` characters of `text` (char boundaries, not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Truncate to `max_chars` and append [`TRUNCATION_MARKER`] only when something was cut.
pub fn truncate_with_marker(text: &str, max_chars: usize) -> String {
    let head = truncate_chars(text, max_chars);
    if head.len() < text.len() {
        format!("{}{}", head, TRUNCATION_MARKER)
    } else {
        text.to_string()
    }
}

/// Short single-line preview for logs
pub fn preview(text: &str, max_chars: usize) -> String {
    let head = truncate_chars(text, max_chars);
    if head.len() < text.len() {
        format!("{}...", head)
    } else {
        head.to_string()
    }
}

/// Drop markdown emphasis/heading characters that a TTS voice would read aloud
pub fn strip_markup(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '*' | '#' | '_')).collect()
}

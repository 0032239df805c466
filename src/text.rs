//! Small text helpers shared by the parsers and the report

/// Cut `value` to at most `max_chars` characters, appending `...` when shortened
pub fn truncate(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &value[..byte_idx]),
        None => value.to_string(),
    }
}

/// First line of a message, cut to `max_chars`
pub fn first_line(message: &str, max_chars: usize) -> String {
    truncate(message.lines().next().unwrap_or_default(), max_chars)
}

//! HTML text helpers

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Collapse runs of whitespace (including newlines) into single spaces
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string to at most `length` characters, omission included
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");
    let omission_len = omission.chars().count();

    if s.chars().count() <= length {
        s.to_string()
    } else if length <= omission_len {
        // No room for the omission
        s.chars().take(length).collect::<String>().trim_end().to_string()
    } else {
        let truncated: String = s.chars().take(length - omission_len).collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}

/// One-line summary of plain text
pub fn summarize(text: &str, length: usize) -> String {
    truncate(&collapse_whitespace(text), length, None)
}

//! Lightweight message formatting
//!
//! Converts raw message text to display markup. Text is HTML-escaped first,
//! then the small markdown subset (`**bold**`, `*italic*`, newlines) is
//! rewritten, so nothing in the input can produce markup of its own.

use regex::Regex;
use std::sync::LazyLock;

#[cfg(test)]
mod proptests;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));

static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("italic pattern is valid"));

/// Escape characters that are significant in HTML text and attributes
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render raw text as markup. Bold is rewritten before italic so the
/// italic rule never sees the delimiters of a bold span.
pub fn format_message(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let escaped = escape_html(raw);
    let bolded = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    let italicized = ITALIC.replace_all(&bolded, "<em>$1</em>");
    italicized.replace('\n', "<br>")
}

/// Confidence as a one-decimal percentage, e.g. `0.9` -> `90.0%`
pub fn confidence_label(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

pub fn tag_label(tag: &str) -> String {
    format!("#{tag}")
}

//! Flattening of Rolldown errors into plain message strings.
//!
//! Rolldown reports failures as batched diagnostics whose concrete types are
//! not part of its stable surface. We only rely on their `Debug` output and
//! pull the `message: "..."` fields out of it, falling back to the whole text.

use std::sync::LazyLock;

use regex::Regex;

static MESSAGE_FIELD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"message: "((?:[^"\\]|\\.)*)""#).ok());

/// Extract one message per diagnostic from a Rolldown error value.
///
/// Never returns an empty vector.
pub fn messages_from_rolldown(error: &dyn std::fmt::Debug) -> Vec<String> {
    messages_from_debug_text(&format!("{error:?}"))
}

fn messages_from_debug_text(text: &str) -> Vec<String> {
    let mut messages: Vec<String> = Vec::new();

    if let Some(re) = MESSAGE_FIELD.as_ref() {
        for capture in re.captures_iter(text) {
            let message = unescape(&capture[1]);
            let message = message.trim();
            if !message.is_empty() && !messages.iter().any(|m| m == message) {
                messages.push(message.to_string());
            }
        }
    }

    if messages.is_empty() {
        let trimmed = text.trim();
        messages.push(if trimmed.is_empty() {
            "Unknown bundler error".to_string()
        } else {
            trimmed.to_string()
        });
    }

    messages
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

//! Build-scoped message collection.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, warn};

/// Severity of a logged [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Warning,
}

/// A single diagnostic produced during a build or while serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Append-only, thread-safe message log.
///
/// Clones share the same underlying log, so one instance is created per build
/// and handed to every task. Messages are never reordered or removed.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsLog {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl DiagnosticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&self, text: impl Into<String>) {
        let text = text.into();
        error!("{}", text);
        self.push(MessageKind::Error, text);
    }

    pub fn add_warning(&self, text: impl Into<String>) {
        let text = text.into();
        warn!("{}", text);
        self.push(MessageKind::Warning, text);
    }

    fn push(&self, kind: MessageKind, text: String) {
        self.messages.lock().push(Message { kind, text });
    }

    /// Error messages in append order.
    pub fn errors(&self) -> Vec<Message> {
        self.filtered(MessageKind::Error)
    }

    /// Warning messages in append order.
    pub fn warnings(&self) -> Vec<Message> {
        self.filtered(MessageKind::Warning)
    }

    /// Every message in append order.
    pub fn all(&self) -> Vec<Message> {
        self.messages.lock().clone()
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .lock()
            .iter()
            .any(|m| m.kind == MessageKind::Error)
    }

    fn filtered(&self, kind: MessageKind) -> Vec<Message> {
        self.messages
            .lock()
            .iter()
            .filter(|m| m.kind == kind)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_append_order() {
        let log = DiagnosticsLog::new();
        log.add_error("e1");
        log.add_warning("w1");
        log.add_error("e2");

        let all: Vec<String> = log.all().into_iter().map(|m| m.text).collect();
        assert_eq!(all, vec!["e1", "w1", "e2"]);

        let errors: Vec<String> = log.errors().into_iter().map(|m| m.text).collect();
        assert_eq!(errors, vec!["e1", "e2"]);

        let warnings: Vec<String> = log.warnings().into_iter().map(|m| m.text).collect();
        assert_eq!(warnings, vec!["w1"]);
        assert!(log.has_errors());
    }

    #[test]
    fn test_clones_share_state() {
        let log = DiagnosticsLog::new();
        let clone = log.clone();
        clone.add_warning("shared");
        assert_eq!(log.warnings().len(), 1);
        assert!(!log.has_errors());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends() {
        let log = DiagnosticsLog::new();
        let mut tasks = tokio::task::JoinSet::new();
        for task in 0..16 {
            let log = log.clone();
            tasks.spawn(async move {
                for i in 0..50 {
                    if i % 2 == 0 {
                        log.add_error(format!("task {task} error {i}"));
                    } else {
                        log.add_warning(format!("task {task} warning {i}"));
                    }
                }
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap();
        }

        assert_eq!(log.all().len(), 800);
        assert_eq!(log.errors().len(), 400);
        assert_eq!(log.warnings().len(), 400);
    }
}

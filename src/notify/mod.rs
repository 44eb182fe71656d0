//! # Notifications
//!
//! The toast sink. Every validation or run failure ends up here; the console
//! renders the most recent few and lets the user dismiss them.

use std::collections::VecDeque;

/// Maximum number of toasts kept on screen.
const MAX_NOTIFICATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

/// Anything that can surface a message to the user.
pub trait Notify {
    fn notify(&mut self, message: String, severity: Severity);
}

#[derive(Debug, Clone, Default)]
pub struct Notifications {
    entries: VecDeque<Notification>,
    next_id: u64,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent first.
    pub fn entries(&self) -> &VecDeque<Notification> {
        &self.entries
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|entry| entry.id != id);
    }
}

impl Notify for Notifications {
    fn notify(&mut self, message: String, severity: Severity) {
        match severity {
            Severity::Error => log::warn!("notify: {message}"),
            Severity::Info => log::info!("notify: {message}"),
        }

        if self.entries.len() >= MAX_NOTIFICATIONS {
            self.entries.pop_back();
        }
        self.next_id += 1;
        self.entries.push_front(Notification {
            id: self.next_id,
            message,
            severity,
        });
    }
}

#[cfg(test)]
impl Notify for Vec<(String, Severity)> {
    fn notify(&mut self, message: String, severity: Severity) {
        self.push((message, severity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_and_bounded() {
        let mut sink = Notifications::new();
        for i in 0..MAX_NOTIFICATIONS + 2 {
            sink.notify(format!("message {i}"), Severity::Info);
        }

        assert_eq!(sink.entries().len(), MAX_NOTIFICATIONS);
        assert_eq!(
            sink.entries()[0].message,
            format!("message {}", MAX_NOTIFICATIONS + 1)
        );
    }

    #[test]
    fn dismiss_removes_only_the_target() {
        let mut sink = Notifications::new();
        sink.notify("first".into(), Severity::Error);
        sink.notify("second".into(), Severity::Info);

        let first_id = sink.entries()[1].id;
        sink.dismiss(first_id);

        assert_eq!(sink.entries().len(), 1);
        assert_eq!(sink.entries()[0].message, "second");
    }

    #[test]
    fn ids_are_unique() {
        let mut sink = Notifications::new();
        sink.notify("a".into(), Severity::Info);
        sink.notify("b".into(), Severity::Info);
        assert_ne!(sink.entries()[0].id, sink.entries()[1].id);
    }
}

//! Transient user notifications ("toasts").
//!
//! A [`Notifier`] is a cheap handle onto one shared queue. The application
//! context creates it and hands clones to the services; the front end drains
//! and renders it.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::error::CoreError;

pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: NotificationKind,
    pub duration: Duration,
}

#[derive(Debug)]
struct Queue {
    default_duration: Duration,
    items: Vec<Notification>,
}

#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<Mutex<Queue>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_DURATION)
    }
}

impl Notifier {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Queue {
                default_duration,
                items: Vec::new(),
            })),
        }
    }

    fn queue(&self) -> MutexGuard<'_, Queue> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a notification and return its id.
    pub fn push(&self, message: impl Into<String>, kind: NotificationKind, duration: Option<Duration>) -> String {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(|c| char::from(c).to_ascii_lowercase())
            .collect();
        let mut queue = self.queue();
        let duration = duration.unwrap_or(queue.default_duration);
        queue.items.push(Notification {
            id: id.clone(),
            message: message.into(),
            kind,
            duration,
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.push(message, NotificationKind::Success, None)
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.push(message, NotificationKind::Error, None)
    }

    pub fn warning(&self, message: impl Into<String>) -> String {
        self.push(message, NotificationKind::Warning, None)
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.push(message, NotificationKind::Info, None)
    }

    /// Report a failed operation once.
    ///
    /// Session expiry is skipped: it is handled by a global sign-out, not
    /// shown as a local error.
    pub fn report(&self, err: &CoreError, fallback: &str) -> Option<String> {
        if err.is_session_expired() {
            return None;
        }
        Some(self.error(err.user_message(fallback)))
    }

    /// Remove one notification. Returns false if it was already gone.
    pub fn dismiss(&self, id: &str) -> bool {
        let mut queue = self.queue();
        let before = queue.items.len();
        queue.items.retain(|n| n.id != id);
        queue.items.len() != before
    }

    /// Take everything queued so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut self.queue().items)
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.queue().items.clone()
    }

    pub fn len(&self) -> usize {
        self.queue().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue().items.is_empty()
    }

    pub fn clear(&self) {
        self.queue().items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_queue() {
        let notifier = Notifier::default();
        let handle = notifier.clone();
        handle.success("Saved");
        assert_eq!(notifier.len(), 1);
        let items = notifier.drain();
        assert_eq!(items[0].kind, NotificationKind::Success);
        assert_eq!(items[0].duration, DEFAULT_NOTIFICATION_DURATION);
        assert!(handle.is_empty());
    }

    #[test]
    fn ids_are_short_lowercase_tokens() {
        let notifier = Notifier::default();
        let a = notifier.info("a");
        let b = notifier.info("b");
        assert_ne!(a, b);
        for id in [&a, &b] {
            assert_eq!(id.len(), 9);
            assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn dismiss_removes_by_id() {
        let notifier = Notifier::new(Duration::from_secs(1));
        let a = notifier.info("a");
        let b = notifier.warning("b");
        assert_ne!(a, b);
        assert!(notifier.dismiss(&a));
        assert!(!notifier.dismiss(&a));
        let left = notifier.snapshot();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].message, "b");
        assert_eq!(left[0].duration, Duration::from_secs(1));
    }

    #[test]
    fn explicit_duration_overrides_default() {
        let notifier = Notifier::default();
        notifier.push("slow", NotificationKind::Info, Some(Duration::from_secs(30)));
        assert_eq!(notifier.snapshot()[0].duration, Duration::from_secs(30));
    }

    #[test]
    fn report_skips_session_expiry() {
        let notifier = Notifier::default();
        assert!(notifier.report(&CoreError::SessionExpired, "x").is_none());
        assert!(notifier.is_empty());

        notifier.report(
            &CoreError::Api {
                status: 404,
                message: "Task not found".to_string(),
            },
            "Failed to update task",
        );
        assert_eq!(notifier.drain()[0].message, "Task not found");
    }
}

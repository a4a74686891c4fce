//! User-visible notices
//!
//! The pipeline reports every failure to the user through a [`Notifier`]
//! before handing the error back to the caller.

use std::sync::{Arc, Mutex};

/// Fallback text when nothing better is known
pub const MSG_REQUEST_FAILED: &str = "Request failed";
pub const MSG_AUTH_FAILED: &str = "Authentication failed, please retry later";
pub const MSG_ACCESS_DENIED: &str = "Access denied";
pub const MSG_NOT_FOUND: &str = "Requested resource does not exist";
pub const MSG_SERVER_ERROR: &str = "Internal server error";
pub const MSG_TIMEOUT: &str = "Request timed out, please retry later";
pub const MSG_NETWORK: &str = "Network error, please check your connection";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// Sink for user-visible notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => tracing::info!(message = %notice.message, "notice"),
            NoticeLevel::Warning => tracing::warn!(message = %notice.message, "notice"),
            NoticeLevel::Error => tracing::error!(message = %notice.message, "notice"),
        }
    }
}

/// Keeps every notice in memory, in order
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    entries: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded notices
    pub fn entries(&self) -> Vec<Notice> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Remove and return the recorded notices
    pub fn drain(&self) -> Vec<Notice> {
        self.entries
            .lock()
            .map(|mut entries| std::mem::take(&mut *entries))
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|n| n.message).collect()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        tracing::debug!(message = %notice.message, "notice recorded");
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_log_records_in_order() {
        let log = NoticeLog::new();
        let sink: Arc<dyn Notifier> = Arc::new(log.clone());
        sink.notify(Notice::error(MSG_ACCESS_DENIED));
        sink.notify(Notice::info("saved"));

        assert_eq!(log.messages(), vec![MSG_ACCESS_DENIED, "saved"]);
        assert_eq!(log.drain().len(), 2);
        assert!(log.entries().is_empty());
    }
}

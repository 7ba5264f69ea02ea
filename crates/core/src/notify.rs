use std::sync::Mutex;

use log::{error, info};

/// User-facing message emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// An attempt of a long-running operation is starting (loading indicator).
    Progress {
        operation: String,
        attempt: u32,
        max_attempts: u32,
    },
    /// Something failed after all retries; must be shown to the user.
    Error(String),
    /// A user action completed.
    Success(String),
}

/// Receives user-facing messages. The presentation layer decides how to show them.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Progress {
                operation,
                attempt,
                max_attempts,
            } => info!("{operation}: attempt {attempt}/{max_attempts}"),
            Notice::Error(message) => error!("{message}"),
            Notice::Success(message) => info!("{message}"),
        }
    }
}

/// Keeps every notice in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|n| match n {
                Notice::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|n| match n {
                Notice::Success(m) => Some(m),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

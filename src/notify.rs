//! One-way status notices for whatever front end is attached.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{Display, IntoStaticStr};
use tokio::sync::mpsc;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    /// How long a front end should keep the notice on screen.
    pub fn display_duration(self) -> Duration {
        match self {
            NoticeLevel::Info | NoticeLevel::Success => Duration::from_secs(5),
            NoticeLevel::Warning => Duration::from_secs(6),
            NoticeLevel::Error => Duration::from_secs(8),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

/// Fire-and-forget sender. Sending never blocks, and a closed or disabled
/// channel silently drops the notice.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    sender: Option<mpsc::UnboundedSender<Notice>>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn notify(&self, level: NoticeLevel, title: &str, message: impl Into<String>) {
        let notice = Notice {
            level,
            title: title.to_string(),
            message: message.into(),
        };
        trace!(level = %notice.level, title = %notice.title, "notice");

        if let Some(sender) = &self.sender {
            // The receiver may be gone; that is not the sender's problem.
            let _ = sender.send(notice);
        }
    }

    pub fn info(&self, title: &str, message: impl Into<String>) {
        self.notify(NoticeLevel::Info, title, message);
    }

    pub fn success(&self, title: &str, message: impl Into<String>) {
        self.notify(NoticeLevel::Success, title, message);
    }

    pub fn warning(&self, title: &str, message: impl Into<String>) {
        self.notify(NoticeLevel::Warning, title, message);
    }

    pub fn error(&self, title: &str, message: impl Into<String>) {
        self.notify(NoticeLevel::Error, title, message);
    }
}

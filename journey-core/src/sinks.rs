//! Notification and export sinks.
//!
//! Both are fire-and-forget from the journey's point of view: nothing in
//! the core waits on a notification, and a failed export never touches
//! the recorded answers.

use crate::questions::AnswerRecord;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Failure,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            description: None,
        }
    }

    pub fn failure(title: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Failure,
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        let description = notification.description.as_deref().unwrap_or("");
        match notification.level {
            NotificationLevel::Success => {
                info!(title = %notification.title, description, "notify: success")
            }
            NotificationLevel::Failure => {
                warn!(title = %notification.title, description, "notify: failure")
            }
        }
    }
}

/// Errors from the export sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("No exporter configured")]
    Unavailable,

    #[error("Export failed: {0}")]
    Failed(String),
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested download name, e.g. `refleksi.png`.
    pub file_name: String,
    pub location: Option<PathBuf>,
}

/// Renders the answers into a downloadable image.
#[async_trait]
pub trait AnswerExporter: Send + Sync {
    async fn export(&self, answers: &AnswerRecord) -> Result<ExportArtifact, ExportError>;
}

//! Workflow Messages
//!
//! Messages sent from the workflow to the presentation layer. Surfaces read
//! the full state through the workflow's accessors; these messages tell
//! them *when* to look and carry the short notifications (toasts) a user
//! sees after each submission.

use serde::{Deserialize, Serialize};

/// Messages from the workflow to a UI surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowMessage {
    /// The workflow moved to a new phase
    StateChanged {
        /// The phase just entered
        phase: WorkflowPhase,
    },

    /// Short notification for the user
    Notify {
        /// Severity
        level: NotifyLevel,
        /// Headline
        title: String,
        /// Body text
        message: String,
    },
}

impl WorkflowMessage {
    /// Create a notification
    pub fn notify(
        level: NotifyLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Notify {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Notification severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Success
    Success,
    /// Warning
    Warning,
    /// Error
    Error,
}

/// Lifecycle phase of the workflow, without payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    /// Nothing submitted yet
    Idle,
    /// A request is in flight
    Submitting,
    /// The last request produced a result
    Succeeded,
    /// The last request failed
    Failed,
}

impl WorkflowPhase {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Submitting => "Processing image...",
            Self::Succeeded => "Classification complete",
            Self::Failed => "Classification failed",
        }
    }

    /// Whether this phase ends a submission
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

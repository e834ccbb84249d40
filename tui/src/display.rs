//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from `WorkflowMessage`s and the workflow's accessors,
//! and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the workflow tells it.
//! Display state is the bridge between the workflow and rendering.
//!
//! - `DisplayResult`: the last successful classification, already projected
//! - `DisplayNotification`: the last short notification and its age

use std::time::Duration;

use classifier_core::{
    ClassificationBackend, DisplayEntry, ErrorInfo, NotifyLevel, WorkflowMessage, WorkflowPhase,
};

use crate::workflow_client::WorkflowClient;

/// How long a notification stays on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(6);

/// Shown while a request is in flight
pub const PROCESSING_HINT: &str =
    "Processing the image, this may take a few minutes for large images...";

/// A successful classification, ready to render
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayResult {
    /// Objects detected, as reported by the service
    pub object_count: u64,
    /// Informational message from the service
    pub message: Option<String>,
    /// Ordered, colored breakdown
    pub entries: Vec<DisplayEntry>,
    /// Whether the service sent an annotated image
    pub has_image: bool,
}

impl DisplayResult {
    /// One-line note on whether the annotated image came back
    pub fn annotated_image_line(&self) -> &'static str {
        if self.has_image {
            "Annotated image received (save it with `stargaze --save-image`)"
        } else {
            "No annotated image returned"
        }
    }
}

/// A notification to display
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayNotification {
    /// Notification level
    pub level: NotifyLevel,
    /// Headline
    pub title: String,
    /// Message content
    pub message: String,
    /// Time on screen so far
    pub age: Duration,
}

/// Complete display state
#[derive(Clone, Debug)]
pub struct DisplayState {
    /// Workflow phase
    pub phase: WorkflowPhase,
    /// Last successful result (Succeeded only)
    pub result: Option<DisplayResult>,
    /// Last error (Failed only)
    pub error: Option<ErrorInfo>,
    /// Pending notification (if any)
    pub notification: Option<DisplayNotification>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            phase: WorkflowPhase::Idle,
            result: None,
            error: None,
            notification: None,
        }
    }
}

impl DisplayState {
    /// Create a new display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a `WorkflowMessage` to update display state
    pub fn apply_message(&mut self, msg: WorkflowMessage) {
        match msg {
            WorkflowMessage::StateChanged { phase } => {
                self.phase = phase;
            }
            WorkflowMessage::Notify {
                level,
                title,
                message,
            } => {
                self.show_notification(level, title, message);
            }
        }
    }

    /// Re-read result and error from the workflow
    pub fn refresh<B: ClassificationBackend + 'static>(&mut self, client: &WorkflowClient<B>) {
        self.phase = client.phase();
        self.error = client.error().cloned();
        self.result = client.response().map(|response| DisplayResult {
            object_count: response.object_count,
            message: response.message.clone(),
            entries: client.entries(),
            has_image: response.annotated_image.is_some(),
        });
    }

    /// Show a notification raised by the app itself
    pub fn show_notification(
        &mut self,
        level: NotifyLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.notification = Some(DisplayNotification {
            level,
            title: title.into(),
            message: message.into(),
            age: Duration::ZERO,
        });
    }

    /// Age the notification and drop it once it has expired
    pub fn update(&mut self, delta: Duration) {
        if let Some(ref mut notification) = self.notification {
            notification.age += delta;
            if notification.age >= NOTIFICATION_TTL {
                self.notification = None;
            }
        }
    }

    /// Status line text
    pub fn status_line(&self) -> &'static str {
        self.phase.description()
    }

    /// Hint shown while processing
    pub fn processing_hint(&self) -> Option<&'static str> {
        (self.phase == WorkflowPhase::Submitting).then_some(PROCESSING_HINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_state_changed_updates_phase() {
        let mut display = DisplayState::new();
        assert_eq!(display.status_line(), "Ready");
        assert_eq!(display.processing_hint(), None);

        display.apply_message(WorkflowMessage::StateChanged {
            phase: WorkflowPhase::Submitting,
        });
        assert_eq!(display.phase, WorkflowPhase::Submitting);
        assert_eq!(display.processing_hint(), Some(PROCESSING_HINT));
    }

    #[test]
    fn test_notify_sets_notification() {
        let mut display = DisplayState::new();
        display.apply_message(WorkflowMessage::notify(
            NotifyLevel::Success,
            "Classification complete",
            "2 objects detected",
        ));

        let notification = display.notification.as_ref().unwrap();
        assert_eq!(notification.level, NotifyLevel::Success);
        assert_eq!(notification.message, "2 objects detected");
    }

    #[test]
    fn test_notification_expires() {
        let mut display = DisplayState::new();
        display.show_notification(
            NotifyLevel::Error,
            "No file selected",
            "Please select an image file",
        );

        display.update(NOTIFICATION_TTL / 2);
        assert!(display.notification.is_some());

        display.update(NOTIFICATION_TTL);
        assert!(display.notification.is_none());
    }

    #[test]
    fn test_annotated_image_line() {
        let mut result = DisplayResult {
            object_count: 0,
            message: None,
            entries: Vec::new(),
            has_image: false,
        };
        assert_eq!(result.annotated_image_line(), "No annotated image returned");

        result.has_image = true;
        assert!(result.annotated_image_line().starts_with("Annotated image received"));
    }

    #[test]
    fn test_newer_notification_replaces_older() {
        let mut display = DisplayState::new();
        display.show_notification(NotifyLevel::Info, "a", "first");
        display.update(Duration::from_secs(5));
        display.show_notification(NotifyLevel::Info, "b", "second");

        let notification = display.notification.as_ref().unwrap();
        assert_eq!(notification.message, "second");
        assert_eq!(notification.age, Duration::ZERO);
    }
}

//! Workflow Client
//!
//! Thin wrapper around the classification workflow for TUI integration.
//! The client embeds the workflow directly and gives the app a small
//! surface: submit a path, poll for the result, drain messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it holds no classification logic. Request
//! building, state transitions and projection all live in `classifier-core`.
//! The TUI's job is:
//! 1. Turn the typed path into a submission
//! 2. Poll the workflow every frame
//! 3. Receive `WorkflowMessage`s
//! 4. Render display state from the workflow's accessors

use std::path::Path;

use tokio::sync::mpsc;

use classifier_core::{
    http_workflow, ClassificationBackend, ClassificationRequest, ClassificationResponse,
    ClassificationWorkflow, ClassifierConfig, ClassifyError, ConfigError, DisplayEntry, ErrorInfo,
    HttpBackend, SubmitOutcome, WorkflowMessage, WorkflowPhase,
};

/// Channel capacity between the workflow and the app
const CHANNEL_CAPACITY: usize = 100;

/// Client for driving the embedded workflow
pub struct WorkflowClient<B: ClassificationBackend + 'static> {
    /// The embedded workflow
    workflow: ClassificationWorkflow<B>,
    /// Receiver for messages from the workflow
    rx: mpsc::Receiver<WorkflowMessage>,
}

impl WorkflowClient<HttpBackend> {
    /// Create a client talking HTTP to the configured endpoint
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let workflow = http_workflow(config, tx)?;
        Ok(Self { workflow, rx })
    }
}

impl<B: ClassificationBackend + 'static> WorkflowClient<B> {
    /// Create a client around any backend
    pub fn new(backend: B, catalog: classifier_core::ClassCatalog) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let workflow = ClassificationWorkflow::new(backend, catalog, tx);
        Self { workflow, rx }
    }

    /// Submit the image at `path`
    ///
    /// An empty path is a submission without a file. While a request is in
    /// flight the call is ignored before the file is touched.
    pub async fn submit_path(&mut self, path: &str) -> Result<SubmitOutcome, ClassifyError> {
        if self.workflow.is_submitting() {
            tracing::debug!(path, "Submit ignored, request already in flight");
            return Ok(SubmitOutcome::Ignored);
        }

        let path = path.trim();
        let request = if path.is_empty() {
            None
        } else {
            Some(ClassificationRequest::from_path(Path::new(path)).await?)
        };

        self.workflow.submit(request).await
    }

    /// Apply the in-flight result if it has settled (non-blocking)
    pub async fn poll(&mut self) -> bool {
        self.workflow.poll().await
    }

    /// Receive all pending messages from the workflow (non-blocking)
    pub fn recv_all(&mut self) -> Vec<WorkflowMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Current phase
    pub fn phase(&self) -> WorkflowPhase {
        self.workflow.phase()
    }

    /// Whether a request is in flight
    pub fn is_submitting(&self) -> bool {
        self.workflow.is_submitting()
    }

    /// Last successful response
    pub fn response(&self) -> Option<&ClassificationResponse> {
        self.workflow.response()
    }

    /// Last error
    pub fn error(&self) -> Option<&ErrorInfo> {
        self.workflow.error()
    }

    /// Projected breakdown of the current result
    pub fn entries(&self) -> Vec<DisplayEntry> {
        self.workflow.entries()
    }

    /// Where requests go
    pub fn endpoint(&self) -> &str {
        self.workflow.backend().endpoint()
    }
}

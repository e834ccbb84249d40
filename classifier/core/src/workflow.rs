//! Classification Workflow
//!
//! Owns the submit/await/result lifecycle of a classification:
//!
//! ```text
//!            submit(file)              request settles
//!   Idle ─────────────────▶ Submitting ───────────────▶ Succeeded(response)
//!                               ▲      └──────────────▶ Failed(error)
//!                               │   submit(file)              │
//!                               └─────────────────────────────┘
//! ```
//!
//! # Design Philosophy
//!
//! The whole lifecycle lives in one [`WorkflowState`] value, so "loading
//! and failed at the same time" cannot be expressed. `submit` moves to
//! `Submitting` right away and spawns the single request on the tokio
//! runtime; the surface keeps rendering and calls [`ClassificationWorkflow::poll`]
//! (or awaits [`ClassificationWorkflow::wait`]) to pick up the result.
//! While a request is in flight further submits are ignored. There is no
//! cancellation and no timeout: a request runs until the transport settles it.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::backend::{ClassificationBackend, ClassificationRequest, ClassificationResponse};
use crate::catalog::ClassCatalog;
use crate::error::{ClassifyError, ErrorInfo};
use crate::messages::{NotifyLevel, WorkflowMessage, WorkflowPhase};
use crate::projector::{project, DisplayEntry};

/// The single source of truth for the classification lifecycle
#[derive(Clone, Debug, Default, PartialEq)]
pub enum WorkflowState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// One request is in flight
    Submitting,
    /// The last request produced a result
    Succeeded(ClassificationResponse),
    /// The last request failed
    Failed(ErrorInfo),
}

impl WorkflowState {
    /// Phase tag of this state
    #[must_use]
    pub fn phase(&self) -> WorkflowPhase {
        match self {
            Self::Idle => WorkflowPhase::Idle,
            Self::Submitting => WorkflowPhase::Submitting,
            Self::Succeeded(_) => WorkflowPhase::Succeeded,
            Self::Failed(_) => WorkflowPhase::Failed,
        }
    }
}

/// What a call to [`ClassificationWorkflow::submit`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request was sent
    Started,
    /// A request was already in flight; nothing happened
    Ignored,
}

type Settlement = Result<ClassificationResponse, ClassifyError>;

/// The classification workflow - one per session
pub struct ClassificationWorkflow<B: ClassificationBackend> {
    /// Classification backend
    backend: Arc<B>,
    /// Catalog used to project results
    catalog: ClassCatalog,
    /// Current lifecycle state
    state: WorkflowState,
    /// Result of the in-flight request, once it settles
    in_flight: Option<oneshot::Receiver<Settlement>>,
    /// Channel to the UI surface
    tx: mpsc::Sender<WorkflowMessage>,
}

impl<B: ClassificationBackend + 'static> ClassificationWorkflow<B> {
    /// Create a workflow in the `Idle` state
    pub fn new(backend: B, catalog: ClassCatalog, tx: mpsc::Sender<WorkflowMessage>) -> Self {
        Self {
            backend: Arc::new(backend),
            catalog,
            state: WorkflowState::Idle,
            in_flight: None,
            tx,
        }
    }

    /// Current state
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Current phase
    pub fn phase(&self) -> WorkflowPhase {
        self.state.phase()
    }

    /// Whether a request is in flight
    pub fn is_submitting(&self) -> bool {
        matches!(self.state, WorkflowState::Submitting)
    }

    /// The last successful response, if the workflow is `Succeeded`
    pub fn response(&self) -> Option<&ClassificationResponse> {
        match &self.state {
            WorkflowState::Succeeded(response) => Some(response),
            _ => None,
        }
    }

    /// The last error, if the workflow is `Failed`
    pub fn error(&self) -> Option<&ErrorInfo> {
        match &self.state {
            WorkflowState::Failed(info) => Some(info),
            _ => None,
        }
    }

    /// Projected class breakdown of the current result (empty otherwise)
    pub fn entries(&self) -> Vec<DisplayEntry> {
        self.response()
            .map(|r| project(&r.class_counts, &self.catalog))
            .unwrap_or_default()
    }

    /// Catalog used for projection
    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    /// The backend requests are sent to
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Name of the backend (e.g., "HTTP")
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Submit an image for classification
    ///
    /// Returns [`SubmitOutcome::Ignored`] while a request is already in
    /// flight. Otherwise the previous result or error is dropped, the state
    /// becomes `Submitting` and exactly one request is started.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Validation`] when `file` is `None`; the state
    /// is left untouched and no request is made.
    pub async fn submit(
        &mut self,
        file: Option<ClassificationRequest>,
    ) -> Result<SubmitOutcome, ClassifyError> {
        let Some(request) = file else {
            let err = ClassifyError::no_file();
            self.notify(NotifyLevel::Error, "No file selected", &err.to_string())
                .await;
            return Err(err);
        };

        if self.is_submitting() {
            tracing::debug!(file = %request.file_name, "Submit ignored, request already in flight");
            return Ok(SubmitOutcome::Ignored);
        }

        tracing::info!(
            file = %request.file_name,
            content_type = request.content_type.mime(),
            backend = self.backend.name(),
            endpoint = self.backend.endpoint(),
            "Submitting image for classification"
        );

        let (done_tx, done_rx) = oneshot::channel();
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            let settlement = backend.classify(&request).await;
            // Receiver gone means the workflow was dropped; nothing to report to.
            let _ = done_tx.send(settlement);
        });

        self.in_flight = Some(done_rx);
        self.set_state(WorkflowState::Submitting).await;

        Ok(SubmitOutcome::Started)
    }

    /// Apply the in-flight request's result if it has settled
    ///
    /// Never blocks. Returns `true` if the state changed.
    pub async fn poll(&mut self) -> bool {
        let Some(rx) = self.in_flight.as_mut() else {
            return false;
        };

        let settlement = match rx.try_recv() {
            Ok(settlement) => settlement,
            Err(oneshot::error::TryRecvError::Empty) => return false,
            Err(oneshot::error::TryRecvError::Closed) => Err(self.lost_request()),
        };

        self.in_flight = None;
        self.settle(settlement).await;
        true
    }

    /// Wait for the in-flight request to settle and return the new state
    ///
    /// Returns immediately if nothing is in flight.
    ///
    /// Dropping the returned future before it resolves leaves the request in
    /// flight; a later `poll` or `wait` still picks up its result.
    pub async fn wait(&mut self) -> &WorkflowState {
        let Some(rx) = self.in_flight.as_mut() else {
            return &self.state;
        };

        let settlement = match rx.await {
            Ok(settlement) => settlement,
            Err(_) => Err(self.lost_request()),
        };

        self.in_flight = None;
        self.settle(settlement).await;
        &self.state
    }

    /// The request task ended without reporting (it panicked or was aborted)
    fn lost_request(&self) -> ClassifyError {
        tracing::error!(
            endpoint = self.backend.endpoint(),
            "Classification task ended without a result"
        );
        ClassifyError::interrupted(self.backend.endpoint())
    }

    /// Move to the terminal state for `settlement`
    async fn settle(&mut self, settlement: Settlement) {
        match settlement {
            Ok(response) => {
                let detected = format!("{} objects detected", response.object_count);
                tracing::info!(
                    object_count = response.object_count,
                    classes = response.class_counts.len(),
                    "Classification complete"
                );
                self.set_state(WorkflowState::Succeeded(response)).await;
                self.notify(NotifyLevel::Success, "Classification complete", &detected)
                    .await;
            }
            Err(err) => {
                let info = ErrorInfo::from(&err);
                tracing::warn!(kind = ?info.kind, error = %info.message, "Classification failed");
                let message = info.message.clone();
                self.set_state(WorkflowState::Failed(info)).await;
                self.notify(NotifyLevel::Error, "Classification failed", &message)
                    .await;
            }
        }
    }

    /// Set state and tell the surface
    async fn set_state(&mut self, state: WorkflowState) {
        self.state = state;
        let phase = self.state.phase();
        self.send(WorkflowMessage::StateChanged { phase }).await;
    }

    /// Send notification
    async fn notify(&self, level: NotifyLevel, title: &str, message: &str) {
        self.send(WorkflowMessage::notify(level, title, message)).await;
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: WorkflowMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::debug!("Surface channel closed, dropping message: {}", e);
        }
    }
}

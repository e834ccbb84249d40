//! Classifier Core - Headless Classification Workflow for stargaze
//!
//! This crate provides the core logic for stargaze, completely independent
//! of any UI framework. It can drive a TUI, a desktop shell, a CLI, or run
//! headless in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        UI Surfaces                           │
//! │      ┌─────────┐        ┌─────────┐        ┌──────────┐      │
//! │      │   TUI   │        │   CLI   │        │ Headless │      │
//! │      │(ratatui)│        │ (clap)  │        │ (tests)  │      │
//! │      └────┬────┘        └────┬────┘        └────┬─────┘      │
//! │           └──────────────────┼──────────────────┘            │
//! │                 submit / poll / wait (down)                  │
//! │                  WorkflowMessage (up)                        │
//! └──────────────────────────────┼───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┼───────────────────────────────┐
//! │                       CLASSIFIER CORE                        │
//! │  ┌───────────────────────────┴────────────────────────────┐  │
//! │  │                 ClassificationWorkflow                 │  │
//! │  │   ┌────────────┐   ┌───────────┐   ┌───────────────┐   │  │
//! │  │   │ Workflow   │   │ Projector │   │   Backend     │   │  │
//! │  │   │   State    │   │ + Catalog │   │ (HTTP POST)   │   │  │
//! │  │   └────────────┘   └───────────┘   └───────────────┘   │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ClassificationWorkflow`]: owns the submit/await/result lifecycle
//! - [`WorkflowState`]: `Idle | Submitting | Succeeded | Failed`
//! - [`project`]: turns raw class counts into ordered, colored [`DisplayEntry`] rows
//! - [`ClassCatalog`]: known classes, their colors and the fallback color
//! - [`ClassificationBackend`]: the outbound boundary ([`HttpBackend`] by default)
//!
//! # Quick Start
//!
//! ```ignore
//! use classifier_core::{
//!     ClassCatalog, ClassificationRequest, ClassificationWorkflow, HttpBackend,
//! };
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let backend = HttpBackend::from_env()?;
//!     let mut workflow = ClassificationWorkflow::new(backend, ClassCatalog::astronomy(), tx);
//!
//!     let request = ClassificationRequest::from_path("orion.jpg").await?;
//!     workflow.submit(Some(request)).await?;
//!     workflow.wait().await;
//!
//!     for entry in workflow.entries() {
//!         println!("{}: {}", entry.name, entry.count);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: classification backend abstraction and HTTP client
//! - [`catalog`]: class catalog and color tokens
//! - [`config`]: TOML/env/CLI configuration
//! - [`counts`]: order-preserving class counts
//! - [`error`]: error taxonomy
//! - [`messages`]: messages from the workflow to UI surfaces
//! - [`projector`]: result projection
//! - [`workflow`]: the classification workflow
//!
//! # No UI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod catalog;
pub mod config;
pub mod counts;
pub mod error;
pub mod messages;
pub mod projector;
pub mod workflow;

// Re-exports for convenience
pub use backend::{
    BackendConfig, ClassificationBackend, ClassificationRequest, ClassificationResponse,
    EncodedImage, HttpBackend, ImageContentType, ObjectPrediction, PixelCenter,
};
pub use catalog::{CatalogEntry, ClassCatalog, ColorToken};
pub use config::{
    default_config_path, load_config, load_config_from_path, ClassifierConfig, ConfigError,
    ConfigOverrides, ConfigSource,
};
pub use counts::ClassCounts;
pub use error::{ClassifyError, ErrorInfo, ErrorKind};
pub use messages::{NotifyLevel, WorkflowMessage, WorkflowPhase};
pub use projector::{project, total_count, DisplayEntry};
pub use workflow::{ClassificationWorkflow, SubmitOutcome, WorkflowState};

/// Build a workflow talking HTTP to the configured endpoint
///
/// # Errors
///
/// Returns [`ConfigError`] if the configured endpoint is not a usable URL.
pub fn http_workflow(
    config: &ClassifierConfig,
    tx: tokio::sync::mpsc::Sender<WorkflowMessage>,
) -> Result<ClassificationWorkflow<HttpBackend>, ConfigError> {
    let backend = HttpBackend::from_config(&config.backend())?;
    Ok(ClassificationWorkflow::new(backend, config.catalog.clone(), tx))
}

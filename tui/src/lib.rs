//! Stargaze TUI - Terminal interface for stargaze
//!
//! This crate provides a single-screen terminal UI for classifying
//! astronomy photos: type a path, press Enter, read the breakdown.
//!
//! # Architecture
//!
//! - **WorkflowClient**: embeds the `classifier-core` workflow
//! - **Display**: display state derived from workflow messages
//! - **Widgets**: class breakdown rows and wrapped text blocks
//! - **Theme**: palette and color-token mapping

pub mod app;
pub mod display;
pub mod theme;
pub mod widgets;
pub mod workflow_client;

pub use app::App;
pub use workflow_client::WorkflowClient;

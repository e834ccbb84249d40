//! Stargaze - classify an astronomy photo from the command line
//!
//! Sends one image to the classification service, prints the object count
//! and the class breakdown, and optionally saves the annotated image.
//!
//! # Usage
//!
//! ```bash
//! # Classify against the default service (http://127.0.0.1:5000)
//! stargaze orion.jpg
//!
//! # Different service, keep the annotated image
//! stargaze --endpoint http://gpu-box:5000 --save-image orion-annotated.jpg orion.jpg
//!
//! # Machine-readable output
//! stargaze --json orion.jpg
//!
//! # Verbose logging
//! RUST_LOG=debug stargaze orion.jpg
//! ```
//!
//! # Environment Variables
//!
//! - `STARGAZE_ENDPOINT`: service base URL
//! - `STARGAZE_CONFIG`: config file path
//! - `RUST_LOG`: log filter

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

use classifier_core::{
    http_workflow, load_config, load_config_from_path, total_count, ClassificationRequest,
    ClassificationResponse, ConfigOverrides, DisplayEntry, WorkflowState,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "stargaze")]
#[command(author, version, about = "Classify objects in an astronomy photo", long_about = None)]
struct Args {
    /// Image to classify (.jpg, .jpeg or .png)
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Classification service base URL
    #[arg(short = 'e', long, value_name = "URL")]
    endpoint: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the annotated image to this path
    #[arg(short = 's', long, value_name = "PATH")]
    save_image: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "STARGAZE_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

/// JSON output shape
#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    entries: &'a [DisplayEntry],
    #[serde(flatten)]
    response: &'a ClassificationResponse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = match args.config {
        Some(ref path) => {
            anyhow::ensure!(path.exists(), "Config file {} does not exist", path.display());
            load_config_from_path(Some(path.clone()))?
        }
        None => load_config()?,
    };
    if let Some(ref endpoint) = args.endpoint {
        ConfigOverrides::new()
            .with_endpoint(endpoint.clone())
            .apply(&mut config);
        config.validate()?;
    }

    info!(endpoint = %config.endpoint, source = %config.source(), "Configuration loaded");

    let request = ClassificationRequest::from_path(&args.image).await?;
    let file_name = request.file_name.clone();

    // The CLI reports results itself; workflow notifications are only logged.
    let (tx, mut rx) = mpsc::channel(16);
    let mut workflow = http_workflow(&config, tx)?;

    workflow.submit(Some(request)).await?;
    if !args.json {
        eprintln!("Processing {file_name}, this may take a few minutes...");
    }
    workflow.wait().await;

    while let Ok(msg) = rx.try_recv() {
        tracing::debug!(?msg, "Workflow message");
    }

    let response = match workflow.state() {
        WorkflowState::Succeeded(response) => response,
        WorkflowState::Failed(error) => {
            anyhow::bail!("{}: {}", error.kind.label(), error.message)
        }
        WorkflowState::Idle | WorkflowState::Submitting => {
            anyhow::bail!("Classification did not complete")
        }
    };

    let entries = workflow.entries();

    if args.json {
        let report = JsonReport {
            file: &file_name,
            entries: &entries,
            response,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&file_name, response, &entries);
    }

    if let Some(ref path) = args.save_image {
        save_annotated_image(response, path).await?;
        if !args.json {
            println!("\nAnnotated image saved to {}", path.display());
        }
    }

    Ok(())
}

/// Print the human-readable breakdown
fn print_summary(file_name: &str, response: &ClassificationResponse, entries: &[DisplayEntry]) {
    println!("{file_name}");
    println!("Detected objects: {}", response.object_count);

    if let Some(ref message) = response.message {
        println!("Service: {message}");
    }

    if entries.is_empty() {
        println!("No objects found.");
        return;
    }

    let total = total_count(entries);
    let width = entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0);

    println!("\nClass distribution:");
    for entry in entries {
        let pad = width.saturating_sub(entry.name.chars().count());
        println!(
            "  {}{}  {:>6}  {:>4.0}%  {}",
            entry.name,
            " ".repeat(pad),
            entry.count,
            entry.share_of(total) * 100.0,
            entry.color
        );
    }
}

/// Decode and write the annotated image
async fn save_annotated_image(response: &ClassificationResponse, path: &Path) -> Result<()> {
    let image = response
        .annotated_image
        .as_ref()
        .context("The service returned no annotated image (no objects were found)")?;

    let bytes = image.decode()?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Initialize logging to stderr
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("stargaze={level},classifier_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

//! TOML Configuration File Support
//!
//! Configuration loading for stargaze, with an optional TOML file at
//! `~/.config/stargaze/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are applied in this order (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [endpoint]
//! url = "http://127.0.0.1:5000"
//!
//! [catalog]
//! default_color = "#8b93a7"
//!
//! [[catalog.classes]]
//! name = "Yıldız"
//! color = "#3b82f6"
//!
//! [[catalog.classes]]
//! name = "Bulutsu"
//! color = "#f59e0b"
//! ```
//!
//! A `[catalog]` section with at least one class replaces the built-in
//! catalog entirely.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{parse_endpoint, BackendConfig, DEFAULT_ENDPOINT, ENDPOINT_ENV};
use crate::catalog::{ClassCatalog, DEFAULT_FALLBACK_COLOR};

/// Environment variable pointing at an alternative config file
pub const CONFIG_PATH_ENV: &str = "STARGAZE_CONFIG";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Endpoint section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointToml {
    /// Base URL of the classification service
    pub url: Option<String>,
}

/// A class entry in the TOML catalog
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogClassToml {
    /// Class name as reported by the service
    pub name: String,
    /// Color token
    pub color: String,
}

/// Catalog section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogToml {
    /// Fallback color for unknown classes
    pub default_color: Option<String>,

    /// Known classes, in presentation order
    pub classes: Vec<CatalogClassToml>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StargazeToml {
    /// Endpoint configuration section
    pub endpoint: EndpointToml,

    /// Catalog configuration section
    pub catalog: CatalogToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration
#[derive(Clone, Debug)]
pub struct ClassifierConfig {
    /// Base URL of the classification service
    pub endpoint: String,

    /// Catalog used to project results
    pub catalog: ClassCatalog,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            catalog: ClassCatalog::astronomy(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl ClassifierConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Backend configuration derived from the endpoint
    #[must_use]
    pub fn backend(&self) -> BackendConfig {
        BackendConfig::http(self.endpoint.clone())
    }

    /// Check the resolved values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the endpoint is not an
    /// `http`/`https` URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_endpoint(&self.endpoint).map(|_| ())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$STARGAZE_CONFIG` if set, otherwise
/// `$XDG_CONFIG_HOME/stargaze/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|p| p.join("stargaze").join("config.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed or holds
/// invalid values. A missing config file is not an error.
pub fn load_config() -> Result<ClassifierConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read, parsed or
/// validated.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ClassifierConfig, ConfigError> {
    let mut config = ClassifierConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: StargazeToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(
    config: &mut ClassifierConfig,
    toml: &StargazeToml,
) -> Result<(), ConfigError> {
    if let Some(ref url) = toml.endpoint.url {
        config.endpoint = url.clone();
    }

    if !toml.catalog.classes.is_empty() {
        config.catalog = catalog_from_toml(&toml.catalog)?;
    } else if toml.catalog.default_color.is_some() {
        return Err(ConfigError::ValidationError(
            "[catalog] sets default_color but lists no classes".to_string(),
        ));
    }

    Ok(())
}

/// Build a catalog from its TOML section
fn catalog_from_toml(section: &CatalogToml) -> Result<ClassCatalog, ConfigError> {
    let mut seen = HashSet::new();
    for class in &section.classes {
        if class.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "catalog class names must not be empty".to_string(),
            ));
        }
        if !seen.insert(class.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "catalog class '{}' is listed more than once",
                class.name
            )));
        }
    }

    let default_color = section
        .default_color
        .clone()
        .unwrap_or_else(|| DEFAULT_FALLBACK_COLOR.to_string());

    Ok(ClassCatalog::new(
        section
            .classes
            .iter()
            .map(|c| (c.name.clone(), c.color.clone())),
        default_color,
    ))
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut ClassifierConfig) {
    if let Ok(url) = std::env::var(ENDPOINT_ENV) {
        if !url.trim().is_empty() {
            config.endpoint = url;
            config.source = ConfigSource::Env;
        }
    }
}

// =============================================================================
// CLI Overrides
// =============================================================================

/// Configuration overrides from the command line
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Endpoint URL override
    pub endpoint: Option<String>,
}

impl ConfigOverrides {
    /// Create empty overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the endpoint URL
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Apply the overrides to `config`
    pub fn apply(&self, config: &mut ClassifierConfig) {
        if let Some(ref endpoint) = self.endpoint {
            config.endpoint = endpoint.clone();
            config.source = ConfigSource::Cli;
        }
    }
}

//! Classification Errors
//!
//! Everything that can go wrong between "the user picked a file" and "the
//! service answered". Each error maps onto one [`ErrorKind`] so surfaces can
//! branch on the kind and still show the human-readable message.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building, sending or interpreting a classification
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The submission itself is unusable (no file, unsupported file type)
    #[error("{0}")]
    Validation(String),

    /// The selected image could not be read
    #[error("Could not read image {path}: {source}")]
    FileRead {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// The service answered with a failure status
    #[error("{message}")]
    Endpoint {
        /// HTTP status code
        status: u16,
        /// Message from the service, or a status-derived fallback
        message: String,
    },

    /// The service could not be reached at all
    #[error("{message}")]
    Connection {
        /// URL that was attempted
        endpoint: String,
        /// Message telling the user to check the service
        message: String,
    },

    /// The service answered with success but the body is not a valid result
    #[error("Malformed response from classification service: {0}")]
    MalformedResponse(String),

    /// The annotated image is not valid base64
    #[error("Annotated image could not be decoded: {0}")]
    ImageDecode(String),
}

impl ClassifyError {
    /// Validation error for a submit without a file
    #[must_use]
    pub fn no_file() -> Self {
        Self::Validation("No image selected. Please choose an astronomy photo to classify.".into())
    }

    /// Connection error for an unreachable `endpoint`
    pub fn connection(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let message = format!(
            "Could not connect to the classification service at {endpoint}. \
             Make sure the service is running and reachable."
        );
        Self::Connection { endpoint, message }
    }

    /// Connection error for a request that stopped before the service answered
    ///
    /// Used when the request task itself went away, so the message does not
    /// blame the service.
    pub fn interrupted(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let message = format!(
            "The classification request to {endpoint} stopped before an answer arrived. \
             Please submit the image again."
        );
        Self::Connection { endpoint, message }
    }

    /// Machine-readable kind of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::FileRead { .. } => ErrorKind::Validation,
            Self::Endpoint { .. } => ErrorKind::Endpoint,
            Self::Connection { .. } => ErrorKind::Connection,
            Self::MalformedResponse(_) | Self::ImageDecode(_) => ErrorKind::MalformedResponse,
        }
    }
}

/// Machine-distinguishable error category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Nothing usable was submitted
    Validation,
    /// The service rejected the request
    Endpoint,
    /// The service could not be reached
    Connection,
    /// The service broke its response contract
    MalformedResponse,
}

impl ErrorKind {
    /// Short human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation => "Invalid submission",
            Self::Endpoint => "Service error",
            Self::Connection => "Connection failure",
            Self::MalformedResponse => "Malformed response",
        }
    }
}

/// Error as stored in the workflow state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error category
    pub kind: ErrorKind,
    /// Message suitable for display
    pub message: String,
}

impl From<&ClassifyError> for ErrorInfo {
    fn from(err: &ClassifyError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<ClassifyError> for ErrorInfo {
    fn from(err: ClassifyError) -> Self {
        Self::from(&err)
    }
}

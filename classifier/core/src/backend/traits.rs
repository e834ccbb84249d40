//! Classification Backend Traits
//!
//! Request/response types and the trait every classification backend
//! implements. The workflow only ever talks to a [`ClassificationBackend`],
//! which keeps the HTTP details in one place and lets tests drive the
//! workflow with scripted backends.

use std::path::Path;

use async_trait::async_trait;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::{DecodePaddingMode, Engine};
use serde::{Deserialize, Deserializer, Serialize};

use crate::counts::ClassCounts;
use crate::error::ClassifyError;

/// Image formats the classification service accepts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageContentType {
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
}

impl ImageContentType {
    /// MIME type sent with the upload
    #[must_use]
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Infer the content type from a file extension (case-insensitive)
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Infer the content type from a path's extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// An image ready to be submitted
#[derive(Clone, Debug)]
pub struct ClassificationRequest {
    /// File name reported in the upload
    pub file_name: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// Declared content type
    pub content_type: ImageContentType,
}

impl ClassificationRequest {
    /// Create a request from bytes already in memory
    pub fn new(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        content_type: ImageContentType,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            content_type,
        }
    }

    /// Read an image from disk
    ///
    /// Only `.jpg`, `.jpeg` and `.png` files are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Validation`] for unsupported extensions and
    /// [`ClassifyError::FileRead`] if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClassifyError> {
        let path = path.as_ref();
        let content_type = ImageContentType::from_path(path).ok_or_else(|| {
            ClassifyError::Validation(format!(
                "Unsupported image type for {}: only JPEG and PNG files can be classified",
                path.display()
            ))
        })?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClassifyError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Self::new(file_name, bytes, content_type))
    }
}

/// Base64 engine accepting both padded and unpadded input
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Annotated image as delivered by the service (base64 text)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Wrap base64 text
    pub fn new(base64: impl Into<String>) -> Self {
        Self(base64.into())
    }

    /// The base64 text as received
    #[must_use]
    pub fn as_base64(&self) -> &str {
        &self.0
    }

    /// Decode into raw image bytes (the service encodes JPEG)
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::ImageDecode`] if the text is not base64.
    pub fn decode(&self) -> Result<Vec<u8>, ClassifyError> {
        LENIENT_BASE64
            .decode(self.0.trim())
            .map_err(|e| ClassifyError::ImageDecode(e.to_string()))
    }
}

/// Pixel position of a detected object's center
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelCenter {
    /// Horizontal pixel coordinate
    pub x: i64,
    /// Vertical pixel coordinate
    pub y: i64,
}

/// The service's verdict for a single detected object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectPrediction {
    /// Object index within the image
    pub object_id: u64,
    /// Predicted class name
    pub predicted_class: String,
    /// Object center, when the service could compute one
    #[serde(default, deserialize_with = "lenient_center")]
    pub center: Option<PixelCenter>,
    /// Model confidence for the predicted class, when available
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// The service reports `"N/A"` when it has no center; treat anything that is
/// not an `{x, y}` object as absent.
fn lenient_center<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PixelCenter>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(serde_json::from_value(value).ok())
}

/// A successful classification
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    /// Image with detected objects outlined; absent when nothing was found
    #[serde(rename = "debug_image_base64", default)]
    pub annotated_image: Option<EncodedImage>,
    /// Number of detected objects, as reported by the service
    pub object_count: u64,
    /// Detected objects per class, in the order the service listed them
    pub class_counts: ClassCounts,
    /// Per-object predictions
    #[serde(default)]
    pub predictions: Vec<ObjectPrediction>,
    /// Informational message from the service
    #[serde(default)]
    pub message: Option<String>,
}

impl ClassificationResponse {
    /// Parse a success body
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::MalformedResponse`] if the body does not
    /// match the expected shape.
    pub fn from_json(body: &str) -> Result<Self, ClassifyError> {
        serde_json::from_str(body).map_err(|e| ClassifyError::MalformedResponse(e.to_string()))
    }
}

/// Classification backend trait
///
/// Implement this trait to plug a different transport into the workflow.
#[async_trait]
pub trait ClassificationBackend: Send + Sync {
    /// Backend name (e.g., "HTTP")
    fn name(&self) -> &str;

    /// Where requests go; used in connection-failure messages
    fn endpoint(&self) -> &str;

    /// Check whether the backend answers at all
    async fn health_check(&self) -> bool {
        true
    }

    /// Classify one image
    ///
    /// Exactly one outbound call per invocation; no retries.
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResponse, ClassifyError>;
}

/// Default classification service address
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Environment variable overriding the service address
pub const ENDPOINT_ENV: &str = "STARGAZE_ENDPOINT";

/// Backend connection configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendConfig {
    /// Classification service reached over HTTP
    Http {
        /// Base URL of the service (without `/classify`)
        base_url: String,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Http {
            base_url: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl BackendConfig {
    /// Create an HTTP configuration
    pub fn http(base_url: impl Into<String>) -> Self {
        Self::Http {
            base_url: base_url.into(),
        }
    }

    /// Create an HTTP configuration from the environment
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        Self::Http { base_url }
    }
}

//! Classification Backend Integration
//!
//! Abstracted access to the classification service through a common trait.
//!
//! # Available Backends
//!
//! - **HTTP**: the classification service's `POST /classify` route (default)
//!
//! # Usage
//!
//! ```ignore
//! use classifier_core::backend::{ClassificationBackend, ClassificationRequest, HttpBackend};
//!
//! let backend = HttpBackend::from_env()?;
//! let request = ClassificationRequest::from_path("andromeda.jpg").await?;
//! let response = backend.classify(&request).await?;
//! ```

mod http;
mod traits;

pub(crate) use http::parse_endpoint;
pub use http::HttpBackend;
pub use traits::{
    BackendConfig, ClassificationBackend, ClassificationRequest, ClassificationResponse,
    EncodedImage, ImageContentType, ObjectPrediction, PixelCenter, DEFAULT_ENDPOINT, ENDPOINT_ENV,
};

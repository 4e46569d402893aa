// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Error types for model loading and embedding generation

use std::path::PathBuf;
use thiserror::Error;

use super::device::Device;
use crate::vision::ImageError;

/// Fatal errors raised while loading the model at startup
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unknown model: {key}. Available: {available:?}")]
    InvalidModelKey { key: String, available: Vec<String> },

    #[error("Requested device '{0}' is not available")]
    DeviceUnavailable(Device),

    #[error("ONNX vision model not found: {}", .0.display())]
    ModelFileMissing(PathBuf),

    #[error("Failed to fetch {file} from {repo}: {message}")]
    Download {
        repo: String,
        file: String,
        message: String,
    },

    #[error("Model {key} outputs {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Runtime(#[from] anyhow::Error),
}

impl LoadError {
    /// Whether the failure is tied to the device the model was bound to
    pub fn is_device_failure(&self) -> bool {
        matches!(self, LoadError::DeviceUnavailable(_) | LoadError::Runtime(_))
    }
}

/// Per-request errors, rendered as `{"error": ...}` at the HTTP boundary
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("No image file provided")]
    MissingImage,

    #[error("No images provided")]
    NoImages,

    #[error("Invalid image file: {0}")]
    InvalidImage(#[from] ImageError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Image {index}: {source}")]
    BatchItem {
        index: usize,
        #[source]
        source: Box<EmbedError>,
    },

    #[error("{0}")]
    Internal(String),
}

impl EmbedError {
    /// Whether the failure was caused by the client's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EmbedError::MissingImage
                | EmbedError::NoImages
                | EmbedError::InvalidImage(_)
                | EmbedError::InvalidRequest(_)
        )
    }
}

impl From<anyhow::Error> for EmbedError {
    fn from(e: anyhow::Error) -> Self {
        EmbedError::Internal(format!("{:#}", e))
    }
}

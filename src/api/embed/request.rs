// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Multipart upload parsing for the embedding endpoints

use axum_extra::extract::Multipart;
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;

use crate::embeddings::EmbedError;

/// Multipart field carrying the image for `POST /embed`
pub const IMAGE_FIELD: &str = "image";

/// Multipart field (repeated) carrying the images for `POST /embed/batch`
pub const IMAGES_FIELD: &str = "images";

/// Failure semantics of a batch request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    /// First failure aborts the batch with a 500
    #[default]
    Strict,
    /// Every image gets its own success or error entry
    Partial,
}

/// Query string of `POST /embed/batch`
///
/// # Example
/// `POST /embed/batch?mode=partial`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchQuery {
    #[serde(default)]
    pub mode: BatchMode,
}

/// Read every part named `field_name`, in upload order
///
/// Parts with other names are skipped. A malformed multipart stream is a
/// client error.
pub async fn read_uploads(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<Vec<Bytes>, EmbedError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| EmbedError::InvalidRequest(e.to_string()))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| EmbedError::InvalidRequest(e.to_string()))?;

        debug!(
            "Received upload {:?} under '{}': {} bytes",
            file_name,
            field_name,
            data.len()
        );
        uploads.push(data);
    }

    Ok(uploads)
}

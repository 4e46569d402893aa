// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed and POST /embed/batch handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::request::{read_uploads, BatchMode, BatchQuery, IMAGES_FIELD, IMAGE_FIELD};
use super::response::{BatchEmbedResponse, EmbedResponse, PartialBatchResponse};
use crate::api::http_server::AppState;
use crate::embeddings::EmbedError;

/// POST /embed handler
///
/// Generates a unit-length embedding for the image uploaded under the
/// `image` multipart field.
///
/// # Response Body
/// ```json
/// { "embedding": [0.01, ...], "dimension": 512, "model": "vit-b-32" }
/// ```
///
/// # Errors
/// - 400: no `image` field, body is not multipart, bytes are not an image
/// - 500: preprocessing or inference failed
pub async fn embed_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EmbedResponse>, EmbedError> {
    let multipart = multipart.map_err(|_| EmbedError::MissingImage)?;

    let image = read_uploads(multipart, IMAGE_FIELD)
        .await?
        .into_iter()
        .next()
        .ok_or(EmbedError::MissingImage)?;

    debug!("Embedding single image ({} bytes)", image.len());

    let service = state.service.clone();
    let embedding = run_blocking(move || service.embed_bytes(&image)).await?;

    Ok(Json(EmbedResponse::new(
        embedding,
        state.service.model_key(),
    )))
}

/// POST /embed/batch handler
///
/// Embeds every image uploaded under the repeated `images` field, in
/// upload order. By default the batch is all-or-nothing: any failure
/// returns a 500 and discards earlier results. With `?mode=partial` each
/// image gets its own result entry instead.
///
/// # Response Body
/// ```json
/// { "embeddings": [[...], [...]], "count": 2, "dimension": 512, "model": "vit-b-32" }
/// ```
///
/// # Errors
/// - 400: no images, unknown `mode`
/// - 500: any image failed (strict mode only)
pub async fn embed_batch_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BatchQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, EmbedError> {
    let Query(query) = query.map_err(|e| EmbedError::InvalidRequest(e.body_text()))?;
    let multipart = multipart.map_err(|_| EmbedError::NoImages)?;

    let images = read_uploads(multipart, IMAGES_FIELD).await?;
    if images.is_empty() {
        return Err(EmbedError::NoImages);
    }

    info!(
        "Embedding batch of {} images ({:?} mode)",
        images.len(),
        query.mode
    );

    let service = state.service.clone();
    let model = state.service.model_key().to_string();

    match query.mode {
        BatchMode::Strict => {
            let embeddings = run_blocking(move || service.embed_batch(&images)).await?;
            Ok(Json(BatchEmbedResponse::new(embeddings, model)).into_response())
        }
        BatchMode::Partial => {
            let outcomes = run_blocking(move || service.embed_batch_partial(&images)).await?;
            for (index, outcome) in outcomes.iter().enumerate() {
                if let Err(e) = outcome {
                    warn!("Batch image {} failed: {}", index, e);
                }
            }
            Ok(Json(PartialBatchResponse::new(outcomes, model)).into_response())
        }
    }
}

/// Run CPU-bound embedding work off the async runtime
async fn run_blocking<T, F>(work: F) -> Result<T, EmbedError>
where
    F: FnOnce() -> Result<T, EmbedError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| EmbedError::Internal(format!("embedding task failed: {}", e)))?
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response bodies for the embedding endpoints

use serde::{Deserialize, Serialize};

use crate::embeddings::EmbedError;

/// Response body for `POST /embed`
///
/// # Example
/// ```json
/// { "embedding": [0.01, -0.03, ...], "dimension": 512, "model": "vit-b-32" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    /// Unit-length embedding vector
    pub embedding: Vec<f32>,
    pub dimension: usize,
    /// Catalog key of the active model
    pub model: String,
}

impl EmbedResponse {
    pub fn new(embedding: Vec<f32>, model: impl Into<String>) -> Self {
        Self {
            dimension: embedding.len(),
            embedding,
            model: model.into(),
        }
    }
}

/// Response body for `POST /embed/batch`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEmbedResponse {
    /// One vector per uploaded image, in upload order
    pub embeddings: Vec<Vec<f32>>,
    pub count: usize,
    /// Length of the first vector (0 if none)
    pub dimension: usize,
    pub model: String,
}

impl BatchEmbedResponse {
    pub fn new(embeddings: Vec<Vec<f32>>, model: impl Into<String>) -> Self {
        Self {
            count: embeddings.len(),
            dimension: embeddings.first().map(Vec::len).unwrap_or(0),
            embeddings,
            model: model.into(),
        }
    }
}

/// Outcome for one image of a partial batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body for `POST /embed/batch?mode=partial`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialBatchResponse {
    pub results: Vec<BatchItemResult>,
    pub count: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Length of the first successful vector (0 if none)
    pub dimension: usize,
    pub model: String,
}

impl PartialBatchResponse {
    pub fn new(outcomes: Vec<Result<Vec<f32>, EmbedError>>, model: impl Into<String>) -> Self {
        let results: Vec<BatchItemResult> = outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| match outcome {
                Ok(embedding) => BatchItemResult {
                    index,
                    embedding: Some(embedding),
                    error: None,
                },
                Err(e) => BatchItemResult {
                    index,
                    embedding: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        let succeeded = results.iter().filter(|r| r.embedding.is_some()).count();
        let dimension = results
            .iter()
            .find_map(|r| r.embedding.as_ref().map(Vec::len))
            .unwrap_or(0);

        Self {
            count: results.len(),
            failed: results.len() - succeeded,
            succeeded,
            dimension,
            results,
            model: model.into(),
        }
    }
}

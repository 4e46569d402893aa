// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding service shared by all request handlers
//!
//! Owns the loaded encoder and implements the request pipeline:
//! decode → RGB → preprocess → infer → unit-normalize. The encoder is
//! read-only after construction; there is no global state.

use image::DynamicImage;
use std::sync::Arc;
use tracing::debug;

use super::catalog::ModelConfig;
use super::device::Device;
use super::encoder::ImageEncoder;
use super::errors::EmbedError;
use super::normalize::l2_normalize;
use crate::vision::{decode_image_bytes, ensure_rgb};

/// The process-wide loaded model and its metadata
pub struct EmbeddingService {
    model_key: String,
    device: Device,
    dimension: usize,
    encoder: Arc<dyn ImageEncoder>,
}

impl std::fmt::Debug for EmbeddingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingService")
            .field("model_key", &self.model_key)
            .field("device", &self.device)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl EmbeddingService {
    pub fn new(model_key: impl Into<String>, device: Device, encoder: Arc<dyn ImageEncoder>) -> Self {
        Self {
            model_key: model_key.into(),
            device,
            dimension: encoder.dimension(),
            encoder,
        }
    }

    /// Service for a catalog entry
    pub fn from_config(config: &ModelConfig, device: Device, encoder: Arc<dyn ImageEncoder>) -> Self {
        Self::new(config.key, device, encoder)
    }

    pub fn model_key(&self) -> &str {
        &self.model_key
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed an already decoded image
    pub fn embed_image(&self, image: DynamicImage) -> Result<Vec<f32>, EmbedError> {
        let rgb = ensure_rgb(image);
        let pixel_values = self.encoder.preprocess(&rgb)?;
        let mut embedding = self.encoder.infer(&pixel_values)?;

        if embedding.len() != self.dimension {
            return Err(EmbedError::Internal(format!(
                "model returned {} values, expected {}",
                embedding.len(),
                self.dimension
            )));
        }

        l2_normalize(&mut embedding)?;
        Ok(embedding)
    }

    /// Decode raw upload bytes and embed them
    ///
    /// Undecodable bytes yield `EmbedError::InvalidImage`.
    pub fn embed_bytes(&self, bytes: &[u8]) -> Result<Vec<f32>, EmbedError> {
        let (image, info) = decode_image_bytes(bytes)?;
        debug!(
            "Decoded image: {}x{} {:?}, {} bytes",
            info.width, info.height, info.format, info.size_bytes
        );
        self.embed_image(image)
    }

    /// Embed a batch sequentially, in input order, all-or-nothing
    ///
    /// The first failure aborts the batch; its index is carried in
    /// `EmbedError::BatchItem` and earlier results are dropped.
    pub fn embed_batch<B: AsRef<[u8]>>(&self, images: &[B]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if images.is_empty() {
            return Err(EmbedError::NoImages);
        }

        images
            .iter()
            .enumerate()
            .map(|(index, bytes)| {
                self.embed_bytes(bytes.as_ref())
                    .map_err(|e| EmbedError::BatchItem {
                        index,
                        source: Box::new(e),
                    })
            })
            .collect()
    }

    /// Embed a batch keeping one result per image
    pub fn embed_batch_partial<B: AsRef<[u8]>>(
        &self,
        images: &[B],
    ) -> Result<Vec<Result<Vec<f32>, EmbedError>>, EmbedError> {
        if images.is_empty() {
            return Err(EmbedError::NoImages);
        }

        Ok(images
            .iter()
            .map(|bytes| self.embed_bytes(bytes.as_ref()))
            .collect())
    }
}

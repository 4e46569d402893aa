// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Narrow interface between the service and a concrete vision model

use anyhow::Result;
use image::DynamicImage;
use ndarray::Array4;

/// A pretrained image encoder: preprocessing plus a forward pass
///
/// Implementations must be deterministic (inference mode only) and safe to
/// call from several blocking threads at once.
pub trait ImageEncoder: Send + Sync {
    /// Turn an RGB image into the model's input tensor
    fn preprocess(&self, image: &DynamicImage) -> Result<Array4<f32>>;

    /// Run the forward pass and return the raw (unnormalized) feature vector
    fn infer(&self, pixel_values: &Array4<f32>) -> Result<Vec<f32>>;

    /// Declared output dimension
    fn dimension(&self) -> usize;
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX CLIP vision encoder
//!
//! Wraps an ONNX Runtime session over the vision tower of a CLIP export
//! (`vision_model.onnx`). The session takes `pixel_values` [N, 3, H, W] and
//! produces projected `image_embeds` [N, dim].
//!
//! Features:
//! - Session bound to the selected execution provider (CUDA, CoreML, CPU)
//! - Output dimension validated with a dry run at load time
//! - CLIP preprocessing at the tower's native resolution

use anyhow::{anyhow, Context, Result};
use image::DynamicImage;
use ndarray::{Array4, Axis};
use ort::execution_providers::{
    CPUExecutionProvider, CUDAExecutionProvider, CoreMLExecutionProvider,
    ExecutionProviderDispatch,
};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::catalog::ModelConfig;
use super::device::Device;
use super::encoder::ImageEncoder;
use super::errors::LoadError;
use crate::vision::preprocess_for_clip;

/// Preferred output of the vision tower (projected embeddings)
const IMAGE_EMBEDS_OUTPUT: &str = "image_embeds";

/// CLIP vision encoder running on ONNX Runtime
///
/// # Thread Safety
/// `Session::run` needs exclusive access, so the session sits behind a
/// mutex and concurrent requests are serialized at inference.
#[derive(Clone)]
pub struct ClipVisionModel {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Model output name
    output_name: String,
    /// Catalog key of the loaded variant
    model_key: String,
    /// Output dimension
    dimension: usize,
    /// Square input resolution
    image_size: u32,
}

impl std::fmt::Debug for ClipVisionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipVisionModel")
            .field("model_key", &self.model_key)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("dimension", &self.dimension)
            .field("image_size", &self.image_size)
            .finish_non_exhaustive()
    }
}

impl ClipVisionModel {
    /// Load the vision encoder from disk and bind it to `device`
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - The execution provider for `device` cannot be registered
    /// - The dry run fails or yields a dimension other than `config.dimension`
    pub fn load<P: AsRef<Path>>(
        model_path: P,
        config: &ModelConfig,
        device: Device,
        intra_threads: usize,
    ) -> Result<Self, LoadError> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            return Err(LoadError::ModelFileMissing(model_path.to_path_buf()));
        }

        info!(
            "Loading CLIP vision encoder {} from {} on {}",
            config.key,
            model_path.display(),
            device
        );

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([execution_provider(device)])
            .context(format!("Failed to register {} execution provider", device))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load CLIP vision model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "pixel_values".to_string());

        let output_name = session
            .outputs
            .iter()
            .find(|output| output.name == IMAGE_EMBEDS_OUTPUT)
            .or_else(|| session.outputs.first())
            .map(|output| output.name.clone())
            .unwrap_or_else(|| IMAGE_EMBEDS_OUTPUT.to_string());

        debug!(
            "Vision encoder loaded - input: {}, output: {}",
            input_name, output_name
        );

        let model = Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
            model_key: config.key.to_string(),
            dimension: config.dimension,
            image_size: config.image_size,
        };

        // Dry run on a blank tensor to confirm the declared width
        let size = config.image_size as usize;
        let probe = model.infer(&Array4::zeros((1, 3, size, size)))?;
        if probe.len() != config.dimension {
            return Err(LoadError::DimensionMismatch {
                key: config.key.to_string(),
                expected: config.dimension,
                actual: probe.len(),
            });
        }

        info!(
            "✅ CLIP vision encoder ready ({}D embeddings, {}px input)",
            model.dimension, model.image_size
        );

        Ok(model)
    }
}

impl ImageEncoder for ClipVisionModel {
    fn preprocess(&self, image: &DynamicImage) -> Result<Array4<f32>> {
        Ok(preprocess_for_clip(image, self.image_size))
    }

    fn infer(&self, pixel_values: &Array4<f32>) -> Result<Vec<f32>> {
        let shape = pixel_values.shape();
        if shape[0] != 1 || shape[1] != 3 {
            anyhow::bail!("Invalid input shape: {:?}, expected [1, 3, H, W]", shape);
        }

        let input_value =
            Value::from_array(pixel_values.to_owned()).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow!("Failed to lock session: {}", e))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Vision encoder inference failed")?;

        let output = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        // [batch, dim] -> first row
        match output.ndim() {
            2 => Ok(output.index_axis(Axis(0), 0).iter().copied().collect()),
            _ => anyhow::bail!("Unexpected encoder output shape: {:?}", output.shape()),
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn execution_provider(device: Device) -> ExecutionProviderDispatch {
    match device {
        Device::Cuda => CUDAExecutionProvider::default().build().error_on_failure(),
        Device::Mps => CoreMLExecutionProvider::default().build().error_on_failure(),
        Device::Cpu => CPUExecutionProvider::default().build(),
    }
}

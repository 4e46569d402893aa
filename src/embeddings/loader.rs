// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Startup model loading
//!
//! Resolves a catalog key, selects the compute device, locates (or
//! downloads) the ONNX vision tower and builds the `EmbeddingService`.
//! Runs once before the listener is bound; every failure is fatal.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use super::catalog::{catalog_keys, find_model, ModelConfig, ONNX_VISION_FILE};
use super::clip_model::ClipVisionModel;
use super::device::{bind_device, Device, DevicePreference, DeviceProbe, OrtDeviceProbe};
use super::encoder::ImageEncoder;
use super::errors::LoadError;
use super::service::EmbeddingService;

/// What to load and where to run it
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Catalog key (e.g., "vit-b-32")
    pub model_key: String,
    /// Requested compute device
    pub device: DevicePreference,
    /// Local directory holding `vision_model.onnx`; the hub is used when unset
    pub model_dir: Option<PathBuf>,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
}

/// Resolve a key against the catalog
pub fn resolve_model(key: &str) -> Result<&'static ModelConfig, LoadError> {
    find_model(key).ok_or_else(|| LoadError::InvalidModelKey {
        key: key.to_string(),
        available: catalog_keys().into_iter().map(String::from).collect(),
    })
}

/// Find the vision encoder file inside a local model directory
///
/// Accepts either `<dir>/vision_model.onnx` or the hub layout
/// `<dir>/onnx/vision_model.onnx`.
pub fn find_local_model_file(model_dir: &Path) -> Result<PathBuf, LoadError> {
    let flat = model_dir.join("vision_model.onnx");
    if flat.exists() {
        return Ok(flat);
    }

    let nested = model_dir.join(ONNX_VISION_FILE);
    if nested.exists() {
        return Ok(nested);
    }

    Err(LoadError::ModelFileMissing(flat))
}

/// Fetch the vision encoder from the Hugging Face hub (cached locally)
pub fn download_model_file(config: &ModelConfig) -> Result<PathBuf, LoadError> {
    let download_error = |message: String| LoadError::Download {
        repo: config.onnx_repo.to_string(),
        file: ONNX_VISION_FILE.to_string(),
        message,
    };

    info!(
        "Fetching {} from {} (export of {})",
        ONNX_VISION_FILE, config.onnx_repo, config.pretrained
    );

    let api = hf_hub::api::sync::Api::new().map_err(|e| download_error(e.to_string()))?;
    api.model(config.onnx_repo.to_string())
        .get(ONNX_VISION_FILE)
        .map_err(|e| download_error(e.to_string()))
}

/// Bind an encoder built by `build` to the first usable device
///
/// `build` is called once per candidate device until one succeeds.
pub fn build_service<F>(
    config: &ModelConfig,
    preference: DevicePreference,
    probe: &dyn DeviceProbe,
    build: F,
) -> Result<EmbeddingService, LoadError>
where
    F: FnMut(Device) -> Result<Arc<dyn ImageEncoder>, LoadError>,
{
    let (device, encoder) = bind_device(preference, probe, build)?;
    info!("Device: {}", device);
    Ok(EmbeddingService::from_config(config, device, encoder))
}

/// Load the configured model and wrap it in a service
pub async fn load_service(options: &LoadOptions) -> Result<EmbeddingService, LoadError> {
    let config = resolve_model(&options.model_key)?;

    info!("Loading model: {} ({})", config.key, config.pretrained);

    let model_dir = options.model_dir.clone();
    let preference = options.device;
    let intra_threads = options.intra_threads;

    // Download and session construction block; keep them off the runtime
    let service = tokio::task::spawn_blocking(move || {
        let model_path = match model_dir {
            Some(dir) => find_local_model_file(&dir)?,
            None => download_model_file(config)?,
        };

        build_service(config, preference, &OrtDeviceProbe, |device| {
            let model = ClipVisionModel::load(&model_path, config, device, intra_threads)?;
            Ok(Arc::new(model) as Arc<dyn ImageEncoder>)
        })
    })
    .await
    .map_err(|e| LoadError::Runtime(anyhow::anyhow!("model loading task failed: {}", e)))??;

    info!("Model loaded successfully!");
    info!("Embedding dimension: {}", service.dimension());

    Ok(service)
}

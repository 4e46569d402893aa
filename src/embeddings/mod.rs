// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! CLIP image embeddings
//!
//! - `catalog` - supported model variants
//! - `device` - compute device preference and selection
//! - `clip_model` - ONNX Runtime vision encoder
//! - `loader` - one-shot startup loading
//! - `service` - request pipeline shared by the HTTP handlers

pub mod catalog;
pub mod clip_model;
pub mod device;
pub mod encoder;
pub mod errors;
pub mod loader;
pub mod normalize;
pub mod service;

pub use catalog::{catalog_keys, find_model, ModelConfig, ModelLabels, CATALOG, DEFAULT_MODEL_KEY};
pub use clip_model::ClipVisionModel;
pub use device::{bind_device, Device, DevicePreference, DeviceProbe, OrtDeviceProbe};
pub use encoder::ImageEncoder;
pub use errors::{EmbedError, LoadError};
pub use loader::{build_service, load_service, LoadOptions};
pub use normalize::{l2_norm, l2_normalize};
pub use service::EmbeddingService;

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Catalog of supported CLIP variants
//!
//! Every entry names the pretrained checkpoint, the hub repository holding
//! its ONNX vision tower, and the labels reported by `GET /models`.

use serde::Serialize;

/// Model selected when none is given on the command line
pub const DEFAULT_MODEL_KEY: &str = "vit-b-32";

/// Location of the vision encoder inside an ONNX export repository
pub const ONNX_VISION_FILE: &str = "onnx/vision_model.onnx";

/// Static description of one supported model variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelConfig {
    /// Catalog key (e.g., "vit-b-32")
    pub key: &'static str,
    /// Upstream pretrained checkpoint
    pub pretrained: &'static str,
    /// Hub repository with the ONNX export of the checkpoint
    pub onnx_repo: &'static str,
    /// Output embedding dimension
    pub dimension: usize,
    /// Square input resolution of the vision tower
    pub image_size: u32,
    pub quality: &'static str,
    pub speed: &'static str,
}

/// Labels exposed per model by the catalog endpoint
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModelLabels {
    pub dim: usize,
    pub quality: &'static str,
    pub speed: &'static str,
}

impl ModelConfig {
    pub fn labels(&self) -> ModelLabels {
        ModelLabels {
            dim: self.dimension,
            quality: self.quality,
            speed: self.speed,
        }
    }
}

/// Supported models, in the order they are listed
pub const CATALOG: &[ModelConfig] = &[
    ModelConfig {
        key: "vit-b-32",
        pretrained: "openai/clip-vit-base-patch32",
        onnx_repo: "Xenova/clip-vit-base-patch32",
        dimension: 512,
        image_size: 224,
        quality: "good",
        speed: "fast",
    },
    ModelConfig {
        key: "vit-b-16",
        pretrained: "openai/clip-vit-base-patch16",
        onnx_repo: "Xenova/clip-vit-base-patch16",
        dimension: 512,
        image_size: 224,
        quality: "better",
        speed: "medium",
    },
    ModelConfig {
        key: "vit-l-14",
        pretrained: "openai/clip-vit-large-patch14",
        onnx_repo: "Xenova/clip-vit-large-patch14",
        dimension: 768,
        image_size: 224,
        quality: "best",
        speed: "slow",
    },
    ModelConfig {
        key: "vit-l-14-336",
        pretrained: "openai/clip-vit-large-patch14-336",
        onnx_repo: "Xenova/clip-vit-large-patch14-336",
        dimension: 768,
        image_size: 336,
        quality: "best+",
        speed: "slowest",
    },
];

/// Look up a model by catalog key
pub fn find_model(key: &str) -> Option<&'static ModelConfig> {
    CATALOG.iter().find(|m| m.key == key)
}

/// All catalog keys in catalog order
pub fn catalog_keys() -> Vec<&'static str> {
    CATALOG.iter().map(|m| m.key).collect()
}

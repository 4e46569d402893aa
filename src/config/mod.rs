// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Startup configuration
//!
//! Every flag can also be set through the environment (a `.env` file is
//! loaded before parsing).

use clap::Parser;
use std::path::PathBuf;

use crate::embeddings::{DevicePreference, LoadOptions, DEFAULT_MODEL_KEY};

/// CLIP Embedding Server
#[derive(Parser, Debug, Clone)]
#[command(name = "clip-embed-server")]
#[command(version)]
#[command(about = "Serve CLIP image embeddings over HTTP", long_about = None)]
pub struct Args {
    /// CLIP model to use (vit-b-32, vit-b-16, vit-l-14, vit-l-14-336)
    #[arg(long, env = "CLIP_MODEL", default_value = DEFAULT_MODEL_KEY)]
    pub model: String,

    /// Port to run server on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Device to run the model on (auto picks cuda, then mps, then cpu)
    #[arg(long, env = "CLIP_DEVICE", value_enum, default_value_t = DevicePreference::Auto)]
    pub device: DevicePreference,

    /// Directory containing vision_model.onnx (downloaded from the hub when unset)
    #[arg(long, env = "CLIP_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Maximum request body size in megabytes
    #[arg(long, env = "MAX_UPLOAD_MB", default_value_t = 32)]
    pub max_upload_mb: usize,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "ORT_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,
}

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_key: String,
    pub device: DevicePreference,
    pub model_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub intra_threads: usize,
}

impl ServerConfig {
    /// Options for the startup model loader
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            model_key: self.model_key.clone(),
            device: self.device,
            model_dir: self.model_dir.clone(),
            intra_threads: self.intra_threads,
        }
    }
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            model_key: args.model,
            device: args.device,
            model_dir: args.model_dir,
            max_upload_bytes: args.max_upload_mb.max(1) * 1024 * 1024,
            intra_threads: args.intra_threads.max(1),
        }
    }
}

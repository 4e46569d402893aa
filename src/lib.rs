// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod embeddings;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{create_app, start_server, AppState};
pub use config::{Args, ServerConfig};
pub use embeddings::{
    load_service, Device, DevicePreference, EmbedError, EmbeddingService, ImageEncoder, LoadError,
    LoadOptions,
};

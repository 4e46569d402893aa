// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod handlers;
pub mod http_server;

pub use embed::{
    embed_batch_handler, embed_handler, BatchEmbedResponse, BatchMode, EmbedResponse,
    PartialBatchResponse,
};
pub use errors::ErrorResponse;
pub use handlers::{health_handler, models_handler, HealthResponse, ModelsResponse};
pub use http_server::{create_app, start_server, AppState, DEFAULT_MAX_UPLOAD_BYTES};

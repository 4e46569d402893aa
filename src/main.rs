// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use clip_embed_server::{
    api::start_server,
    config::{Args, ServerConfig},
    embeddings::load_service,
    version,
};
use std::{env, sync::Arc};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from(Args::parse());

    info!("Starting {}", version::get_version_string());
    info!("Features: {}", version::FEATURES.join(", "));
    info!(
        "Model: {}, device preference: {:?}, model dir: {:?}",
        config.model_key, config.device, config.model_dir
    );

    // Model loads once; the server never starts without it
    let service = match load_service(&config.load_options()).await {
        Ok(service) => service,
        Err(e) => {
            error!("Failed to load model '{}': {}", config.model_key, e);
            return Err(e.into());
        }
    };

    info!(
        "Model {} ready on {} (dimension {})",
        service.model_key(),
        service.device(),
        service.dimension()
    );

    start_server(&config, Arc::new(service)).await
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::http_server::AppState;
use crate::embeddings::{catalog_keys, ModelLabels, CATALOG};
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: Option<String>,
    pub device: String,
    pub dimension: Option<usize>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub current: String,
    pub available: Vec<&'static str>,
    pub models: BTreeMap<&'static str, ModelLabels>,
}

/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let service = &state.service;

    Json(HealthResponse {
        status: "ok".to_string(),
        model: Some(service.model_key().to_string()),
        device: service.device().to_string(),
        dimension: Some(service.dimension()),
        version: version::VERSION.to_string(),
    })
}

/// GET /models
pub async fn models_handler(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        current: state.service.model_key().to_string(),
        available: catalog_keys(),
        models: CATALOG.iter().map(|m| (m.key, m.labels())).collect(),
    })
}

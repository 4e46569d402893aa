// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the CLIP embedding server

/// Semantic version number
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name reported in logs
pub const SERVICE_NAME: &str = "CLIP Embedding Server";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "single-embed",
    "batch-embed",
    "partial-batch",
    "device-fallback",
    "local-model-dir",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} v{}", SERVICE_NAME, VERSION)
}

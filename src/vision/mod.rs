// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image handling for the embedding pipeline
//!
//! This module provides:
//! - Decoding of uploaded bytes with format sniffing
//! - RGB normalization of decoded images
//! - CLIP preprocessing into NCHW tensors

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{decode_image_bytes, ensure_rgb, ImageError, ImageInfo, MAX_IMAGE_SIZE};
pub use preprocessing::{preprocess_for_clip, CLIP_MEAN, CLIP_STD};

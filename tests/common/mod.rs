// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared helpers for the integration tests
//!
//! The mock encoders reuse the real CLIP preprocessing so every test runs
//! the same decode and tensor path as production, without model weights.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use clip_embed_server::{
    api::{create_app, AppState},
    embeddings::{Device, EmbeddingService, ImageEncoder},
    vision::preprocess_for_clip,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use ndarray::{Array4, Axis};
use std::io::Cursor;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

pub const BOUNDARY: &str = "clip-test-boundary";

/// Deterministic encoder: tiles the per-channel means of the input tensor
pub struct MockEncoder {
    pub dimension: usize,
}

impl ImageEncoder for MockEncoder {
    fn preprocess(&self, image: &DynamicImage) -> Result<Array4<f32>> {
        Ok(preprocess_for_clip(image, 32))
    }

    fn infer(&self, pixel_values: &Array4<f32>) -> Result<Vec<f32>> {
        let means: Vec<f32> = (0..3)
            .map(|c| pixel_values.index_axis(Axis(1), c).mean().unwrap_or(0.0))
            .collect();
        Ok((0..self.dimension)
            .map(|i| means[i % 3] + 1.0 + (i as f32) * 0.001)
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Encoder whose forward pass always fails
pub struct FailingEncoder;

impl ImageEncoder for FailingEncoder {
    fn preprocess(&self, image: &DynamicImage) -> Result<Array4<f32>> {
        Ok(preprocess_for_clip(image, 32))
    }

    fn infer(&self, _pixel_values: &Array4<f32>) -> Result<Vec<f32>> {
        Err(anyhow!("execution provider lost"))
    }

    fn dimension(&self) -> usize {
        512
    }
}

/// Encoder that returns an all-zero vector
pub struct ZeroEncoder;

impl ImageEncoder for ZeroEncoder {
    fn preprocess(&self, image: &DynamicImage) -> Result<Array4<f32>> {
        Ok(preprocess_for_clip(image, 32))
    }

    fn infer(&self, _pixel_values: &Array4<f32>) -> Result<Vec<f32>> {
        Ok(vec![0.0; 512])
    }

    fn dimension(&self) -> usize {
        512
    }
}

pub fn service_with(model_key: &str, encoder: Arc<dyn ImageEncoder>) -> Arc<EmbeddingService> {
    Arc::new(EmbeddingService::new(model_key, Device::Cpu, encoder))
}

pub fn mock_service(dimension: usize) -> Arc<EmbeddingService> {
    service_with("vit-b-32", Arc::new(MockEncoder { dimension }))
}

pub fn test_app(service: Arc<EmbeddingService>) -> Router {
    create_app(Arc::new(AppState::new(service)))
}

pub fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), format)
        .expect("encode test image");
    buf
}

pub fn png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color))),
        ImageFormat::Png,
    )
}

pub fn rgba_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color))),
        ImageFormat::Png,
    )
}

pub fn jpeg(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color))),
        ImageFormat::Jpeg,
    )
}

/// Build a multipart/form-data body from (field, file name, bytes) parts
pub fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, file_name, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[(&str, &str, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

/// Send a request and decode the JSON body
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub fn as_vector(value: &serde_json::Value) -> Vec<f32> {
    value
        .as_array()
        .expect("embedding array")
        .iter()
        .map(|v| v.as_f64().expect("number") as f32)
        .collect()
}

pub fn norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end tests against a real CLIP vision tower
//!
//! Requires CLIP_MODEL_DIR pointing at a directory containing the ONNX
//! export of vit-b-32 (`vision_model.onnx` or `onnx/vision_model.onnx`).
//! Run with: `CLIP_MODEL_DIR=/models/clip-vit-base-patch32 cargo test -- --ignored`

use clip_embed_server::embeddings::{l2_norm, load_service, DevicePreference, LoadOptions};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::PathBuf;

fn model_dir() -> PathBuf {
    PathBuf::from(std::env::var("CLIP_MODEL_DIR").expect("CLIP_MODEL_DIR must be set"))
}

fn png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod real_model_tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Needs model weights
    async fn test_real_model_embeddings() {
        let service = load_service(&LoadOptions {
            model_key: "vit-b-32".to_string(),
            device: DevicePreference::Cpu,
            model_dir: Some(model_dir()),
            intra_threads: 2,
        })
        .await
        .expect("Failed to load CLIP model");

        assert_eq!(service.dimension(), 512);

        let red = service.embed_bytes(&png(640, 480, [220, 20, 20])).unwrap();
        let red_small = service.embed_bytes(&png(64, 48, [220, 20, 20])).unwrap();
        let blue = service.embed_bytes(&png(640, 480, [20, 20, 220])).unwrap();

        assert_eq!(red.len(), 512);
        assert!((l2_norm(&red) - 1.0).abs() < 1e-5);

        // Same content at different resolutions lands close together
        assert!(cosine(&red, &red_small) > cosine(&red, &blue));

        let again = service.embed_bytes(&png(640, 480, [220, 20, 20])).unwrap();
        for (a, b) in red.iter().zip(&again) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[tokio::test]
    #[ignore] // Needs model weights
    async fn test_real_model_batch_matches_single() {
        let service = load_service(&LoadOptions {
            model_key: "vit-b-32".to_string(),
            device: DevicePreference::Cpu,
            model_dir: Some(model_dir()),
            intra_threads: 2,
        })
        .await
        .expect("Failed to load CLIP model");

        let images = vec![png(300, 200, [0, 128, 0]), png(200, 300, [128, 0, 128])];
        let batch = service.embed_batch(&images).unwrap();

        assert_eq!(batch.len(), 2);
        for (bytes, embedding) in images.iter().zip(&batch) {
            let single = service.embed_bytes(bytes).unwrap();
            for (a, b) in single.iter().zip(embedding) {
                assert!((a - b).abs() < 1e-5);
            }
        }
    }
}

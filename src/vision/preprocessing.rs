// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the CLIP vision encoder

use image::{imageops::FilterType, DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// CLIP normalization mean values (OpenAI CLIP, not ImageNet)
pub const CLIP_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];

/// CLIP normalization std values
pub const CLIP_STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// Preprocess an RGB image for a CLIP vision tower
///
/// Steps:
/// 1. Center crop the largest square (side = shortest edge)
/// 2. Resize the square to `input_size` x `input_size` (bicubic)
/// 3. Normalize: (pixel/255 - mean) / std
/// 4. Convert to NCHW tensor format [1, 3, H, W]
///
/// Cropping before resizing keeps memory bounded by the input and the
/// target size, whatever the aspect ratio.
pub fn preprocess_for_clip(image: &DynamicImage, input_size: u32) -> Array4<f32> {
    let square = resize_square(&crop_center_square(image), input_size);
    let rgb = square.to_rgb8();

    let size = input_size as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] =
                (pixel[c] as f32 / 255.0 - CLIP_MEAN[c]) / CLIP_STD[c];
        }
    }

    tensor
}

/// Largest centered square of the image
pub fn crop_center_square(image: &DynamicImage) -> DynamicImage {
    let (w, h) = image.dimensions();
    center_crop(image, w.min(h))
}

/// Resize a square image to `target` x `target`
///
/// An empty image becomes a uniform gray square.
pub fn resize_square(image: &DynamicImage, target: u32) -> DynamicImage {
    let (w, h) = image.dimensions();

    if w == 0 || h == 0 {
        return DynamicImage::ImageRgb8(RgbImage::from_pixel(target, target, Rgb([128, 128, 128])));
    }

    if (w, h) == (target, target) {
        return image.clone();
    }

    image.resize_exact(target, target, FilterType::CatmullRom)
}

/// Crop a `size` x `size` square from the center of the image
pub fn center_crop(image: &DynamicImage, size: u32) -> DynamicImage {
    let (w, h) = image.dimensions();
    let crop_x = w.saturating_sub(size) / 2;
    let crop_y = h.saturating_sub(size) / 2;
    image.crop_imm(crop_x, crop_y, size.min(w), size.min(h))
}

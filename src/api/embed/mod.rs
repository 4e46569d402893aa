// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Image embedding endpoints
//!
//! - `POST /embed` - one image under the `image` multipart field
//! - `POST /embed/batch` - any number of images under `images`

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{embed_batch_handler, embed_handler};
pub use request::{read_uploads, BatchMode, BatchQuery, IMAGES_FIELD, IMAGE_FIELD};
pub use response::{BatchEmbedResponse, BatchItemResult, EmbedResponse, PartialBatchResponse};

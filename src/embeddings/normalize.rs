// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Unit normalization of feature vectors

use super::errors::EmbedError;

/// Euclidean norm of a vector
pub fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scale a vector in place to unit Euclidean length
///
/// A zero or non-finite norm cannot be scaled to unit length and is
/// reported as an internal error instead of producing NaNs.
pub fn l2_normalize(vector: &mut [f32]) -> Result<(), EmbedError> {
    let norm = l2_norm(vector);
    if !norm.is_finite() || norm <= f32::EPSILON {
        return Err(EmbedError::Internal(format!(
            "cannot normalize feature vector with norm {}",
            norm
        )));
    }

    vector.iter_mut().for_each(|x| *x /= norm);
    Ok(())
}

//! Validity gate: band-count verification and per-pixel screening

use crate::config::{BandCountPolicy, GateConfig, ValidityPolicy};
use crate::errors::{BandStatsError, Result};
use ndarray::{Array2, Array3, ArrayView1, Axis};
use std::path::Path;

/// Outcome of the band-count check for one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandCheck {
    Accepted,
    /// Wrong band count under [`BandCountPolicy::Skip`]
    Skipped { expected: usize, found: usize },
}

/// Verify the band count of `sample` against the gate configuration
///
/// # Errors
///
/// Returns `BandCountMismatch` when the count is wrong and the policy is
/// [`BandCountPolicy::Fail`].
pub fn check_band_count(
    path: &Path,
    sample: &Array3<f32>,
    gate: &GateConfig,
) -> Result<BandCheck> {
    let Some(expected) = gate.expected_bands else {
        return Ok(BandCheck::Accepted);
    };
    let found = sample.len_of(Axis(2));
    if found == expected {
        return Ok(BandCheck::Accepted);
    }

    match gate.band_count_policy {
        BandCountPolicy::Skip => Ok(BandCheck::Skipped { expected, found }),
        BandCountPolicy::Fail => Err(BandStatsError::BandCountMismatch {
            path: path.to_path_buf(),
            expected,
            found,
        }),
    }
}

/// A pixel is valid when none of its band values is NaN or infinite
#[inline]
#[must_use]
pub fn pixel_is_valid(pixel: ArrayView1<'_, f32>) -> bool {
    pixel.iter().all(|v| v.is_finite())
}

/// `(rows, cols)` mask of pixels that pass `policy`
#[must_use]
pub fn valid_pixel_mask(sample: &Array3<f32>, policy: ValidityPolicy) -> Array2<bool> {
    let (rows, cols, _) = sample.dim();
    Array2::from_shape_fn((rows, cols), |(r, c)| match policy {
        ValidityPolicy::AcceptAll => true,
        ValidityPolicy::FiniteOnly => pixel_is_valid(sample.slice(ndarray::s![r, c, ..])),
    })
}

//! Parallel reduction of one image into partial moments
//!
//! Rows of the sample are reduced on the rayon pool, then the per-row
//! partials are combined in row order so the result does not depend on how
//! the work was split. Values are widened to f64 before summation to avoid
//! precision loss.

use super::accumulator::ImageMoments;
use super::validity::pixel_is_valid;
use crate::config::{AccumulationMode, ValidityPolicy};
use ndarray::{Array3, ArrayView2, Axis};
use rayon::prelude::*;

/// Number of channels the moments of `sample` will have under `mode`
#[must_use]
pub fn moment_channels(sample: &Array3<f32>, mode: AccumulationMode) -> usize {
    match mode {
        AccumulationMode::PerBand => sample.len_of(Axis(2)),
        AccumulationMode::Flattened => 1,
    }
}

/// Compute sums, sums of squares and the valid count for one image
#[must_use]
pub fn image_moments(
    sample: &Array3<f32>,
    validity: ValidityPolicy,
    mode: AccumulationMode,
) -> ImageMoments {
    let channels = moment_channels(sample, mode);

    log::trace!(
        "Reducing {} rows across {} threads",
        sample.len_of(Axis(0)),
        rayon::current_num_threads()
    );

    let rows: Vec<ImageMoments> = sample
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|row| {
            let mut acc = ImageMoments::zeros(channels);
            accumulate_row(&mut acc, row, validity, mode);
            acc
        })
        .collect();

    rows.iter()
        .fold(ImageMoments::zeros(channels), |acc, row| acc.combine(row))
}

fn accumulate_row(
    acc: &mut ImageMoments,
    row: ArrayView2<'_, f32>,
    validity: ValidityPolicy,
    mode: AccumulationMode,
) {
    for pixel in row.outer_iter() {
        match mode {
            AccumulationMode::PerBand => {
                if validity == ValidityPolicy::FiniteOnly && !pixel_is_valid(pixel) {
                    continue;
                }
                acc.push_pixel(pixel.iter().copied());
            }
            AccumulationMode::Flattened => {
                for &v in pixel {
                    if validity == ValidityPolicy::FiniteOnly && !v.is_finite() {
                        continue;
                    }
                    acc.push_pixel([v]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_band_sums_over_valid_pixels() {
        let sample = Array3::from_shape_fn((2, 2, 3), |(r, c, b)| (r * 2 + c + b) as f32);
        let m = image_moments(&sample, ValidityPolicy::FiniteOnly, AccumulationMode::PerBand);

        assert_eq!(m.count, 4);
        // band 0 values: 0, 1, 2, 3
        assert_eq!(m.sum[0], 6.0);
        assert_eq!(m.sum_sq[0], 14.0);
        // band 2 values: 2, 3, 4, 5
        assert_eq!(m.sum[2], 14.0);
    }

    #[test]
    fn nan_in_one_band_drops_whole_pixel() {
        let mut sample = Array3::<f32>::from_elem((1, 3, 4), 2.0);
        sample[[0, 1, 2]] = f32::NAN;

        let m = image_moments(&sample, ValidityPolicy::FiniteOnly, AccumulationMode::PerBand);
        assert_eq!(m.count, 2);
        for band in 0..4 {
            assert_eq!(m.sum[band], 4.0);
            assert_eq!(m.sum_sq[band], 8.0);
        }
    }

    #[test]
    fn accept_all_keeps_non_finite_values() {
        let mut sample = Array3::<f32>::from_elem((1, 2, 2), 1.0);
        sample[[0, 0, 1]] = f32::INFINITY;

        let m = image_moments(&sample, ValidityPolicy::AcceptAll, AccumulationMode::PerBand);
        assert_eq!(m.count, 2);
        assert_eq!(m.sum[0], 2.0);
        assert!(m.sum[1].is_infinite());
    }

    #[test]
    fn flattened_pools_values_from_all_bands() {
        let sample = Array3::from_shape_fn((1, 2, 3), |(_, c, b)| (c * 3 + b) as f32);
        let m = image_moments(&sample, ValidityPolicy::FiniteOnly, AccumulationMode::Flattened);

        assert_eq!(m.channels(), 1);
        assert_eq!(m.count, 6);
        assert_eq!(m.sum[0], 15.0);
        assert_eq!(m.sum_sq[0], 55.0);
    }

    #[test]
    fn flattened_filters_single_values() {
        let mut sample = Array3::<f32>::from_elem((1, 2, 2), 3.0);
        sample[[0, 0, 0]] = f32::NAN;

        let m = image_moments(&sample, ValidityPolicy::FiniteOnly, AccumulationMode::Flattened);
        assert_eq!(m.count, 3);
        assert_eq!(m.sum[0], 9.0);
    }

    #[test]
    fn empty_image_contributes_nothing() {
        let sample = Array3::<f32>::zeros((0, 0, 10));
        let m = image_moments(&sample, ValidityPolicy::FiniteOnly, AccumulationMode::PerBand);
        assert_eq!(m.count, 0);
        assert_eq!(m.channels(), 10);
    }
}

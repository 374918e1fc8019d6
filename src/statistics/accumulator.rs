//! Running sums and finalization
//!
//! The accumulator never holds pixel data. Each image is first reduced into
//! [`ImageMoments`] and then merged, which keeps accumulation commutative
//! over images.

use crate::errors::{BandStatsError, Result};
use std::path::Path;

/// Partial sums contributed by a single image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageMoments {
    pub sum: Vec<f64>,
    pub sum_sq: Vec<f64>,
    /// Number of valid pixels (or values, in flattened mode)
    pub count: u64,
}

impl ImageMoments {
    /// Zeroed moments for `channels` channels
    #[must_use]
    pub fn zeros(channels: usize) -> Self {
        Self {
            sum: vec![0.0; channels],
            sum_sq: vec![0.0; channels],
            count: 0,
        }
    }

    #[must_use]
    pub fn channels(&self) -> usize {
        self.sum.len()
    }

    /// Add one pixel, one value per channel
    pub fn push_pixel(&mut self, pixel: impl IntoIterator<Item = f32>) {
        for ((s, q), v) in self.sum.iter_mut().zip(self.sum_sq.iter_mut()).zip(pixel) {
            let v = f64::from(v);
            *s += v;
            *q += v * v;
        }
        self.count += 1;
    }

    /// Add another partial result over the same channels in place
    pub fn add(&mut self, other: &Self) {
        for (a, b) in self.sum.iter_mut().zip(&other.sum) {
            *a += b;
        }
        for (a, b) in self.sum_sq.iter_mut().zip(&other.sum_sq) {
            *a += b;
        }
        self.count += other.count;
    }

    /// Combine two partial results over the same channels
    #[must_use]
    pub fn combine(mut self, other: &Self) -> Self {
        self.add(other);
        self
    }
}

/// Final statistics for one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStatistics {
    /// 1-based band number
    pub band: usize,
    pub mean: f64,
    pub std: f64,
}

/// Running per-channel sums, sums of squares and a shared valid-pixel count
///
/// The channel count is fixed by the first image merged into it.
#[derive(Debug, Clone, Default)]
pub struct BandAccumulator {
    totals: ImageMoments,
    initialized: bool,
}

impl BandAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator with its channel count already fixed
    #[must_use]
    pub fn with_channels(channels: usize) -> Self {
        Self {
            totals: ImageMoments::zeros(channels),
            initialized: true,
        }
    }

    /// Channel count, if any image has been merged yet
    #[must_use]
    pub fn channels(&self) -> Option<usize> {
        self.initialized.then_some(self.totals.channels())
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.totals.count
    }

    #[must_use]
    pub fn sums(&self) -> &[f64] {
        &self.totals.sum
    }

    #[must_use]
    pub fn sums_of_squares(&self) -> &[f64] {
        &self.totals.sum_sq
    }

    /// Whether moments with `channels` channels can be merged
    #[must_use]
    pub fn accepts(&self, channels: usize) -> bool {
        !self.initialized || self.totals.channels() == channels
    }

    /// Merge one image's moments into the running totals
    ///
    /// # Errors
    ///
    /// Returns `ChannelMismatch` if the moments were computed over a
    /// different number of channels than earlier images.
    pub fn merge(&mut self, path: &Path, moments: &ImageMoments) -> Result<()> {
        if !self.accepts(moments.channels()) {
            return Err(BandStatsError::ChannelMismatch {
                path: path.to_path_buf(),
                expected: self.totals.channels(),
                found: moments.channels(),
            });
        }
        if !self.initialized {
            self.totals = ImageMoments::zeros(moments.channels());
            self.initialized = true;
        }

        self.totals.add(moments);
        Ok(())
    }

    /// Mean and standard deviation per channel
    ///
    /// Returns `None` when no valid pixel was ever accumulated. Variance is
    /// clamped at zero before the square root, so cancellation in
    /// `E[x^2] - E[x]^2` cannot produce NaN.
    #[must_use]
    pub fn finalize(&self) -> Option<Vec<BandStatistics>> {
        if self.totals.count == 0 {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let n = self.totals.count as f64;
        let stats = self
            .totals
            .sum
            .iter()
            .zip(&self.totals.sum_sq)
            .enumerate()
            .map(|(i, (&s, &q))| {
                let mean = s / n;
                let variance = (q / n - mean * mean).max(0.0);
                BandStatistics {
                    band: i + 1,
                    mean,
                    std: variance.sqrt(),
                }
            })
            .collect();
        Some(stats)
    }
}

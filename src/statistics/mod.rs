//! Streaming band statistics
//!
//! This module computes running per-band means and standard deviations over
//! a sequence of images without holding more than one image in memory.
//!
//! # Organization
//!
//! - [`accumulator`]: running sums, merging and finalization
//! - [`validity`]: band-count verification and per-pixel screening
//! - [`parallel`]: reduction of a single image into partial moments

pub mod accumulator;
pub mod parallel;
pub mod validity;

pub use accumulator::{BandAccumulator, BandStatistics, ImageMoments};
pub use parallel::{image_moments, moment_channels};
pub use validity::{check_band_count, pixel_is_valid, valid_pixel_mask, BandCheck};

//! Per-image inspection
//!
//! Summaries of a decoded sample: shape, source data type, value range and
//! presence of NaN or infinite values.

use crate::config::ValidityPolicy;
use crate::errors::Result;
use crate::raster_io::{RasterSample, SampleLoader, TiffLoader};
use crate::statistics::valid_pixel_mask;
use std::path::Path;

/// Structured description of one decoded image
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSummary {
    pub rows: usize,
    pub cols: usize,
    pub bands: usize,
    pub source_type: &'static str,
    /// Smallest finite value, `None` if the image has no finite value
    pub min: Option<f32>,
    /// Largest finite value, `None` if the image has no finite value
    pub max: Option<f32>,
    pub has_nan: bool,
    pub has_infinite: bool,
    /// Pixels whose values are finite in every band
    pub valid_pixels: usize,
}

impl SampleSummary {
    /// Compute the summary of a loaded sample
    #[must_use]
    pub fn from_sample(sample: &RasterSample) -> Self {
        let (rows, cols, bands) = sample.data.dim();

        let mut min: Option<f32> = None;
        let mut max: Option<f32> = None;
        let mut has_nan = false;
        let mut has_infinite = false;
        for &v in &sample.data {
            if v.is_nan() {
                has_nan = true;
            } else if v.is_infinite() {
                has_infinite = true;
            } else {
                min = Some(min.map_or(v, |m| m.min(v)));
                max = Some(max.map_or(v, |m| m.max(v)));
            }
        }

        let valid_pixels = valid_pixel_mask(&sample.data, ValidityPolicy::FiniteOnly)
            .iter()
            .filter(|&&valid| valid)
            .count();

        Self {
            rows,
            cols,
            bands,
            source_type: sample.source_type,
            min,
            max,
            has_nan,
            has_infinite,
            valid_pixels,
        }
    }

    /// Human-readable lines describing the sample
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let range = match (self.min, self.max) {
            (Some(min), Some(max)) => format!("[{}, {}]", min, max),
            _ => "(no finite values)".to_string(),
        };
        vec![
            format!("Number of bands: {}", self.bands),
            format!("Dimensions (height x width): {} x {}", self.rows, self.cols),
            format!("Data type: {}", self.source_type),
            format!("Value range: {}", range),
            format!("Contains NaN: {}", self.has_nan),
            format!("Contains infinite values: {}", self.has_infinite),
            format!("Valid pixels: {}", self.valid_pixels),
        ]
    }

    /// Log the summary at debug level, one line per property
    pub fn log_debug(&self, name: &str) {
        log::debug!("Image information: {}", name);
        for line in self.lines() {
            log::debug!("   {}", line);
        }
    }
}

/// Load a single raster and print its summary to stdout
///
/// # Errors
///
/// Returns an error if the file cannot be decoded.
pub fn describe_image(path: &Path) -> Result<SampleSummary> {
    let sample = TiffLoader.load(path)?;
    let summary = SampleSummary::from_sample(&sample);

    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
    println!("\n Image Description: {}", name);
    println!("={}", "=".repeat(name.len() + 20));
    for line in summary.lines() {
        println!(" {}", line);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn summary_of_clean_sample() {
        let data = Array3::from_shape_fn((2, 3, 4), |(r, c, b)| (r + c + b) as f32);
        let summary = SampleSummary::from_sample(&RasterSample::new(data, "uint16"));

        assert_eq!((summary.rows, summary.cols, summary.bands), (2, 3, 4));
        assert_eq!(summary.source_type, "uint16");
        assert_eq!(summary.min, Some(0.0));
        assert_eq!(summary.max, Some(6.0));
        assert!(!summary.has_nan);
        assert!(!summary.has_infinite);
        assert_eq!(summary.valid_pixels, 6);
    }

    #[test]
    fn summary_ignores_non_finite_values_in_range() {
        let mut data = Array3::<f32>::from_elem((1, 2, 2), 5.0);
        data[[0, 0, 0]] = f32::NAN;
        data[[0, 1, 1]] = f32::NEG_INFINITY;
        let summary = SampleSummary::from_sample(&RasterSample::new(data, "float32"));

        assert_eq!(summary.min, Some(5.0));
        assert_eq!(summary.max, Some(5.0));
        assert!(summary.has_nan);
        assert!(summary.has_infinite);
        assert_eq!(summary.valid_pixels, 0);
    }

    #[test]
    fn all_nan_sample_has_no_range() {
        let data = Array3::<f32>::from_elem((1, 1, 2), f32::NAN);
        let summary = SampleSummary::from_sample(&RasterSample::new(data, "float32"));
        assert_eq!(summary.min, None);
        assert!(summary.lines()[3].contains("no finite values"));
    }
}

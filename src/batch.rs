//! Batch driver
//!
//! Processes an ordered list of images one at a time: load, validate,
//! accumulate. A failure on one file is logged and recorded in the report;
//! only a band-count mismatch under [`BandCountPolicy::Fail`] stops the run.

use crate::config::{BandCountPolicy, BatchConfig, GateConfig, DEFAULT_PROGRESS_EVERY};
use crate::discovery::discover_images;
use crate::errors::{BandStatsError, Result};
use crate::metadata::SampleSummary;
use crate::raster_io::{SampleLoader, TiffLoader};
use crate::report::{BatchReport, SkipReason, SkippedImage};
use crate::statistics::{check_band_count, image_moments, BandAccumulator, BandCheck};
use std::path::Path;

/// Result of processing a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The image contributed this many valid pixels (or values)
    Accumulated { valid: u64 },
    /// The image was left out
    Skipped(SkipReason),
}

/// Sequential driver over a [`SampleLoader`]
#[derive(Debug, Clone)]
pub struct BatchDriver<L> {
    loader: L,
    gate: GateConfig,
    progress_every: usize,
    verbose: bool,
}

impl<L: SampleLoader> BatchDriver<L> {
    pub fn new(loader: L, gate: GateConfig) -> Self {
        Self {
            loader,
            gate,
            progress_every: DEFAULT_PROGRESS_EVERY,
            verbose: false,
        }
    }

    #[must_use]
    pub fn with_progress_every(mut self, progress_every: usize) -> Self {
        self.progress_every = progress_every.max(1);
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Process every path in order and build the final report
    ///
    /// # Errors
    ///
    /// Returns `BandCountMismatch` if an image has the wrong band count and
    /// the policy is [`BandCountPolicy::Fail`]. All other per-file failures
    /// are recorded as skips.
    pub fn run<P: AsRef<Path>>(&self, paths: &[P]) -> Result<BatchReport> {
        let total = paths.len();
        let mut accumulator = BandAccumulator::new();
        let mut processed = 0;
        let mut skipped = Vec::new();

        for (idx, path) in paths.iter().enumerate() {
            let path = path.as_ref();
            log::info!("Processing image {}/{}: {}", idx + 1, total, display_name(path));

            match self.process_file(path, &mut accumulator) {
                Ok(FileOutcome::Accumulated { valid }) => {
                    log::info!("Valid pixels in this image: {}", valid);
                    processed += 1;
                }
                Ok(FileOutcome::Skipped(reason)) => {
                    log::warn!("Skipping {}: {}", display_name(path), reason.describe());
                    skipped.push(SkippedImage {
                        path: path.to_path_buf(),
                        reason,
                    });
                }
                Err(e @ BandStatsError::BandCountMismatch { .. }) => {
                    log::error!("{}", e);
                    return Err(e);
                }
                Err(e) => {
                    log::warn!("Error processing {}: {}", display_name(path), e);
                    skipped.push(SkippedImage {
                        path: path.to_path_buf(),
                        reason: SkipReason::Failed(e.to_string()),
                    });
                }
            }

            if (idx + 1) % self.progress_every == 0 {
                log::info!("Processed {} of {} images", idx + 1, total);
            }
        }

        Ok(BatchReport {
            images_found: total,
            images_processed: processed,
            skipped,
            valid_pixels: accumulator.count(),
            mode: self.gate.mode,
            statistics: accumulator.finalize(),
            input: None,
        })
    }

    /// Load, validate and accumulate one file
    ///
    /// The sample is dropped before this returns, so at most one image is
    /// held in memory at a time.
    ///
    /// # Errors
    ///
    /// Returns loader errors, `ChannelMismatch` when the image cannot be
    /// merged into the running totals, and `BandCountMismatch` under
    /// [`BandCountPolicy::Fail`].
    pub fn process_file(
        &self,
        path: &Path,
        accumulator: &mut BandAccumulator,
    ) -> Result<FileOutcome> {
        let sample = self.loader.load(path)?;

        if self.verbose {
            SampleSummary::from_sample(&sample).log_debug(&display_name(path));
        }

        let check = check_band_count(path, &sample.data, &self.gate)?;
        if let BandCheck::Skipped { expected, found } = check {
            debug_assert_eq!(self.gate.band_count_policy, BandCountPolicy::Skip);
            return Ok(FileOutcome::Skipped(SkipReason::BandCount { expected, found }));
        }

        let moments = image_moments(&sample.data, self.gate.validity, self.gate.mode);
        drop(sample);

        if moments.count == 0 {
            return Ok(FileOutcome::Skipped(SkipReason::NoValidPixels));
        }

        accumulator.merge(path, &moments)?;
        Ok(FileOutcome::Accumulated {
            valid: moments.count,
        })
    }
}

/// Discover the images described by `config` and run the batch over them
///
/// # Errors
///
/// Returns configuration and discovery errors, plus anything
/// [`BatchDriver::run`] treats as fatal.
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    config.validate()?;

    let files = discover_images(&config.input_dir, &config.pattern)?;
    log::info!("Number of images found: {}", files.len());
    if files.is_empty() {
        log::warn!(
            "No images found in {} matching '{}'. Check the path and extension.",
            config.input_dir.display(),
            config.pattern
        );
    }

    let driver = BatchDriver::new(TiffLoader, config.gate.clone())
        .with_progress_every(config.progress_every)
        .with_verbose(config.verbose);

    Ok(driver
        .run(&files)?
        .with_input(&config.input_dir, &config.pattern))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string())
}

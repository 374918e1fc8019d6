//! Run configuration
//!
//! Every knob that used to be a hardcoded constant (input directory, file
//! pattern, expected band count) plus the policies that decide how invalid
//! data is treated.

use crate::errors::{BandStatsError, Result};
use std::path::PathBuf;

/// Band count of a Landsat scene as exported by the upstream pipeline
pub const DEFAULT_EXPECTED_BANDS: usize = 10;

/// Default filename pattern for input discovery
pub const DEFAULT_PATTERN: &str = "*.TIF";

/// Default interval, in files, between progress lines
pub const DEFAULT_PROGRESS_EVERY: usize = 100;

/// What to do with an image whose band count differs from the expectation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandCountPolicy {
    /// Log the mismatch and leave the image out of all statistics
    #[default]
    Skip,
    /// Abort the whole batch with an error
    Fail,
}

/// Which pixels contribute to the running sums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidityPolicy {
    /// A pixel counts only if every band value is finite
    #[default]
    FiniteOnly,
    /// Every pixel counts, NaN and infinities included
    AcceptAll,
}

/// How band values are grouped into statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccumulationMode {
    /// One mean/std pair per band
    #[default]
    PerBand,
    /// All bands pooled into a single channel
    Flattened,
}

impl BandCountPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Fail => "fail",
        }
    }
}

impl ValidityPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FiniteOnly => "finite-only",
            Self::AcceptAll => "accept-all",
        }
    }
}

impl AccumulationMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerBand => "per-band",
            Self::Flattened => "flattened",
        }
    }
}

/// Gate settings, separated from input location so the batch driver can be
/// used on an explicit list of paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Required band count; `None` accepts any
    pub expected_bands: Option<usize>,
    pub band_count_policy: BandCountPolicy,
    pub validity: ValidityPolicy,
    pub mode: AccumulationMode,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            expected_bands: Some(DEFAULT_EXPECTED_BANDS),
            band_count_policy: BandCountPolicy::default(),
            validity: ValidityPolicy::default(),
            mode: AccumulationMode::default(),
        }
    }
}

/// Full configuration of one statistics run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub pattern: String,
    pub gate: GateConfig,
    /// Log a progress line every this many files
    pub progress_every: usize,
    /// Log a per-image summary for each loaded sample
    pub verbose: bool,
}

impl BatchConfig {
    /// Create a configuration with defaults for everything but the input directory
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            pattern: DEFAULT_PATTERN.to_string(),
            gate: GateConfig::default(),
            progress_every: DEFAULT_PROGRESS_EVERY,
            verbose: false,
        }
    }

    /// Check that the configuration describes a run that can make sense
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an empty pattern, a zero expected band
    /// count or a zero progress interval.
    pub fn validate(&self) -> Result<()> {
        if self.pattern.trim().is_empty() {
            return Err(BandStatsError::InvalidConfig(
                "file pattern must not be empty".to_string(),
            ));
        }
        if self.gate.expected_bands == Some(0) {
            return Err(BandStatsError::InvalidConfig(
                "expected band count must be at least 1".to_string(),
            ));
        }
        if self.progress_every == 0 {
            return Err(BandStatsError::InvalidConfig(
                "progress interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

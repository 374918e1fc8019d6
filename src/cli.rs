//! Defines command-line interface options using `clap` for the band_stats application.

use crate::config::{
    AccumulationMode, BandCountPolicy, BatchConfig, GateConfig, ValidityPolicy,
    DEFAULT_EXPECTED_BANDS, DEFAULT_PATTERN, DEFAULT_PROGRESS_EVERY,
};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Per-band statistics over a directory of multi-band raster images
#[derive(Parser, Debug)]
#[command(
    name = "band_stats",
    version,
    about = "Compute per-band mean and standard deviation over a collection of GeoTIFF images"
)]
pub struct Args {
    /// Directory containing the images
    #[arg(short, long, required_unless_present = "describe")]
    pub input: Option<PathBuf>,

    /// Filename pattern of the images inside the input directory
    #[arg(short, long, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Expected number of bands per image
    #[arg(long, conflicts_with = "any_bands")]
    pub bands: Option<usize>,

    /// Accept images with any number of bands
    #[arg(long, default_value_t = false)]
    pub any_bands: bool,

    /// What to do when an image has the wrong number of bands
    #[arg(long, value_enum, default_value_t = MismatchArg::Skip)]
    pub on_band_mismatch: MismatchArg,

    /// Which pixels contribute to the statistics
    #[arg(long, value_enum, default_value_t = ValidityArg::FiniteOnly)]
    pub validity: ValidityArg,

    /// Pool all bands into a single channel
    #[arg(long, default_value_t = false)]
    pub flatten: bool,

    /// Log a progress line every N images
    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    pub progress_every: usize,

    /// Only count the images matching the pattern
    #[arg(long, default_value_t = false)]
    pub count_only: bool,

    /// Describe a single image (bands, dimensions, data type, value range)
    #[arg(long)]
    pub describe: Option<PathBuf>,

    /// Write the report as JSON to this path ('-' for stdout)
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Number of threads to use for per-image reductions. Defaults to number of CPU cores.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MismatchArg {
    Skip,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidityArg {
    FiniteOnly,
    AcceptAll,
}

impl From<MismatchArg> for BandCountPolicy {
    fn from(arg: MismatchArg) -> Self {
        match arg {
            MismatchArg::Skip => Self::Skip,
            MismatchArg::Fail => Self::Fail,
        }
    }
}

impl From<ValidityArg> for ValidityPolicy {
    fn from(arg: ValidityArg) -> Self {
        match arg {
            ValidityArg::FiniteOnly => Self::FiniteOnly,
            ValidityArg::AcceptAll => Self::AcceptAll,
        }
    }
}

impl Args {
    /// Band expectation implied by the flags
    ///
    /// Flattened runs check no band count unless `--bands` is given.
    #[must_use]
    pub fn expected_bands(&self) -> Option<usize> {
        if self.any_bands {
            None
        } else if let Some(n) = self.bands {
            Some(n)
        } else if self.flatten {
            None
        } else {
            Some(DEFAULT_EXPECTED_BANDS)
        }
    }

    /// Whether the JSON report goes to stdout, which then carries nothing else
    #[must_use]
    pub fn json_to_stdout(&self) -> bool {
        self.json.as_deref() == Some(Path::new("-"))
    }

    /// Build the run configuration, if an input directory was given
    #[must_use]
    pub fn to_config(&self) -> Option<BatchConfig> {
        let input = self.input.clone()?;
        Some(BatchConfig {
            input_dir: input,
            pattern: self.pattern.clone(),
            gate: GateConfig {
                expected_bands: self.expected_bands(),
                band_count_policy: self.on_band_mismatch.into(),
                validity: self.validity.into(),
                mode: if self.flatten {
                    AccumulationMode::Flattened
                } else {
                    AccumulationMode::PerBand
                },
            },
            progress_every: self.progress_every,
            verbose: self.verbose,
        })
    }
}

//! band_stats: per-band pixel statistics over collections of raster images
//!
//! band_stats computes the mean and standard deviation of every band over a
//! directory of multi-band satellite images (e.g. 10-band Landsat GeoTIFFs),
//! streaming one image at a time through a running-sums accumulator.
//!
//! ## Key Features
//!
//! - **Streaming Statistics**: sums and sums of squares in f64, finalized once
//! - **Validity Gate**: band-count verification and NaN/Inf pixel screening,
//!   each driven by an explicit policy
//! - **Fault Isolation**: a corrupt or mis-shaped file is skipped, not fatal
//! - **Parallel Reductions**: each image is reduced on the Rayon pool
//!
//! ## Module Organization
//!
//! - [`raster_io`]: TIFF decoding into `(rows, cols, bands)` arrays
//! - [`discovery`]: glob-based input enumeration
//! - [`statistics`]: accumulator, validity gate and per-image reduction
//! - [`batch`]: the sequential driver over a list of files
//! - [`report`]: console and JSON output
//! - [`metadata`]: per-image summaries
//! - [`config`]: run configuration and policies
//! - [`parallel`]: thread pool configuration
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use band_stats::prelude::*;
//!
//! let config = BatchConfig::new("../images/landsat_images/tiff_images");
//! let report = band_stats::batch::run_batch(&config).unwrap();
//! report.print_summary();
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod metadata;
pub mod parallel;
pub mod raster_io;
pub mod report;
pub mod statistics;

pub use errors::*;

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::batch::{run_batch, BatchDriver, FileOutcome};
    pub use crate::config::{
        AccumulationMode, BandCountPolicy, BatchConfig, GateConfig, ValidityPolicy,
    };
    pub use crate::discovery::{count_images, discover_images};
    pub use crate::errors::{BandStatsError, Result};
    pub use crate::parallel::ParallelConfig;
    pub use crate::raster_io::{RasterSample, SampleLoader, TiffLoader};
    pub use crate::report::{BatchReport, SkipReason, SkippedImage};
    pub use crate::statistics::{BandAccumulator, BandStatistics, ImageMoments};
}

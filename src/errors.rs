//! Centralized error handling for band_stats
//!
//! One error type covers raster decoding, discovery, configuration and
//! reporting so that per-file failures can be logged uniformly by the batch
//! driver while fatal ones propagate to `main`.

use std::fmt;
use std::path::PathBuf;

/// Main error type for band_stats operations
#[derive(Debug)]
pub enum BandStatsError {
    /// TIFF decoding errors
    TiffError(tiff::TiffError),

    /// I/O operation errors
    IoError(std::io::Error),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// Invalid glob pattern
    PatternError(glob::PatternError),

    /// Input directory does not exist or is not a directory
    InputDirectoryNotFound { path: PathBuf },

    /// Image band count differs from the configured expectation
    BandCountMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    /// Image channel count differs from what the accumulator was sized for
    ChannelMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    /// Decoded buffer does not fit the declared image shape
    ReshapeError {
        len: usize,
        rows: usize,
        cols: usize,
        bands: usize,
    },

    /// Pixel layout or sample format the loader cannot handle
    UnsupportedFormat(String),

    /// Configuration values that cannot describe a valid run
    InvalidConfig(String),

    /// Thread pool configuration error
    ThreadPoolError(String),

    /// JSON serialization error
    JsonError(serde_json::Error),

    /// Generic error
    Generic(String),
}

impl fmt::Display for BandStatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandStatsError::TiffError(e) => write!(f, "TIFF error: {}", e),
            BandStatsError::IoError(e) => write!(f, "I/O error: {}", e),
            BandStatsError::ArrayError(e) => write!(f, "Array error: {}", e),
            BandStatsError::PatternError(e) => write!(f, "Invalid file pattern: {}", e),
            BandStatsError::InputDirectoryNotFound { path } => {
                write!(f, "Input directory '{}' not found", path.display())
            }
            BandStatsError::BandCountMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "Image '{}' has {} bands, expected {}",
                path.display(),
                found,
                expected
            ),
            BandStatsError::ChannelMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "Image '{}' has {} channels but statistics are being accumulated over {}",
                path.display(),
                found,
                expected
            ),
            BandStatsError::ReshapeError {
                len,
                rows,
                cols,
                bands,
            } => write!(
                f,
                "Cannot reshape {} values into {} x {} x {}",
                len, rows, cols, bands
            ),
            BandStatsError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            BandStatsError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            BandStatsError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
            BandStatsError::JsonError(e) => write!(f, "JSON error: {}", e),
            BandStatsError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for BandStatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BandStatsError::TiffError(e) => Some(e),
            BandStatsError::IoError(e) => Some(e),
            BandStatsError::ArrayError(e) => Some(e),
            BandStatsError::PatternError(e) => Some(e),
            BandStatsError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<tiff::TiffError> for BandStatsError {
    fn from(error: tiff::TiffError) -> Self {
        BandStatsError::TiffError(error)
    }
}

impl From<std::io::Error> for BandStatsError {
    fn from(error: std::io::Error) -> Self {
        BandStatsError::IoError(error)
    }
}

impl From<ndarray::ShapeError> for BandStatsError {
    fn from(error: ndarray::ShapeError) -> Self {
        BandStatsError::ArrayError(error)
    }
}

impl From<glob::PatternError> for BandStatsError {
    fn from(error: glob::PatternError) -> Self {
        BandStatsError::PatternError(error)
    }
}

impl From<serde_json::Error> for BandStatsError {
    fn from(error: serde_json::Error) -> Self {
        BandStatsError::JsonError(error)
    }
}

impl From<String> for BandStatsError {
    fn from(error: String) -> Self {
        BandStatsError::Generic(error)
    }
}

impl From<&str> for BandStatsError {
    fn from(error: &str) -> Self {
        BandStatsError::Generic(error.to_string())
    }
}

/// Result type alias for band_stats operations
pub type Result<T> = std::result::Result<T, BandStatsError>;

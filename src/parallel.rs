//! Parallel processing configuration and management
//!
//! This module configures Rayon's global thread pool, which is used for
//! the per-image reductions. Files themselves are always processed one at
//! a time.

use crate::errors::{BandStatsError, Result};
use rayon::ThreadPoolBuilder;

/// Configuration for parallel processing
#[derive(Debug, Clone, Default)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    /// Create a new parallel configuration
    pub fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// Set up the global Rayon thread pool with the specified configuration
    pub fn setup_global_pool(&self) -> Result<()> {
        if let Some(num_threads) = self.num_threads {
            ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
                .map_err(|e| {
                    BandStatsError::ThreadPoolError(format!(
                        "Failed to initialize thread pool with {} threads: {}",
                        num_threads, e
                    ))
                })?;

            log::info!("Configured parallel processing with {} threads", num_threads);
        } else {
            log::debug!("Using default thread pool configuration");
        }

        Ok(())
    }
}

/// Get information about the current parallel configuration
pub fn get_parallel_info() -> ParallelInfo {
    ParallelInfo {
        current_threads: rayon::current_num_threads(),
        available_cores: num_cpus::get(),
    }
}

/// Information about the parallel processing environment
#[derive(Debug, Clone)]
pub struct ParallelInfo {
    pub current_threads: usize,
    pub available_cores: usize,
}

impl ParallelInfo {
    /// Log parallel processing information at debug level
    pub fn log_info(&self) {
        log::debug!(
            "Parallel processing: {} threads, {} CPU cores available",
            self.current_threads,
            self.available_cores
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_configurations() {
        let default_config = ParallelConfig::default();
        assert!(default_config.num_threads.is_none());
        assert!(default_config.setup_global_pool().is_ok());

        assert_eq!(ParallelConfig::new(Some(2)).num_threads, Some(2));
    }

    #[test]
    fn parallel_info_reports_positive_counts() {
        let info = get_parallel_info();
        assert!(info.current_threads > 0);
        assert!(info.available_cores > 0);
        info.log_info();
    }
}

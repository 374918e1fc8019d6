//! Batch report: console summary and JSON document

use crate::config::AccumulationMode;
use crate::errors::Result;
use crate::statistics::BandStatistics;
use chrono::Utc;
use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Why an image did not contribute to the statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Band count differed from the configured expectation
    BandCount { expected: usize, found: usize },
    /// Image decoded but no pixel passed the validity policy
    NoValidPixels,
    /// Decode, reshape or shape-consistency failure
    Failed(String),
}

impl SkipReason {
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::BandCount { expected, found } => {
                format!("wrong number of bands ({} detected, {} expected)", found, expected)
            }
            Self::NoValidPixels => "no valid pixels".to_string(),
            Self::Failed(msg) => msg.clone(),
        }
    }
}

/// An image left out of the statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of one batch run, derived from the final accumulator state
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub images_found: usize,
    pub images_processed: usize,
    pub skipped: Vec<SkippedImage>,
    pub valid_pixels: u64,
    pub mode: AccumulationMode,
    /// `None` when no valid pixel was accumulated
    pub statistics: Option<Vec<BandStatistics>>,
    /// Input directory and pattern, when the batch came from discovery
    pub input: Option<(PathBuf, String)>,
}

impl BatchReport {
    /// Attach the discovery parameters used to build the batch
    #[must_use]
    pub fn with_input(mut self, dir: &Path, pattern: &str) -> Self {
        self.input = Some((dir.to_path_buf(), pattern.to_string()));
        self
    }

    #[must_use]
    pub fn has_statistics(&self) -> bool {
        self.statistics.is_some()
    }

    /// Console lines of the final summary
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "=== Final Summary ===".to_string(),
            format!(
                "Images processed successfully: {}/{}",
                self.images_processed, self.images_found
            ),
            format!("Total valid pixels: {}", self.valid_pixels),
        ];

        if !self.skipped.is_empty() {
            lines.push(format!("Skipped images: {}", self.skipped.len()));
            for skipped in &self.skipped {
                lines.push(format!(
                    "   - {}: {}",
                    skipped.path.display(),
                    skipped.reason.describe()
                ));
            }
        }

        match &self.statistics {
            Some(stats) => {
                lines.push(String::new());
                match self.mode {
                    AccumulationMode::PerBand => lines.push("Statistics per band:".to_string()),
                    AccumulationMode::Flattened => {
                        lines.push("Statistics over all bands (flattened):".to_string());
                    }
                }
                for s in stats {
                    let label = match self.mode {
                        AccumulationMode::PerBand => "Band",
                        AccumulationMode::Flattened => "Channel",
                    };
                    lines.push(format!(
                        "{} {}: mean = {:.2}, std = {:.2}",
                        label, s.band, s.mean, s.std
                    ));
                }
            }
            None => {
                lines.push("No statistics could be computed: no valid pixels".to_string());
            }
        }

        lines
    }

    /// Print the summary to stdout
    pub fn print_summary(&self) {
        println!();
        for line in self.summary_lines() {
            println!("{}", line);
        }
    }

    /// Write the summary to `out`
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out)?;
        for line in self.summary_lines() {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    /// Machine-readable form of the report
    #[must_use]
    pub fn to_json(&self) -> Value {
        let input = self.input.as_ref().map(|(dir, pattern)| {
            json!({
                "directory": dir.display().to_string(),
                "pattern": pattern,
            })
        });

        let skipped: Vec<Value> = self
            .skipped
            .iter()
            .map(|s| {
                json!({
                    "path": s.path.display().to_string(),
                    "reason": s.reason.describe(),
                })
            })
            .collect();

        let bands = self.statistics.as_ref().map(|stats| {
            stats
                .iter()
                .map(|s| json!({ "band": s.band, "mean": s.mean, "std": s.std }))
                .collect::<Vec<_>>()
        });

        json!({
            "generated_at": Utc::now().to_rfc3339(),
            "input": input,
            "mode": self.mode.as_str(),
            "images_found": self.images_found,
            "images_processed": self.images_processed,
            "images_skipped": skipped,
            "valid_pixels": self.valid_pixels,
            "bands": bands,
        })
    }

    /// Write the JSON report to `destination`, or to stdout when it is `-`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn write_json(&self, destination: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.to_json())?;
        if destination == Path::new("-") {
            println!("{}", text);
        } else {
            fs::write(destination, text)?;
            log::info!("Saved JSON report to {}", destination.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn report(statistics: Option<Vec<BandStatistics>>) -> BatchReport {
        BatchReport {
            images_found: 3,
            images_processed: 2,
            skipped: vec![SkippedImage {
                path: PathBuf::from("bad.TIF"),
                reason: SkipReason::BandCount {
                    expected: 10,
                    found: 7,
                },
            }],
            valid_pixels: 8,
            mode: AccumulationMode::PerBand,
            statistics,
            input: None,
        }
    }

    #[test]
    fn summary_lists_bands_with_two_decimals() {
        let r = report(Some(vec![
            BandStatistics {
                band: 1,
                mean: 2.0,
                std: 1.0,
            },
            BandStatistics {
                band: 2,
                mean: 0.123,
                std: 3.5,
            },
        ]));
        let lines = r.summary_lines();
        assert!(lines.contains(&"Images processed successfully: 2/3".to_string()));
        assert!(lines.contains(&"Total valid pixels: 8".to_string()));
        assert!(lines.contains(&"Band 1: mean = 2.00, std = 1.00".to_string()));
        assert!(lines.contains(&"Band 2: mean = 0.12, std = 3.50".to_string()));
        assert!(lines
            .iter()
            .any(|l| l.contains("bad.TIF") && l.contains("7 detected")));
    }

    #[test]
    fn summary_without_statistics_says_so() {
        let lines = report(None).summary_lines();
        assert!(lines
            .last()
            .unwrap()
            .starts_with("No statistics could be computed"));
        assert!(!lines.iter().any(|l| l.contains("NaN")));
    }

    #[test]
    fn json_report_shape() {
        let r = report(Some(vec![BandStatistics {
            band: 1,
            mean: 2.0,
            std: 1.0,
        }]))
        .with_input(Path::new("/data"), "*.TIF");
        let value = r.to_json();

        assert_eq!(value["images_found"], 3);
        assert_eq!(value["images_processed"], 2);
        assert_eq!(value["valid_pixels"], 8);
        assert_eq!(value["mode"], "per-band");
        assert_eq!(value["input"]["pattern"], "*.TIF");
        assert_eq!(value["bands"][0]["mean"], 2.0);
        assert_eq!(value["images_skipped"].as_array().unwrap().len(), 1);
        assert!(value["generated_at"].is_string());

        let empty = report(None).to_json();
        assert!(empty["bands"].is_null());
    }

    #[test]
    fn json_report_written_to_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("report.json");
        report(None).write_json(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["images_found"], 3);
    }

    #[test]
    fn summary_can_be_written_to_any_stream() {
        let mut out = Vec::new();
        report(None).write_summary(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with('\n'));
        assert!(text.contains("=== Final Summary ==="));
        assert!(text.contains("Images processed successfully: 2/3"));
    }
}

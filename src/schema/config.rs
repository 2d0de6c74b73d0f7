//! Configuration types for Game of Life runs.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default alive-cell report interval (2 seconds).
fn default_report_interval_ms() -> u64 {
    2000
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

/// Run parameters. Immutable for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Grid width in cells.
    pub image_width: usize,
    /// Grid height in cells.
    pub image_height: usize,
    /// Number of turns to run.
    pub turns: u32,
    /// Worker count used for each turn.
    pub threads: usize,
    /// Interval between alive-cell reports, in milliseconds.
    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self::new(512, 512, 100, 8)
    }
}

impl Params {
    /// Create parameters with the default report interval.
    pub fn new(image_width: usize, image_height: usize, turns: u32, threads: usize) -> Self {
        Self {
            image_width,
            image_height,
            turns,
            threads,
            report_interval_ms: default_report_interval_ms(),
        }
    }

    /// Set the report interval, rounded up to whole milliseconds.
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        let millis = interval.as_nanos().div_ceil(1_000_000);
        self.report_interval_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    #[inline]
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    /// Name of the image the initial grid is read from.
    pub fn input_name(&self) -> String {
        format!("{}x{}", self.image_width, self.image_height)
    }

    /// Name of the image a grid at `turn` is written to.
    pub fn output_name(&self, turn: u32) -> String {
        format!("{}x{}x{}", self.image_width, self.image_height, turn)
    }

    /// Validate configuration parameters.
    ///
    /// More threads than rows is accepted; the surplus workers get empty bands.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.threads == 0 {
            return Err(ConfigError::InvalidThreads);
        }
        if self.report_interval_ms == 0 {
            return Err(ConfigError::InvalidReportInterval);
        }
        if self.threads > self.image_height {
            log::warn!(
                "{} threads for {} rows: {} workers will be idle each turn",
                self.threads,
                self.image_height,
                self.threads - self.image_height
            );
        }
        Ok(())
    }
}

/// Top-level configuration loaded by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(flatten)]
    pub params: Params,
    /// Directory holding input `.pgm` images.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Directory output `.pgm` images are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            params: Params::default(),
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Image dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Thread count must be at least 1")]
    InvalidThreads,
    #[error("Report interval must be non-zero")]
    InvalidReportInterval,
}

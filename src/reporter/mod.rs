//! Report generation module.
//!
//! This module renders a [`PipelineReport`] in one of two formats:
//! - Text: each block's code, followed by its diagram URL when one was rendered.
//!   [`TextStream`] writes the same lines while the pipeline is still running.
//! - JSON: machine-readable structured output
//!
//! # Example
//!
//! ```rust
//! use tf_eraser::reporter::Reporter;
//! use tf_eraser::types::{PipelineReport, ReportFormat};
//! use tf_eraser::Config;
//!
//! let config = Config::default();
//! let reporter = Reporter::new(&config);
//! let text = reporter.generate(&PipelineReport::default(), ReportFormat::Text).unwrap();
//! assert!(text.is_empty());
//! ```

mod json;
mod text;

use crate::config::Config;
use crate::error::Result;
use crate::types::{PipelineReport, ReportFormat};

pub use json::JsonReporter;
pub use text::{TextReporter, TextStream};

/// Report generator that supports multiple output formats.
pub struct Reporter {
    config: Config,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generate a report in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate(&self, report: &PipelineReport, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => TextReporter::new().generate(report),
            ReportFormat::Json => JsonReporter::new(&self.config).generate(report),
        }
    }
}

/// Trait for report generators.
pub trait ReportGenerator {
    /// Generate a report from pipeline results.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn generate(&self, report: &PipelineReport) -> Result<String>;
}

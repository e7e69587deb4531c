//! JSON report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{BlockOutcome, Enrichment, PipelineReport};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// JSON report generator.
pub struct JsonReporter {
    /// Whether to pretty-print the output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
        }
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, report: &PipelineReport) -> Result<String> {
        let json_report = JsonReport::from(report);

        let json = if self.pretty {
            serde_json::to_string_pretty(&json_report)
        } else {
            serde_json::to_string(&json_report)
        };

        json.map_err(|e| crate::err!(ReportGeneration {
            message: format!("Failed to serialize JSON report: {e}"),
        }))
    }
}

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Blocks in service order
    pub blocks: Vec<JsonBlock>,
}

impl From<&PipelineReport> for JsonReport {
    fn from(report: &PipelineReport) -> Self {
        Self {
            metadata: ReportMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: Utc::now().to_rfc3339(),
                files_submitted: report.files_submitted.clone(),
                render_failures: report.enrichment_failures(),
            },
            blocks: report.blocks.iter().map(JsonBlock::from).collect(),
        }
    }
}

/// Report metadata.
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    /// tf-eraser version
    pub version: String,
    /// Report generation timestamp
    pub timestamp: String,
    /// URIs of the files sent for transpilation
    pub files_submitted: Vec<String>,
    /// Number of blocks whose render call failed
    pub render_failures: usize,
}

/// JSON representation of a block and its render outcome.
#[derive(Debug, Serialize)]
pub struct JsonBlock {
    pub id: String,
    pub provider: String,
    pub provisioner: String,
    pub language: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment_error: Option<String>,
}

impl From<&BlockOutcome> for JsonBlock {
    fn from(outcome: &BlockOutcome) -> Self {
        let block = &outcome.block;
        let (image_url, create_file_url, enrichment_error) = match &outcome.enrichment {
            Enrichment::Skipped => (None, None, None),
            Enrichment::Rendered(r) => (
                Some(r.image_url.clone()),
                Some(r.create_file_url.clone()).filter(|u| !u.is_empty()),
                None,
            ),
            Enrichment::Failed(message) => (None, None, Some(message.clone())),
        };

        Self {
            id: block.id.clone(),
            provider: block.provider.clone(),
            provisioner: block.provisioner.clone(),
            language: block.language.clone(),
            code: block.code.clone(),
            created_at: block.created_at,
            image_url,
            create_file_url,
            enrichment_error,
        }
    }
}

//! Core data types for tf-eraser.
//!
//! This module contains the wire types exchanged with the transpile and
//! render services, plus the in-memory results the pipeline hands to the
//! reporter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Output selector sent to the transpile service.
pub const OUTPUT_FORMAT_ERASER_DSL: &str = "EraserDSL";

/// Element type used in render requests.
pub const ELEMENT_TYPE_DIAGRAM: &str = "diagram";

/// Diagram type used in render requests.
pub const DIAGRAM_TYPE_CLOUD_ARCHITECTURE: &str = "cloud-architecture-diagram";

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ============================================================================
// Transpile wire types
// ============================================================================

/// A Terraform file submitted for transpilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// `file://` URI of the absolute path
    pub uri: String,
    /// Raw file text
    pub content: String,
}

impl SourceFile {
    /// Create a new source file entry.
    #[must_use]
    pub fn new(uri: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            content: content.into(),
        }
    }
}

/// Body of the transpile request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranspileRequest {
    /// Files in directory-listing order
    #[serde(rename = "content")]
    pub files: Vec<SourceFile>,
    /// Target description language
    #[serde(rename = "output")]
    pub output_format: String,
}

impl TranspileRequest {
    /// Build a request targeting Eraser's diagram language.
    #[must_use]
    pub fn eraser_dsl(files: Vec<SourceFile>) -> Self {
        Self {
            files,
            output_format: OUTPUT_FORMAT_ERASER_DSL.to_string(),
        }
    }
}

/// One unit of transpiled output.
///
/// Every field defaults when missing; only `code` matters downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeBlock {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provider: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provisioner: String,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Decoded transpile response: the blocks in service order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranspileResult {
    #[serde(deserialize_with = "null_as_default")]
    pub blocks: Vec<CodeBlock>,
}

/// Envelope the transpile service wraps its result in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranspileResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub result: TranspileResult,
}

// ============================================================================
// Render wire types
// ============================================================================

/// A single element in a render request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub diagram_type: String,
    pub code: String,
}

/// Body of the render request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRequest {
    pub elements: Vec<DiagramElement>,
}

impl EnrichmentRequest {
    /// Wrap one block's code in a single cloud-architecture diagram envelope.
    #[must_use]
    pub fn diagram(code: impl Into<String>) -> Self {
        Self {
            elements: vec![DiagramElement {
                element_type: ELEMENT_TYPE_DIAGRAM.to_string(),
                diagram_type: DIAGRAM_TYPE_CLOUD_ARCHITECTURE.to_string(),
                code: code.into(),
            }],
        }
    }
}

/// Decoded render response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentResult {
    #[serde(rename = "imageUrl", deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(rename = "createEraserFileUrl", deserialize_with = "null_as_default")]
    pub create_file_url: String,
}

// ============================================================================
// Pipeline results
// ============================================================================

/// What happened when a block was sent for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    /// No render token was configured for this run
    Skipped,
    /// The render service returned a diagram
    Rendered(EnrichmentResult),
    /// The render call failed; the message was already logged
    Failed(String),
}

impl Enrichment {
    /// The image URL, when rendering succeeded.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Rendered(result) => Some(result.image_url.as_str()),
            _ => None,
        }
    }
}

/// A transpiled block together with its render outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOutcome {
    pub block: CodeBlock,
    pub enrichment: Enrichment,
}

/// Everything one invocation produced, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// URIs of the files sent to the transpile service
    pub files_submitted: Vec<String>,
    /// Blocks in the order the service returned them
    pub blocks: Vec<BlockOutcome>,
}

impl PipelineReport {
    /// Number of blocks whose render call failed.
    #[must_use]
    pub fn enrichment_failures(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b.enrichment, Enrichment::Failed(_)))
            .count()
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ReportFormat {
    /// Block code followed by the image URL, as plain lines
    #[default]
    Text,
    /// JSON document
    Json,
}

//! Error types for tf-eraser.
//!
//! All failures are expressed through a single `thiserror` enum. Each variant
//! records where in the crate it was raised so that a failed run points
//! straight at the stage that broke.
//!
//! # Error Categories
//!
//! - **Collection errors**: listing the directory, reading a file, resolving a path
//! - **Transpile errors**: serializing the request, the HTTP exchange, decoding
//! - **Enrichment errors**: the render call and its response (never fatal)
//! - **Config errors**: invalid configuration files or values
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use tf_eraser::error::{TfEraserError, Result};
//!
//! fn read(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).map_err(|e| TfEraserError::FileRead {
//!         path: path.to_path_buf(),
//!         source: e,
//!         src_path: file!(),
//!         src_line: line!(),
//!     })
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Macro to create errors with automatic source location tracking.
///
/// Usage:
/// ```ignore
/// return Err(err!(ConfigValue { key: "transpile.endpoint".to_string(), message }));
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident { $($field:ident: $value:expr),* $(,)? }) => {
        $crate::error::TfEraserError::$variant {
            $($field: $value,)*
            src_path: file!(),
            src_line: line!(),
        }
    };
}

/// A specialized Result type for tf-eraser operations.
pub type Result<T> = std::result::Result<T, TfEraserError>;

/// The main error type for tf-eraser.
#[derive(Error, Debug)]
pub enum TfEraserError {
    // =========================================================================
    // Collection Errors
    // =========================================================================
    /// The input directory could not be listed.
    #[error("error reading directory '{path}' ({src_path}:{src_line}): {source}")]
    DirectoryRead {
        /// The directory being listed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// A qualifying Terraform file could not be read.
    #[error("error reading file '{path}' ({src_path}:{src_line}): {source}")]
    FileRead {
        /// The file being read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// A directory entry could not be resolved to an absolute path.
    #[error("error getting absolute path for '{path}' ({src_path}:{src_line}): {source}")]
    PathResolution {
        /// The path that failed to resolve
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Transpile Errors
    // =========================================================================
    /// The transpile request body could not be serialized.
    #[error("error marshaling transpile request ({src_path}:{src_line}): {source}")]
    RequestSerialization {
        /// The underlying serde error
        #[source]
        source: serde_json::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// The transpile HTTP exchange failed at the network level.
    #[error("transpile request to '{endpoint}' failed ({src_path}:{src_line}): {source}")]
    TranspileRequest {
        /// The endpoint that was called
        endpoint: String,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// The transpile response could not be turned into blocks.
    #[error("error parsing transpile response ({src_path}:{src_line}): {message}")]
    ResponseDecode {
        /// What went wrong
        message: String,
        /// HTTP status code (if the exchange got that far)
        status_code: Option<u16>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Enrichment Errors (non-fatal)
    // =========================================================================
    /// The render request could not be built or sent, or was rejected.
    #[error("error making Eraser request ({src_path}:{src_line}): {message}")]
    EnrichmentRequest {
        /// What went wrong
        message: String,
        /// HTTP status code (if available)
        status_code: Option<u16>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// The render response body was not the expected JSON.
    #[error("error parsing Eraser response ({src_path}:{src_line}): {source}")]
    EnrichmentDecode {
        /// The underlying serde error
        #[source]
        source: serde_json::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration parsing error.
    #[error("Failed to parse configuration ({src_path}:{src_line}): {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}' ({src_path}:{src_line}): {message}")]
    ConfigValue {
        /// The configuration key
        key: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Output Errors
    // =========================================================================
    /// Report generation error.
    #[error("Failed to generate report ({src_path}:{src_line}): {message}")]
    ReportGeneration {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// I/O error with path context, e.g. writing the report or reading config.
    #[error("I/O error at '{path}' ({src_path}:{src_line}): {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },
}

impl TfEraserError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error, src_path: &'static str, src_line: u32) -> Self {
        Self::Io { path: path.into(), source, src_path, src_line }
    }

    /// Creates a `ConfigParse` error.
    #[must_use]
    pub fn config_parse(message: String, source: Option<Box<dyn std::error::Error + Send + Sync>>, src_path: &'static str, src_line: u32) -> Self {
        Self::ConfigParse { message, source, src_path, src_line }
    }

    /// Whether the error aborts the whole invocation.
    ///
    /// Enrichment errors are reported per block and never abort a run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::EnrichmentRequest { .. } | Self::EnrichmentDecode { .. }
        )
    }

    /// Returns the process exit code for the error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.is_fatal() {
            1
        } else {
            0
        }
    }

    /// Short name of the pipeline stage the error belongs to.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::DirectoryRead { .. } | Self::FileRead { .. } | Self::PathResolution { .. } => {
                "collect"
            }
            Self::RequestSerialization { .. }
            | Self::TranspileRequest { .. }
            | Self::ResponseDecode { .. } => "transpile",
            Self::EnrichmentRequest { .. } | Self::EnrichmentDecode { .. } => "enrich",
            Self::ConfigParse { .. } | Self::ConfigValue { .. } => "config",
            Self::ReportGeneration { .. } | Self::Io { .. } => "output",
        }
    }
}

/// Extension trait for `Result` to add context to errors.
pub trait ResultExt<T> {
    /// Adds a file path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;

    /// Converts a general error into a `ConfigParse` error with context.
    fn to_config_parse_error(self, message: String) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| TfEraserError::io(path, e, file!(), line!()))
    }

    fn to_config_parse_error(self, message: String) -> Result<T> {
        self.map_err(|e| TfEraserError::config_parse(message, Some(Box::new(e)), file!(), line!()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "gone")
    }

    #[test]
    fn test_err_macro_records_location() {
        let e = crate::err!(ConfigValue {
            key: "transpile.endpoint".to_string(),
            message: "not a url".to_string(),
        });
        match e {
            TfEraserError::ConfigValue { src_path, src_line, .. } => {
                assert!(src_path.ends_with("error.rs"));
                assert!(src_line > 0);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_collection_errors_are_fatal() {
        let e = crate::err!(FileRead {
            path: PathBuf::from("/tmp/main.tf"),
            source: io_err(),
        });
        assert!(e.is_fatal());
        assert_eq!(e.exit_code(), 1);
        assert_eq!(e.stage(), "collect");
        assert!(e.to_string().contains("/tmp/main.tf"));
    }

    #[test]
    fn test_enrichment_errors_are_not_fatal() {
        let e = crate::err!(EnrichmentRequest {
            message: "connection refused".to_string(),
            status_code: None,
        });
        assert!(!e.is_fatal());
        assert_eq!(e.exit_code(), 0);
        assert_eq!(e.stage(), "enrich");
    }

    #[test]
    fn test_response_decode_is_fatal() {
        let e = crate::err!(ResponseDecode {
            message: "status 500".to_string(),
            status_code: Some(500),
        });
        assert!(e.is_fatal());
        assert_eq!(e.stage(), "transpile");
    }

    #[test]
    fn test_with_path_wraps_io_error() {
        let r: std::result::Result<(), std::io::Error> = Err(io_err());
        let e = r.with_path("/tmp/report.json").unwrap_err();
        assert!(matches!(e, TfEraserError::Io { .. }));
        assert!(e.to_string().contains("/tmp/report.json"));
    }
}

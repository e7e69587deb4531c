//! Remote service clients.
//!
//! The pipeline talks to two services:
//! - the transpile service, which turns Terraform files into Eraser DSL blocks
//! - the Eraser render service, which turns one block into a diagram image
//!
//! Both sit behind traits so the pipeline can be driven by test doubles.

mod eraser;
mod transpile;

pub use eraser::EraserClient;
pub use transpile::TranspileClient;

use crate::config::HttpOptions;
use crate::error::Result;
use crate::types::{EnrichmentResult, SourceFile, TranspileResult};
use async_trait::async_trait;
use reqwest::Client;

/// Longest response excerpt kept in error messages.
const BODY_EXCERPT_LIMIT: usize = 200;

/// Converts Terraform files into diagram code blocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transpiler: Send + Sync {
    /// Submit the files and return the blocks in service order.
    ///
    /// # Errors
    ///
    /// Returns `RequestSerialization`, `TranspileRequest`, or
    /// `ResponseDecode`. All are fatal for the run.
    async fn transpile(&self, files: Vec<SourceFile>) -> Result<TranspileResult>;
}

/// Renders one block of diagram code into an image.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Render `code` and return where the image lives.
    ///
    /// # Errors
    ///
    /// Returns `EnrichmentRequest` or `EnrichmentDecode`. Neither is fatal.
    async fn render(&self, code: &str) -> Result<EnrichmentResult>;
}

/// Build the HTTP client shared by both services.
///
/// # Errors
///
/// Returns a `ConfigValue` error if the client cannot be constructed.
pub fn build_http_client(options: &HttpOptions) -> Result<Client> {
    let mut builder = Client::builder().user_agent(options.user_agent.clone());
    if let Some(timeout) = options.timeout() {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(|e| crate::err!(ConfigValue {
        key: "http".to_string(),
        message: format!("Failed to create HTTP client: {e}"),
    }))
}

/// First few hundred characters of a response body, for error messages.
pub(crate) fn body_excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_LIMIT {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(BODY_EXCERPT_LIMIT).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_excerpt_short() {
        assert_eq!(body_excerpt(b"  oops \n"), "oops");
    }

    #[test]
    fn test_body_excerpt_truncates() {
        let long = "x".repeat(BODY_EXCERPT_LIMIT + 50);
        let excerpt = body_excerpt(long.as_bytes());
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.len(), BODY_EXCERPT_LIMIT + 3);
    }

    #[test]
    fn test_build_http_client_with_timeout() {
        let options = HttpOptions {
            timeout_secs: Some(5),
            ..HttpOptions::default()
        };
        assert!(build_http_client(&options).is_ok());
    }
}

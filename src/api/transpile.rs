//! Transpile service client.

use super::{body_excerpt, Transpiler};
use crate::config::Config;
use crate::error::Result;
use crate::types::{SourceFile, TranspileRequest, TranspileResponse, TranspileResult};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

/// Posts Terraform files to the transpile endpoint.
#[derive(Debug, Clone)]
pub struct TranspileClient {
    client: Client,
    endpoint: Url,
}

impl TranspileClient {
    /// Create a client targeting `endpoint`.
    #[must_use]
    pub fn new(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// Create a client from the `transpile` config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is not a valid URL.
    pub fn from_config(config: &Config, client: Client) -> Result<Self> {
        Ok(Self::new(client, config.transpile_endpoint()?))
    }

    /// The endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request_error(&self, source: reqwest::Error) -> crate::TfEraserError {
        crate::err!(TranspileRequest {
            endpoint: self.endpoint.to_string(),
            source: source,
        })
    }
}

#[async_trait]
impl Transpiler for TranspileClient {
    async fn transpile(&self, files: Vec<SourceFile>) -> Result<TranspileResult> {
        let request = TranspileRequest::eraser_dsl(files);
        let body = serde_json::to_vec(&request).map_err(|e| crate::err!(RequestSerialization {
            source: e,
        }))?;

        tracing::info!(
            endpoint = %self.endpoint,
            files = request.files.len(),
            bytes = body.len(),
            "Submitting files for transpilation"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.request_error(e))?;
        tracing::debug!(status = %status, bytes = bytes.len(), "Transpile response received");

        if !status.is_success() {
            return Err(crate::err!(ResponseDecode {
                message: format!("service returned {status}: {}", body_excerpt(&bytes)),
                status_code: Some(status.as_u16()),
            }));
        }

        let decoded: TranspileResponse = serde_json::from_slice(&bytes).map_err(|e| crate::err!(ResponseDecode {
            message: format!("{e} (body: {})", body_excerpt(&bytes)),
            status_code: Some(status.as_u16()),
        }))?;

        tracing::info!(blocks = decoded.result.blocks.len(), "Transpile complete");
        Ok(decoded.result)
    }
}

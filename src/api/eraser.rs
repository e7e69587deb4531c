//! Eraser render client.
//!
//! Sends one block of Eraser DSL to the render API and reads back the
//! diagram's image URL. Failures here are reported per block and never end
//! the run.

use super::{body_excerpt, DiagramRenderer};
use crate::config::Config;
use crate::error::Result;
use crate::types::{EnrichmentRequest, EnrichmentResult};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::fmt;
use url::Url;

/// Client for the Eraser render endpoint.
///
/// The bearer token is supplied at construction; the client never reads
/// the environment itself.
#[derive(Clone)]
pub struct EraserClient {
    client: Client,
    endpoint: Url,
    token: String,
}

impl fmt::Debug for EraserClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EraserClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl EraserClient {
    /// Create a client for `endpoint` authenticating with `token`.
    #[must_use]
    pub fn new(client: Client, endpoint: Url, token: impl Into<String>) -> Self {
        Self {
            client,
            endpoint,
            token: token.into(),
        }
    }

    /// Create a client from the `eraser` config section.
    ///
    /// Returns `Ok(None)` when rendering is inactive for this run, i.e. no
    /// non-empty API key is configured or rendering was switched off.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is not a valid URL.
    pub fn from_config(config: &Config, client: Client) -> Result<Option<Self>> {
        let Some(token) = config.render_token() else {
            tracing::debug!("No Eraser API key configured, diagram rendering disabled");
            return Ok(None);
        };

        Ok(Some(Self::new(client, config.eraser_endpoint()?, token)))
    }

    /// The endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl DiagramRenderer for EraserClient {
    async fn render(&self, code: &str) -> Result<EnrichmentResult> {
        let request = EnrichmentRequest::diagram(code);
        let body = serde_json::to_vec(&request).map_err(|e| crate::err!(EnrichmentRequest {
            message: format!("error preparing Eraser request: {e}"),
            status_code: None,
        }))?;

        tracing::debug!(endpoint = %self.endpoint, bytes = body.len(), "Requesting diagram render");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .body(body)
            .send()
            .await
            .map_err(|e| crate::err!(EnrichmentRequest {
                message: e.to_string(),
                status_code: None,
            }))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| crate::err!(EnrichmentRequest {
            message: format!("error reading Eraser response: {e}"),
            status_code: Some(status.as_u16()),
        }))?;

        if !status.is_success() {
            return Err(crate::err!(EnrichmentRequest {
                message: format!("Eraser returned {status}: {}", body_excerpt(&bytes)),
                status_code: Some(status.as_u16()),
            }));
        }

        let result: EnrichmentResult = serde_json::from_slice(&bytes).map_err(|e| crate::err!(EnrichmentDecode {
            source: e,
        }))?;

        tracing::debug!(image_url = %result.image_url, "Diagram rendered");
        Ok(result)
    }
}

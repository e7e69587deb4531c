//! Configuration module for tf-eraser.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`tf-eraser.yaml`)
//! - Environment variables
//! - CLI arguments
//!
//! Later sources win: file, then environment, then CLI flags.
//!
//! # Configuration File Format
//!
//! ```yaml
//! # tf-eraser.yaml
//!
//! transpile:
//!   endpoint: https://apiv2.stakpak.dev/v1/commands/Terraform/transpile
//!
//! eraser:
//!   endpoint: https://app.eraser.io/api/render/elements
//!   api_key: ${ERASER_API_KEY}  # Environment variable expansion
//!   enabled: true
//!
//! http:
//!   timeout_secs: 60
//!
//! output:
//!   pretty: true
//! ```

use crate::error::{Result, ResultExt, TfEraserError};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

/// Default transpile service endpoint.
pub const DEFAULT_TRANSPILE_ENDPOINT: &str =
    "https://apiv2.stakpak.dev/v1/commands/Terraform/transpile";

/// Default Eraser render endpoint.
pub const DEFAULT_ERASER_ENDPOINT: &str = "https://app.eraser.io/api/render/elements";

/// Environment variable holding the Eraser API key.
pub const ERASER_API_KEY_ENV: &str = "ERASER_API_KEY";

/// Environment variable overriding the transpile endpoint.
pub const TRANSPILE_ENDPOINT_ENV: &str = "TF_ERASER_ENDPOINT";

// Matches ${VAR} and $VAR
static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}|\$([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid regex")
});

/// Transpile service options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranspileOptions {
    /// Endpoint the Terraform files are posted to.
    pub endpoint: String,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_TRANSPILE_ENDPOINT.to_string(),
        }
    }
}

/// Eraser render options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EraserOptions {
    /// Render endpoint.
    pub endpoint: String,

    /// Bearer token. Rendering only happens when this is set and non-empty.
    pub api_key: Option<String>,

    /// Master switch; `false` disables rendering even with a key.
    pub enabled: bool,
}

impl Default for EraserOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ERASER_ENDPOINT.to_string(),
            api_key: None,
            enabled: true,
        }
    }
}

/// HTTP transport options shared by both clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpOptions {
    /// Per-request timeout. Unset means the transport default (none).
    pub timeout_secs: Option<u64>,

    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: format!("tf-eraser/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpOptions {
    /// The configured timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Main configuration structure with nested sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transpile service options
    pub transpile: TranspileOptions,

    /// Eraser render options
    pub eraser: EraserOptions,

    /// HTTP options
    pub http: HttpOptions,

    /// Output options
    pub output: OutputOptions,
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        let expanded = expand_env_vars(content);

        let config: Config = serde_yaml::from_str(&expanded).map_err(|e| {
            TfEraserError::config_parse(e.to_string(), Some(Box::new(e)), file!(), line!())
        })?;

        tracing::debug!(
            transpile_endpoint = %config.transpile.endpoint,
            eraser_enabled = config.eraser.enabled,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .to_config_parse_error(format!("cannot read {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Fill unset values from the process environment.
    pub fn load_from_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Fill unset values using the given variable lookup.
    ///
    /// `ERASER_API_KEY` only applies when no key is configured;
    /// `TF_ERASER_ENDPOINT` always overrides the file value.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if self.eraser.api_key.as_deref().is_none_or(str::is_empty) {
            if let Some(key) = non_empty(ERASER_API_KEY_ENV) {
                tracing::debug!("Loaded Eraser API key from {} environment variable", ERASER_API_KEY_ENV);
                self.eraser.api_key = Some(key);
            }
        }

        if let Some(endpoint) = non_empty(TRANSPILE_ENDPOINT_ENV) {
            tracing::debug!(endpoint = %endpoint, "Transpile endpoint overridden from environment");
            self.transpile.endpoint = endpoint;
        }
    }

    /// Merge CLI arguments into the configuration.
    pub fn merge_cli_args(&mut self, cli: &crate::cli::Cli) {
        if let Some(ref endpoint) = cli.endpoint {
            self.transpile.endpoint = endpoint.clone();
        }
        if cli.no_render {
            self.eraser.enabled = false;
        }
    }

    /// Check that both endpoints are valid URLs.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigValue` error naming the bad key.
    pub fn validate(&self) -> Result<()> {
        self.transpile_endpoint()?;
        self.eraser_endpoint()?;
        Ok(())
    }

    /// The parsed transpile endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL.
    pub fn transpile_endpoint(&self) -> Result<Url> {
        parse_endpoint("transpile.endpoint", &self.transpile.endpoint)
    }

    /// The parsed Eraser endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL.
    pub fn eraser_endpoint(&self) -> Result<Url> {
        parse_endpoint("eraser.endpoint", &self.eraser.endpoint)
    }

    /// The token to render with, if rendering is active for this run.
    #[must_use]
    pub fn render_token(&self) -> Option<&str> {
        if !self.eraser.enabled {
            return None;
        }
        self.eraser.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

fn parse_endpoint(key: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| crate::err!(ConfigValue {
        key: key.to_string(),
        message: format!("'{raw}' is not a valid URL: {e}"),
    }))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(crate::err!(ConfigValue {
            key: key.to_string(),
            message: format!("unsupported scheme '{other}'"),
        })),
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. Unset variables expand to nothing so
/// that an unresolved `${ERASER_API_KEY}` never turns into a bogus token.
fn expand_env_vars(content: &str) -> String {
    expand_env_vars_with(content, |name| std::env::var(name).ok())
}

fn expand_env_vars_with<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_VAR_PATTERN
        .replace_all(content, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            lookup(name).unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.transpile.endpoint, DEFAULT_TRANSPILE_ENDPOINT);
        assert_eq!(config.eraser.endpoint, DEFAULT_ERASER_ENDPOINT);
        assert!(config.eraser.enabled);
        assert!(config.http.timeout().is_none());
        assert!(config.render_token().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml_nested() {
        let yaml = r#"
transpile:
  endpoint: http://localhost:4000/v1/commands/Terraform/transpile
eraser:
  api_key: secret
  enabled: true
http:
  timeout_secs: 30
output:
  pretty: false
"#;

        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(
            config.transpile.endpoint,
            "http://localhost:4000/v1/commands/Terraform/transpile"
        );
        // Unspecified keys keep their defaults
        assert_eq!(config.eraser.endpoint, DEFAULT_ERASER_ENDPOINT);
        assert_eq!(config.render_token(), Some("secret"));
        assert_eq!(config.http.timeout(), Some(Duration::from_secs(30)));
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_invalid_yaml_is_config_parse_error() {
        let err = Config::from_yaml("transpile: [unclosed").unwrap_err();
        assert!(matches!(err, TfEraserError::ConfigParse { .. }));
    }

    #[test]
    fn test_env_var_expansion() {
        let lookup = env(&[("TOKEN", "abc"), ("HOST", "example.com")]);
        assert_eq!(expand_env_vars_with("key: ${TOKEN}", &lookup), "key: abc");
        assert_eq!(expand_env_vars_with("url: https://$HOST/x", &lookup), "url: https://example.com/x");
        assert_eq!(expand_env_vars_with("no vars here", &lookup), "no vars here");
    }

    #[test]
    fn test_unset_env_var_expands_to_nothing() {
        let lookup = env(&[]);
        assert_eq!(expand_env_vars_with("api_key: ${MISSING}", &lookup), "api_key: ");
    }

    #[test]
    fn test_apply_env_sets_key_and_endpoint() {
        let mut config = Config::default();
        config.apply_env_with(env(&[
            (ERASER_API_KEY_ENV, "k-123"),
            (TRANSPILE_ENDPOINT_ENV, "http://127.0.0.1:9/transpile"),
        ]));
        assert_eq!(config.render_token(), Some("k-123"));
        assert_eq!(config.transpile.endpoint, "http://127.0.0.1:9/transpile");
    }

    #[test]
    fn test_apply_env_keeps_configured_key() {
        let mut config = Config::default();
        config.eraser.api_key = Some("from-file".to_string());
        config.apply_env_with(env(&[(ERASER_API_KEY_ENV, "from-env")]));
        assert_eq!(config.render_token(), Some("from-file"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env_with(env(&[(ERASER_API_KEY_ENV, ""), (TRANSPILE_ENDPOINT_ENV, "")]));
        assert!(config.render_token().is_none());
        assert_eq!(config.transpile.endpoint, DEFAULT_TRANSPILE_ENDPOINT);
    }

    #[test]
    fn test_render_token_respects_enabled_flag() {
        let mut config = Config::default();
        config.eraser.api_key = Some("key".to_string());
        config.eraser.enabled = false;
        assert!(config.render_token().is_none());

        config.eraser.enabled = true;
        config.eraser.api_key = Some(String::new());
        assert!(config.render_token().is_none());
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.transpile.endpoint = "not a url".to_string();
        let err = config.validate().unwrap_err();
        match err {
            TfEraserError::ConfigValue { key, .. } => assert_eq!(key, "transpile.endpoint"),
            other => panic!("unexpected error: {other:?}"),
        }

        let mut config = Config::default();
        config.eraser.endpoint = "ftp://app.eraser.io/render".to_string();
        assert!(matches!(config.validate(), Err(TfEraserError::ConfigValue { .. })));
    }

    #[test]
    fn test_wire_constants_are_not_configurable() {
        let yaml = r#"
transpile:
  output_format: OtherDSL
eraser:
  diagram_type: sequence-diagram
"#;

        let config = Config::from_yaml(yaml).unwrap();
        let round_trip = serde_yaml::to_string(&config).unwrap();
        assert!(!round_trip.contains("OtherDSL"));
        assert!(!round_trip.contains("sequence-diagram"));
        assert_eq!(config.transpile.endpoint, DEFAULT_TRANSPILE_ENDPOINT);
    }

    #[test]
    fn test_apply_env_fills_blank_key() {
        let mut config = Config::default();
        config.eraser.api_key = Some(String::new());
        config.apply_env_with(env(&[(ERASER_API_KEY_ENV, "from-env")]));
        assert_eq!(config.render_token(), Some("from-env"));
    }
}

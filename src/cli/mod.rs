//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap.
//!
//! # Example Usage
//!
//! ```bash
//! # Transpile a directory and print the Eraser DSL
//! tf-eraser ./terraform
//!
//! # Also render diagrams
//! ERASER_API_KEY=... tf-eraser ./terraform
//!
//! # Point at a local transpile service and write JSON to a file
//! tf-eraser ./terraform --endpoint http://localhost:4000/v1/commands/Terraform/transpile \
//!     --format json --output diagrams.json
//! ```

use crate::types::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

/// tf-eraser - Turn a directory of Terraform files into Eraser diagrams.
#[derive(Parser, Debug)]
#[command(
    name = "tf-eraser",
    author,
    version,
    about = "Turn a directory of Terraform files into Eraser architecture diagrams",
    long_about = "tf-eraser sends the .tf files of one directory to a transpile service, \
                  prints the Eraser diagram code it returns and, when ERASER_API_KEY is set, \
                  renders each block to a diagram image URL."
)]
pub struct Cli {
    /// Directory containing Terraform files (not searched recursively)
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Path to configuration file
    #[arg(short, long, env = "TF_ERASER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Transpile endpoint (overrides config and TF_ERASER_ENDPOINT)
    #[arg(short, long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip diagram rendering even if an Eraser API key is set
    #[arg(long)]
    pub no_render: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parsing() {
        // Verify CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_directory_only() {
        let cli = Cli::parse_from(["tf-eraser", "./terraform"]);
        assert_eq!(cli.directory, PathBuf::from("./terraform"));
        assert_eq!(cli.format, ReportFormat::Text);
        assert!(cli.endpoint.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.no_render);
    }

    #[test]
    fn test_directory_is_required() {
        assert!(Cli::try_parse_from(["tf-eraser"]).is_err());
    }

    #[test]
    fn test_single_directory_only() {
        assert!(Cli::try_parse_from(["tf-eraser", "./a", "./b"]).is_err());
    }

    #[test]
    fn test_with_options() {
        let cli = Cli::parse_from([
            "tf-eraser",
            "./terraform",
            "--format",
            "json",
            "--output",
            "diagrams.json",
            "--endpoint",
            "http://localhost:4000/v1/commands/Terraform/transpile",
            "--no-render",
            "-vv",
        ]);
        assert_eq!(cli.format, ReportFormat::Json);
        assert_eq!(cli.output, Some(PathBuf::from("diagrams.json")));
        assert_eq!(
            cli.endpoint.as_deref(),
            Some("http://localhost:4000/v1/commands/Terraform/transpile")
        );
        assert!(cli.no_render);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_merge_into_config() {
        let cli = Cli::parse_from([
            "tf-eraser",
            "./terraform",
            "--endpoint",
            "http://127.0.0.1:4000/transpile",
            "--no-render",
        ]);
        let mut config = Config::default();
        config.eraser.api_key = Some("k".to_string());
        config.merge_cli_args(&cli);

        assert_eq!(config.transpile.endpoint, "http://127.0.0.1:4000/transpile");
        assert!(config.render_token().is_none());
    }
}

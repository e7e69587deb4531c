//! tf-eraser CLI entry point.
//!
//! This binary provides the command-line interface for tf-eraser.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tf_eraser::cli::Cli;
use tf_eraser::error::ResultExt;
use tf_eraser::reporter::{Reporter, TextStream};
use tf_eraser::{Config, Pipeline, PipelineReport, ReportFormat, TfEraserError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Config files looked up in the working directory, in order.
const DEFAULT_CONFIG_FILES: &[&str] = &["tf-eraser.yaml", "tf-eraser.yml", ".tf-eraser.yaml"];

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let failure = e.downcast_ref::<TfEraserError>();
            tracing::error!(
                stage = failure.map_or("startup", TfEraserError::stage),
                error = %e,
                "Fatal error"
            );

            eprintln!("Error: {e}");

            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut i = 0;
                while let Some(cause) = source {
                    eprintln!("  {i}: {cause}");
                    source = cause.source();
                    i += 1;
                }
            }

            ExitCode::from(failure.map_or(1, TfEraserError::exit_code))
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // RUST_LOG wins over the verbose flag
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(format!("warn,tf_eraser={base_level}"))
        })
    };

    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::debug!("Loading configuration");
    let config = load_config(&cli)?;

    let pipeline = Pipeline::from_config(&config)?;

    let report = match cli.format {
        ReportFormat::Text => stream_text(&pipeline, &cli).await?,
        ReportFormat::Json => {
            let report = pipeline.run(&cli.directory).await?;
            let mut rendered = Reporter::new(&config).generate(&report, ReportFormat::Json)?;
            rendered.push('\n');
            write_report(cli.output.as_deref(), &rendered)?;
            report
        }
    };

    if report.enrichment_failures() > 0 {
        tracing::warn!(
            failures = report.enrichment_failures(),
            "Some diagrams could not be rendered"
        );
    }

    Ok(())
}

/// Print each block as soon as it is transpiled, with its URL line after its render call.
async fn stream_text(pipeline: &Pipeline, cli: &Cli) -> anyhow::Result<PipelineReport> {
    let report = match &cli.output {
        Some(path) => {
            let file = std::fs::File::create(path).with_path(path)?;
            let report = pipeline
                .run_with_sink(&cli.directory, &mut TextStream::new(file))
                .await?;
            tracing::info!(path = %path.display(), "Report written");
            report
        }
        None => {
            pipeline
                .run_with_sink(&cli.directory, &mut TextStream::new(std::io::stdout()))
                .await?
        }
    };
    Ok(report)
}

fn write_report(output: Option<&Path>, rendered: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered).with_path(path)?;
            tracing::info!(path = %path.display(), "Report written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match find_config_file(cli.config.as_deref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading configuration file");
            Config::from_file(&path)?
        }
        None => {
            tracing::debug!("No configuration file found, using default configuration");
            Config::default()
        }
    };

    config.load_from_env();
    config.merge_cli_args(cli);
    config.validate()?;

    tracing::debug!(
        transpile_endpoint = %config.transpile.endpoint,
        rendering = config.render_token().is_some(),
        "Configuration loaded successfully"
    );
    Ok(config)
}

fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    DEFAULT_CONFIG_FILES
        .iter()
        .map(PathBuf::from)
        .chain(dirs::config_dir().map(|d| d.join("tf-eraser").join("config.yaml")))
        .find(|p| p.is_file())
}

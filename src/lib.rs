//! # tf-eraser
//!
//! Turn a directory of Terraform files into Eraser architecture diagrams.
//!
//! tf-eraser is a thin client: it reads the `.tf` files of one directory,
//! posts them to a transpile service that returns Eraser DSL code blocks, and
//! optionally asks the Eraser render API for an image of each block.
//!
//! ## Pipeline
//!
//! 1. **Collect**: read the directory (non-recursive) into `file://` addressed sources
//! 2. **Transpile**: one POST with every file, decoded into ordered code blocks
//! 3. **Render**: when an Eraser API key is configured, one POST per block
//! 4. **Report**: print the blocks in service order, each followed by its image URL
//!
//! Collection and transpile failures abort the run. Render failures are
//! logged and the next block is processed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tf_eraser::{Config, Pipeline, ReportFormat};
//! use tf_eraser::reporter::Reporter;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = Config::default();
//!     config.load_from_env();
//!
//!     let pipeline = Pipeline::from_config(&config)?;
//!     let report = pipeline.run("./terraform".as_ref()).await?;
//!
//!     let text = Reporter::new(&config).generate(&report, ReportFormat::Text)?;
//!     print!("{text}");
//!     Ok(())
//! }
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms
)]

pub mod api;
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod reporter;
pub mod types;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{Result, TfEraserError};
pub use pipeline::Pipeline;
pub use types::{
    BlockOutcome, CodeBlock, Enrichment, EnrichmentResult, PipelineReport, ReportFormat,
    SourceFile, TranspileRequest, TranspileResult,
};

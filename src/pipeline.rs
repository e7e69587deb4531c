//! Pipeline driver.
//!
//! Runs collect → transpile → render-per-block strictly in sequence and
//! gathers the results into a [`PipelineReport`]. Collection and transpile
//! failures end the run; render failures are logged and recorded against
//! their block, and the next block is processed as usual.
//!
//! Each block is handed to a [`BlockSink`] as soon as it is known, before
//! its render call starts, so output does not wait on the render service.

use crate::api::{self, DiagramRenderer, EraserClient, TranspileClient, Transpiler};
use crate::collector;
use crate::config::Config;
use crate::error::Result;
use crate::types::{BlockOutcome, CodeBlock, Enrichment, PipelineReport};
use std::path::Path;

/// Receives blocks while the pipeline is still running.
pub trait BlockSink {
    /// Called with each transpiled block, before it is rendered.
    ///
    /// # Errors
    ///
    /// An error aborts the run.
    fn block_transpiled(&mut self, _index: usize, _block: &CodeBlock) -> Result<()> {
        Ok(())
    }

    /// Called once the block's render step is over, whatever its result.
    ///
    /// # Errors
    ///
    /// An error aborts the run.
    fn block_finished(&mut self, _index: usize, _outcome: &BlockOutcome) -> Result<()> {
        Ok(())
    }
}

/// Sink that ignores every block; the report is the only output.
#[derive(Debug, Default)]
pub struct DiscardSink;

impl BlockSink for DiscardSink {}

/// Sequences the collector and both service clients for one invocation.
pub struct Pipeline {
    transpiler: Box<dyn Transpiler>,
    renderer: Option<Box<dyn DiagramRenderer>>,
}

impl Pipeline {
    /// Create a pipeline from explicit clients.
    ///
    /// A `None` renderer means no block is sent for rendering.
    #[must_use]
    pub fn new(transpiler: Box<dyn Transpiler>, renderer: Option<Box<dyn DiagramRenderer>>) -> Self {
        Self { transpiler, renderer }
    }

    /// Build the HTTP clients described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint is invalid or the HTTP client cannot
    /// be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = api::build_http_client(&config.http)?;
        let transpiler = TranspileClient::from_config(config, client.clone())?;
        let renderer = EraserClient::from_config(config, client)?;

        tracing::debug!(
            transpile_endpoint = %transpiler.endpoint(),
            rendering = renderer.is_some(),
            "Pipeline configured"
        );

        Ok(Self::new(
            Box::new(transpiler),
            renderer.map(|r| Box::new(r) as Box<dyn DiagramRenderer>),
        ))
    }

    /// Run the whole pipeline against `dir`.
    ///
    /// # Errors
    ///
    /// Returns the first collection or transpile error. Render errors are
    /// never returned; they show up as [`Enrichment::Failed`].
    pub async fn run(&self, dir: &Path) -> Result<PipelineReport> {
        self.run_with_sink(dir, &mut DiscardSink).await
    }

    /// Run the pipeline, handing each block to `sink` as it is processed.
    ///
    /// # Errors
    ///
    /// Returns the first collection, transpile or sink error.
    pub async fn run_with_sink(&self, dir: &Path, sink: &mut (dyn BlockSink + Send)) -> Result<PipelineReport> {
        tracing::info!(directory = %dir.display(), "Collecting Terraform files");
        let files = collector::collect_directory(dir).await?;
        let files_submitted: Vec<String> = files.iter().map(|f| f.uri.clone()).collect();

        let result = self.transpiler.transpile(files).await?;

        let mut blocks = Vec::with_capacity(result.blocks.len());
        for (index, block) in result.blocks.into_iter().enumerate() {
            sink.block_transpiled(index, &block)?;
            let enrichment = self.enrich(index, &block).await;
            let outcome = BlockOutcome { block, enrichment };
            sink.block_finished(index, &outcome)?;
            blocks.push(outcome);
        }

        let report = PipelineReport { files_submitted, blocks };
        tracing::info!(
            files = report.files_submitted.len(),
            blocks = report.blocks.len(),
            render_failures = report.enrichment_failures(),
            "Pipeline complete"
        );
        Ok(report)
    }

    async fn enrich(&self, index: usize, block: &CodeBlock) -> Enrichment {
        let Some(renderer) = &self.renderer else {
            return Enrichment::Skipped;
        };

        tracing::info!(block = index, id = %block.id, "Generating diagram image URL");
        match renderer.render(&block.code).await {
            Ok(result) => Enrichment::Rendered(result),
            Err(e) => {
                tracing::warn!(block = index, id = %block.id, error = %e, "Diagram rendering failed, continuing");
                Enrichment::Failed(e.to_string())
            }
        }
    }
}

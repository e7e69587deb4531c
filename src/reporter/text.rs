//! Plain text report generator.

use crate::error::Result;
use crate::pipeline::BlockSink;
use crate::reporter::ReportGenerator;
use crate::types::{BlockOutcome, CodeBlock, Enrichment, PipelineReport};
use std::io::Write;

/// Label printed in front of each rendered diagram URL.
pub const IMAGE_URL_LABEL: &str = "Eraser Diagram Image URL:";

/// Text report generator for CLI output.
///
/// One block per entry: the code as-is, then the image URL line when the
/// block was rendered. Render failures are left to the log.
#[derive(Debug, Default)]
pub struct TextReporter;

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ReportGenerator for TextReporter {
    fn generate(&self, report: &PipelineReport) -> Result<String> {
        let mut output = String::new();

        for outcome in &report.blocks {
            output.push_str(&code_line(&outcome.block));
            if let Some(line) = image_url_line(&outcome.enrichment) {
                output.push_str(&line);
            }
        }

        Ok(output)
    }
}

/// Writes the text report block by block while the pipeline runs.
///
/// Each line is flushed as soon as it is written, so a slow render call
/// never holds back the code of the block it belongs to.
#[derive(Debug)]
pub struct TextStream<W: Write> {
    writer: W,
}

impl<W: Write> TextStream<W> {
    /// Stream into `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give back the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer
            .write_all(line.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|e| crate::err!(ReportGeneration {
                message: format!("cannot write text report: {e}"),
            }))
    }
}

impl<W: Write> BlockSink for TextStream<W> {
    fn block_transpiled(&mut self, _index: usize, block: &CodeBlock) -> Result<()> {
        self.write_line(&code_line(block))
    }

    fn block_finished(&mut self, _index: usize, outcome: &BlockOutcome) -> Result<()> {
        match image_url_line(&outcome.enrichment) {
            Some(line) => self.write_line(&line),
            None => Ok(()),
        }
    }
}

fn code_line(block: &CodeBlock) -> String {
    format!("{}\n", block.code)
}

fn image_url_line(enrichment: &Enrichment) -> Option<String> {
    enrichment
        .image_url()
        .map(|url| format!("{IMAGE_URL_LABEL} {url}\n"))
}

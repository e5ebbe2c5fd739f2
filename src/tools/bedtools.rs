//! Window extraction
//!
//! [`BedtoolsExtractor`] runs `bedtools getfasta` against the genome file.
//! [`NativeExtractor`] slices the already loaded genome and writes the same
//! FASTA, without the external dependency.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::{ToolCommand, WindowExtractor};
use crate::algorithm::protalign::window::Window;
use crate::error::ToolError;
use crate::sequence::{write_fasta_record, GenomeIndex};

#[derive(Debug, Clone)]
pub struct BedtoolsExtractor {
    pub executable: String,
    pub timeout: Option<Duration>,
}

impl BedtoolsExtractor {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            timeout: None,
        }
    }

    pub fn command(&self, genome: &Path, bed: &Path, out: &Path) -> ToolCommand {
        ToolCommand::new("bedtools getfasta", self.executable.clone())
            .arg("getfasta")
            .arg("-fo")
            .arg(out)
            .arg("-fi")
            .arg(genome)
            .arg("-bed")
            .arg(bed)
            .timeout(self.timeout)
    }
}

impl WindowExtractor for BedtoolsExtractor {
    fn extract(&self, genome: &Path, window: &Window, out: &Path) -> Result<(), ToolError> {
        let io_error = |source| ToolError::Io {
            tool: "bedtools getfasta",
            source,
        };
        let mut bed = tempfile::Builder::new()
            .suffix(".bed")
            .tempfile()
            .map_err(io_error)?;
        bed.write_all(window.bed_line().as_bytes())
            .and_then(|_| bed.flush())
            .map_err(io_error)?;
        self.command(genome, bed.path(), out).output()?;
        Ok(())
    }
}

/// Extracts windows from the in-memory genome.
#[derive(Debug, Clone)]
pub struct NativeExtractor {
    genome: Arc<GenomeIndex>,
}

impl NativeExtractor {
    pub fn new(genome: Arc<GenomeIndex>) -> Self {
        Self { genome }
    }
}

impl WindowExtractor for NativeExtractor {
    fn extract(&self, _genome: &Path, window: &Window, out: &Path) -> Result<(), ToolError> {
        let record = self
            .genome
            .get(&window.chrom)
            .ok_or_else(|| ToolError::Failed {
                tool: "native extract",
                status: "unknown chromosome".to_string(),
                stderr: window.chrom.clone(),
            })?;
        let end = window.end.min(record.len());
        let start = window.start.min(end);
        write_fasta_record(out, &window.descriptor(), &record.seq[start..end]).map_err(|source| {
            ToolError::Io {
                tool: "native extract",
                source,
            }
        })
    }
}

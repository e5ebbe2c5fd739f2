//! exonerate `protein2genome` and its GFF3 converter

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use super::{FeatureConverter, SplicedAligner, ToolCommand};
use crate::error::ToolError;

/// Fixed exonerate options: best single model, GFF only.
pub const EXONERATE_ARGS: &[&str] = &[
    "--model",
    "protein2genome",
    "--bestn",
    "1",
    "--showtargetgff",
    "TRUE",
    "--showquerygff",
    "TRUE",
    "--showalignment",
    "FALSE",
    "--showvulgar",
    "FALSE",
];

#[derive(Debug, Clone)]
pub struct Exonerate {
    pub executable: String,
    pub timeout: Option<Duration>,
}

impl Exonerate {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            timeout: None,
        }
    }

    pub fn command(&self, protein: &Path, target: &Path) -> ToolCommand {
        ToolCommand::new("exonerate", self.executable.clone())
            .args(EXONERATE_ARGS.iter().copied())
            .arg("--query")
            .arg(protein)
            .arg("--target")
            .arg(target)
            .timeout(self.timeout)
    }
}

impl SplicedAligner for Exonerate {
    fn align(&self, protein: &Path, target: &Path) -> Result<String, ToolError> {
        let out = self.command(protein, target).output()?;
        if out.is_empty() {
            return Err(ToolError::EmptyOutput { tool: "exonerate" });
        }
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

/// `exonerate_gff_to_alignment_gff3.pl <raw>`; reads a file, so the raw
/// report is staged in a temporary file first.
#[derive(Debug, Clone)]
pub struct ExonerateGffConverter {
    pub executable: String,
    pub timeout: Option<Duration>,
}

impl ExonerateGffConverter {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            timeout: None,
        }
    }

    pub fn command(&self, raw: &Path) -> ToolCommand {
        ToolCommand::new("gff3 converter", self.executable.clone())
            .arg(raw)
            .timeout(self.timeout)
    }
}

impl FeatureConverter for ExonerateGffConverter {
    fn convert(&self, raw: &str) -> Result<String, ToolError> {
        let io_error = |source| ToolError::Io {
            tool: "gff3 converter",
            source,
        };
        let mut staged = tempfile::Builder::new()
            .suffix(".gff")
            .tempfile()
            .map_err(io_error)?;
        staged
            .write_all(raw.as_bytes())
            .and_then(|_| staged.flush())
            .map_err(io_error)?;
        let out = self.command(staged.path()).output()?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

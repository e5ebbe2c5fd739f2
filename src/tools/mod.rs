//! External tool boundary
//!
//! The pipeline talks to four collaborators through the traits below. The
//! command-line wrappers shell out to DIAMOND, bedtools, exonerate and the
//! exonerate-to-GFF3 converter; tests substitute in-process fakes.

pub mod bedtools;
pub mod command;
pub mod diamond;
pub mod exonerate;

use std::path::Path;
use std::time::Duration;

use crate::algorithm::protalign::window::Window;
use crate::error::ToolError;

pub use bedtools::{BedtoolsExtractor, NativeExtractor};
pub use command::ToolCommand;
pub use diamond::Diamond;
pub use exonerate::{Exonerate, ExonerateGffConverter};

/// Scores the translated genome against the query proteins.
pub trait HomologySearch: Send + Sync {
    /// Returns BLAST tabular (outfmt 6) text.
    fn search(
        &self,
        translated: &Path,
        queries: &Path,
        threads: usize,
    ) -> Result<String, ToolError>;
}

/// Materializes a genome window as FASTA with record id `chrom:start-end`.
pub trait WindowExtractor: Send + Sync {
    fn extract(&self, genome: &Path, window: &Window, out: &Path) -> Result<(), ToolError>;
}

/// Aligns one protein against one genomic window.
pub trait SplicedAligner: Send + Sync {
    /// Returns the raw alignment report.
    fn align(&self, protein: &Path, target: &Path) -> Result<String, ToolError>;
}

/// Turns a raw alignment report into GFF lines with window-relative
/// coordinates.
pub trait FeatureConverter: Send + Sync {
    fn convert(&self, raw: &str) -> Result<String, ToolError>;
}

/// Executables and limits for the command-line tool wrappers.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub diamond: String,
    pub exonerate: String,
    pub bedtools: String,
    pub converter: String,
    /// Per invocation; `None` waits forever
    pub timeout: Option<Duration>,
    /// DIAMOND `-k`
    pub max_target_seqs: usize,
}

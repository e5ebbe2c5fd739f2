//! Error types for the pipeline boundaries
//!
//! Fatal conditions surface as [`PipelineError`] through `anyhow`. Per-hit
//! problems ([`HitError`], [`ToolError`]) are recovered by dropping that hit.
//! Unparseable converter rows ([`FeatureError`]) are skipped.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A tabular hit record that cannot be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HitError {
    /// Wrong number of tab-separated columns
    #[error("expected {expected} tab-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    /// A numeric column did not parse
    #[error("invalid {field} value '{value}'")]
    InvalidField { field: &'static str, value: String },
    /// The target id carries no `_strand<k><plus|minus>` suffix
    #[error("malformed frame id '{0}'")]
    MalformedFrameId(String),
    /// Residue coordinates must be 1-based
    #[error("residue coordinates must start at 1, got {start}..{end}")]
    ZeroResidue { start: usize, end: usize },
    /// The chromosome named by the frame id is not in the genome
    #[error("unknown chromosome '{0}'")]
    UnknownChromosome(String),
    /// The hit maps past the end of its source sequence
    #[error("hit {start}..{end} lies outside '{chrom}' (length {len})")]
    OutOfBounds {
        chrom: String,
        start: usize,
        end: usize,
        len: usize,
    },
    /// The hit names a query protein missing from the protein set
    #[error("unknown query protein '{0}'")]
    UnknownQuery(String),
}

/// A converter GFF row or window descriptor that cannot be read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("expected {expected} GFF columns, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("invalid GFF {field} '{value}'")]
    InvalidCoordinate { field: &'static str, value: String },
    /// Not a `chrom:start-end` descriptor with `start <= end`
    #[error("invalid window descriptor '{0}'")]
    InvalidWindow(String),
}

/// An external tool invocation that did not produce usable output.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The executable could not be spawned
    #[error("{tool}: executable '{executable}' not found")]
    NotFound { tool: &'static str, executable: String },
    /// Spawning or talking to the child failed
    #[error("{tool}: {source}")]
    Io {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
    /// The child exited unsuccessfully
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: &'static str,
        status: String,
        stderr: String,
    },
    /// The child was killed after exceeding the configured timeout
    #[error("{tool} timed out after {timeout:?}")]
    TimedOut { tool: &'static str, timeout: Duration },
    /// The child succeeded but wrote nothing useful
    #[error("{tool} produced no output")]
    EmptyOutput { tool: &'static str },
}

/// Conditions that abort the whole run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An input file is missing or unreadable
    #[error("input file {path:?} is not readable: {reason}")]
    UnreadableInput { path: PathBuf, reason: String },
    /// Input contains no sequences
    #[error("no sequences found in {0:?}")]
    EmptyInput(PathBuf),
    /// Two genome records share one id
    #[error("duplicate sequence id '{0}' in genome")]
    DuplicateSequence(String),
    /// Translation produced fewer frames than 6 x sequences
    #[error("translated {written} frames, expected {expected}")]
    MissingFrames { written: usize, expected: usize },
}

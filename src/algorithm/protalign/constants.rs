//! Defaults for the protein alignment pipeline

/// Padding added on both sides of a mapped hit so the spliced aligner can
/// reach the real splice sites.
pub const FLANK_MARGIN: usize = 100_000;

/// Hits must have an e-value strictly below this to trigger a new alignment.
pub const EVALUE_THRESHOLD: f64 = 1e-5;

/// Per-invocation limit for external tools, in seconds. 0 disables it.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 3600;

/// DIAMOND `-k`: one best target frame per query.
pub const DEFAULT_MAX_TARGET_SEQS: usize = 1;

pub const TRANSLATED_GENOME_FILE: &str = "translated_genome.faa";
pub const HITS_FILE: &str = "homology_hits.tsv";
pub const ALIGNMENT_DIR: &str = "alignments";
pub const OUTPUT_FILE: &str = "protein_evidence.gff3";

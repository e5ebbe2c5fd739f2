//! Command-line arguments for protein-to-genome alignment

use clap::Args;
use std::path::PathBuf;

use super::constants::{
    DEFAULT_MAX_TARGET_SEQS, DEFAULT_TOOL_TIMEOUT_SECS, EVALUE_THRESHOLD, FLANK_MARGIN,
};

/// Map query proteins onto a genome
#[derive(Args, Debug)]
pub struct AlignArgs {
    /// Genome FASTA
    #[arg(short, long)]
    pub genome: PathBuf,
    /// Query protein FASTA
    #[arg(short, long)]
    pub proteins: PathBuf,
    /// Worker threads for each pool and for DIAMOND (0 = all cores)
    #[arg(short = 'n', long, default_value_t = 0)]
    pub threads: usize,
    /// Working directory for intermediate files and cached alignments
    #[arg(short, long, default_value = ".")]
    pub workdir: PathBuf,
    /// Output GFF3 (default: <workdir>/protein_evidence.gff3)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Bases added on each side of a mapped hit
    #[arg(long, default_value_t = FLANK_MARGIN)]
    pub flank: usize,
    /// Hits at or above this e-value are not aligned
    #[arg(short, long, default_value_t = EVALUE_THRESHOLD)]
    pub evalue: f64,
    /// DIAMOND -k
    #[arg(long, default_value_t = DEFAULT_MAX_TARGET_SEQS)]
    pub max_target_seqs: usize,
    /// NCBI genetic code table id for the genome translation
    #[arg(long, default_value_t = 1)]
    pub gencode: u8,
    /// Seconds before an external tool is killed (0 = never)
    #[arg(long, default_value_t = DEFAULT_TOOL_TIMEOUT_SECS)]
    pub tool_timeout: u64,
    /// Slice windows from the loaded genome instead of running bedtools
    #[arg(long, default_value_t = false)]
    pub native_extract: bool,

    #[arg(long, env = "PROTMAP_DIAMOND", default_value = "diamond")]
    pub diamond: String,
    #[arg(long, env = "PROTMAP_EXONERATE", default_value = "exonerate")]
    pub exonerate: String,
    #[arg(long, env = "PROTMAP_BEDTOOLS", default_value = "bedtools")]
    pub bedtools: String,
    #[arg(
        long,
        env = "PROTMAP_CONVERTER",
        default_value = "exonerate_gff_to_alignment_gff3.pl"
    )]
    pub converter: String,
}

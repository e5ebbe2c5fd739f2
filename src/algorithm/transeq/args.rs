//! Command-line arguments for six-frame translation

use clap::Args;
use std::path::PathBuf;

/// Translate a genome in all six reading frames
#[derive(Args, Debug)]
pub struct TranseqArgs {
    /// Genome FASTA
    #[arg(short, long)]
    pub genome: PathBuf,
    /// Output protein FASTA
    #[arg(short, long)]
    pub out: PathBuf,
    /// Worker threads (0 = all cores)
    #[arg(short = 'n', long, default_value_t = 0)]
    pub threads: usize,
    /// NCBI genetic code table id
    #[arg(long, default_value_t = 1)]
    pub gencode: u8,
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

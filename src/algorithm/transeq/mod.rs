//! Six-frame translation module
//!
//! Translates every genome sequence in all six reading frames and writes
//! the result as a protein FASTA whose record ids encode strand and frame.

pub mod args;
pub mod scheduler;
pub mod translation;

use anyhow::Result;

use crate::sequence::GenomeIndex;
use crate::utils::genetic_code::GeneticCode;

pub use args::TranseqArgs;
pub use scheduler::{translate_genome, TranslationSummary};
pub use translation::{six_frames, translate_frame, Frame, FrameId, Strand, TranslatedFrame};

pub fn run(args: TranseqArgs) -> Result<()> {
    let genome = GenomeIndex::from_fasta(&args.genome)?;
    let code = GeneticCode::from_id(args.gencode);
    translate_genome(&genome, &args.out, &code, args.threads, args.verbose)?;
    Ok(())
}

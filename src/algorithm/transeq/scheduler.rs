//! Parallel six-frame translation of a whole genome
//!
//! One task per (sequence, frame) pair runs on a dedicated rayon pool.
//! Finished frames are sent over a channel to a single writer thread, so
//! output order follows completion order. The writer counts what it wrote
//! and the run fails if any frame went missing.

use anyhow::{anyhow, Context, Result};
use bio::io::fasta;
use rayon::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::sync::Arc;

use super::translation::{translate_frame, Frame, FrameId, TranslatedFrame, NUM_FRAMES};
use crate::error::PipelineError;
use crate::sequence::{GenomeIndex, Sequence};
use crate::utils::genetic_code::GeneticCode;
use crate::utils::progress::progress_bar;

#[derive(Debug, Clone)]
pub struct TranslationSummary {
    pub sequences: usize,
    pub frames: usize,
    pub path: PathBuf,
}

/// Every (sequence, frame) task must have produced exactly one record.
pub fn check_frame_count(written: usize, expected: usize) -> Result<(), PipelineError> {
    if written != expected {
        return Err(PipelineError::MissingFrames { written, expected });
    }
    Ok(())
}

/// Translate every genome sequence in six frames and write the protein
/// dataset to `out` as FASTA.
pub fn translate_genome(
    genome: &GenomeIndex,
    out: &Path,
    code: &GeneticCode,
    num_threads: usize,
    verbose: bool,
) -> Result<TranslationSummary> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to build translation thread pool")?;

    let tasks: Vec<(Arc<Sequence>, Frame)> = genome
        .iter()
        .flat_map(|record| Frame::all().map(move |frame| (Arc::clone(record), frame)))
        .collect();
    let expected = genome.len() * NUM_FRAMES as usize;
    debug_assert_eq!(tasks.len(), expected);
    log::info!(
        "Translating {} sequences in six frames ({} tasks, {} threads)",
        genome.len(),
        tasks.len(),
        pool.current_num_threads()
    );

    let file = File::create(out).with_context(|| format!("Failed to create {:?}", out))?;
    let (tx, rx) = channel::<TranslatedFrame>();
    let writer = std::thread::spawn(move || -> Result<usize> {
        let mut writer = fasta::Writer::new(file);
        let mut written = 0usize;
        while let Ok(frame) = rx.recv() {
            writer.write(&frame.id.to_string(), None, &frame.aa_seq)?;
            written += 1;
        }
        writer.flush()?;
        Ok(written)
    });

    let bar = progress_bar(tasks.len(), verbose);
    pool.install(|| {
        tasks.par_iter().for_each_with(tx.clone(), |tx, (record, frame)| {
            let translated = TranslatedFrame {
                id: FrameId::new(record.id.clone(), *frame),
                aa_seq: translate_frame(&record.seq, *frame, code),
            };
            // A closed channel means the writer failed; its error surfaces on join.
            let _ = tx.send(translated);
            bar.inc(1);
        });
    });
    drop(tx);
    bar.finish_and_clear();

    let written = writer
        .join()
        .map_err(|_| anyhow!("Translation writer thread panicked"))??;
    check_frame_count(written, expected)?;
    log::info!("Wrote {} translated frames to {:?}", written, out);

    Ok(TranslationSummary {
        sequences: genome.len(),
        frames: written,
        path: out.to_path_buf(),
    })
}

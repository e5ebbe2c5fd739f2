//! Per-hit spliced alignment
//!
//! Every hit runs as an independent task on its own rayon pool:
//!
//! ```text
//! pending ─┬─ cached ────────────┐
//!          ├─ significant ─ align ┼─ convert ─ remap ─ aggregate
//!          └─ below threshold ────┘
//! ```
//!
//! Cached and below-threshold hits skip extraction and alignment but are
//! still converted from whatever report the cache holds. A failing task only
//! loses its own features.

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::channel;

use super::cache::AlignmentCache;
use super::window::map_window;
use crate::common::Hit;
use crate::error::{HitError, ToolError};
use crate::report::gff::{aggregate, remap_converted, Feature};
use crate::sequence::{write_fasta_record, GenomeIndex, ProteinSet};
use crate::tools::{FeatureConverter, SplicedAligner, WindowExtractor};
use crate::utils::progress::progress_bar;

/// Whether a hit is strong enough to justify a new alignment.
#[inline]
pub fn is_significant(e_value: f64, threshold: f64) -> bool {
    e_value < threshold
}

/// How a hit left the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Newly aligned
    Aligned,
    /// A cached report was reused
    SkippedExisting,
    /// Not significant; only a cached report, if any, is reported
    BelowThreshold,
    /// An external tool failed or timed out
    ToolFailed,
    /// Unusable hit (bad coordinates, unknown chromosome or query)
    Dropped,
}

/// Result of one hit task.
#[derive(Debug, Clone)]
pub struct HitResult {
    pub outcome: HitOutcome,
    pub features: Vec<Feature>,
}

impl HitResult {
    fn empty(outcome: HitOutcome) -> Self {
        Self {
            outcome,
            features: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct OutcomeCounts {
    aligned: AtomicUsize,
    skipped_existing: AtomicUsize,
    below_threshold: AtomicUsize,
    tool_failed: AtomicUsize,
    dropped: AtomicUsize,
}

impl OutcomeCounts {
    pub fn record(&self, outcome: HitOutcome) {
        let counter = match outcome {
            HitOutcome::Aligned => &self.aligned,
            HitOutcome::SkippedExisting => &self.skipped_existing,
            HitOutcome::BelowThreshold => &self.below_threshold,
            HitOutcome::ToolFailed => &self.tool_failed,
            HitOutcome::Dropped => &self.dropped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, outcome: HitOutcome) -> usize {
        let counter = match outcome {
            HitOutcome::Aligned => &self.aligned,
            HitOutcome::SkippedExisting => &self.skipped_existing,
            HitOutcome::BelowThreshold => &self.below_threshold,
            HitOutcome::ToolFailed => &self.tool_failed,
            HitOutcome::Dropped => &self.dropped,
        };
        counter.load(Ordering::Relaxed)
    }
}

impl fmt::Display for OutcomeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "aligned={} cached={} below_threshold={} tool_failed={} dropped={}",
            self.get(HitOutcome::Aligned),
            self.get(HitOutcome::SkippedExisting),
            self.get(HitOutcome::BelowThreshold),
            self.get(HitOutcome::ToolFailed),
            self.get(HitOutcome::Dropped)
        )
    }
}

#[derive(Debug)]
pub struct AlignmentSummary {
    pub hits: usize,
    pub features: usize,
    pub counts: OutcomeCounts,
}

#[derive(Debug, Clone, Copy)]
pub struct AlignmentSettings {
    pub flank: usize,
    pub evalue_threshold: f64,
}

/// Everything a hit task reads. Shared by reference across workers.
pub struct AlignmentContext<'a> {
    pub genome: &'a GenomeIndex,
    pub genome_path: &'a Path,
    pub proteins: &'a ProteinSet,
    pub workdir: &'a Path,
    pub cache: &'a dyn AlignmentCache,
    pub extractor: &'a dyn WindowExtractor,
    pub aligner: &'a dyn SplicedAligner,
    pub converter: &'a dyn FeatureConverter,
    pub settings: AlignmentSettings,
}

enum TaskFailure {
    Dropped(HitError),
    Tool(ToolError),
    Io(std::io::Error),
}

impl From<HitError> for TaskFailure {
    fn from(e: HitError) -> Self {
        TaskFailure::Dropped(e)
    }
}

impl From<ToolError> for TaskFailure {
    fn from(e: ToolError) -> Self {
        TaskFailure::Tool(e)
    }
}

impl From<std::io::Error> for TaskFailure {
    fn from(e: std::io::Error) -> Self {
        TaskFailure::Io(e)
    }
}

impl<'a> AlignmentContext<'a> {
    /// Run one hit through the state machine.
    pub fn process_hit(&self, hit: &Hit) -> HitResult {
        let key = hit.key();
        let outcome = if self.cache.has(&key) {
            log::debug!("{}: cached alignment found, skipping", key);
            HitOutcome::SkippedExisting
        } else if is_significant(hit.e_value, self.settings.evalue_threshold) {
            match self.align_new(hit, &key) {
                Ok(()) => HitOutcome::Aligned,
                Err(TaskFailure::Dropped(e)) => {
                    log::warn!("{}: dropping hit: {}", key, e);
                    return HitResult::empty(HitOutcome::Dropped);
                }
                Err(TaskFailure::Tool(e)) => {
                    log::warn!("{}: {}", key, e);
                    return HitResult::empty(HitOutcome::ToolFailed);
                }
                Err(TaskFailure::Io(e)) => {
                    log::warn!("{}: I/O error: {}", key, e);
                    return HitResult::empty(HitOutcome::ToolFailed);
                }
            }
        } else {
            log::debug!(
                "{}: e-value {:e} not below {:e}, no new alignment",
                key,
                hit.e_value,
                self.settings.evalue_threshold
            );
            HitOutcome::BelowThreshold
        };

        let Some(raw) = self.cache.get(&key) else {
            return HitResult::empty(outcome);
        };
        match self.converter.convert(&raw) {
            Ok(converted) => HitResult {
                outcome,
                features: remap_converted(&converted),
            },
            Err(e) => {
                log::warn!("{}: {}", key, e);
                HitResult::empty(HitOutcome::ToolFailed)
            }
        }
    }

    fn align_new(&self, hit: &Hit, key: &str) -> Result<(), TaskFailure> {
        let protein = self
            .proteins
            .get(&hit.query_id)
            .ok_or_else(|| HitError::UnknownQuery(hit.query_id.clone()))?;
        let window = map_window(hit, self.genome, self.settings.flank)?;
        log::debug!("{}: window {}", key, window);

        let scratch = tempfile::Builder::new()
            .prefix(&format!("{}.", key))
            .tempdir_in(self.workdir)?;
        let protein_path = scratch.path().join("query.faa");
        let window_path = scratch.path().join("window.fa");
        write_fasta_record(&protein_path, &protein.id, &protein.seq)?;

        self.extractor
            .extract(self.genome_path, &window, &window_path)?;
        let raw = self.aligner.align(&protein_path, &window_path)?;
        self.cache.put(key, &raw)?;
        Ok(())
    }
}

/// Drop repeated hits so each (query, frame, span) is aligned by exactly
/// one task.
pub fn dedup_hits(hits: Vec<Hit>) -> Vec<Hit> {
    let mut seen = rustc_hash::FxHashSet::default();
    hits.into_iter()
        .filter(|hit| {
            let fresh = seen.insert((
                hit.query_id.clone(),
                hit.subject.clone(),
                hit.residue_span(),
            ));
            if !fresh {
                log::debug!("Duplicate hit {}, ignoring", hit.key());
            }
            fresh
        })
        .collect()
}

/// Align every hit in parallel and write the aggregated features to `out`.
pub fn align_hits(
    ctx: &AlignmentContext<'_>,
    hits: &[Hit],
    num_threads: usize,
    out: &Path,
    verbose: bool,
) -> Result<AlignmentSummary> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to build alignment thread pool")?;
    log::info!(
        "Aligning {} hits ({} threads)",
        hits.len(),
        pool.current_num_threads()
    );

    let (tx, rx) = channel::<Vec<Feature>>();
    let out_path = out.to_path_buf();
    let writer = std::thread::spawn(move || aggregate(rx, &out_path));

    let counts = OutcomeCounts::default();
    let bar = progress_bar(hits.len(), verbose);
    pool.install(|| {
        hits.par_iter().for_each_with(tx.clone(), |tx, hit| {
            let result = ctx.process_hit(hit);
            counts.record(result.outcome);
            let _ = tx.send(result.features);
            bar.inc(1);
        });
    });
    drop(tx);
    bar.finish_and_clear();

    let features = writer
        .join()
        .map_err(|_| anyhow!("Feature aggregator thread panicked"))??;
    log::info!("Hit outcomes: {}", counts);
    log::info!("Wrote {} features to {:?}", features, out);

    Ok(AlignmentSummary {
        hits: hits.len(),
        features,
        counts,
    })
}

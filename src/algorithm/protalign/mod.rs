//! Protein-to-genome alignment pipeline
//!
//! translate genome → homology search → per-hit window alignment → GFF3
//!
//! Input loading is fatal; everything after the search is best effort and a
//! failing hit only costs its own features.

pub mod alignment;
pub mod args;
pub mod cache;
pub mod constants;
pub mod window;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::algorithm::transeq::translate_genome;
use crate::common::{parse_hits, write_hits};
use crate::sequence::{GenomeIndex, ProteinSet};
use crate::utils::genetic_code::GeneticCode;
use crate::tools::{
    BedtoolsExtractor, Diamond, Exonerate, ExonerateGffConverter, FeatureConverter,
    HomologySearch, NativeExtractor, SplicedAligner, ToolConfig, WindowExtractor,
};

pub use alignment::{
    align_hits, dedup_hits, is_significant, AlignmentContext, AlignmentSettings,
    AlignmentSummary, HitOutcome, HitResult, OutcomeCounts,
};
pub use args::AlignArgs;
pub use cache::{AlignmentCache, FsCache, MemoryCache};
pub use window::{map_window, Window};

use constants::{ALIGNMENT_DIR, HITS_FILE, OUTPUT_FILE, TRANSLATED_GENOME_FILE};

/// Loaded, validated inputs.
pub struct Inputs {
    pub genome: Arc<GenomeIndex>,
    pub genome_path: PathBuf,
    pub proteins: ProteinSet,
    pub proteins_path: PathBuf,
}

impl Inputs {
    pub fn load(genome: &Path, proteins: &Path) -> Result<Self> {
        let genome_index = GenomeIndex::from_fasta(genome)
            .with_context(|| format!("Failed to load genome {:?}", genome))?;
        let protein_set = ProteinSet::from_fasta(proteins)
            .with_context(|| format!("Failed to load proteins {:?}", proteins))?;
        log::info!(
            "Loaded {} genome sequences and {} query proteins",
            genome_index.len(),
            protein_set.len()
        );
        Ok(Self {
            genome: Arc::new(genome_index),
            genome_path: genome.to_path_buf(),
            proteins: protein_set,
            proteins_path: proteins.to_path_buf(),
        })
    }
}

/// The four external collaborators.
pub struct Toolset {
    pub search: Box<dyn HomologySearch>,
    pub extractor: Box<dyn WindowExtractor>,
    pub aligner: Box<dyn SplicedAligner>,
    pub converter: Box<dyn FeatureConverter>,
}

impl Toolset {
    /// Command-line wrappers. With `native_extract` windows are cut from the
    /// loaded genome instead of by bedtools.
    pub fn from_config(config: &ToolConfig, genome: &Arc<GenomeIndex>, native_extract: bool) -> Self {
        let extractor: Box<dyn WindowExtractor> = if native_extract {
            Box::new(NativeExtractor::new(Arc::clone(genome)))
        } else {
            Box::new(BedtoolsExtractor {
                executable: config.bedtools.clone(),
                timeout: config.timeout,
            })
        };
        Self {
            search: Box::new(Diamond {
                executable: config.diamond.clone(),
                max_target_seqs: config.max_target_seqs,
                timeout: config.timeout,
            }),
            extractor,
            aligner: Box::new(Exonerate {
                executable: config.exonerate.clone(),
                timeout: config.timeout,
            }),
            converter: Box::new(ExonerateGffConverter {
                executable: config.converter.clone(),
                timeout: config.timeout,
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub workdir: PathBuf,
    pub out: PathBuf,
    pub threads: usize,
    /// NCBI genetic code table id
    pub gencode: u8,
    pub settings: AlignmentSettings,
    pub verbose: bool,
}

impl PipelineConfig {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        let workdir = workdir.into();
        Self {
            out: workdir.join(OUTPUT_FILE),
            workdir,
            threads: resolve_threads(0),
            gencode: 1,
            settings: AlignmentSettings {
                flank: constants::FLANK_MARGIN,
                evalue_threshold: constants::EVALUE_THRESHOLD,
            },
            verbose: false,
        }
    }

    pub fn translated_path(&self) -> PathBuf {
        self.workdir.join(TRANSLATED_GENOME_FILE)
    }

    pub fn hits_path(&self) -> PathBuf {
        self.workdir.join(HITS_FILE)
    }

    pub fn alignment_dir(&self) -> PathBuf {
        self.workdir.join(ALIGNMENT_DIR)
    }
}

/// `0` means every available core.
pub fn resolve_threads(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get()
    } else {
        requested
    }
}

#[derive(Debug)]
pub struct PipelineSummary {
    pub frames: usize,
    pub hits: usize,
    pub dropped_hits: usize,
    pub alignment: AlignmentSummary,
}

pub fn run_pipeline(
    config: &PipelineConfig,
    inputs: &Inputs,
    tools: &Toolset,
    cache: &dyn AlignmentCache,
) -> Result<PipelineSummary> {
    fs::create_dir_all(&config.workdir)
        .with_context(|| format!("Failed to create working directory {:?}", config.workdir))?;

    let translated = config.translated_path();
    let code = GeneticCode::from_id(config.gencode);
    let translation = translate_genome(
        &inputs.genome,
        &translated,
        &code,
        config.threads,
        config.verbose,
    )?;

    log::info!("Running homology search");
    let raw_hits = tools
        .search
        .search(&translated, &inputs.proteins_path, config.threads)
        .context("Homology search failed")?;
    let (hits, dropped_hits) = parse_hits(&raw_hits);
    let hits = dedup_hits(hits);
    write_hits(&hits, &config.hits_path())?;
    log::info!("{} hits ({} malformed rows dropped)", hits.len(), dropped_hits);

    let ctx = AlignmentContext {
        genome: &inputs.genome,
        genome_path: &inputs.genome_path,
        proteins: &inputs.proteins,
        workdir: &config.workdir,
        cache,
        extractor: tools.extractor.as_ref(),
        aligner: tools.aligner.as_ref(),
        converter: tools.converter.as_ref(),
        settings: config.settings,
    };
    let alignment = align_hits(&ctx, &hits, config.threads, &config.out, config.verbose)?;

    Ok(PipelineSummary {
        frames: translation.frames,
        hits: hits.len(),
        dropped_hits,
        alignment,
    })
}

pub fn run(args: AlignArgs) -> Result<()> {
    let inputs = Inputs::load(&args.genome, &args.proteins)?;

    let tool_config = ToolConfig {
        diamond: args.diamond.clone(),
        exonerate: args.exonerate.clone(),
        bedtools: args.bedtools.clone(),
        converter: args.converter.clone(),
        timeout: (args.tool_timeout > 0).then(|| Duration::from_secs(args.tool_timeout)),
        max_target_seqs: args.max_target_seqs,
    };
    let tools = Toolset::from_config(&tool_config, &inputs.genome, args.native_extract);

    let mut config = PipelineConfig::new(&args.workdir);
    if let Some(out) = args.out {
        config.out = out;
    }
    config.threads = resolve_threads(args.threads);
    config.gencode = args.gencode;
    config.settings = AlignmentSettings {
        flank: args.flank,
        evalue_threshold: args.evalue,
    };
    config.verbose = args.verbose;

    let cache = FsCache::new(config.alignment_dir()).with_context(|| {
        format!("Failed to create alignment cache {:?}", config.alignment_dir())
    })?;
    let summary = run_pipeline(&config, &inputs, &tools, &cache)?;
    log::info!(
        "Done: {} frames, {} hits, {} features in {:?}",
        summary.frames,
        summary.hits,
        summary.alignment.features,
        config.out
    );
    Ok(())
}

//! Alignment features: parsing, window-to-genome remap and the final writer
//!
//! The converter emits GFF rows whose seqid is the window descriptor
//! `chrom:start-end` and whose start/end are 1-based positions inside that
//! window. Remapping adds the 0-based window start, which yields 1-based
//! absolute genome coordinates.

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::mpsc::Receiver;

use crate::algorithm::protalign::window::Window;
use crate::error::FeatureError;

pub const GFF_FIELDS: usize = 9;

/// One GFF row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub seqid: String,
    pub source: String,
    pub feature_type: String,
    pub start: u64,
    pub end: u64,
    pub score: String,
    pub strand: String,
    pub phase: String,
    pub attributes: String,
}

impl Feature {
    /// Shift window-relative coordinates onto the genome.
    pub fn remap(mut self, window: &Window) -> Feature {
        self.seqid = window.chrom.clone();
        self.start += window.start as u64;
        self.end += window.start as u64;
        self
    }
}

impl FromStr for Feature {
    type Err = FeatureError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let f: Vec<&str> = line.split('\t').collect();
        if f.len() != GFF_FIELDS {
            return Err(FeatureError::FieldCount {
                expected: GFF_FIELDS,
                found: f.len(),
            });
        }
        let coord = |field: &'static str, value: &str| {
            value.parse::<u64>().map_err(|_| FeatureError::InvalidCoordinate {
                field,
                value: value.to_string(),
            })
        };
        Ok(Feature {
            seqid: f[0].to_string(),
            source: f[1].to_string(),
            feature_type: f[2].to_string(),
            start: coord("start", f[3])?,
            end: coord("end", f[4])?,
            score: f[5].to_string(),
            strand: f[6].to_string(),
            phase: f[7].to_string(),
            attributes: f[8].to_string(),
        })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.seqid,
            self.source,
            self.feature_type,
            self.start,
            self.end,
            self.score,
            self.strand,
            self.phase,
            self.attributes
        )
    }
}

/// Total order used for the aggregated file, so identical inputs give
/// identical bytes regardless of completion order.
pub fn feature_order(a: &Feature, b: &Feature) -> Ordering {
    a.seqid
        .cmp(&b.seqid)
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.end.cmp(&b.end))
        .then_with(|| a.strand.cmp(&b.strand))
        .then_with(|| a.source.cmp(&b.source))
        .then_with(|| a.feature_type.cmp(&b.feature_type))
        .then_with(|| a.attributes.cmp(&b.attributes))
        .then_with(|| a.score.cmp(&b.score))
        .then_with(|| a.phase.cmp(&b.phase))
}

/// Parse converter output and move every row onto genome coordinates.
/// Rows whose seqid is not a window descriptor (e.g. query-side features)
/// are skipped.
pub fn remap_converted(text: &str) -> Vec<Feature> {
    let mut features = Vec::new();
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let feature: Feature = match line.parse() {
            Ok(feature) => feature,
            Err(e) => {
                log::debug!("Skipping converter row '{}': {}", line, e);
                continue;
            }
        };
        match feature.seqid.parse::<Window>() {
            Ok(window) => features.push(feature.remap(&window)),
            Err(_) => log::debug!("Skipping row on non-window seqid '{}'", feature.seqid),
        }
    }
    features
}

/// Sort and write features, one per line.
pub fn write_features(features: &mut [Feature], path: &Path) -> Result<usize> {
    features.sort_by(feature_order);
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    for feature in features.iter() {
        writeln!(writer, "{}", feature)?;
    }
    writer.flush()?;
    Ok(features.len())
}

/// Drain per-hit feature batches until every sender is gone, then write
/// them all. Empty batches are discarded.
pub fn aggregate(rx: Receiver<Vec<Feature>>, path: &Path) -> Result<usize> {
    let mut all: Vec<Feature> = Vec::new();
    while let Ok(batch) = rx.recv() {
        if !batch.is_empty() {
            all.extend(batch);
        }
    }
    write_features(&mut all, path)
}

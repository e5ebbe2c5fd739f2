//! Sequence records and FASTA input
//!
//! Genome and protein files are read once, up front, with `bio::io::fasta`.
//! Any problem here is fatal and reported before a worker pool is started.

use anyhow::{Context, Result};
use bio::io::fasta;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::error::PipelineError;

/// A named sequence as read from FASTA. Immutable after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: String,
    pub seq: Vec<u8>,
}

impl Sequence {
    pub fn new(id: impl Into<String>, seq: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            seq: seq.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

fn check_readable(path: &Path) -> Result<(), PipelineError> {
    File::open(path)
        .map(|_| ())
        .map_err(|e| PipelineError::UnreadableInput {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Read every record of a FASTA file. The record id is the header up to
/// the first whitespace, as `bio` splits it.
pub fn read_fasta(path: &Path) -> Result<Vec<Sequence>> {
    check_readable(path)?;
    let reader = fasta::Reader::from_file(path)
        .with_context(|| format!("Failed to open FASTA {:?}", path))?;
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Malformed FASTA record in {:?}", path))?;
        records.push(Sequence::new(record.id(), record.seq()));
    }
    if records.is_empty() {
        return Err(PipelineError::EmptyInput(path.to_path_buf()).into());
    }
    Ok(records)
}

/// Genome sequences keyed by id, shared read-only across workers.
#[derive(Debug, Default, Clone)]
pub struct GenomeIndex {
    records: Vec<Arc<Sequence>>,
    by_id: FxHashMap<String, usize>,
}

impl GenomeIndex {
    /// Build an index; duplicate ids are rejected because every later
    /// lookup is id keyed.
    pub fn new(records: Vec<Sequence>) -> Result<Self, PipelineError> {
        let mut index = GenomeIndex::default();
        for record in records {
            if index.by_id.contains_key(&record.id) {
                return Err(PipelineError::DuplicateSequence(record.id));
            }
            index.by_id.insert(record.id.clone(), index.records.len());
            index.records.push(Arc::new(record));
        }
        Ok(index)
    }

    pub fn from_fasta(path: &Path) -> Result<Self> {
        Ok(Self::new(read_fasta(path)?)?)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Sequence>> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    pub fn seq_len(&self, id: &str) -> Option<usize> {
        self.get(id).map(|s| s.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Sequence>> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Query proteins keyed by id. The first record with a given id wins.
#[derive(Debug, Default, Clone)]
pub struct ProteinSet {
    by_id: FxHashMap<String, Arc<Sequence>>,
}

impl ProteinSet {
    pub fn new(records: Vec<Sequence>) -> Self {
        let mut by_id = FxHashMap::default();
        for record in records {
            if by_id.contains_key(&record.id) {
                log::warn!("Duplicate query protein '{}', keeping the first", record.id);
                continue;
            }
            by_id.insert(record.id.clone(), Arc::new(record));
        }
        Self { by_id }
    }

    pub fn from_fasta(path: &Path) -> Result<Self> {
        Ok(Self::new(read_fasta(path)?))
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Sequence>> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Write a single record as FASTA.
pub fn write_fasta_record(path: &Path, id: &str, seq: &[u8]) -> std::io::Result<()> {
    let mut writer = fasta::Writer::to_file(path)?;
    writer.write(id, None, seq)?;
    writer.flush()
}

//! Six-frame translation
//!
//! Frames 0..=2 read the forward strand from offsets 0, 1 and 2. Frames
//! 3..=5 read the reverse complement of the sequence with its last 0, 1 or 2
//! bases trimmed, which is the same as skipping the first 0, 1 or 2 bases of
//! the full reverse complement.
//!
//! Translated records are named `<seq id>_strand<k><plus|minus>`. Window
//! mapping parses that name back, so [`FrameId`] owns both directions.

use std::fmt;
use std::str::FromStr;

use crate::error::HitError;
use crate::sequence::Sequence;
use crate::utils::genetic_code::{reverse_complement, GeneticCode};

/// Number of reading frames per sequence.
pub const NUM_FRAMES: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Plus => "plus",
            Strand::Minus => "minus",
        }
    }

    /// GFF strand column.
    pub fn symbol(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

/// One of the six reading frames: index 0..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Frame(u8);

impl Frame {
    pub fn new(index: u8) -> Option<Frame> {
        (index < NUM_FRAMES).then_some(Frame(index))
    }

    pub fn from_parts(offset: u8, strand: Strand) -> Option<Frame> {
        if offset > 2 {
            return None;
        }
        Some(match strand {
            Strand::Plus => Frame(offset),
            Strand::Minus => Frame(offset + 3),
        })
    }

    pub fn all() -> impl Iterator<Item = Frame> {
        (0..NUM_FRAMES).map(Frame)
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    pub fn strand(&self) -> Strand {
        if self.0 < 3 {
            Strand::Plus
        } else {
            Strand::Minus
        }
    }

    /// Nucleotides skipped before the first codon on this frame's strand.
    pub fn offset(&self) -> usize {
        (self.0 % 3) as usize
    }
}

/// Name of a translated frame record: source sequence id plus frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameId {
    pub seq_id: String,
    pub frame: Frame,
}

impl FrameId {
    pub fn new(seq_id: impl Into<String>, frame: Frame) -> Self {
        Self {
            seq_id: seq_id.into(),
            frame,
        }
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_strand{}{}",
            self.seq_id,
            self.frame.offset(),
            self.frame.strand().as_str()
        )
    }
}

impl FromStr for FrameId {
    type Err = HitError;

    /// Splits on the last `_`, so source ids may themselves contain `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || HitError::MalformedFrameId(s.to_string());
        let (seq_id, suffix) = s.rsplit_once('_').ok_or_else(malformed)?;
        let rest = suffix.strip_prefix("strand").ok_or_else(malformed)?;
        let mut chars = rest.chars();
        let offset = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .ok_or_else(malformed)? as u8;
        let strand = match chars.as_str() {
            "plus" => Strand::Plus,
            "minus" => Strand::Minus,
            _ => return Err(malformed()),
        };
        if seq_id.is_empty() {
            return Err(malformed());
        }
        let frame = Frame::from_parts(offset, strand).ok_or_else(malformed)?;
        Ok(FrameId::new(seq_id, frame))
    }
}

/// A translated reading frame of one genome sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedFrame {
    pub id: FrameId,
    pub aa_seq: Vec<u8>,
}

/// Translate a single frame of `seq`.
pub fn translate_frame(seq: &[u8], frame: Frame, code: &GeneticCode) -> Vec<u8> {
    let k = frame.offset();
    match frame.strand() {
        Strand::Plus => {
            if k >= seq.len() {
                return Vec::new();
            }
            code.translate(&seq[k..])
        }
        Strand::Minus => {
            let keep = seq.len().saturating_sub(k);
            code.translate(&reverse_complement(&seq[..keep]))
        }
    }
}

/// Translate all six frames of a sequence. Always returns six records;
/// frames too short to hold a codon are empty.
pub fn six_frames(record: &Sequence, code: &GeneticCode) -> Vec<TranslatedFrame> {
    Frame::all()
        .map(|frame| TranslatedFrame {
            id: FrameId::new(record.id.clone(), frame),
            aa_seq: translate_frame(&record.seq, frame, code),
        })
        .collect()
}

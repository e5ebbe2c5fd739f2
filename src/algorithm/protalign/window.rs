//! Hit-to-genome window mapping
//!
//! Three coordinate spaces meet here:
//!
//! - residue: 1-based inclusive positions on a translated frame, as reported
//!   by the homology search;
//! - frame nucleotide: positions on the strand the frame was read from,
//!   shifted by the frame offset;
//! - genome: 0-based half-open positions on the forward strand of the source
//!   sequence (BED convention).
//!
//! Forward frame, offset `k`, residues `s..=e`:
//!   `[k + 3(s-1), k + 3e)`
//!
//! Reverse frame, offset `k`, source length `L`. Residue 1 starts at the
//! forward position `L - k - 1` and runs leftwards:
//!   `[L - k - 3e, L - k - 3(s-1))`
//!
//! Both ends are clamped to `[0, L]`, so a hit overhanging the sequence end
//! still yields a window. The coding interval is then padded by the flank
//! margin on both sides and clamped again.

use std::fmt;
use std::str::FromStr;

use crate::algorithm::transeq::{Frame, Strand};
use crate::common::Hit;
use crate::error::{FeatureError, HitError};
use crate::sequence::GenomeIndex;

/// A padded genomic interval, 0-based half-open, on the forward strand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Window {
    pub chrom: String,
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `chrom:start-end`, the record id the extractor gives the window.
    pub fn descriptor(&self) -> String {
        self.to_string()
    }

    /// One BED line describing the window.
    pub fn bed_line(&self) -> String {
        format!("{}\t{}\t{}\n", self.chrom, self.start, self.end)
    }

    /// Recover the residue interval a window was mapped from. Only exact when
    /// neither side was clamped; `None` when the window is too small to have
    /// come from `frame` with this flank.
    pub fn residue_interval(
        &self,
        frame: Frame,
        seq_len: usize,
        flank: usize,
    ) -> Option<(usize, usize)> {
        let a = self.start.checked_add(flank)?;
        let b = self.end.checked_sub(flank)?;
        let k = frame.offset();
        match frame.strand() {
            Strand::Plus => Some((a.checked_sub(k)? / 3 + 1, b.checked_sub(k)? / 3)),
            Strand::Minus => Some((
                seq_len.checked_sub(k + b)? / 3 + 1,
                seq_len.checked_sub(k + a)? / 3,
            )),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

impl FromStr for Window {
    type Err = FeatureError;

    /// Parse a `chrom:start-end` descriptor. The chromosome may contain `:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FeatureError::InvalidWindow(s.to_string());
        let (chrom, range) = s.rsplit_once(':').ok_or_else(invalid)?;
        let (start, end) = range.split_once('-').ok_or_else(invalid)?;
        let start: usize = start.parse().map_err(|_| invalid())?;
        let end: usize = end.parse().map_err(|_| invalid())?;
        if chrom.is_empty() || start > end {
            return Err(invalid());
        }
        Ok(Window {
            chrom: chrom.to_string(),
            start,
            end,
        })
    }
}

/// Forward-strand nucleotide interval `[a, b)` covered by residues
/// `s..=e` of `frame` on a source sequence of length `seq_len`, clamped to
/// `[0, seq_len]`. `None` for a zero residue coordinate.
pub fn nucleotide_interval(
    frame: Frame,
    s: usize,
    e: usize,
    seq_len: usize,
) -> Option<(usize, usize)> {
    if s == 0 || e == 0 {
        return None;
    }
    let (s, e) = (s.min(e), s.max(e));
    let k = frame.offset();
    let near = k + 3 * (s - 1);
    let far = k + 3 * e;
    Some(match frame.strand() {
        Strand::Plus => (near.min(seq_len), far.min(seq_len)),
        Strand::Minus => (seq_len.saturating_sub(far), seq_len.saturating_sub(near)),
    })
}

/// Pad `[a, b)` by `flank` on both sides and clamp it to `[0, seq_len]`.
pub fn pad_and_clamp(a: usize, b: usize, flank: usize, seq_len: usize) -> (usize, usize) {
    let start = a.saturating_sub(flank);
    let end = b.saturating_add(flank).min(seq_len);
    (start, end.max(start))
}

/// Compute the alignment window for a hit.
pub fn map_window(hit: &Hit, genome: &GenomeIndex, flank: usize) -> Result<Window, HitError> {
    let chrom = &hit.subject.seq_id;
    let seq_len = genome
        .seq_len(chrom)
        .ok_or_else(|| HitError::UnknownChromosome(chrom.clone()))?;
    if hit.s_start == 0 || hit.s_end == 0 {
        return Err(HitError::ZeroResidue {
            start: hit.s_start,
            end: hit.s_end,
        });
    }
    let out_of_bounds = || HitError::OutOfBounds {
        chrom: chrom.clone(),
        start: hit.s_start,
        end: hit.s_end,
        len: seq_len,
    };
    let (a, b) = nucleotide_interval(hit.subject.frame, hit.s_start, hit.s_end, seq_len)
        .ok_or_else(out_of_bounds)?;
    if a == b {
        return Err(out_of_bounds());
    }
    let (s, e) = hit.residue_span();
    if b - a != 3 * (e - s + 1) {
        log::warn!(
            "Hit {}..{} on {} overhangs {} (length {}), clamped to {}..{}",
            hit.s_start,
            hit.s_end,
            hit.subject,
            chrom,
            seq_len,
            a,
            b
        );
    }
    let (start, end) = pad_and_clamp(a, b, flank, seq_len);
    Ok(Window {
        chrom: chrom.clone(),
        start,
        end,
    })
}

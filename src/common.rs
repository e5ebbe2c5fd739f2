//! Tabular homology hits
//!
//! The homology search reports BLAST tabular (outfmt 6) rows:
//!
//! `qseqid sseqid pident length mismatch gapopen qstart qend sstart send evalue bitscore`
//!
//! Rows are parsed once, here, into [`Hit`]. Downstream code never indexes
//! raw columns.

use anyhow::{Context, Result};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::algorithm::transeq::FrameId;
use crate::error::HitError;

/// Number of columns in a default outfmt 6 row.
pub const HIT_FIELDS: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub query_id: String,
    /// Translated frame the query matched (column 1)
    pub subject: FrameId,
    pub identity: f64,
    pub length: usize,
    pub mismatch: usize,
    pub gapopen: usize,
    pub q_start: usize,
    pub q_end: usize,
    /// 1-based residue on the translated frame (column 8)
    pub s_start: usize,
    /// 1-based inclusive residue on the translated frame (column 9)
    pub s_end: usize,
    /// Column 10
    pub e_value: f64,
    pub bit_score: f64,
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, HitError> {
    value.trim().parse().map_err(|_| HitError::InvalidField {
        field,
        value: value.to_string(),
    })
}

impl Hit {
    /// Subject residue interval ordered low to high.
    pub fn residue_span(&self) -> (usize, usize) {
        (self.s_start.min(self.s_end), self.s_start.max(self.s_end))
    }

    /// Stable per-hit name used for intermediate files and the result cache:
    /// `<query>.<frame id>.<low>-<high>`. Bytes outside `[A-Za-z0-9_-]` in
    /// the ids are written as `%XX`, so distinct hits never share a key.
    pub fn key(&self) -> String {
        let (start, end) = self.residue_span();
        format!(
            "{}.{}.{}-{}",
            escape_key_part(&self.query_id),
            escape_key_part(&self.subject.to_string()),
            start,
            end
        )
    }
}

fn escape_key_part(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for &b in part.as_bytes() {
        if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

impl FromStr for Hit {
    type Err = HitError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
        if fields.len() != HIT_FIELDS {
            return Err(HitError::FieldCount {
                expected: HIT_FIELDS,
                found: fields.len(),
            });
        }
        Ok(Hit {
            query_id: fields[0].to_string(),
            subject: fields[1].parse()?,
            identity: parse_field("pident", fields[2])?,
            length: parse_field("length", fields[3])?,
            mismatch: parse_field("mismatch", fields[4])?,
            gapopen: parse_field("gapopen", fields[5])?,
            q_start: parse_field("qstart", fields[6])?,
            q_end: parse_field("qend", fields[7])?,
            s_start: parse_field("sstart", fields[8])?,
            s_end: parse_field("send", fields[9])?,
            e_value: parse_field("evalue", fields[10])?,
            bit_score: parse_field("bitscore", fields[11])?,
        })
    }
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{:.3}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.1e}\t{:.1}",
            self.query_id,
            self.subject,
            self.identity,
            self.length,
            self.mismatch,
            self.gapopen,
            self.q_start,
            self.q_end,
            self.s_start,
            self.s_end,
            self.e_value,
            self.bit_score
        )
    }
}

/// Parse tabular search output. Blank lines and `#` comments are ignored;
/// malformed rows are logged and dropped. Returns the hits and the number
/// of dropped rows.
pub fn parse_hits(text: &str) -> (Vec<Hit>, usize) {
    let mut hits = Vec::new();
    let mut dropped = 0;
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match line.parse::<Hit>() {
            Ok(hit) => hits.push(hit),
            Err(e) => {
                log::warn!("Dropping hit on line {}: {}", lineno + 1, e);
                dropped += 1;
            }
        }
    }
    (hits, dropped)
}

/// Persist hits as outfmt 6 so a run leaves its search results behind.
pub fn write_hits(hits: &[Hit], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    for hit in hits {
        writeln!(writer, "{}", hit)?;
    }
    writer.flush()?;
    Ok(())
}

//! Test fixtures: a synthetic ORF genome and in-process stand-ins for the
//! external tools.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use protmap::algorithm::protalign::window::nucleotide_interval;
use protmap::algorithm::transeq::six_frames;
use protmap::error::ToolError;
use protmap::sequence::{read_fasta, Sequence};
use protmap::tools::{FeatureConverter, HomologySearch, SplicedAligner};
use protmap::utils::genetic_code::{reverse_complement, GeneticCode};

/// One codon per residue, none of them stops.
const CODONS: &[(&[u8; 3], u8)] = &[
    (b"GCT", b'A'),
    (b"CGT", b'R'),
    (b"AAT", b'N'),
    (b"GAT", b'D'),
    (b"TGT", b'C'),
    (b"CAA", b'Q'),
    (b"GAA", b'E'),
    (b"GGT", b'G'),
    (b"CAT", b'H'),
    (b"ATT", b'I'),
    (b"CTG", b'L'),
    (b"AAA", b'K'),
    (b"TTT", b'F'),
    (b"CCG", b'P'),
    (b"TCT", b'S'),
    (b"ACC", b'T'),
    (b"TGG", b'W'),
    (b"TAT", b'Y'),
    (b"GTG", b'V'),
];

pub const GENOME_LEN: usize = 300;
pub const ORF_RESIDUES: usize = 90;

/// A 90-residue ORF starting with ATG at position 0 of a 300-base sequence,
/// followed by 30 bases of filler. Returns (nucleotides, protein).
pub fn forward_orf() -> (Vec<u8>, Vec<u8>) {
    let mut dna = b"ATG".to_vec();
    let mut protein = b"M".to_vec();
    let mut i = 0usize;
    while protein.len() < ORF_RESIDUES {
        let (codon, aa) = CODONS[(i * 7 + i / 3) % CODONS.len()];
        dna.extend_from_slice(codon);
        protein.push(aa);
        i += 1;
    }
    while dna.len() < GENOME_LEN {
        dna.extend_from_slice(b"TTA");
    }
    dna.truncate(GENOME_LEN);
    (dna, protein)
}

/// The same ORF on the minus strand: the reverse complement of
/// [`forward_orf`].
pub fn reverse_orf() -> (Vec<u8>, Vec<u8>) {
    let (dna, protein) = forward_orf();
    (reverse_complement(&dna), protein)
}

pub fn write_fasta(path: &Path, records: &[(&str, &[u8])]) {
    let mut text = String::new();
    for (id, seq) in records {
        text.push('>');
        text.push_str(id);
        text.push('\n');
        text.push_str(std::str::from_utf8(seq).unwrap());
        text.push('\n');
    }
    fs::write(path, text).unwrap();
}

/// Genome and protein FASTA files for one chromosome and one query.
pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub genome: PathBuf,
    pub proteins: PathBuf,
}

impl Fixture {
    pub fn new(chrom: &str, dna: &[u8], query: &str, protein: &[u8]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let genome = dir.path().join("genome.fa");
        let proteins = dir.path().join("proteins.faa");
        write_fasta(&genome, &[(chrom, dna)]);
        write_fasta(&proteins, &[(query, protein)]);
        Self {
            dir,
            genome,
            proteins,
        }
    }

    pub fn workdir(&self) -> PathBuf {
        self.dir.path().join("work")
    }
}

/// Exact-substring homology search over the translated genome. Every query
/// is reported at its first exact occurrence with a fixed e-value.
pub struct FakeSearch {
    pub evalue: f64,
    /// Appended verbatim to the tabular output
    pub extra_rows: String,
}

impl FakeSearch {
    pub fn new(evalue: f64) -> Self {
        Self {
            evalue,
            extra_rows: String::new(),
        }
    }
}

impl HomologySearch for FakeSearch {
    fn search(&self, translated: &Path, queries: &Path, _threads: usize) -> Result<String, ToolError> {
        let frames = read_fasta(translated).unwrap();
        let proteins = read_fasta(queries).unwrap();
        let mut out = String::new();
        for protein in &proteins {
            let hit = frames.iter().find_map(|frame| {
                find(&frame.seq, &protein.seq).map(|pos| (frame, pos))
            });
            if let Some((frame, pos)) = hit {
                let len = protein.seq.len();
                out.push_str(&format!(
                    "{}\t{}\t100.000\t{}\t0\t0\t1\t{}\t{}\t{}\t{:e}\t{}.0\n",
                    protein.id,
                    frame.id,
                    len,
                    len,
                    pos + 1,
                    pos + len,
                    self.evalue,
                    2 * len
                ));
            }
        }
        out.push_str(&self.extra_rows);
        Ok(out)
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Spliced-aligner stand-in: locates the protein in the window's six frames
/// and reports one GFF row in window-relative coordinates. Counts calls.
#[derive(Clone, Default)]
pub struct FakeAligner {
    pub calls: Arc<AtomicUsize>,
}

impl FakeAligner {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SplicedAligner for FakeAligner {
    fn align(&self, protein: &Path, target: &Path) -> Result<String, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let protein = read_fasta(protein).unwrap().remove(0);
        let window: Sequence = read_fasta(target).unwrap().remove(0);
        let code = GeneticCode::standard();
        for frame in six_frames(&window, code) {
            let Some(pos) = find(&frame.aa_seq, &protein.seq) else {
                continue;
            };
            let (a, b) = nucleotide_interval(
                frame.id.frame,
                pos + 1,
                pos + protein.seq.len(),
                window.len(),
            )
            .unwrap();
            return Ok(format!(
                "{}\tfake_exonerate\tcds\t{}\t{}\t100\t{}\t.\tTarget={}\n",
                window.id,
                a + 1,
                b,
                frame.id.frame.strand().symbol(),
                protein.id
            ));
        }
        Err(ToolError::EmptyOutput { tool: "fake aligner" })
    }
}

/// Aligner that always fails, as a crashed exonerate would.
pub struct FailingAligner;

impl SplicedAligner for FailingAligner {
    fn align(&self, _protein: &Path, _target: &Path) -> Result<String, ToolError> {
        Err(ToolError::Failed {
            tool: "exonerate",
            status: "exit status: 1".to_string(),
            stderr: "segmentation fault".to_string(),
        })
    }
}

/// Passes the raw report through unchanged.
pub struct IdentityConverter;

impl FeatureConverter for IdentityConverter {
    fn convert(&self, raw: &str) -> Result<String, ToolError> {
        Ok(raw.to_string())
    }
}

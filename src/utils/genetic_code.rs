//! Codon translation and nucleotide complement tables
//!
//! Both tables are built at compile time and never mutated. Lookups are
//! case-insensitive; anything outside `ACGT` resolves to [`UNKNOWN_RESIDUE`].

/// Residue emitted for ambiguous, degenerate or truncated codons.
pub const UNKNOWN_RESIDUE: u8 = b'X';

/// Residue emitted for stop codons.
pub const STOP_RESIDUE: u8 = b'*';

/// NCBI translation tables, indexed by `16 * b1 + 4 * b2 + b3` with
/// `T=0, C=1, A=2, G=3`.
const STANDARD_AA: [u8; 64] = *b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
const VERTEBRATE_MITO_AA: [u8; 64] =
    *b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG";
const YEAST_MITO_AA: [u8; 64] =
    *b"FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
const MOLD_MITO_AA: [u8; 64] =
    *b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
const INVERTEBRATE_MITO_AA: [u8; 64] =
    *b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG";
const CILIATE_AA: [u8; 64] =
    *b"FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// Nucleotide -> 2-bit index in TCAG order. 255 marks non-ACGT symbols.
static NT_INDEX: [u8; 256] = {
    let mut table = [255u8; 256];
    table[b'T' as usize] = 0;
    table[b't' as usize] = 0;
    table[b'C' as usize] = 1;
    table[b'c' as usize] = 1;
    table[b'A' as usize] = 2;
    table[b'a' as usize] = 2;
    table[b'G' as usize] = 3;
    table[b'g' as usize] = 3;
    table
};

/// Nucleotide -> complement. Non-ACGT symbols complement to `X`.
static COMPLEMENT: [u8; 256] = {
    let mut table = [UNKNOWN_RESIDUE; 256];
    table[b'A' as usize] = b'T';
    table[b'a' as usize] = b'T';
    table[b'T' as usize] = b'A';
    table[b't' as usize] = b'A';
    table[b'C' as usize] = b'G';
    table[b'c' as usize] = b'G';
    table[b'G' as usize] = b'C';
    table[b'g' as usize] = b'C';
    table
};

/// Codon table passed into the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneticCode {
    pub table: [u8; 64],
}

static STANDARD: GeneticCode = GeneticCode { table: STANDARD_AA };

impl GeneticCode {
    /// NCBI translation table 1.
    pub fn standard() -> &'static GeneticCode {
        &STANDARD
    }

    /// Table for an NCBI genetic code id. Unsupported ids fall back to the
    /// standard code with a warning.
    pub fn from_id(id: u8) -> Self {
        let table = match id {
            1 | 11 => STANDARD_AA,
            2 => VERTEBRATE_MITO_AA,
            3 => YEAST_MITO_AA,
            4 => MOLD_MITO_AA,
            5 => INVERTEBRATE_MITO_AA,
            6 => CILIATE_AA,
            _ => {
                log::warn!(
                    "Genetic code {} not supported, using the standard code (1)",
                    id
                );
                STANDARD_AA
            }
        };
        GeneticCode { table }
    }

    /// Translate one codon. Slices that are not exactly three long and codons
    /// containing anything other than `ACGT` yield [`UNKNOWN_RESIDUE`].
    #[inline]
    pub fn get(&self, codon: &[u8]) -> u8 {
        if codon.len() != 3 {
            return UNKNOWN_RESIDUE;
        }
        let mut idx = 0usize;
        for &base in codon {
            let bits = NT_INDEX[base as usize];
            if bits == 255 {
                return UNKNOWN_RESIDUE;
            }
            idx = (idx << 2) | bits as usize;
        }
        self.table[idx]
    }

    /// Translate non-overlapping triplets from the start of `seq`.
    /// A trailing partial codon is dropped.
    pub fn translate(&self, seq: &[u8]) -> Vec<u8> {
        seq.chunks_exact(3).map(|codon| self.get(codon)).collect()
    }
}

/// Complement of a single nucleotide.
#[inline]
pub fn complement(base: u8) -> u8 {
    COMPLEMENT[base as usize]
}

/// Reverse complement. Output is upper case; unknown symbols become `X`.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

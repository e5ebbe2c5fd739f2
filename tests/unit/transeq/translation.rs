//! Unit tests for transeq/translation.rs and transeq/scheduler.rs

use proptest::prelude::*;
use protmap::algorithm::transeq::{
    six_frames, translate_frame, translate_genome, Frame, FrameId, Strand,
};
use protmap::sequence::{read_fasta, GenomeIndex, Sequence};
use protmap::utils::genetic_code::{reverse_complement, GeneticCode};

const SEQ: &[u8] = b"ATGAAATTTGGGCCC";

fn frame(offset: u8, strand: Strand) -> Frame {
    Frame::from_parts(offset, strand).unwrap()
}

#[test]
fn test_hand_translated_forward_frames() {
    let code = GeneticCode::standard();
    assert_eq!(translate_frame(SEQ, frame(0, Strand::Plus), code), b"MKFGP");
    assert_eq!(translate_frame(SEQ, frame(1, Strand::Plus), code), b"*NLG");
    assert_eq!(translate_frame(SEQ, frame(2, Strand::Plus), code), b"EIWA");
}

#[test]
fn test_hand_translated_reverse_frames() {
    // revcomp = GGGCCCAAATTTCAT
    let code = GeneticCode::standard();
    assert_eq!(translate_frame(SEQ, frame(0, Strand::Minus), code), b"GPKFH");
    assert_eq!(translate_frame(SEQ, frame(1, Strand::Minus), code), b"GPNF");
    assert_eq!(translate_frame(SEQ, frame(2, Strand::Minus), code), b"AQIS");
}

#[test]
fn test_ambiguous_codon_is_unknown() {
    let code = GeneticCode::standard();
    assert_eq!(translate_frame(b"ATGNNNAAA", frame(0, Strand::Plus), code), b"MXK");
    assert_eq!(reverse_complement(b"ANC"), b"GXT");
}

#[test]
fn test_six_frames_short_sequence() {
    let record = Sequence::new("tiny", "AC");
    let frames = six_frames(&record, GeneticCode::standard());
    assert_eq!(frames.len(), 6);
    assert!(frames.iter().all(|f| f.aa_seq.is_empty()));
}

#[test]
fn test_frame_ids_round_trip_with_underscores() {
    let id: FrameId = "scaffold_12_strand2minus".parse().unwrap();
    assert_eq!(id.seq_id, "scaffold_12");
    assert_eq!(id.frame, frame(2, Strand::Minus));
    assert_eq!(id.to_string(), "scaffold_12_strand2minus");
    assert!("scaffold_12_strand3plus".parse::<FrameId>().is_err());
    assert!("scaffold".parse::<FrameId>().is_err());
}

#[test]
fn test_translate_genome_writes_six_records_per_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("frames.faa");
    let genome = GenomeIndex::new(vec![
        Sequence::new("chr1", SEQ),
        Sequence::new("chr_2", "GGGAAACCCTTT"),
    ])
    .unwrap();

    let summary = translate_genome(&genome, &out, GeneticCode::standard(), 2, false).unwrap();
    assert_eq!(summary.sequences, 2);
    assert_eq!(summary.frames, 12);

    let records = read_fasta(&out).unwrap();
    assert_eq!(records.len(), 12);
    let forward = records
        .iter()
        .find(|r| r.id == "chr1_strand0plus")
        .unwrap();
    assert_eq!(forward.seq, b"MKFGP");
    assert!(records.iter().any(|r| r.id == "chr_2_strand2minus"));
}

#[test]
fn test_translate_genome_uses_requested_code() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("frames.faa");
    let genome = GenomeIndex::new(vec![Sequence::new("mt", "ATGTGAAGA")]).unwrap();

    translate_genome(&genome, &out, &GeneticCode::from_id(2), 1, false).unwrap();
    let records = read_fasta(&out).unwrap();
    let forward = records.iter().find(|r| r.id == "mt_strand0plus").unwrap();
    assert_eq!(forward.seq, b"MW*");
}

fn dna() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"ACGT".to_vec()), 0..200)
}

proptest! {
    #[test]
    fn prop_reverse_complement_is_involution(seq in dna()) {
        let rc = reverse_complement(&seq);
        prop_assert_eq!(rc.len(), seq.len());
        prop_assert_eq!(reverse_complement(&rc), seq);
    }

    #[test]
    fn prop_reverse_frame_trims_before_complementing(seq in dna(), k in 0u8..3) {
        // Dropping the last k bases then reverse complementing equals
        // skipping the first k bases of the reverse complement.
        let code = GeneticCode::standard();
        let rc = reverse_complement(&seq);
        let skipped = if (k as usize) < rc.len() { &rc[k as usize..] } else { &rc[..0] };
        prop_assert_eq!(
            translate_frame(&seq, frame(k, Strand::Minus), code),
            code.translate(skipped)
        );
    }

    #[test]
    fn prop_frame_lengths(seq in dna()) {
        let record = Sequence::new("s", seq.clone());
        for f in six_frames(&record, GeneticCode::standard()) {
            let k = f.id.frame.offset();
            prop_assert_eq!(f.aa_seq.len(), seq.len().saturating_sub(k) / 3);
        }
    }
}

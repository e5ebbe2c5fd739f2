//! Unit tests for protalign/args.rs

use clap::{Args, Command, FromArgMatches};
use protmap::algorithm::protalign::constants::{FLANK_MARGIN, EVALUE_THRESHOLD};
use protmap::algorithm::protalign::AlignArgs;
use std::path::PathBuf;

fn parse_args(args: &[&str]) -> AlignArgs {
    let mut all_args = vec!["protmap".to_string(), "align".to_string()];
    all_args.extend(args.iter().map(|s| s.to_string()));

    let cmd = Command::new("protmap").subcommand(AlignArgs::augment_args(Command::new("align")));
    let matches = cmd.get_matches_from(all_args);
    let sub_matches = matches.subcommand_matches("align").unwrap();
    AlignArgs::from_arg_matches(sub_matches).unwrap()
}

#[test]
fn test_default_values() {
    let args = parse_args(&["-g", "genome.fa", "-p", "proteins.faa"]);
    assert_eq!(args.genome, PathBuf::from("genome.fa"));
    assert_eq!(args.proteins, PathBuf::from("proteins.faa"));
    assert_eq!(args.threads, 0);
    assert_eq!(args.workdir, PathBuf::from("."));
    assert_eq!(args.out, None);
    assert_eq!(args.flank, FLANK_MARGIN);
    assert_eq!(args.flank, 100_000);
    assert_eq!(args.evalue, EVALUE_THRESHOLD);
    assert_eq!(args.max_target_seqs, 1);
    assert_eq!(args.gencode, 1);
    assert_eq!(args.tool_timeout, 3600);
    assert!(!args.native_extract);
    assert!(!args.verbose);
}

#[test]
fn test_custom_values() {
    let args = parse_args(&[
        "-g",
        "g.fa",
        "-p",
        "p.faa",
        "-n",
        "4",
        "-w",
        "run1",
        "-o",
        "out.gff3",
        "-e",
        "1e-10",
        "--flank",
        "5000",
        "--tool-timeout",
        "0",
        "--native-extract",
        "--gencode",
        "4",
    ]);
    assert_eq!(args.threads, 4);
    assert_eq!(args.workdir, PathBuf::from("run1"));
    assert_eq!(args.out, Some(PathBuf::from("out.gff3")));
    assert_eq!(args.evalue, 1e-10);
    assert_eq!(args.flank, 5000);
    assert_eq!(args.tool_timeout, 0);
    assert!(args.native_extract);
    assert_eq!(args.gencode, 4);
}

#[test]
fn test_tool_paths_on_command_line() {
    let args = parse_args(&[
        "-g",
        "g.fa",
        "-p",
        "p.faa",
        "--diamond",
        "/opt/diamond/bin/diamond",
        "--exonerate",
        "/opt/exonerate",
    ]);
    assert_eq!(args.diamond, "/opt/diamond/bin/diamond");
    assert_eq!(args.exonerate, "/opt/exonerate");
}

//! Unit tests for transeq/args.rs

use clap::{Args, Command, FromArgMatches};
use protmap::algorithm::transeq::TranseqArgs;
use std::path::PathBuf;

fn parse_args(args: &[&str]) -> TranseqArgs {
    let mut all_args = vec!["protmap".to_string(), "transeq".to_string()];
    all_args.extend(args.iter().map(|s| s.to_string()));

    let cmd = Command::new("protmap").subcommand(TranseqArgs::augment_args(Command::new("transeq")));
    let matches = cmd.get_matches_from(all_args);
    let sub_matches = matches.subcommand_matches("transeq").unwrap();
    TranseqArgs::from_arg_matches(sub_matches).unwrap()
}

#[test]
fn test_default_values() {
    let args = parse_args(&["-g", "genome.fa", "-o", "frames.faa"]);
    assert_eq!(args.genome, PathBuf::from("genome.fa"));
    assert_eq!(args.out, PathBuf::from("frames.faa"));
    assert_eq!(args.threads, 0);
    assert_eq!(args.gencode, 1);
    assert!(!args.verbose);
}

#[test]
fn test_threads_and_verbose() {
    let args = parse_args(&["-g", "g.fa", "-o", "f.faa", "-n", "8", "-v", "--gencode", "11"]);
    assert_eq!(args.threads, 8);
    assert_eq!(args.gencode, 11);
    assert!(args.verbose);
}

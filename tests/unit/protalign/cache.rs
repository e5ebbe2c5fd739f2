//! Unit tests for protalign/cache.rs

use protmap::algorithm::protalign::{AlignmentCache, FsCache, MemoryCache};
use protmap::common::Hit;

fn key() -> String {
    "prot|1\tchr1_strand0plus\t100\t90\t0\t0\t1\t90\t91\t1\t1e-30\t180"
        .parse::<Hit>()
        .unwrap()
        .key()
}

#[test]
fn test_hit_key_orders_residues_and_escapes() {
    assert_eq!(key(), "prot%7C1.chr1_strand0plus.1-91");
}

#[test]
fn test_fs_cache_files_named_by_key() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FsCache::new(dir.path().join("alignments")).unwrap();
    cache.put(&key(), "raw report\n").unwrap();
    let path = dir.path().join("alignments").join(format!("{}.gff", key()));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "raw report\n");
    assert_eq!(cache.get(&key()).as_deref(), Some("raw report\n"));
}

#[test]
fn test_fs_cache_keeps_punctuation_variants_apart() {
    let hit = |query: &str| {
        format!("{}\tchr1_strand0plus\t100\t9\t0\t0\t1\t9\t1\t9\t1e-30\t18", query)
            .parse::<Hit>()
            .unwrap()
    };
    let dir = tempfile::tempdir().unwrap();
    let cache = FsCache::new(dir.path()).unwrap();
    cache.put(&hit("sp|P1|X").key(), "pipes\n").unwrap();
    cache.put(&hit("sp_P1_X").key(), "underscores\n").unwrap();
    assert_eq!(cache.get(&hit("sp|P1|X").key()).as_deref(), Some("pipes\n"));
    assert_eq!(cache.get(&hit("sp_P1_X").key()).as_deref(), Some("underscores\n"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_fs_cache_leaves_no_partial_files() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FsCache::new(dir.path()).unwrap();
    cache.put("a", "1").unwrap();
    cache.put("b", "2").unwrap();
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.gff", "b.gff"]);
}

#[test]
fn test_memory_cache_shared_across_threads() {
    let cache = MemoryCache::new();
    std::thread::scope(|scope| {
        for i in 0..8 {
            let cache = &cache;
            scope.spawn(move || cache.put(&format!("k{}", i), "x").unwrap());
        }
    });
    assert_eq!(cache.len(), 8);
    assert_eq!(cache.puts(), 8);
    assert!(cache.has("k7"));
}

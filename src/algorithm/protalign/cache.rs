//! Per-hit alignment cache
//!
//! A hit whose raw alignment report is already cached is never aligned
//! again. [`FsCache`] keeps reports as `<key>.gff` files in the working
//! directory so an interrupted run can be resumed; [`MemoryCache`] keeps
//! them in a map.

use rustc_hash::FxHashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Raw alignment reports keyed by [`Hit::key`](crate::common::Hit::key).
pub trait AlignmentCache: Send + Sync {
    fn has(&self, key: &str) -> bool;
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, raw: &str) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FsCache {
    dir: PathBuf,
}

impl FsCache {
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.gff", key))
    }
}

impl AlignmentCache for FsCache {
    fn has(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    /// Written to a temporary file first and renamed into place, so a
    /// killed run never leaves a truncated report that later counts as done.
    fn put(&self, key: &str, raw: &str) -> io::Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(raw.as_bytes())?;
        tmp.flush()?;
        tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<FxHashMap<String, String>>,
    puts: AtomicU64,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `put` calls so far.
    pub fn puts(&self) -> u64 {
        self.puts.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AlignmentCache for MemoryCache {
    fn has(&self, key: &str) -> bool {
        self.entries
            .read()
            .map(|e| e.contains_key(key))
            .unwrap_or(false)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn put(&self, key: &str, raw: &str) -> io::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "cache lock poisoned"))?;
        entries.insert(key.to_string(), raw.to_string());
        self.puts.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

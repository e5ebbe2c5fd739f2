//! DIAMOND wrapper: `makedb` over the translated genome, then `blastp`

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{HomologySearch, ToolCommand};
use crate::error::ToolError;

#[derive(Debug, Clone)]
pub struct Diamond {
    pub executable: String,
    pub max_target_seqs: usize,
    pub timeout: Option<Duration>,
}

impl Diamond {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            max_target_seqs: 1,
            timeout: None,
        }
    }

    /// Database path DIAMOND writes for `translated` (it appends `.dmnd`).
    pub fn db_path(translated: &Path) -> PathBuf {
        let mut name = translated.as_os_str().to_owned();
        name.push(".dmnd");
        PathBuf::from(name)
    }

    pub fn makedb_command(&self, translated: &Path, threads: usize) -> ToolCommand {
        ToolCommand::new("diamond makedb", self.executable.clone())
            .arg("makedb")
            .arg("--in")
            .arg(translated)
            .arg("-d")
            .arg(translated)
            .arg("-p")
            .arg(threads.max(1).to_string())
            .timeout(self.timeout)
    }

    pub fn blastp_command(&self, translated: &Path, queries: &Path, threads: usize) -> ToolCommand {
        ToolCommand::new("diamond blastp", self.executable.clone())
            .arg("blastp")
            .arg("-q")
            .arg(queries)
            .arg("--db")
            .arg(Self::db_path(translated))
            .arg("-k")
            .arg(self.max_target_seqs.to_string())
            .arg("-p")
            .arg(threads.max(1).to_string())
            .args(["--outfmt", "6"])
            .timeout(self.timeout)
    }
}

impl HomologySearch for Diamond {
    fn search(&self, translated: &Path, queries: &Path, threads: usize) -> Result<String, ToolError> {
        self.makedb_command(translated, threads).output()?;
        let out = self.blastp_command(translated, queries, threads).output()?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

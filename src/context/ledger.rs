use crate::context::paths::DockPaths;
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One summarized historical message. `step` is 1-based and equals the
/// message's position in the flattened category history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub step: u64,
    pub summary: String,
}

/// Per-category incremental summary ledger.
///
/// Logically append-only: entries are appended in step order and never
/// reordered, rewritten, or removed. Physically the JSON array is replaced
/// wholesale on each append, written to a temp file in the same directory
/// and renamed into place so readers never observe a partial write.
///
/// Single-writer contract: concurrent invocations against the same
/// category are not supported. An advisory lock is held across the
/// read-modify-write window so a second writer fails loudly instead of
/// silently corrupting or duplicating a step.
pub struct LedgerStore {
    file: PathBuf,
}

impl LedgerStore {
    pub fn for_category(paths: &DockPaths, category: &str) -> Self {
        Self {
            file: paths.summary_file(category),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Load all entries; a missing ledger file is an empty ledger.
    pub fn load(&self) -> Result<Vec<LedgerEntry>> {
        if !self.file.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.file)
            .with_context(|| format!("failed to read {}", self.file.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", self.file.display()))
    }

    /// Append one entry and persist the full ledger atomically. Returns
    /// the ledger as persisted. Rejects out-of-sequence steps so a racing
    /// writer cannot silently duplicate one.
    pub fn append(&self, entry: LedgerEntry) -> Result<Vec<LedgerEntry>> {
        let parent = self
            .file
            .parent()
            .context("summary ledger path has no parent directory")?;
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;

        let lock_path = parent.join("history_summary.lock");
        let lock = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("failed to open {}", lock_path.display()))?;
        lock.try_lock_exclusive().with_context(|| {
            format!(
                "summary ledger {} is locked by another process",
                self.file.display()
            )
        })?;

        let mut entries = self.load()?;
        let expected = entries.len() as u64 + 1;
        if entry.step != expected {
            anyhow::bail!(
                "ledger step out of sequence for {}: got {}, expected {}",
                self.file.display(),
                entry.step,
                expected
            );
        }
        entries.push(entry);

        let data = serde_json::to_string_pretty(&entries)?;
        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
        tmp.write_all(data.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.file)
            .with_context(|| format!("failed to replace {}", self.file.display()))?;

        let _ = FileExt::unlock(&lock);
        Ok(entries)
    }
}

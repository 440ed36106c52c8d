//! Scan results file (`achievements.json`).
//!
//! A JSON object mapping achievement title to completion. The file is
//! rewritten after every category, so an interrupted scan keeps what it
//! already found.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanResults {
    achievements: BTreeMap<String, bool>,
}

impl ScanResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites an entry. The last reading wins.
    pub fn upsert(&mut self, title: impl Into<String>, completed: bool) {
        self.achievements.insert(title.into(), completed);
    }

    pub fn achievements(&self) -> &BTreeMap<String, bool> {
        &self.achievements
    }

    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }

    /// Writes the results atomically: a temp file in the same directory is
    /// renamed over the target.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let json = serde_json::to_string_pretty(&self.achievements)?;
        let mut temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        temp.write_all(json.as_bytes())?;
        temp.flush()?;
        temp.persist(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::debug!("Saved {} achievements to {}", self.len(), path.display());
        Ok(())
    }
}

/// Reads a results file written by [`ScanResults::save`].
pub fn load_achievements(path: &Path) -> Result<BTreeMap<String, bool>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

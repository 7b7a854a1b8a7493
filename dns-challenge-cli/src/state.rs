//! Resolved names carried from the `auth` hook to the `cleanup` hook
//!
//! certbot runs each hook in a fresh process, so the name cache is persisted as a JSON object
//! `{"<validation name>": "<resolved name>"}`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored entries. A missing file is an empty state.
    pub fn load(&self) -> anyhow::Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file {}", self.path.display()))
    }

    pub fn insert(&self, validation_name: &str, resolved_name: &str) -> anyhow::Result<()> {
        let mut entries = self.load()?;
        entries.insert(validation_name.to_string(), resolved_name.to_string());
        self.save(&entries)
    }

    /// Drop an entry; the file is removed once empty.
    pub fn remove(&self, validation_name: &str) -> anyhow::Result<()> {
        let mut entries = self.load()?;
        if entries.remove(validation_name).is_none() {
            return Ok(());
        }
        if entries.is_empty() && self.path.exists() {
            return std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove state file {}", self.path.display()));
        }
        self.save(&entries)
    }

    fn save(&self, entries: &HashMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        // Write then rename so a concurrent reader never sees a partial file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to write state file {}", self.path.display()))
    }
}

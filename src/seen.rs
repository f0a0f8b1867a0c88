//! Remembers which narrations were already turned into videos.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Lookup/record capability used to avoid publishing the same fact twice.
pub trait SeenStore {
    fn contains(&self, key: &str) -> bool;
    fn record(&mut self, key: &str) -> anyhow::Result<()>;
}

/// Key for a narration: lowercase, whitespace collapsed.
pub fn seen_key(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Default)]
pub struct MemorySeenStore {
    keys: BTreeSet<String>,
}

impl SeenStore for MemorySeenStore {
    fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn record(&mut self, key: &str) -> anyhow::Result<()> {
        self.keys.insert(key.to_string());
        Ok(())
    }
}

/// Keys persisted as a JSON array, rewritten on every record.
#[derive(Debug)]
pub struct JsonSeenStore {
    path: PathBuf,
    keys: BTreeSet<String>,
}

impl JsonSeenStore {
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let keys = load_keys(&path)?;
        debug!("Loaded {} seen keys from {}", keys.len(), path.display());
        Ok(Self { path, keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl SeenStore for JsonSeenStore {
    fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn record(&mut self, key: &str) -> anyhow::Result<()> {
        if self.keys.insert(key.to_string()) {
            save_keys(&self.path, &self.keys)?;
        }
        Ok(())
    }
}

fn load_keys(path: &Path) -> anyhow::Result<BTreeSet<String>> {
    if !path.exists() {
        return Ok(BTreeSet::new());
    }
    let data = fs::read_to_string(path)?;
    let keys: Vec<String> = serde_json::from_str(&data)?;
    Ok(keys.into_iter().collect())
}

fn save_keys(path: &Path, keys: &BTreeSet<String>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(keys)?;
    fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seen_key_normalizes() {
        assert_eq!(
            seen_key("  Honey NEVER\n spoils. "),
            seen_key("honey never spoils.")
        );
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemorySeenStore::default();
        assert!(!store.contains("a"));
        store.record("a").unwrap();
        assert!(store.contains("a"));
    }

    #[test]
    fn test_json_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("used_facts.json");

        let mut store = JsonSeenStore::open(&path).unwrap();
        assert!(store.is_empty());
        store.record("honey never spoils.").unwrap();
        store.record("honey never spoils.").unwrap();

        let reopened = JsonSeenStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert!(reopened.contains("honey never spoils."));
    }
}

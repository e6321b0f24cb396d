//! The set of reference images a session is started from.
//!
//! Hosts register what they acquired (files, drops, URLs) as [`ImageEntry`]
//! values. The library rejects entries whose signature is already present, so
//! the same file added twice shows up once in the queue.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::queue::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub id: ItemId,
    pub name: String,
    pub size_bytes: u64,
    /// Last-modified time in epoch milliseconds.
    pub modified_ms: u64,
}

impl ImageEntry {
    /// `name-size-modified`, stable across re-acquisition of the same file.
    pub fn signature(&self) -> String {
        format!("{}-{}-{}", self.name, self.size_bytes, self.modified_ms)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageLibrary {
    entries: Vec<ImageEntry>,
}

impl ImageLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add entries, skipping duplicates of existing entries and of each other.
    /// Returns how many were added.
    pub fn add<I: IntoIterator<Item = ImageEntry>>(&mut self, entries: I) -> usize {
        let before = self.entries.len();
        for entry in entries {
            let signature = entry.signature();
            let duplicate = self
                .entries
                .iter()
                .any(|e| e.id == entry.id || e.signature() == signature);
            if duplicate {
                debug!(name = %entry.name, "skipping duplicate image");
                continue;
            }
            self.entries.push(entry);
        }
        self.entries.len() - before
    }

    /// Remove by id. A running session must be restarted afterwards.
    pub fn remove(&mut self, id: &str) -> Option<ImageEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: &str) -> Option<&ImageEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, size: u64) -> ImageEntry {
        ImageEntry {
            id: id.into(),
            name: name.into(),
            size_bytes: size,
            modified_ms: 1_000,
        }
    }

    #[test]
    fn add_skips_same_signature() {
        let mut lib = ImageLibrary::new();
        assert_eq!(lib.add([entry("1", "pose.jpg", 10), entry("2", "hand.jpg", 20)]), 2);
        // Same file acquired again under a new id.
        assert_eq!(lib.add([entry("3", "pose.jpg", 10)]), 0);
        assert_eq!(lib.ids(), vec!["1", "2"]);
    }

    #[test]
    fn add_dedupes_within_batch() {
        let mut lib = ImageLibrary::new();
        let added = lib.add([
            entry("1", "a.png", 5),
            entry("2", "a.png", 5),
            entry("3", "a.png", 6),
        ]);
        assert_eq!(added, 2);
    }

    #[test]
    fn remove_and_clear() {
        let mut lib = ImageLibrary::new();
        lib.add([entry("1", "a.png", 1), entry("2", "b.png", 2)]);
        assert_eq!(lib.remove("1").map(|e| e.name), Some("a.png".to_string()));
        assert!(lib.remove("1").is_none());
        assert_eq!(lib.len(), 1);
        assert!(lib.get("2").is_some());
        lib.clear();
        assert!(lib.is_empty());
    }
}

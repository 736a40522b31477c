//! Persisted log of completed AI searches.
//!
//! Newest first, at most [`MAX_HISTORY_ENTRIES`], one entry per query text.
//! Entries can only be cleared all at once.

use crate::models::HistoryEntry;
use crate::storage::{load_list, save_list, KeyValueStore};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key for the history list
pub const HISTORY_KEY: &str = "ai_search_history";

/// Maximum number of entries kept in memory and in storage
pub const MAX_HISTORY_ENTRIES: usize = 10;

pub struct HistoryStore {
    /// Most recent first
    entries: VecDeque<HistoryEntry>,
    storage: Arc<dyn KeyValueStore>,
    max_size: usize,
}

impl HistoryStore {
    /// Load persisted history once; afterwards this store owns it.
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self {
            entries: Self::load(storage.as_ref()).into(),
            storage,
            max_size: MAX_HISTORY_ENTRIES,
        };
        store.trim_to_max_size();
        debug!("Loaded {} AI search history entries", store.entries.len());
        store
    }

    /// Read history from storage. Never fails; bad data means no history.
    pub fn load(storage: &dyn KeyValueStore) -> Vec<HistoryEntry> {
        load_list(storage, HISTORY_KEY)
    }

    /// Add an entry at the front, replacing any entry with the same query.
    pub fn append(&mut self, mut entry: HistoryEntry) {
        entry.query = entry.query.trim().to_string();

        self.entries
            .retain(|existing| existing.query.trim() != entry.query && existing.id != entry.id);
        self.entries.push_front(entry);
        self.trim_to_max_size();
        self.persist();
    }

    /// Remove every entry, in memory and in storage
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.storage.remove(HISTORY_KEY) {
            warn!("Failed to clear AI search history: {:#}", e);
        }
    }

    #[cfg(test)]
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    #[cfg(test)]
    pub fn find(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn trim_to_max_size(&mut self) {
        self.entries.truncate(self.max_size);
    }

    fn persist(&self) {
        if let Err(e) = save_list(self.storage.as_ref(), HISTORY_KEY, self.entries.iter()) {
            warn!("Failed to save AI search history: {:#}", e);
        }
    }
}

//! Recent search persistence
//!
//! Keeps a bounded, most-recent-first list of unique search terms in session
//! storage. Every operation is best-effort: storage failures are logged and
//! degrade to an empty list instead of reaching the caller.

use anyhow::{Context, Result};

use crate::session::SessionStore;
use crate::session::constants::{RECENT_SEARCH_KEY, RECENT_SEARCH_LIMIT};

/// Manages the recent search list stored under a single session key
#[derive(Debug)]
pub struct RecentSearches<S> {
    store: S,
    key: String,
    limit: usize,
}

impl<S: SessionStore> RecentSearches<S> {
    /// Create a manager using the default key and limit
    pub fn new(store: S) -> Self {
        Self::with_settings(store, RECENT_SEARCH_KEY, RECENT_SEARCH_LIMIT)
    }

    /// Create a manager with a custom storage key and list limit
    pub fn with_settings(store: S, key: impl Into<String>, limit: usize) -> Self {
        Self {
            store,
            key: key.into(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the persisted list, or an empty one if absent or unreadable
    pub fn get(&self) -> Vec<String> {
        match self.load() {
            Ok(searches) => searches,
            Err(e) => {
                tracing::warn!("Ignoring unreadable recent searches: {:#}", e);
                Vec::new()
            }
        }
    }

    fn load(&self) -> Result<Vec<String>> {
        let Some(raw) = self.store.get_item(&self.key)? else {
            return Ok(Vec::new());
        };
        let mut searches: Vec<String> = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed value under '{}'", self.key))?;
        searches.truncate(self.limit);
        Ok(searches)
    }

    /// Record a submitted term and return the updated list
    ///
    /// The term is trimmed; an empty term leaves the list untouched. An
    /// existing exact (case-sensitive) match moves to the front instead of
    /// being duplicated, and the oldest entry is evicted once the limit is
    /// reached.
    pub fn add(&mut self, term: &str) -> Vec<String> {
        let term = term.trim();
        let mut searches = self.get();
        if term.is_empty() {
            return searches;
        }

        searches.retain(|existing| existing != term);
        searches.insert(0, term.to_string());
        searches.truncate(self.limit);

        if let Err(e) = self.save(&searches) {
            tracing::warn!("Failed to persist recent searches: {:#}", e);
        }
        searches
    }

    fn save(&mut self, searches: &[String]) -> Result<()> {
        let json = serde_json::to_string(searches)?;
        self.store.set_item(&self.key, &json)
    }

    /// Remove the persisted list entirely
    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove_item(&self.key) {
            tracing::warn!("Failed to clear recent searches: {:#}", e);
        }
    }

    /// Recent entries containing `query`, compared case-insensitively
    pub fn matching(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.get()
            .into_iter()
            .filter(|search| search.to_lowercase().contains(&needle))
            .collect()
    }
}

use std::sync::Arc;

use keeper_core::{Error, KeyValueStore, Result};

/// Key under which the bookmarked post IDs are kept, as a JSON array of strings.
pub const BOOKMARKS_KEY: &str = "savedPosts";

/// The bookmark list on top of a key-value store.
#[derive(Clone)]
pub struct BookmarkStore {
    kv: Arc<dyn KeyValueStore>,
}

impl BookmarkStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Never fails: a missing, unreadable or malformed value loads as an empty list.
    pub fn load(&self) -> Vec<String> {
        match self.try_load() {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Cannot load bookmarks, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Vec<String>> {
        match self.kv.get(BOOKMARKS_KEY)? {
            Some(value) => Ok(serde_json::from_str(&value)?),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrite the stored list.
    pub fn save(&self, ids: &[String]) -> Result<()> {
        let value = serde_json::to_string(ids)?;
        self.kv
            .set(BOOKMARKS_KEY, &value)
            .map_err(|e| Error::PersistenceError(e.to_string()))?;
        tracing::debug!("Saved {} bookmarks", ids.len());
        Ok(())
    }
}

impl std::fmt::Debug for BookmarkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookmarkStore").field("key", &BOOKMARKS_KEY).finish()
    }
}

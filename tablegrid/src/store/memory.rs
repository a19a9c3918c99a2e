//! In-memory state store backed by DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::StateStore;
use crate::query::QueryParams;

/// An in-memory state store backed by a concurrent hash map.
///
/// This is the default store. It's fast and thread-safe, but state is lost
/// when the process exits; back the grid with a persistent implementation
/// when query state should outlive a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, QueryParams>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<QueryParams> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    async fn add(&self, key: &str, params: QueryParams) {
        self.entries.insert(key.to_string(), params);
    }

    async fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("k").await.is_none());

        let mut params = QueryParams::new();
        params.page = 4;
        store.add("k", params.clone()).await;
        assert_eq!(store.get("k").await, Some(params));
        assert_eq!(store.len(), 1);

        store.remove("k").await;
        assert!(store.get("k").await.is_none());
        assert!(store.is_empty());
    }
}

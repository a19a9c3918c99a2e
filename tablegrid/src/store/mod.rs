//! Keyed persistence for query state.
//!
//! Provides a `StateStore` trait and an in-memory implementation. The grid
//! saves its query parameters here under a caller-supplied key so that
//! paging, sorting and filter state survive navigating away and back.

mod memory;

pub use memory::*;

use async_trait::async_trait;

use crate::query::QueryParams;

/// Trait for query-state stores.
///
/// Implementations persist the full [`QueryParams`] of a grid under string
/// keys. The grid writes on every query, reads once during initialization,
/// and removes the entry when the caller forces a refresh.
///
/// # Example
///
/// ```
/// use tablegrid::store::{MemoryStore, StateStore};
/// use tablegrid::QueryParams;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let store = MemoryStore::new();
/// store.add("customer.grid", QueryParams::new()).await;
/// assert!(store.get("customer.grid").await.is_some());
/// store.remove("customer.grid").await;
/// assert!(store.get("customer.grid").await.is_none());
/// # });
/// ```
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Retrieves the stored parameters for a key, if any.
    async fn get(&self, key: &str) -> Option<QueryParams>;

    /// Stores parameters under a key, replacing any previous value.
    async fn add(&self, key: &str, params: QueryParams);

    /// Removes the stored parameters for a key.
    async fn remove(&self, key: &str);
}

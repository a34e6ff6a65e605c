//! Hacker News item source
//!
//! The [`ItemSource`] trait is the seam between the batch fetcher and the
//! network: one call, one item, `Ok(None)` when the upstream has nothing at
//! that ID. [`HackerNewsClient`] is the HTTP implementation.

mod http;
mod item;

pub use http::HackerNewsClient;
pub use item::{Item, ItemId, ItemType, StoryCategory};

use async_trait::async_trait;

use crate::error::Result;

/// Produces one item per identifier
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Record type this source returns
    type Item: Send;

    /// Fetch a single item.
    ///
    /// Returns `Ok(None)` when no item exists at `id`. Transport failures,
    /// timeouts, non-2xx statuses and malformed bodies are errors; callers
    /// that batch many lookups decide whether to downgrade them.
    async fn fetch_item(&self, id: ItemId) -> Result<Option<Self::Item>>;
}

#[async_trait]
impl<S: ItemSource + ?Sized> ItemSource for std::sync::Arc<S> {
    type Item = S::Item;

    async fn fetch_item(&self, id: ItemId) -> Result<Option<Self::Item>> {
        (**self).fetch_item(id).await
    }
}

//! Bounded-concurrency batch fetcher

use futures::future::join_all;
use std::future::Future;
use tracing::{debug, warn};

use super::gate::AdmissionGate;
use crate::client::{ItemId, ItemSource};
use crate::config::BatchConfig;
use crate::error::Result;

/// Fetches many items through an [`ItemSource`] with bounded concurrency.
///
/// Results keep the order of the input identifiers regardless of completion
/// order. Absent items and failed fetches are dropped without leaving gaps.
#[derive(Debug, Clone)]
pub struct BatchFetcher<S> {
    source: S,
    gate: AdmissionGate,
}

impl<S: ItemSource> BatchFetcher<S> {
    /// Create a fetcher admitting at most `max_concurrency` fetches at once
    pub fn new(source: S, max_concurrency: usize) -> Self {
        Self {
            source,
            gate: AdmissionGate::new(max_concurrency),
        }
    }

    pub fn from_config(source: S, config: &BatchConfig) -> Self {
        Self::new(source, config.max_concurrency)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Resolve an identifier list, keep its first `max_count` entries and
    /// fetch them.
    ///
    /// `max_count` must already be validated by the caller. A failing
    /// `list_provider` fails the whole batch; failing items do not.
    pub async fn fetch_batch<F, Fut>(
        &self,
        list_provider: F,
        max_count: usize,
    ) -> Result<Vec<S::Item>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ItemId>>>,
    {
        let ids = list_provider().await?;
        let take = ids.len().min(max_count);
        debug!(listed = ids.len(), max_count, take, "resolved batch identifiers");

        Ok(self.fetch_ids(&ids[..take]).await)
    }

    /// Fetch every identifier in `ids`, dropping absent and failed items.
    pub async fn fetch_ids(&self, ids: &[ItemId]) -> Vec<S::Item> {
        let settled = join_all(ids.iter().map(|&id| self.fetch_one(id))).await;
        let items: Vec<S::Item> = settled.into_iter().flatten().collect();

        debug!(
            requested = ids.len(),
            fetched = items.len(),
            skipped = ids.len() - items.len(),
            "batch settled"
        );
        items
    }

    async fn fetch_one(&self, id: ItemId) -> Option<S::Item> {
        match self.gate.admit(self.source.fetch_item(id)).await {
            Ok(Ok(Some(item))) => Some(item),
            Ok(Ok(None)) => {
                debug!(id, "item absent");
                None
            }
            Ok(Err(e)) | Err(e) => {
                warn!(id, error = %e, "failed to fetch item, skipping");
                None
            }
        }
    }
}

//! Batch item fetching
//!
//! Turns an ordered list of identifiers into an ordered list of items:
//! truncate, fetch concurrently behind an [`AdmissionGate`], drop whatever
//! could not be fetched.
//!
//! # Example
//!
//! ```rust,no_run
//! use hackernews_core::batch::BatchFetcher;
//! use hackernews_core::client::{HackerNewsClient, StoryCategory};
//!
//! # async fn run() -> hackernews_core::error::Result<()> {
//! let client = HackerNewsClient::with_defaults()?;
//! let fetcher = BatchFetcher::new(client.clone(), 10);
//!
//! let stories = fetcher
//!     .fetch_batch(|| client.get_story_ids(StoryCategory::Top), 30)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod fetcher;
mod gate;

pub use fetcher::BatchFetcher;
pub use gate::AdmissionGate;

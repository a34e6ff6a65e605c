//! Hacker News tools
//!
//! `hn_get_item` looks up one item by ID. The six `hn_get_*_stories` tools
//! resolve a story list and batch-fetch its first `limit` entries.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use super::registry::{RegistryError, ToolRegistry};
use super::result::{ToolError, ValidationError};
use super::tool::{Tool, ToolMetadata, ToolSchema};
use crate::batch::BatchFetcher;
use crate::client::{HackerNewsClient, ItemId, StoryCategory};

/// `limit` used when the caller omits it
pub const DEFAULT_STORY_LIMIT: usize = 30;

/// Fetcher shared by every Hacker News tool in a process
pub type SharedFetcher = Arc<BatchFetcher<HackerNewsClient>>;

/// Build a registry holding all seven Hacker News tools
pub fn hacker_news_registry(fetcher: SharedFetcher) -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    register_hacker_news_tools(&mut registry, fetcher)?;
    Ok(registry)
}

/// Register the item tool and one list tool per story category
pub fn register_hacker_news_tools(
    registry: &mut ToolRegistry,
    fetcher: SharedFetcher,
) -> Result<(), RegistryError> {
    registry.register(Arc::new(GetItemTool::new(Arc::clone(&fetcher))))?;
    for category in StoryCategory::ALL {
        registry.register(Arc::new(StoryListTool::new(category, Arc::clone(&fetcher))))?;
    }
    Ok(())
}

/// Retrieve one item by ID
pub struct GetItemTool {
    metadata: ToolMetadata,
    fetcher: SharedFetcher,
}

impl GetItemTool {
    pub fn new(fetcher: SharedFetcher) -> Self {
        Self {
            metadata: ToolMetadata::new(
                "hn_get_item",
                "Retrieve a Hacker News item (story, comment, job, poll, or poll option) by its ID",
            )
            .with_tag("hackernews"),
            fetcher,
        }
    }
}

#[async_trait]
impl Tool for GetItemTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "integer",
                    "exclusiveMinimum": 0,
                    "description": "The ID of the item to retrieve"
                }
            },
            "required": ["id"]
        }))
    }

    fn validate(&self, args: &Value) -> Result<(), Vec<ValidationError>> {
        parse_id(args).map(|_| ()).map_err(|e| vec![e])
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let id = parse_id(&args).map_err(|e| ToolError::validation(vec![e]))?;

        // Absent items are a normal answer here; transport trouble is not.
        let item = self.fetcher.source().get_item(id).await?;
        debug!(id, found = item.is_some(), "hn_get_item");

        serde_json::to_value(item).map_err(|e| ToolError::internal(e.to_string()))
    }
}

/// Fetch the first `limit` items of one story list
pub struct StoryListTool {
    category: StoryCategory,
    metadata: ToolMetadata,
    fetcher: SharedFetcher,
}

impl StoryListTool {
    pub fn new(category: StoryCategory, fetcher: SharedFetcher) -> Self {
        let (name, description) = match category {
            StoryCategory::Top => (
                "hn_get_top_stories",
                "Get the current top stories on Hacker News",
            ),
            StoryCategory::New => ("hn_get_new_stories", "Get the newest stories on Hacker News"),
            StoryCategory::Best => ("hn_get_best_stories", "Get the best stories on Hacker News"),
            StoryCategory::Ask => ("hn_get_ask_stories", "Get the latest Ask HN stories"),
            StoryCategory::Show => ("hn_get_show_stories", "Get the latest Show HN stories"),
            StoryCategory::Job => ("hn_get_job_stories", "Get the latest job postings"),
        };

        Self {
            category,
            metadata: ToolMetadata::new(name, description)
                .with_tag("hackernews")
                .with_tag("stories"),
            fetcher,
        }
    }

    pub fn category(&self) -> StoryCategory {
        self.category
    }
}

#[async_trait]
impl Tool for StoryListTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    fn schema(&self) -> ToolSchema {
        let max = self.category.max_limit();
        ToolSchema::new(json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": max,
                    "default": DEFAULT_STORY_LIMIT,
                    "description": format!(
                        "Number of stories to retrieve (default: {}, max: {})",
                        DEFAULT_STORY_LIMIT, max
                    )
                }
            }
        }))
    }

    fn validate(&self, args: &Value) -> Result<(), Vec<ValidationError>> {
        parse_limit(args, self.category.max_limit())
            .map(|_| ())
            .map_err(|e| vec![e])
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let limit = parse_limit(&args, self.category.max_limit())
            .map_err(|e| ToolError::validation(vec![e]))?;

        let client = self.fetcher.source();
        let stories = self
            .fetcher
            .fetch_batch(|| client.get_story_ids(self.category), limit)
            .await?;
        debug!(category = %self.category, limit, returned = stories.len(), "story list fetched");

        serde_json::to_value(stories).map_err(|e| ToolError::internal(e.to_string()))
    }
}

/// Read `id`: required, a positive integer
fn parse_id(args: &Value) -> Result<ItemId, ValidationError> {
    match args.get("id") {
        None | Some(Value::Null) => Err(ValidationError::new("id", "is required")),
        Some(value) => positive_integer(value).ok_or_else(|| {
            ValidationError::new("id", format!("must be a positive integer, got {}", value))
        }),
    }
}

/// Read `limit`: optional, defaults to [`DEFAULT_STORY_LIMIT`], within `1..=max`
fn parse_limit(args: &Value, max: usize) -> Result<usize, ValidationError> {
    let value = match args.get("limit") {
        None | Some(Value::Null) => return Ok(DEFAULT_STORY_LIMIT),
        Some(value) => value,
    };

    match positive_integer(value) {
        Some(n) if n as usize <= max => Ok(n as usize),
        _ => Err(ValidationError::new(
            "limit",
            format!("must be an integer between 1 and {}, got {}", max, value),
        )),
    }
}

/// JSON number that is a whole number greater than zero
fn positive_integer(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return (n > 0).then_some(n);
    }
    // Accept whole-valued floats such as `30.0`
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f >= 1.0 && f <= u64::MAX as f64).then_some(f as u64)
}

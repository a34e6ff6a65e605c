//! Hacker News item and story-list types

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Identifier of one item in the Hacker News tree
pub type ItemId = u64;

/// Kind of a Hacker News item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Job,
    Story,
    Comment,
    Poll,
    #[serde(rename = "pollopt")]
    PollOpt,
    /// A type this client does not know yet, kept verbatim
    #[serde(untagged)]
    Other(String),
}

/// A node in the content tree: story, comment, job, poll or poll option.
///
/// Only `id` is guaranteed; everything else depends on the item type and on
/// whether the item was deleted. Keys this client does not model, and known
/// keys whose value has an unexpected shape, are kept in `extra` and written
/// back unchanged, so an item always round-trips to the upstream JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: ItemId,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ItemType>,

    /// Author username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by: Option<String>,

    /// Creation time, Unix seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,

    /// Comment, story or poll text (HTML)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Child comment IDs, in ranked display order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kids: Option<Vec<ItemId>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ItemId>,

    /// Total comment count (stories and polls)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descendants: Option<i64>,

    /// Poll option IDs (polls only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<ItemId>>,

    /// Owning poll (poll options only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll: Option<ItemId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead: Option<bool>,

    /// Everything else the upstream sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Bare item with only an ID set
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            kind: None,
            by: None,
            time: None,
            text: None,
            url: None,
            score: None,
            title: None,
            kids: None,
            parent: None,
            descendants: None,
            parts: None,
            poll: None,
            deleted: None,
            dead: None,
            extra: Map::new(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.unwrap_or(false)
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;

        // Without a usable id there is nothing to return
        let id = fields
            .remove("id")
            .ok_or_else(|| <D::Error as de::Error>::missing_field("id"))?;
        let id: ItemId = serde_json::from_value(id).map_err(<D::Error as de::Error>::custom)?;

        let mut item = Item::new(id);
        item.kind = take_field(&mut fields, "type");
        item.by = take_field(&mut fields, "by");
        item.time = take_field(&mut fields, "time");
        item.text = take_field(&mut fields, "text");
        item.url = take_field(&mut fields, "url");
        item.score = take_field(&mut fields, "score");
        item.title = take_field(&mut fields, "title");
        item.kids = take_field(&mut fields, "kids");
        item.parent = take_field(&mut fields, "parent");
        item.descendants = take_field(&mut fields, "descendants");
        item.parts = take_field(&mut fields, "parts");
        item.poll = take_field(&mut fields, "poll");
        item.deleted = take_field(&mut fields, "deleted");
        item.dead = take_field(&mut fields, "dead");
        item.extra = fields;
        Ok(item)
    }
}

/// Move `key` out of `fields` when it decodes as `T`; otherwise leave it in
/// place for `extra`.
fn take_field<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = fields.get(key)?;
    let decoded = T::deserialize(value).ok()?;
    fields.remove(key);
    Some(decoded)
}

/// Story lists published by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoryCategory {
    Top,
    New,
    Best,
    Ask,
    Show,
    Job,
}

impl StoryCategory {
    /// All categories, in tool listing order
    pub const ALL: [StoryCategory; 6] = [
        StoryCategory::Top,
        StoryCategory::New,
        StoryCategory::Best,
        StoryCategory::Ask,
        StoryCategory::Show,
        StoryCategory::Job,
    ];

    /// Endpoint name under the API base URL, without `.json`
    pub fn endpoint(&self) -> &'static str {
        match self {
            StoryCategory::Top => "topstories",
            StoryCategory::New => "newstories",
            StoryCategory::Best => "beststories",
            StoryCategory::Ask => "askstories",
            StoryCategory::Show => "showstories",
            StoryCategory::Job => "jobstories",
        }
    }

    /// Largest `limit` accepted for this list.
    ///
    /// The API publishes up to 500 top/new/best stories and up to 200 of the
    /// narrower categories.
    pub fn max_limit(&self) -> usize {
        match self {
            StoryCategory::Top | StoryCategory::New | StoryCategory::Best => 500,
            StoryCategory::Ask | StoryCategory::Show | StoryCategory::Job => 200,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryCategory::Top => "top",
            StoryCategory::New => "new",
            StoryCategory::Best => "best",
            StoryCategory::Ask => "ask",
            StoryCategory::Show => "show",
            StoryCategory::Job => "job",
        }
    }
}

impl fmt::Display for StoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        StoryCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized || c.endpoint() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown story category '{}' (expected one of: top, new, best, ask, show, job)",
                    s
                )
            })
    }
}

//! Posts resource types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Page size used when a query does not set one.
pub const DEFAULT_LIMIT: u32 = 10;

/// A post as returned by the remote resource.
///
/// Numeric ids are accepted and kept in their decimal form. Fields other
/// than `id`, `title` and `body` are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    /// Creates a post with the given id and no other content.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            body: String::new(),
            extra: Map::new(),
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(id) => id,
        Id::Number(id) => id.to_string(),
    })
}

/// One page of posts together with the size of the whole filtered set.
///
/// `items.len()` never exceeds the limit the page was requested with, and
/// `total_count` counts every matching post, not just this page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPage {
    /// The posts on this page, in server order.
    pub items: Vec<Post>,
    /// Number of posts matching the filter across all pages.
    pub total_count: u64,
}

/// Filter and paging inputs for listing posts.
///
/// ```
/// use postbind::PostQuery;
///
/// let query = PostQuery::new().filter("rust").limit(5);
/// assert_eq!(query.q.as_deref(), Some("rust"));
/// assert_eq!(query.offset, 0);
/// assert_eq!(query.limit, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    /// Optional filter string.
    pub q: Option<String>,
    /// Number of matching posts to skip.
    pub offset: u64,
    /// Maximum number of posts to return; must be positive.
    pub limit: u32,
}

impl PostQuery {
    /// The first page of ten, unfiltered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to posts matching `q`.
    pub fn filter(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    /// Skips the first `offset` matching posts.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            q: None,
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

// The abstract interfaces the viewer is built on.
// A post source fetches posts from a forum, a key-value store keeps small values on the local device.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use std::sync::Arc;

use crate::error::Result;

// MARK: Traits

/// A post source is any forum that groups posts into named communities, like Reddit and its subreddits.
/// Both operations are plain reads: no retries, no caching.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Short name of the forum, used in logs.
    fn name(&self) -> &str;

    /// Fetch the current hot posts of a community, at most `limit` of them.
    async fn fetch_hot(&self, community: &str, limit: u32) -> Result<Vec<Post>>;

    /// Fetch a single post by its ID.
    /// Fails with `Error::NotFound` when the forum returns no post for the ID.
    async fn fetch_by_id(&self, id: &str) -> Result<Post>;
}

#[async_trait]
impl<T: PostSource + ?Sized> PostSource for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_hot(&self, community: &str, limit: u32) -> Result<Vec<Post>> {
        (**self).fetch_hot(community, limit).await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Post> {
        (**self).fetch_by_id(id).await
    }
}

/// A key-value store scoped to the local device.
/// Values are text, one value per key, and `set` overwrites.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

// MARK: Entities

/// A post as shown to the user. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique within a community.
    pub id: String,
    pub title: String,
    pub author: String,
    /// External link of the post.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Always a web URL when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Post {
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Post {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            url: None,
            thumbnail: None,
        }
    }
}

impl std::fmt::Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Post {} by {}", self.id, self.author)
    }
}

use async_trait::async_trait;

use keeper_core::{Error, Post, PostSource, Result};
use reddit_client::RedditClient;

use crate::util;

/// Reddit as a post source. Communities are subreddits.
#[derive(Debug, Clone)]
pub struct RedditSource {
    client: RedditClient,
}

impl RedditSource {
    pub fn new(client: RedditClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PostSource for RedditSource {
    fn name(&self) -> &str {
        "reddit"
    }

    async fn fetch_hot(&self, community: &str, limit: u32) -> Result<Vec<Post>> {
        let listing = self
            .client
            .hot(community, limit)
            .await
            .map_err(|e| util::fetch_error("posts", e))?;

        let posts: Vec<Post> = listing.data.children.iter().map(|thing| util::post(&thing.data)).collect();
        tracing::info!("Fetched {} hot posts of r/{}", posts.len(), community);
        Ok(posts)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Post> {
        let listing = self
            .client
            .by_id(id)
            .await
            .map_err(|e| util::fetch_error(format!("post {}", id), e))?;

        // The listing is expected to hold exactly one child, extra ones are ignored.
        let post = listing
            .data
            .children
            .first()
            .map(|thing| util::post(&thing.data))
            .ok_or(Error::NotFound(id.to_string()))?;
        tracing::debug!("Fetched {}", post);
        Ok(post)
    }
}

mod error;
mod result;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use std::path::PathBuf;
use std::time::Duration;

use keeper_util::build_params;

pub use crate::error::Error;
use crate::error::Result;
pub use crate::result::*;

pub const BASE_URL: &str = "https://www.reddit.com";
pub const DEFAULT_USER_AGENT: &str = concat!("keeper/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;

/// Read-only client for the public JSON listings of the forum.
#[derive(Debug, Clone)]
pub struct RedditClient {
    client: Client,
    base_url: Url,
    log_dir: Option<PathBuf>,
}

impl RedditClient {
    /// Raw responses are dumped to `CLIENT_LOG_DIR` when the variable is set.
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<RedditClient> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }
        let client = Client::builder().user_agent(user_agent).timeout(timeout).build()?;
        let log_dir = std::env::var("CLIENT_LOG_DIR").ok().map(PathBuf::from);

        Ok(RedditClient {
            client,
            base_url,
            log_dir,
        })
    }

    pub fn with_log_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.log_dir = dir;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /r/{community}/hot.json?limit={limit}`
    pub async fn hot(&self, community: &str, limit: u32) -> Result<Listing> {
        let params = build_params! { required limit };
        self.get(&["r", community, "hot.json"], params, &format!("hot_{}", community))
            .await
    }

    /// `GET /by_id/t3_{id}.json`, a listing holding the single post when it exists.
    pub async fn by_id(&self, id: &str) -> Result<Listing> {
        let fullname = format!("t3_{}.json", id);
        self.get(&["by_id", &fullname], Vec::new(), &format!("by_id_{}", id))
            .await
    }
}

impl RedditClient {
    async fn get<T>(&self, segments: &[&str], query: Vec<(String, String)>, name: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::StatusError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        let content = response.text().await?;

        if let Err(e) = self.log(name, &content).await {
            tracing::warn!("Cannot write response log {}: {}", name, e);
        }
        let result = serde_json::from_str::<T>(&content)?;
        Ok(result)
    }

    async fn log(&self, name: &str, content: &str) -> Result<()> {
        use tokio::{fs::File, io::AsyncWriteExt};

        if let Some(dir) = &self.log_dir {
            let name = name.replace(|c: char| !c.is_ascii_alphanumeric() && c != '_', "_");
            let time = chrono::Local::now().format("%Y%m%d_%H%M%S");
            let filepath = dir.join(format!("reddit_{}_{}.json", name, time));
            let mut file = File::create(filepath).await?;
            file.write_all(content.as_bytes()).await?;
        }
        Ok(())
    }
}

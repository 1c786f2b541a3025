use anyhow::{anyhow, Context};

use std::{env, net::SocketAddr, str::FromStr, time::Duration};

use keeper_view::DEFAULT_PAGE_SIZE;
use reddit_client::{BASE_URL, DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT};

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";

/// Stores the bookmarks in memory only, for throwaway sessions.
pub const MEMORY_DATABASE_URL: &str = ":memory:";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub server_address: SocketAddr,
    pub reddit_base_url: String,
    pub reddit_user_agent: String,
    /// Number of hot posts fetched per search.
    pub hot_limit: u32,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;
        let server_address = parse_or(&lookup, "SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS.parse()?)?;
        let reddit_base_url = lookup("REDDIT_BASE_URL").unwrap_or_else(|| BASE_URL.to_string());
        let reddit_user_agent = lookup("REDDIT_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let hot_limit = parse_or(&lookup, "HOT_LIMIT", DEFAULT_PAGE_SIZE)?;
        if hot_limit == 0 {
            return Err(anyhow!("HOT_LIMIT must be positive"));
        }
        let timeout_ms = parse_or(&lookup, "REQUEST_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;

        Ok(Config {
            database_url,
            server_address,
            reddit_base_url,
            reddit_user_agent,
            hot_limit,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, value)),
        None => Ok(default),
    }
}

use serde::Deserialize;

/// Search form of the page.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub subreddit: String,
}

/// Request for changing the search term.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub term: String,
}

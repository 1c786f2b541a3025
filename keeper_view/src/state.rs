use serde::Serialize;

use keeper_core::Post;

/// Everything the page shows. Owned by the controller, never handed out mutably.
#[derive(Debug, Clone, Default)]
pub(crate) struct ViewState {
    pub search_term: String,
    pub posts: Vec<Post>,
    pub loading: bool,
    pub error: Option<String>,
    /// Bumped on every search term change, results of older generations are dropped.
    pub search_generation: u64,

    pub bookmark_ids: Vec<String>,
    /// Derived from `bookmark_ids` by fetching every post, never persisted.
    pub bookmarks: Vec<Post>,
    pub loading_bookmarks: bool,
    /// Bumped on every bookmark list change.
    pub bookmark_generation: u64,
}

/// Read-only copy of the view state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub search_term: String,
    pub posts: Vec<Post>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub bookmark_ids: Vec<String>,
    pub bookmarks: Vec<Post>,
    pub loading_bookmarks: bool,
}

impl ViewSnapshot {
    pub fn is_bookmarked(&self, post_id: &str) -> bool {
        self.bookmark_ids.iter().any(|id| id == post_id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading || self.loading_bookmarks
    }
}

impl From<&ViewState> for ViewSnapshot {
    fn from(state: &ViewState) -> Self {
        ViewSnapshot {
            search_term: state.search_term.clone(),
            posts: state.posts.clone(),
            loading: state.loading,
            error: state.error.clone(),
            bookmark_ids: state.bookmark_ids.clone(),
            bookmarks: state.bookmarks.clone(),
            loading_bookmarks: state.loading_bookmarks,
        }
    }
}

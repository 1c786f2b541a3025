use tokio::{
    sync::{oneshot, RwLock},
    task::{self, JoinHandle},
};

use std::sync::Arc;

use keeper_core::{Post, PostSource, Result};
use keeper_store::BookmarkStore;

use crate::{
    persist::{listen_bookmark_persist, PersistJob, PersistQueue},
    state::{ViewSnapshot, ViewState},
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Owns the view state and reacts to user actions.
///
/// Two triggers drive all remote work:
/// a search term change fetches the hot posts of that community,
/// a bookmark list change persists the list and fetches every bookmarked post.
/// Each trigger has its own generation counter, so a response that arrives after a newer change is dropped.
pub struct ViewController<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    source: S,
    store: BookmarkStore,
    persist_queue: PersistQueue,
    page_size: u32,
    state: RwLock<ViewState>,
}

/// Work left to do after a bookmark list change is committed.
struct BookmarkRefresh {
    ids: Vec<String>,
    generation: u64,
}

impl<S> Clone for ViewController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: PostSource + 'static> ViewController<S> {
    /// Spawns the persistence worker, so it must run inside a tokio runtime.
    pub fn new(source: S, store: BookmarkStore, page_size: u32) -> Self {
        let persist_queue = listen_bookmark_persist(store.clone());
        Self {
            inner: Arc::new(Inner {
                source,
                store,
                persist_queue,
                page_size,
                state: RwLock::new(ViewState::default()),
            }),
        }
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let state = self.inner.state.read().await;
        ViewSnapshot::from(&*state)
    }

    /// Load the stored bookmarks, then resolve them in the background.
    /// Returns once the list is in the view state, with `loading_bookmarks` set while details are fetched.
    /// Duplicated IDs in the stored list are collapsed, keeping the first occurrence.
    pub async fn init(&self) -> JoinHandle<()> {
        let store = self.inner.store.clone();
        let stored = match task::spawn_blocking(move || store.load()).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("Bookmark load job aborted: {}", e);
                Vec::new()
            }
        };

        let mut ids: Vec<String> = Vec::with_capacity(stored.len());
        for id in stored {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        tracing::info!("Loaded {} bookmarks", ids.len());

        let refresh = {
            let mut state = self.inner.state.write().await;
            state.bookmark_ids = ids;
            self.commit_bookmarks(&mut state)
        };
        let controller = self.clone();
        task::spawn(async move { controller.resolve_bookmarks(refresh).await })
    }

    /// Change the search term, and fetch the hot posts of the new community.
    /// The term is trimmed. An unchanged term does nothing, an empty term clears the results without fetching.
    pub async fn set_search_term(&self, term: &str) {
        let term = term.trim();
        let generation = {
            let mut state = self.inner.state.write().await;
            if state.search_term == term {
                tracing::debug!("Search term unchanged: {:?}", term);
                return;
            }
            state.search_term = term.to_string();
            state.search_generation += 1;
            if term.is_empty() {
                state.posts.clear();
                state.error = None;
                state.loading = false;
                return;
            }
            state.loading = true;
            state.error = None;
            state.search_generation
        };

        tracing::info!("Searching r/{} on {}", term, self.inner.source.name());
        let result = self.inner.source.fetch_hot(term, self.inner.page_size).await;

        let mut state = self.inner.state.write().await;
        if state.search_generation != generation {
            tracing::debug!("Dropping stale results for r/{}", term);
            return;
        }
        match result {
            Ok(posts) => {
                tracing::info!("Fetched {} posts of r/{}", posts.len(), term);
                state.posts = posts;
                state.error = None;
            }
            Err(e) => {
                tracing::warn!("Fetching r/{} failed: {}", term, e);
                state.posts.clear();
                state.error = Some(e.to_string());
            }
        }
        state.loading = false;
    }

    /// Bookmark a post. Returns false when the ID is empty or already bookmarked, in which case nothing happens.
    pub async fn add_bookmark(&self, post_id: &str) -> bool {
        let post_id = post_id.trim();
        if post_id.is_empty() {
            return false;
        }
        let refresh = {
            let mut state = self.inner.state.write().await;
            if state.bookmark_ids.iter().any(|id| id == post_id) {
                tracing::debug!("Post {} is already bookmarked", post_id);
                return false;
            }
            state.bookmark_ids.push(post_id.to_string());
            self.commit_bookmarks(&mut state)
        };
        tracing::info!("Bookmarked post {}", post_id);
        self.resolve_bookmarks(refresh).await;
        true
    }

    /// Remove a bookmark. Returns false when the ID was not bookmarked, in which case nothing happens.
    pub async fn remove_bookmark(&self, post_id: &str) -> bool {
        let post_id = post_id.trim();
        let refresh = {
            let mut state = self.inner.state.write().await;
            let before = state.bookmark_ids.len();
            state.bookmark_ids.retain(|id| id != post_id);
            if state.bookmark_ids.len() == before {
                tracing::debug!("Post {} is not bookmarked", post_id);
                return false;
            }
            self.commit_bookmarks(&mut state)
        };
        tracing::info!("Removed bookmark {}", post_id);
        self.resolve_bookmarks(refresh).await;
        true
    }

    /// Fetch a single post without touching the view state.
    pub async fn fetch_post(&self, post_id: &str) -> Result<Post> {
        self.inner.source.fetch_by_id(post_id.trim()).await
    }

    /// Wait until every bookmark list committed so far has been written to the store.
    pub async fn flush(&self) {
        let (done_sender, done_receiver) = oneshot::channel();
        if self.inner.persist_queue.send(PersistJob::Flush(done_sender)).is_err() {
            tracing::error!("Bookmark persistence worker is gone");
            return;
        }
        let _ = done_receiver.await;
    }

    /// Called with the state lock held, right after the bookmark list changed.
    fn commit_bookmarks(&self, state: &mut ViewState) -> Option<BookmarkRefresh> {
        let job = PersistJob::Save(state.bookmark_ids.clone());
        if self.inner.persist_queue.send(job).is_err() {
            tracing::error!("Bookmark persistence worker is gone, list not saved");
        }

        state.bookmark_generation += 1;
        if state.bookmark_ids.is_empty() {
            state.bookmarks.clear();
            state.loading_bookmarks = false;
            return None;
        }
        state.loading_bookmarks = true;
        Some(BookmarkRefresh {
            ids: state.bookmark_ids.clone(),
            generation: state.bookmark_generation,
        })
    }

    /// Fetch the bookmarked posts one by one, in list order.
    /// A post that fails to fetch is left out, the rest are still shown.
    async fn resolve_bookmarks(&self, refresh: Option<BookmarkRefresh>) {
        let Some(BookmarkRefresh { ids, generation }) = refresh else {
            return;
        };

        let mut posts = Vec::with_capacity(ids.len());
        for id in &ids {
            if self.inner.state.read().await.bookmark_generation != generation {
                tracing::debug!("Bookmark list changed, stop resolving");
                return;
            }
            match self.inner.source.fetch_by_id(id).await {
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Skipping bookmark {}: {}", id, e),
            }
        }

        let mut state = self.inner.state.write().await;
        if state.bookmark_generation != generation {
            tracing::debug!("Dropping stale bookmark details");
            return;
        }
        tracing::info!("Resolved {} of {} bookmarks", posts.len(), ids.len());
        state.bookmarks = posts;
        state.loading_bookmarks = false;
    }
}

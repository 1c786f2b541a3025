use async_trait::async_trait;
use tokio::sync::Notify;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use keeper_core::{Error, KeyValueStore, Post, PostSource, Result};
use keeper_store::{BookmarkStore, MemoryStore, BOOKMARKS_KEY};

use crate::{ViewController, DEFAULT_PAGE_SIZE};

// MARK: Mock source

enum HotResponse {
    Posts(Vec<Post>),
    Status(u16, &'static str),
    Malformed,
}

#[derive(Default)]
struct MockSource {
    hot: Mutex<HashMap<String, HotResponse>>,
    posts: Mutex<HashMap<String, Post>>,
    hot_calls: Mutex<Vec<(String, u32)>>,
    by_id_calls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl MockSource {
    fn with_hot(self, community: &str, response: HotResponse) -> Self {
        self.hot.lock().unwrap().insert(community.to_string(), response);
        self
    }

    fn with_post(self, post: Post) -> Self {
        self.posts.lock().unwrap().insert(post.id.clone(), post);
        self
    }

    /// Requests for `key` block until the returned gate is opened.
    fn gate(&self, key: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(key.to_string(), notify.clone());
        notify
    }

    fn hot_calls(&self) -> Vec<String> {
        self.hot_calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    fn by_id_calls(&self) -> Vec<String> {
        self.by_id_calls.lock().unwrap().clone()
    }

    async fn wait_gate(&self, key: &str) {
        let gate = self.gates.lock().unwrap().get(key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl PostSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_hot(&self, community: &str, limit: u32) -> Result<Vec<Post>> {
        self.hot_calls.lock().unwrap().push((community.to_string(), limit));
        self.wait_gate(community).await;
        match self.hot.lock().unwrap().get(community) {
            Some(HotResponse::Posts(posts)) => Ok(posts.clone()),
            Some(HotResponse::Status(status, reason)) => Err(Error::RequestError {
                context: "posts".to_string(),
                status: *status,
                reason: reason.to_string(),
            }),
            Some(HotResponse::Malformed) => Err(Error::ParseError("expected value at line 1 column 1".to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Post> {
        self.by_id_calls.lock().unwrap().push(id.to_string());
        self.wait_gate(id).await;
        self.posts
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}

// MARK: Helpers

fn post(id: &str) -> Post {
    Post::new(id, format!("Title {id}"), format!("author_{id}"))
}

fn setup(source: MockSource) -> (ViewController<Arc<MockSource>>, Arc<MockSource>, Arc<MemoryStore>) {
    let source = Arc::new(source);
    let kv = Arc::new(MemoryStore::new());
    let controller = ViewController::new(source.clone(), BookmarkStore::new(kv.clone()), DEFAULT_PAGE_SIZE);
    (controller, source, kv)
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn stored(kv: &MemoryStore) -> Option<Vec<String>> {
    kv.get(BOOKMARKS_KEY)
        .unwrap()
        .map(|value| serde_json::from_str(&value).unwrap())
}

async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

// MARK: Search

#[tokio::test]
async fn test_initial_state_is_empty() {
    let (controller, source, _) = setup(MockSource::default());
    let snapshot = controller.snapshot().await;

    assert_eq!(snapshot.search_term, "");
    assert!(snapshot.posts.is_empty());
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error, None);
    assert!(snapshot.bookmark_ids.is_empty());
    assert!(source.hot_calls().is_empty());
}

#[tokio::test]
async fn test_search_fetches_hot_posts() {
    let source = MockSource::default().with_hot("cats", HotResponse::Posts(vec![post("a"), post("b")]));
    let (controller, source, _) = setup(source);

    controller.set_search_term("cats").await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.search_term, "cats");
    assert_eq!(snapshot.posts, vec![post("a"), post("b")]);
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error, None);
    assert_eq!(
        source.hot_calls.lock().unwrap().clone(),
        vec![("cats".to_string(), DEFAULT_PAGE_SIZE)]
    );
}

#[tokio::test]
async fn test_empty_term_makes_no_request() {
    let (controller, source, _) = setup(MockSource::default());

    controller.set_search_term("").await;
    controller.set_search_term("   ").await;

    assert!(source.hot_calls().is_empty());
    assert!(!controller.snapshot().await.loading);
}

#[tokio::test]
async fn test_one_request_per_term_change() {
    let (controller, source, _) = setup(MockSource::default());

    controller.set_search_term("rust").await;
    controller.set_search_term("rust").await;
    controller.set_search_term(" rust ").await;
    controller.set_search_term("golang").await;
    controller.set_search_term("rust").await;

    assert_eq!(source.hot_calls(), ids(&["rust", "golang", "rust"]));
}

#[tokio::test]
async fn test_clearing_term_clears_results() {
    let source = MockSource::default()
        .with_hot("cats", HotResponse::Posts(vec![post("a")]))
        .with_hot("bad", HotResponse::Status(404, "Not Found"));
    let (controller, _, _) = setup(source);

    controller.set_search_term("cats").await;
    controller.set_search_term("").await;
    let snapshot = controller.snapshot().await;
    assert!(snapshot.posts.is_empty());
    assert_eq!(snapshot.search_term, "");

    controller.set_search_term("bad").await;
    assert!(controller.snapshot().await.error.is_some());
    controller.set_search_term("").await;
    assert_eq!(controller.snapshot().await.error, None);
}

#[tokio::test]
async fn test_loading_only_while_request_outstanding() {
    let source = MockSource::default().with_hot("slow", HotResponse::Posts(vec![post("a")]));
    let (controller, source, _) = setup(source);
    let gate = source.gate("slow");

    let search = tokio::spawn({
        let controller = controller.clone();
        async move { controller.set_search_term("slow").await }
    });
    wait_until(|| source.hot_calls().len() == 1).await;

    let snapshot = controller.snapshot().await;
    assert!(snapshot.loading);
    assert!(snapshot.is_loading());

    gate.notify_one();
    search.await.unwrap();

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.loading);
    assert_eq!(snapshot.posts, vec![post("a")]);
}

#[tokio::test]
async fn test_status_error_message() {
    let source = MockSource::default().with_hot("private", HotResponse::Status(403, "Forbidden"));
    let (controller, _, _) = setup(source);

    controller.set_search_term("private").await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.error.as_deref(), Some("Error fetching posts: 403 Forbidden"));
    assert!(snapshot.posts.is_empty());
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_malformed_response_sets_error() {
    let source = MockSource::default()
        .with_hot("cats", HotResponse::Posts(vec![post("a")]))
        .with_hot("broken", HotResponse::Malformed);
    let (controller, _, _) = setup(source);

    controller.set_search_term("cats").await;
    controller.set_search_term("broken").await;

    let snapshot = controller.snapshot().await;
    let error = snapshot.error.unwrap();
    assert!(error.contains("expected value"), "{error}");
    assert!(snapshot.posts.is_empty());
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_error_cleared_by_next_search() {
    let source = MockSource::default()
        .with_hot("bad", HotResponse::Status(500, "Internal Server Error"))
        .with_hot("cats", HotResponse::Posts(vec![post("a")]));
    let (controller, _, _) = setup(source);

    controller.set_search_term("bad").await;
    assert!(controller.snapshot().await.error.is_some());

    controller.set_search_term("cats").await;
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.error, None);
    assert_eq!(snapshot.posts, vec![post("a")]);
}

#[tokio::test]
async fn test_stale_search_results_are_dropped() {
    let source = MockSource::default()
        .with_hot("slow", HotResponse::Posts(vec![post("old")]))
        .with_hot("fast", HotResponse::Posts(vec![post("new")]));
    let (controller, source, _) = setup(source);
    let gate = source.gate("slow");

    let slow = tokio::spawn({
        let controller = controller.clone();
        async move { controller.set_search_term("slow").await }
    });
    wait_until(|| source.hot_calls().len() == 1).await;

    controller.set_search_term("fast").await;
    gate.notify_one();
    slow.await.unwrap();

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.search_term, "fast");
    assert_eq!(snapshot.posts, vec![post("new")]);
    assert!(!snapshot.loading);
}

// MARK: Bookmarks

#[tokio::test]
async fn test_add_bookmark_persists_and_resolves() {
    let source = MockSource::default().with_post(post("1"));
    let (controller, source, kv) = setup(source);

    assert!(controller.add_bookmark("1").await);
    controller.flush().await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.bookmark_ids, ids(&["1"]));
    assert_eq!(snapshot.bookmarks, vec![post("1")]);
    assert!(!snapshot.loading_bookmarks);
    assert!(snapshot.is_bookmarked("1"));
    assert_eq!(source.by_id_calls(), ids(&["1"]));
    assert_eq!(stored(&kv), Some(ids(&["1"])));
}

#[tokio::test]
async fn test_duplicate_bookmark_is_ignored() {
    let source = MockSource::default().with_post(post("1"));
    let (controller, source, kv) = setup(source);

    assert!(controller.add_bookmark("1").await);
    assert!(!controller.add_bookmark("1").await);
    assert!(!controller.add_bookmark("").await);
    controller.flush().await;

    assert_eq!(controller.snapshot().await.bookmark_ids, ids(&["1"]));
    assert_eq!(source.by_id_calls(), ids(&["1"]));
    assert_eq!(stored(&kv), Some(ids(&["1"])));
}

#[tokio::test]
async fn test_remove_bookmark() {
    let source = MockSource::default().with_post(post("1")).with_post(post("2"));
    let (controller, _, kv) = setup(source);

    controller.add_bookmark("1").await;
    controller.add_bookmark("2").await;
    assert!(controller.remove_bookmark("1").await);
    controller.flush().await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.bookmark_ids, ids(&["2"]));
    assert_eq!(snapshot.bookmarks, vec![post("2")]);
    assert!(!snapshot.is_bookmarked("1"));
    assert_eq!(stored(&kv), Some(ids(&["2"])));
}

#[tokio::test]
async fn test_remove_absent_bookmark_does_nothing() {
    let source = MockSource::default().with_post(post("1"));
    let (controller, source, kv) = setup(source);

    controller.add_bookmark("1").await;
    controller.flush().await;
    let before = controller.snapshot().await;
    let calls = source.by_id_calls().len();

    assert!(!controller.remove_bookmark("9").await);
    controller.flush().await;

    assert_eq!(controller.snapshot().await, before);
    assert_eq!(source.by_id_calls().len(), calls);
    assert_eq!(stored(&kv), Some(ids(&["1"])));
}

#[tokio::test]
async fn test_removing_last_bookmark_stores_empty_list() {
    let source = MockSource::default().with_post(post("1"));
    let (controller, source, kv) = setup(source);

    controller.add_bookmark("1").await;
    controller.remove_bookmark("1").await;
    controller.flush().await;

    let snapshot = controller.snapshot().await;
    assert!(snapshot.bookmark_ids.is_empty());
    assert!(snapshot.bookmarks.is_empty());
    assert!(!snapshot.loading_bookmarks);
    assert_eq!(source.by_id_calls(), ids(&["1"]));
    assert_eq!(stored(&kv), Some(Vec::new()));
}

#[tokio::test]
async fn test_failed_bookmark_is_left_out() {
    let source = MockSource::default().with_post(post("A")).with_post(post("C"));
    let (controller, _, kv) = setup(source);

    controller.add_bookmark("A").await;
    controller.add_bookmark("B").await;
    controller.add_bookmark("C").await;
    controller.flush().await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.bookmark_ids, ids(&["A", "B", "C"]));
    assert_eq!(snapshot.bookmarks, vec![post("A"), post("C")]);
    assert!(!snapshot.loading_bookmarks);
    assert_eq!(stored(&kv), Some(ids(&["A", "B", "C"])));
}

#[tokio::test]
async fn test_bookmarks_resolve_in_list_order() {
    let source = MockSource::default()
        .with_post(post("3"))
        .with_post(post("1"))
        .with_post(post("2"));
    let (controller, source, _) = setup(source);

    for id in ["3", "1", "2"] {
        controller.add_bookmark(id).await;
    }

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.bookmarks, vec![post("3"), post("1"), post("2")]);
    assert_eq!(&source.by_id_calls()[3..], &ids(&["3", "1", "2"])[..]);
}

#[tokio::test]
async fn test_stale_bookmark_details_are_dropped() {
    let source = MockSource::default().with_post(post("1")).with_post(post("2"));
    let (controller, source, kv) = setup(source);
    let gate = source.gate("1");

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.add_bookmark("1").await }
    });
    wait_until(|| source.by_id_calls().len() == 1).await;
    assert!(controller.snapshot().await.loading_bookmarks);

    // Second change while the first resolution is still waiting on post 1.
    source.gates.lock().unwrap().remove("1");
    let second = tokio::spawn({
        let controller = controller.clone();
        async move { controller.add_bookmark("2").await }
    });
    second.await.unwrap();
    gate.notify_one();
    assert!(first.await.unwrap());
    controller.flush().await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.bookmark_ids, ids(&["1", "2"]));
    assert_eq!(snapshot.bookmarks, vec![post("1"), post("2")]);
    assert!(!snapshot.loading_bookmarks);
    assert_eq!(stored(&kv), Some(ids(&["1", "2"])));
}

#[tokio::test]
async fn test_store_matches_final_list_after_many_changes() {
    let source = MockSource::default().with_post(post("1")).with_post(post("2"));
    let (controller, _, kv) = setup(source);

    let mut tasks = Vec::new();
    for id in ["1", "2", "3", "4"] {
        let controller = controller.clone();
        tasks.push(tokio::spawn(async move { controller.add_bookmark(id).await }));
    }
    for task in tasks {
        task.await.unwrap();
    }
    controller.remove_bookmark("3").await;
    controller.flush().await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.bookmark_ids.len(), 3);
    assert_eq!(stored(&kv), Some(snapshot.bookmark_ids.clone()));
}

#[tokio::test]
async fn test_fetch_post_leaves_state_alone() {
    let source = MockSource::default().with_post(post("1"));
    let (controller, _, _) = setup(source);
    let before = controller.snapshot().await;

    assert_eq!(controller.fetch_post("1").await.unwrap(), post("1"));
    let err = controller.fetch_post("2").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(ref id) if id == "2"), "{err}");
    assert_eq!(controller.snapshot().await, before);
}

// MARK: Init

#[tokio::test]
async fn test_init_loads_stored_bookmarks() {
    let source = MockSource::default().with_post(post("1")).with_post(post("2"));
    let (controller, source, kv) = setup(source);
    kv.set(BOOKMARKS_KEY, r#"["2","1","2"]"#).unwrap();

    controller.init().await.await.unwrap();
    controller.flush().await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.bookmark_ids, ids(&["2", "1"]));
    assert_eq!(snapshot.bookmarks, vec![post("2"), post("1")]);
    assert!(!snapshot.loading_bookmarks);
    assert_eq!(source.by_id_calls(), ids(&["2", "1"]));
    assert_eq!(stored(&kv), Some(ids(&["2", "1"])));
}

#[tokio::test]
async fn test_init_with_empty_store() {
    let (controller, source, kv) = setup(MockSource::default());

    controller.init().await.await.unwrap();
    controller.flush().await;

    let snapshot = controller.snapshot().await;
    assert!(snapshot.bookmark_ids.is_empty());
    assert!(!snapshot.loading_bookmarks);
    assert!(source.by_id_calls().is_empty());
    assert_eq!(stored(&kv), Some(Vec::new()));
}

#[tokio::test]
async fn test_init_with_malformed_store() {
    let (controller, source, kv) = setup(MockSource::default());
    kv.set(BOOKMARKS_KEY, "{not json").unwrap();

    controller.init().await.await.unwrap();

    assert!(controller.snapshot().await.bookmark_ids.is_empty());
    assert!(source.by_id_calls().is_empty());
}

#[tokio::test]
async fn test_init_returns_before_bookmarks_resolve() {
    let source = MockSource::default().with_post(post("1"));
    let (controller, source, kv) = setup(source);
    kv.set(BOOKMARKS_KEY, r#"["1"]"#).unwrap();
    let gate = source.gate("1");

    let resolving = tokio::time::timeout(Duration::from_millis(500), controller.init())
        .await
        .expect("init waited for bookmark details");

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.bookmark_ids, ids(&["1"]));
    assert!(snapshot.loading_bookmarks);
    assert!(snapshot.bookmarks.is_empty());

    wait_until(|| source.by_id_calls().len() == 1).await;
    gate.notify_one();
    resolving.await.unwrap();

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.loading_bookmarks);
    assert_eq!(snapshot.bookmarks, vec![post("1")]);
}

// MARK: Scenarios

#[tokio::test]
async fn test_search_then_bookmark() {
    let cat = Post {
        url: Some("https://i.redd.it/cat.jpg".to_string()),
        thumbnail: Some("https://b.thumbs.redditmedia.com/cat.jpg".to_string()),
        ..Post::new("abc", "A cat", "whiskers")
    };
    let source = MockSource::default()
        .with_hot("cats", HotResponse::Posts(vec![cat.clone(), post("def")]))
        .with_post(cat.clone());
    let (controller, source, kv) = setup(source);

    controller.set_search_term("cats").await;
    assert!(controller.add_bookmark("abc").await);
    controller.flush().await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.posts.len(), 2);
    assert!(snapshot.is_bookmarked("abc"));
    assert!(!snapshot.is_bookmarked("def"));
    assert_eq!(snapshot.bookmarks, vec![cat]);
    assert_eq!(source.hot_calls(), ids(&["cats"]));
    assert_eq!(stored(&kv), Some(ids(&["abc"])));
}

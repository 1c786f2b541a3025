use axum::{
    extract::{Form, Path, State},
    response::{Html, Redirect},
    routing::{get, post},
    Router,
};
use tokio::time::{timeout, Duration};

use std::future::Future;

use crate::{payload::SearchForm, render, state::AppState};

/// How long an action may run before the page is shown in its loading state instead.
const ACTION_WAIT: Duration = Duration::from_millis(300);

pub fn page_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/search", post(search))
        .route("/bookmarks/:id/add", post(add_bookmark))
        .route("/bookmarks/:id/remove", post(remove_bookmark))
}

async fn index(State(app_state): State<AppState>) -> Html<String> {
    let snapshot = app_state.controller.snapshot().await;
    Html(render::page(&snapshot).into_string())
}

async fn search(State(app_state): State<AppState>, Form(form): Form<SearchForm>) -> Redirect {
    let controller = app_state.controller;
    run_action(async move { controller.set_search_term(&form.subreddit).await }).await;
    Redirect::to("/")
}

async fn add_bookmark(State(app_state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let controller = app_state.controller;
    run_action(async move {
        controller.add_bookmark(&id).await;
    })
    .await;
    Redirect::to("/")
}

async fn remove_bookmark(State(app_state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let controller = app_state.controller;
    run_action(async move {
        controller.remove_bookmark(&id).await;
    })
    .await;
    Redirect::to("/")
}

/// The action keeps running after the redirect when it takes longer than `ACTION_WAIT`,
/// the page then refreshes until it is done.
async fn run_action<F>(action: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::spawn(action);
    match timeout(ACTION_WAIT, handle).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Action task failed: {}", e),
        Err(_) => tracing::debug!("Action still running, redirecting"),
    }
}

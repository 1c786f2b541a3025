use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};

use keeper_core::Post;
use keeper_view::ViewSnapshot;

use crate::{error::Result, payload::SearchRequest, state::AppState};

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/search", post(search))
        .route("/api/bookmarks/:id", post(add_bookmark))
        .route("/api/bookmarks/:id", delete(remove_bookmark))
        .route("/api/posts/:id", get(get_post))
}

async fn get_state(State(app_state): State<AppState>) -> Json<ViewSnapshot> {
    Json(app_state.controller.snapshot().await)
}

async fn search(State(app_state): State<AppState>, Json(request): Json<SearchRequest>) -> Json<ViewSnapshot> {
    let controller = &app_state.controller;
    controller.set_search_term(&request.term).await;
    Json(controller.snapshot().await)
}

async fn add_bookmark(State(app_state): State<AppState>, Path(id): Path<String>) -> Json<ViewSnapshot> {
    let controller = &app_state.controller;
    controller.add_bookmark(&id).await;
    Json(controller.snapshot().await)
}

async fn remove_bookmark(State(app_state): State<AppState>, Path(id): Path<String>) -> Json<ViewSnapshot> {
    let controller = &app_state.controller;
    controller.remove_bookmark(&id).await;
    Json(controller.snapshot().await)
}

/// Look up a single post, without touching the page.
async fn get_post(State(app_state): State<AppState>, Path(id): Path<String>) -> Result<Json<Post>> {
    let post = app_state.controller.fetch_post(&id).await?;
    Ok(Json(post))
}

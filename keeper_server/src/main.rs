mod config;
mod error;
mod payload;
mod render;
mod router;
mod state;


use anyhow::Context;
use axum::Router;
use dotenvy::dotenv;
use tower_http::trace::TraceLayer;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use std::sync::Arc;

use keeper_core::{KeyValueStore, PostSource};
use keeper_reddit::RedditSource;
use keeper_store::{BookmarkStore, MemoryStore, SqliteStore};
use keeper_view::ViewController;
use reddit_client::RedditClient;

use crate::{
    config::{Config, MEMORY_DATABASE_URL},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // 1. Initialize logger
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env()?
        .add_directive("hyper::proto=info".parse()?)
        .add_directive("hyper::client=info".parse()?)
        .add_directive("reqwest=info".parse()?);
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    // 2. Read configuration
    let config = Config::from_env()?;

    // 3. Initialize bookmark store
    let store = open_store(&config.database_url)?;

    // 4. Initialize post source
    let client = RedditClient::new(
        &config.reddit_base_url,
        &config.reddit_user_agent,
        config.request_timeout,
    )
    .context("cannot create Reddit client")?;
    tracing::info!("Fetching posts from {}", client.base_url());
    let source: Arc<dyn PostSource> = Arc::new(RedditSource::new(client));

    // 5. Setup controller, state and router
    let controller = ViewController::new(source, store, config.hot_limit);
    // Bookmark details resolve in the background, the page shows them loading meanwhile.
    let _ = controller.init().await;

    let app_state = AppState {
        controller: controller.clone(),
    };
    let app = app(app_state);

    // 6. Start server
    tracing::info!("Server starting at {}", config.server_address);
    axum::Server::bind(&config.server_address)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    controller.flush().await;
    tracing::info!("Server stopped");
    Ok(())
}

fn app(app_state: AppState) -> Router {
    Router::new()
        .merge(router::page::page_router())
        .merge(router::api::api_router())
        .layer(TraceLayer::new_for_http().on_request(()))
        .with_state(app_state)
}

fn open_store(database_url: &str) -> anyhow::Result<BookmarkStore> {
    let kv: Arc<dyn KeyValueStore> = if database_url == MEMORY_DATABASE_URL {
        tracing::warn!("Bookmarks are kept in memory and lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(SqliteStore::open(database_url)?)
    };
    Ok(BookmarkStore::new(kv))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

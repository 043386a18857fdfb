use crate::{
    auth::AuthToken,
    config::Config,
    errors::AppError,
    feed::FeedOptions,
    feed_store::{FeedStore, RetryPolicy},
    http_api::HttpMemeApi,
};
use std::{sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shared resources for the web server.
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<FeedStore>,
}

/// Initializes tracing (logging) from `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "meme_feed=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Builds the HTTP API client and the session's feed store.
pub fn build_state(config: &Config) -> Result<Arc<AppState>, AppError> {
    tracing::info!(base_url = %config.api_base_url, timeout = ?config.request_timeout, "Startup: Building meme API client");
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| AppError::InitError(format!("Failed to build HTTP client: {}", e)))?;
    let api = HttpMemeApi::new(client, &config.api_base_url)
        .map_err(|e| AppError::InitError(format!("Invalid meme API base URL: {}", e)))?;

    let retry = RetryPolicy {
        max_retries: config.max_retries,
        initial_interval: config.retry_initial_interval,
        max_interval: Duration::from_secs(30),
    };
    let options = FeedOptions {
        dedupe_authors: config.dedupe_authors,
    };
    tracing::info!(?retry, dedupe_authors = options.dedupe_authors, "Startup: Feed store configured");

    let feed = FeedStore::new(
        Arc::new(api),
        AuthToken::new(config.api_token.clone()),
        options,
        retry,
    );

    Ok(Arc::new(AppState {
        feed: Arc::new(feed),
    }))
}

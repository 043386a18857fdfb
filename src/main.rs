use anyhow::Context;
use meme_feed::{config::Config, routes::create_router, startup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    startup::init_tracing();

    // --- Configuration ---
    let config = Config::load().context("Failed to load configuration")?;

    // --- Application State ---
    let state = startup::build_state(&config).context("Failed to build application state")?;

    // Warm the first page so the feed is ready before the first request.
    match state.feed.fetch_next_page().await {
        Ok(_) => tracing::info!("Startup: First feed page loaded"),
        Err(e) => tracing::warn!(error = %e, "Startup: Could not preload the first feed page"),
    }

    let app = create_router(state);

    // --- Server Startup ---
    tracing::info!("Server listening on http://{}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}

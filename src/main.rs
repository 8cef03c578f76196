use anyhow::Context;
use tracing_subscriber::EnvFilter;

use meal_recommender::api::{create_router, AppState};
use meal_recommender::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("meal_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_addr();

    // The corpus must be loaded and normalized before any request is served
    let state = AppState::from_config(config)
        .await
        .context("Failed to load recipe corpus")?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

use anyhow::Context;
use tracing_subscriber::fmt::time::ChronoLocal;

use recite_api::config::Config;
use recite_api::state::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env()?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    // --- 3. Wire Up Shared State ---
    let ctx = AppContext::from_config(&config);
    let app = recite_api::router(ctx, config.max_upload_bytes);

    // --- 4. Serve ---
    tracing::info!("listening on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

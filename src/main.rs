use anyhow::Context;
use tokio::net::TcpListener;

use assistbot_backend::core::config::AppConfig;
use assistbot_backend::core::logging;
use assistbot_backend::server::router::router;
use assistbot_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    logging::init(config.log_dir.as_deref());

    let state = AppState::initialize(config)?;

    let bind_addr = format!("0.0.0.0:{}", state.config.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    tracing::info!("Sukhothai Assist listening on {}", listener.local_addr()?);

    let app = router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

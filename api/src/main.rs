mod ask_request;
mod error;
mod handlers;
mod responses;
mod router;

use anyhow::{Context, Result};
use doc_qa::{QaService, Settings};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env().context("Failed to load configuration")?;
    log::info!("Loaded configuration: {:?}", settings);

    let service = Arc::new(
        QaService::from_settings(&settings).context("Failed to initialize QA service")?,
    );
    let app = router::create_router(service, &settings);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

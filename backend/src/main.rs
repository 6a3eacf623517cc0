use anyhow::Context;
use rewards_admin_backend::{cors_layer, create_router, ProxyConfig, ProxyState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ProxyConfig::from_env();
    info!(
        "Loaded image proxy configuration: {} (CORS origins: {:?})",
        config.bind_addr(),
        config.cors_origins
    );

    let app = create_router(ProxyState::http()?).layer(cors_layer(&config.cors_origins));

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    info!("Image proxy listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

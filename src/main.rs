use anyhow::{Context, Result};
use divecenter_engine::{
    build_router,
    cache::{start_cache_warmer, AppCache},
    config::Config,
    db::create_pool,
    AppState,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,divecenter_engine=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    let db = create_pool(&config)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let cache = AppCache::from_config(&config);
    tokio::spawn(start_cache_warmer(cache.clone(), db.clone()));

    let bind_addr = config.bind_addr;
    let state = AppState { db, cache };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Received shutdown signal");
}

use anyhow::Context;
use social_network::{app_state::AppState, config::Config, db, routes};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = match db::connect_to_db(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Error connecting to database: {:#}", e);
            std::process::exit(1);
        }
    };

    let state = AppState {
        db_pool: pool,
        auth: config.auth,
    };
    let app = routes::create_routes(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

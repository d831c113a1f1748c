use std::{net::SocketAddr, sync::Arc};

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use volt_server::db::run_migrations;
use volt_server::{create_app, AppState, Config, QueryExecutor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volt_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Volt Dealer Suite API server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Database: {}", config.database.target());

    // Connections are opened on first use so the server can report a
    // disconnected database through /api/health instead of refusing to start
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect_lazy_with(config.database.connect_options(config.is_production()));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let db = QueryExecutor::new(db_pool);

    // Run migrations in development; an unreachable database is reported by
    // /api/health rather than stopping the server
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        run_migrations(&db).await;
    }

    let state = AppState {
        db,
        config: Arc::new(config),
    };

    let app = create_app(state);

    tracing::info!("Listening on {}", addr);
    tracing::info!("API base URL: http://localhost:{}/api", addr.port());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

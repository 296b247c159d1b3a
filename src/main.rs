// src/main.rs

use std::{net::SocketAddr, sync::Arc, time::Duration};

use dotenvy::dotenv;
use edugames::{
    config::Config,
    error::AppError,
    play::TracingFeedback,
    routes,
    state::AppState,
    store::{LocalStore, PgStore},
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let feedback = Arc::new(TracingFeedback);

    let state = match &config.database_url {
        Some(url) => {
            let store = PgStore::new(connect_with_retry(url).await);
            tracing::info!("Running migrations...");
            if let Err(e) = store.migrate().await {
                tracing::error!("Failed to run database migrations: {}", e);
                std::process::exit(1);
            }
            tracing::info!("Migrations applied successfully.");
            AppState::new(Arc::new(store), feedback, config.clone())
        }
        None => match LocalStore::open(&config.data_dir).await {
            Ok(store) => AppState::new(Arc::new(store), feedback, config.clone()),
            Err(e) => fail_startup(e),
        },
    };

    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => fail_startup(e.into()),
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}

/// Waits for the database the way a container start-up usually needs to.
async fn connect_with_retry(url: &str) -> PgPool {
    let mut retry_count = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(url)
            .await
        {
            Ok(pool) => {
                tracing::info!("Database connected...");
                return pool;
            }
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    fail_startup(e.into());
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}

fn fail_startup(e: AppError) -> ! {
    tracing::error!("Startup failed: {}", e);
    std::process::exit(1);
}

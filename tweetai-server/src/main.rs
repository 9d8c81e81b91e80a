use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tweetai_server::{
    config,
    db,
    job::{JobSettings, PopulateJob},
    placeholder::HttpPlaceholderSource,
    rate_limit::RateLimiter,
    routes, scheduler,
    state::AppState,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tweetai_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load settings
    let settings = config::Settings::new().expect("Failed to load settings");

    // Initialize database
    let db = db::Database::new(&settings.database.path)
        .expect("Failed to create database");

    db.initialize()
        .expect("Failed to initialize database schema");

    if settings.database.seed_demo_data {
        db.seed_demo_data()
            .expect("Failed to seed demo data");
        tracing::info!("Demo data seeded successfully");
    }

    tracing::info!("Database initialized successfully");

    // Start the hourly population job
    if settings.job.enabled {
        let source = HttpPlaceholderSource::new(&settings.job.base_url, settings.job.request_timeout())
            .expect("Failed to create placeholder API client");
        let job = PopulateJob::new(db.clone(), Arc::new(source), JobSettings::from(&settings.job));
        scheduler::spawn_hourly(job, settings.job.minute, settings.job.run_on_startup);
        tracing::info!(
            "Population job scheduled at minute {} of every hour from {}",
            settings.job.minute,
            settings.job.base_url
        );
    } else {
        tracing::info!("Population job disabled");
    }

    // Create application state
    let state = AppState::new(db, &settings.server.public_url);

    // 5 requests per minute per client address by default
    let rate_limiter = RateLimiter::from_settings(&settings.rate_limit);

    let app = routes::build_router(state, rate_limiter);

    // Start server
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .expect("Failed to parse server address");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        tracing::info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

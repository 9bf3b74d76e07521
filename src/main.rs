use std::sync::Arc;

use catan_domain::{
    repository::ArcScoreRepository,
    service::{ArcScoreboardService, ScoreboardService, ScoreboardServiceImpl},
};
use catan_persistence_mariadb::MariaDbScoreRepository;
use catan_persistence_sqlite::{SqliteScoreRepository, create_db_pool_from_env};
use log::{error, info};

use crate::config::StorageBackend;

mod config;
mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

fn create_repository(backend: StorageBackend) -> ArcScoreRepository {
    match backend {
        StorageBackend::Sqlite => Arc::new(Box::new(SqliteScoreRepository::new(
            create_db_pool_from_env(),
        ))),
        StorageBackend::MariaDb => Arc::new(Box::new(MariaDbScoreRepository::new(
            catan_persistence_mariadb::create_db_pool(),
        ))),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = logs::init_logger() {
        eprintln!("Failed to initialize logger: {}", e);
        std::process::exit(1);
    }

    let backend = StorageBackend::from_env();
    info!("Using {:?} storage", backend);

    let service: ArcScoreboardService = Arc::new(Box::new(ScoreboardServiceImpl::new(
        create_repository(backend),
    )));

    if let Err(e) = service.initialize().await {
        error!("Failed to initialize database: {}", e);
        std::process::exit(1);
    }

    info!("Starting application");

    if let Err(e) = catan_http_api::run(service, shutdown_signal()).await {
        error!("HTTP API failed: {}", e);
        std::process::exit(1);
    }
}

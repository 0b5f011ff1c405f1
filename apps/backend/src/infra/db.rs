use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{DbConfig, DbKind};
use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;
/// Keeps the single in-memory connection (and therefore the database) alive.
const MEMORY_CONN_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

fn engine(kind: DbKind) -> &'static str {
    match kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

/// Retry a connection attempt with fixed interval delays.
/// Returns the error of the last attempt once all retries are exhausted.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(_) => {
                warn!(attempt, max_attempts, interval_ms, "connection_retry=failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
        }
    }
}

fn connect_options(config: &DbConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(config.url.clone());
    opt.sqlx_logging(false);
    match config.kind {
        // Every pooled connection to ":memory:" is its own database.
        DbKind::SqliteMemory => {
            opt.max_connections(1)
                .min_connections(1)
                .idle_timeout(MEMORY_CONN_LIFETIME)
                .max_lifetime(MEMORY_CONN_LIFETIME);
        }
        DbKind::SqliteFile => {
            opt.max_connections(1);
        }
        DbKind::Postgres => {
            opt.max_connections(16)
                .connect_timeout(Duration::from_secs(5))
                .acquire_timeout(Duration::from_secs(5));
        }
    }
    opt
}

/// Open a connection pool. Does NOT run any migrations.
pub async fn connect_db(config: &DbConfig) -> Result<DatabaseConnection, AppError> {
    let attempts = if config.kind == DbKind::SqliteMemory {
        1
    } else {
        CONNECT_ATTEMPTS
    };

    retry_connection(
        || async move {
            Database::connect(connect_options(config))
                .await
                .map_err(AppError::from)
        },
        attempts,
        CONNECT_INTERVAL_MS,
    )
    .await
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(config: &DbConfig) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(config).await?;

    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::db(format!("migration failed: {e}")))?;

    info!(engine = engine(config.kind), kind = ?config.kind, "database ready");
    Ok(conn)
}

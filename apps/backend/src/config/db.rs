use std::env;
use std::str::FromStr;

use crate::config::must_var;
use crate::error::AppError;

/// Storage backend selected by `HITLIST_DB_KIND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "memory" => Ok(DbKind::SqliteMemory),
            other => Err(AppError::config(format!(
                "HITLIST_DB_KIND must be one of postgres, sqlite-file, sqlite-memory; got '{other}'"
            ))),
        }
    }
}

/// Where to connect. `DATABASE_URL` wins over the per-kind variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub kind: DbKind,
    pub url: String,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, AppError> {
        if let Ok(url) = env::var("DATABASE_URL") {
            return Ok(Self {
                kind: kind_from_url(&url)?,
                url,
            });
        }

        let kind = match env::var("HITLIST_DB_KIND") {
            Ok(raw) => raw.parse::<DbKind>()?,
            Err(_) => DbKind::Postgres,
        };
        Ok(Self {
            kind,
            url: db_url(kind)?,
        })
    }

    /// Private in-memory SQLite, used by tests and throwaway servers.
    pub fn sqlite_memory() -> Self {
        Self {
            kind: DbKind::SqliteMemory,
            url: "sqlite::memory:".to_string(),
        }
    }

    pub fn is_sqlite(&self) -> bool {
        matches!(self.kind, DbKind::SqliteFile | DbKind::SqliteMemory)
    }
}

fn kind_from_url(url: &str) -> Result<DbKind, AppError> {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(DbKind::Postgres)
    } else if url.starts_with("sqlite:") && url.contains(":memory:") {
        Ok(DbKind::SqliteMemory)
    } else if url.starts_with("sqlite:") {
        Ok(DbKind::SqliteFile)
    } else {
        Err(AppError::config(
            "DATABASE_URL must start with postgres://, postgresql:// or sqlite:",
        ))
    }
}

/// Builds a database URL from environment variables for the given kind.
pub fn db_url(kind: DbKind) -> Result<String, AppError> {
    match kind {
        DbKind::Postgres => {
            let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
            let db_name = must_var("HITLIST_DB")?;
            let username = must_var("HITLIST_DB_USER")?;
            let password = must_var("HITLIST_DB_PASSWORD")?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
        DbKind::SqliteFile => {
            let path = must_var("HITLIST_SQLITE_PATH")?;
            Ok(format!("sqlite://{path}?mode=rwc"))
        }
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

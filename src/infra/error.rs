use std::{io, net::SocketAddr};

use thiserror::Error;

/// Startup and shutdown failures of the process wiring.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("database url is not configured; set MANKA__DATABASE__URL or DB_URL")]
    MissingDatabaseUrl,
    #[error("failed to connect to database")]
    Connect(#[source] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("http server stopped unexpectedly")]
    Serve(#[source] io::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

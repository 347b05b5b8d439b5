use std::{future::Future, time::Instant};

use metrics::histogram;
use tracing::warn;

use crate::application::repos::RepoError;

use super::PostgresRepositories;

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        sqlx::Error::Database(db) if db.message().contains("duplicate key") => {
            RepoError::Duplicate {
                constraint: db.constraint().unwrap_or("unknown").to_string(),
            }
        }
        sqlx::Error::Database(db) if db.message().contains("invalid input syntax") => {
            RepoError::InvalidInput {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db)
            if db
                .message()
                .contains("canceling statement due to user request") =>
        {
            RepoError::Timeout
        }
        other => RepoError::from_persistence(other),
    }
}

impl PostgresRepositories {
    /// Runs one database round trip under the configured statement timeout.
    pub(super) async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let started = Instant::now();
        let result = tokio::time::timeout(self.statement_timeout, fut).await;
        histogram!("manka_db_query_ms", "operation" => operation)
            .record(started.elapsed().as_secs_f64() * 1000.0);

        match result {
            Ok(inner) => inner.map_err(map_sqlx_error),
            Err(_) => {
                warn!(
                    target = "manka::infra::db",
                    operation,
                    timeout_ms = self.statement_timeout.as_millis() as u64,
                    "database call timed out"
                );
                Err(RepoError::Timeout)
            }
        }
    }
}

/// Escapes `LIKE` wildcards so user input matches literally.
pub(super) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

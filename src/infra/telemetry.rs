use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter,
    filter::Directive,
    fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Statement and pool chatter from the drivers, muted unless `RUST_LOG` asks for it.
const QUIET_DEPENDENCIES: [&str; 3] = ["sqlx::query=warn", "deadpool_redis=warn", "redis=warn"];

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = build_filter(logging);

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::Telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn build_filter(logging: &LoggingSettings) -> EnvFilter {
    let filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return filter;
    }

    QUIET_DEPENDENCIES
        .iter()
        .filter_map(|raw| raw.parse::<Directive>().ok())
        .fold(filter, EnvFilter::add_directive)
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "manka_cache_hit_total",
            Unit::Count,
            "Manga lookups answered from the cache."
        );
        describe_counter!(
            "manka_cache_miss_total",
            Unit::Count,
            "Manga lookups that fell through to the database."
        );
        describe_counter!(
            "manka_cache_error_total",
            Unit::Count,
            "Cache reads or writes that failed or returned an unreadable entry."
        );
        describe_counter!(
            "manka_favorite_toggle_total",
            Unit::Count,
            "Favorite toggles, labelled by outcome."
        );
        describe_histogram!(
            "manka_db_query_ms",
            Unit::Milliseconds,
            "Database round-trip latency in milliseconds."
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_directives_parse() {
        for raw in QUIET_DEPENDENCIES {
            assert!(raw.parse::<Directive>().is_ok(), "{raw} should parse");
        }
    }
}

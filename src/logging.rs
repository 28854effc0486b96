use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_LEVEL;

/// Installs the stderr logger for the lifetime of the returned guard.
///
/// An explicit `--log-level` wins over `RUST_LOG`; without either only
/// error-level events are shown. Stdout stays reserved for the plugin line.
pub fn init_tracing(level: Option<LevelFilter>) -> DefaultGuard {
    let filter = match level {
        Some(level) => EnvFilter::default().add_directive(level.into()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::default().add_directive(DEFAULT_LOG_LEVEL.into())),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

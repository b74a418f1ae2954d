//! Tracing initialization and subscriber setup.

use crate::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the tracing subscriber with stderr output.
///
/// # Parameters
///
/// * `config` - Engine configuration containing the `trace_level` option
///
/// # Trace Level Resolution
///
/// Level is determined by:
/// 1. `RUST_LOG` environment variable if set
/// 2. `config.trace_level` if set
/// 3. Default: `"info"`
///
/// # Initialization Behavior
///
/// Idempotent: safe to call multiple times, only the first call takes
/// effect.
///
/// # Example
///
/// ```rust
/// use tradesite::observability::init_tracing;
/// use tradesite::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer);

    let _ = subscriber.try_init();
}

//! Subscriber installation.

use super::{tracer, SERVICE_NAME};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const TRACE_FILE: &str = "hypothesizer-otlp.json";
const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber that exports spans to the trace file.
///
/// Tracing never blocks the plugin: when the data directory cannot be
/// created the call returns without a subscriber. Calling it twice is
/// harmless; the plugin and the export worker each call it once on their
/// own thread and only the first install wins.
///
/// # Example
///
/// ```rust
/// use hypothesizer::observability::init_tracing;
/// use hypothesizer::Config;
///
/// let config = Config {
///     trace_level: Some("hypothesizer=debug".to_string()),
///     ..Config::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing ready");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);

    let data_dir = crate::infrastructure::paths::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = tracer::create_tracer_provider(data_dir.join(TRACE_FILE), resource);
    let layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(layer)
        .try_init();
}

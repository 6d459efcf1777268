//!
//! Setup logging subsystem.
//!

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use super::config;

/// Keeps the non-blocking writers flushing until it is dropped
#[derive(Debug)]
pub struct TelemetryGuard {
    _log_guards: Vec<WorkerGuard>,
}

/// Setup logging sub-system specifying the service name and the crates to watch.
///
/// `RUST_LOG` overrides the configured filtering directive.
pub fn setup<Str: AsRef<str>>(
    conf: &config::Log,
    service_name: &str,
    crates_to_watch: impl IntoIterator<Item = Str>,
) -> TelemetryGuard {
    let mut guards = Vec::new();
    let subscriber = tracing_subscriber::registry();

    if !conf.console.enabled {
        subscriber.init();
        return TelemetryGuard {
            _log_guards: guards,
        };
    }

    let (console_writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(guard);

    let level = conf.console.level.into_level();
    let console_filter = match conf.console.filtering_directive.as_deref() {
        Some(directive) => EnvFilter::builder()
            .with_default_directive(level.into())
            .parse_lossy(directive),
        None => {
            let directive = crates_to_watch
                .into_iter()
                .map(|krate| format!("{}={level}", krate.as_ref()))
                .chain(std::iter::once(filter::LevelFilter::WARN.to_string()))
                .collect::<Vec<_>>()
                .join(",");
            EnvFilter::builder()
                .with_default_directive(filter::LevelFilter::WARN.into())
                .parse_lossy(std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or(directive))
        }
    };

    match conf.console.log_format {
        config::LogFormat::Default => {
            let logging_layer = fmt::layer()
                .with_timer(fmt::time::time())
                .with_span_events(fmt::format::FmtSpan::CLOSE)
                .pretty()
                .with_writer(console_writer);

            subscriber
                .with(logging_layer.with_filter(console_filter))
                .init();
        }
        config::LogFormat::Json => {
            let logging_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .flatten_event(true)
                .with_writer(console_writer);

            subscriber
                .with(logging_layer.with_filter(console_filter))
                .init();
        }
    }

    tracing::debug!(service = service_name, "logger initialised");

    // Returning the WorkerGuard for logs to be printed until it is dropped
    TelemetryGuard {
        _log_guards: guards,
    }
}

//!
//! Setup logging subsystem.
//!

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use tracing::Level;

use crate::config;

/// Contains guards necessary for logging.
#[derive(Debug)]
pub struct TelemetryGuard {
    _log_guards: Vec<WorkerGuard>,
}

/// Setup logging sub-system specifying the logging configuration, service (application) name,
/// and the names of the crates to watch on the console.
///
/// Calling this more than once in a process leaves the first subscriber in place.
pub fn setup<Str: AsRef<str>>(
    config: &config::Log,
    service_name: &str,
    crates_to_watch: impl IntoIterator<Item = Str>,
) -> TelemetryGuard {
    let mut guards = Vec::new();

    let file_writer = if config.file.enabled {
        let mut path: PathBuf = crate::env::workspace_path();
        path.push(&config.file.path);
        let file_appender = tracing_appender::rolling::hourly(&path, &config.file.file_name);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        guards.push(guard);

        let file_filter = filter::Targets::new().with_default(config.file.level.into_level());
        let file_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(file_writer)
            .with_filter(file_filter);
        Some(file_layer)
    } else {
        None
    };

    // Using 'RUST_LOG' environment variable will override the config settings
    let subscriber = tracing_subscriber::registry().with(file_writer).with(
        EnvFilter::builder()
            .with_default_directive(Level::TRACE.into())
            .from_env_lossy(),
    );

    let init_result = if config.console.enabled {
        let (console_writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);

        let level = config.console.level.into_level();
        let mut console_filter = filter::Targets::new().with_default(Level::WARN);
        for acrate in crates_to_watch {
            console_filter = console_filter.with_target(acrate.as_ref(), level);
        }

        match config.console.log_format {
            config::LogFormat::Default => {
                let logging_layer = fmt::layer()
                    .with_timer(fmt::time::time())
                    .with_span_events(fmt::format::FmtSpan::ACTIVE)
                    .pretty()
                    .with_writer(console_writer)
                    .with_filter(console_filter);
                subscriber.with(logging_layer).try_init()
            }
            config::LogFormat::Json => {
                let logging_layer = fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(console_writer)
                    .with_filter(console_filter);
                subscriber.with(logging_layer).try_init()
            }
        }
    } else {
        subscriber.try_init()
    };

    match init_result {
        Ok(()) => tracing::debug!(service = service_name, "Logging subsystem initialized"),
        Err(error) => {
            tracing::warn!(service = service_name, %error, "Global subscriber already set")
        }
    }

    // Returning the WorkerGuard for logs to be printed until it is dropped
    TelemetryGuard {
        _log_guards: guards,
    }
}

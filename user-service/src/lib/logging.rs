use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::config::LogFormat;
use crate::config::LogRotation;

/// Install the global tracing subscriber.
///
/// Logs always go to stdout; when a log directory is configured they are also
/// written to a rolling file through a non-blocking writer. The returned guard
/// flushes that writer on drop and must be kept alive by the caller.
pub fn init_logging(config: &LogConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_writer, guard) = match &config.directory {
        Some(directory) => {
            let appender = match config.rotation {
                LogRotation::Hourly => tracing_appender::rolling::hourly(directory, &config.file),
                LogRotation::Daily => tracing_appender::rolling::daily(directory, &config.file),
                LogRotation::Never => tracing_appender::rolling::never(directory, &config.file),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json())
            .with(file_writer.map(|writer| {
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false)
            }))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer())
            .with(file_writer.map(|writer| fmt::layer().with_writer(writer).with_ansi(false)))
            .init(),
    }

    guard
}

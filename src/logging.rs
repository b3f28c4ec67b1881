//! Tracing subscriber setup for the binary

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "EOL_CHECKER_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn file_appender(log_file: &Path) -> Option<RollingFileAppender> {
    let dir = log_file.parent()?;
    let name = log_file.file_name()?.to_str()?;
    std::fs::create_dir_all(dir).ok()?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .ok()
}

/// Install the global subscriber
///
/// Console output goes to stderr so stdout stays free for reports. When
/// `log_file` can be opened, the returned guard must be held until exit
/// to flush the file writer.
pub fn init(verbose: bool, format: LogFormat, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let (text_layer, json_layer) = match format {
        LogFormat::Text => (
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            ),
            None,
        ),
        LogFormat::Json => (None, Some(fmt::layer().json().with_writer(std::io::stderr))),
    };

    let (file_layer, guard) = match log_file.and_then(file_appender) {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .with(file_layer)
        .init();

    guard
}

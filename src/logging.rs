use std::fs::OpenOptions;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Environment variable naming a log file to append to.
pub const LOG_FILE_ENV: &str = "WADESK_LOG_FILE";

/// Install the tracing subscriber. Stdout/stderr belong to the alternate
/// screen, so diagnostics only go to a file and only when `WADESK_LOG_FILE`
/// is set; otherwise events are dropped at a no-op registry.
pub fn init() {
    let registry = tracing_subscriber::registry();

    match std::env::var(LOG_FILE_ENV) {
        Ok(log_path) if !log_path.is_empty() => {
            let file = match OpenOptions::new().create(true).append(true).open(&log_path) {
                Ok(file) => file,
                Err(err) => {
                    eprintln!("warning: cannot open log file {log_path}: {err}");
                    registry.init();
                    return;
                }
            };

            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);

            registry.with(file_layer).init();
        }
        _ => registry.init(),
    }
}

use std::fs;

use chrono::Local;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::Result;

pub const LOG_DIR: &str = "logs";

/// Console output at INFO (or `RUST_LOG`), plus a per-run DEBUG log file.
///
/// The returned guard flushes the file writer on drop, so keep it alive for
/// the whole run.
pub fn init_logging(pipeline: &str) -> Result<WorkerGuard> {
    fs::create_dir_all(LOG_DIR)?;

    let file_name = format!("{pipeline}_collection_{}.log", Local::now().format("%Y%m%d_%H%M%S"));
    let file_appender = tracing_appender::rolling::never(LOG_DIR, &file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = EnvFilter::new(format!("info,{}=debug", env!("CARGO_CRATE_NAME")));
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking_writer)
        .with_filter(file_filter);
    let console_layer = fmt::layer().with_writer(std::io::stdout).with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    info!("Logging started, log file: {LOG_DIR}/{file_name}");
    Ok(guard)
}

use aula_bridge::{Logging, LoggingRotation};
use file_rotate::TimeFrequency;
use file_rotate::compression::Compression;
use file_rotate::{ContentLimit, FileRotate, suffix::AppendCount};
use std::fs::OpenOptions;
use std::io::{self, Write};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::{self, writer::BoxMakeWriter};
use tracing_subscriber::{EnvFilter, Registry, prelude::*};

const LOG_FILE_NAME: &str = "aula.log";

/// Keeps the non-blocking writers flushing until dropped.
pub struct LoggingHandle {
    _guards: Vec<WorkerGuard>,
}

fn content_limit(rotation: &LoggingRotation, max_size: usize) -> ContentLimit {
    match rotation {
        LoggingRotation::Size => ContentLimit::Bytes(max_size),
        LoggingRotation::Hourly => ContentLimit::Time(TimeFrequency::Hourly),
        LoggingRotation::Daily => ContentLimit::Time(TimeFrequency::Daily),
        LoggingRotation::Weekly => ContentLimit::Time(TimeFrequency::Weekly),
        LoggingRotation::Monthly => ContentLimit::Time(TimeFrequency::Monthly),
        LoggingRotation::Yearly => ContentLimit::Time(TimeFrequency::Yearly),
        LoggingRotation::Never => ContentLimit::None,
    }
}

pub fn init_logging(cfg: &Logging) -> Option<LoggingHandle> {
    if !cfg.logs() {
        return None;
    }

    let Logging {
        output,
        file_path,
        rotation,
        max_size,
        max_files,
        level,
    } = cfg.clone();

    let mut guards: Vec<WorkerGuard> = Vec::new();

    let env_filter = if let Ok(env_filter) = EnvFilter::try_from_default_env() {
        env_filter
    } else {
        EnvFilter::new(level)
    };

    let stdout_layer = output.stdout.then(|| {
        let (stdout_nb, guard) = NonBlocking::new(io::stdout());
        guards.push(guard);

        let mw = BoxMakeWriter::new(move || -> Box<dyn Write + Send + Sync> {
            Box::new(stdout_nb.clone())
        });

        fmt::layer()
            .with_target(true)
            .with_ansi(true)
            .with_writer(mw)
    });

    let file_layer = output.file.then(|| {
        std::fs::create_dir_all(&file_path).ok();

        let mut opts = OpenOptions::new();
        opts.read(true).write(true).create(true).append(true);

        let full = format!("{}/{}", file_path, LOG_FILE_NAME);
        let fr = FileRotate::new(
            &full,
            AppendCount::new(max_files),
            content_limit(&rotation, max_size),
            Compression::None,
            Some(opts),
        );

        let (file_nb, guard) = NonBlocking::new(fr);
        guards.push(guard);

        let mw = BoxMakeWriter::new(move || -> Box<dyn Write + Send + Sync> {
            Box::new(file_nb.clone())
        });

        fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(mw)
    });

    let subscriber = Registry::default()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer);

    // If a subscriber is running (e.g. tests)
    if subscriber.try_init().is_err() {
        return None;
    }

    Some(LoggingHandle { _guards: guards })
}

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("student_roster=debug,roster=debug,info")
        } else {
            EnvFilter::new("student_roster=info,roster=info,warn")
        }
    })
}

/// Creates the parent directory and opens `path` for appending. The error
/// names the path and whichever step failed.
fn open_log_file(path: &Path) -> Result<File, String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("cannot create {}: {}", parent.display(), e))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("cannot open {}: {}", path.display(), e))
}

/// Console logging plus an optional append-only log file.
///
/// A log file that cannot be opened is reported on the console and skipped.
pub fn init_cli_logger(verbose: bool, log_file: Option<&Path>) {
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    let mut open_error = None;
    let file_layer = log_file.and_then(|path| {
        match open_log_file(path) {
            Ok(file) => Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false)
                    .boxed(),
            ),
            Err(e) => {
                open_error = Some(e);
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(console)
        .with(file_layer)
        .init();

    if let Some(message) = open_error {
        tracing::warn!("Log file unavailable, logging to console only ({})", message);
    }
}

/// JSON lines on stderr, for running under a supervisor that collects logs.
pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(default_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .json(),
        )
        .init();
}

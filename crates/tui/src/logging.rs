use std::error::Error;
use std::ffi::OsStr;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output to `path`; the terminal belongs to the UI.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_logging(filter: &str, path: &Path) -> Result<WorkerGuard, Box<dyn Error>> {
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .unwrap_or_else(|| OsStr::new("simple-dialogs.log"));
    std::fs::create_dir_all(directory)?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = match EnvFilter::try_new(filter) {
        Ok(filter) => filter,
        Err(error) => {
            eprintln!("[simple-dialogs] invalid log filter {filter:?} ({error}); using info");
            EnvFilter::new("info")
        }
    };
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|error| error as Box<dyn Error>)?;
    Ok(guard)
}

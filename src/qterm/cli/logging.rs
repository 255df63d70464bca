use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "QTERM_LOG";
const LOG_FILENAME: &str = "qterm.log";

/// File-based tracing. The terminal owns stdout, so logs go to
/// `<dir>/qterm.log`. `QTERM_LOG` takes an `EnvFilter` directive; without it
/// the level is `warn`, or `debug` when `verbose` is set.
pub fn init(dir: &Path, verbose: bool) {
    if std::fs::create_dir_all(dir).is_err() {
        return;
    }
    let Ok(log_file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILENAME))
    else {
        return;
    };

    let fallback = if verbose { "qterm=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .try_init();
}

//! Log lines shared by the loaders
//!
//! Every read reports where it started and how many rows came back, so a
//! slow or empty input is visible at the default `info` level.

use std::path::Path;
use std::time::Duration;

pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{operation} {}", path.display());
}

/// Report rows produced by `operation` (a past-tense verb such as "read")
pub fn log_operation_complete(operation: &str, path: &Path, rows: usize, elapsed: Option<Duration>) {
    let source = path.display();
    match elapsed {
        Some(elapsed) => log::info!("{rows} rows {operation} from {source} in {elapsed:.2?}"),
        None => log::info!("{rows} rows {operation} from {source}"),
    }
}

/// Warn about data that was skipped or could not be used
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{message} ({})", path.display()),
        None => log::warn!("{message}"),
    }
}

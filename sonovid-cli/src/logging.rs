// ============================================================================
// sonovid-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and optional file logging
//
// Console logging goes through env_logger, so RUST_LOG works as usual. When
// a log directory is given, fern takes over and writes the console stream
// plus a debug-level file named sonovid_<timestamp>.log.
//
// KEY COMPONENTS:
// - init_logging: installs the global logger
// - level_for_verbosity: maps -v counts to log levels
// - get_timestamp: timestamp used in log file names
//
// USAGE:
// - (default): warnings and errors only
// - -v: info, -vv: debug, -vvv: trace (includes raw ffmpeg output)

use crate::error::CliResult;
use log::LevelFilter;
use sonovid_core::CoreError;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Returns
/// A string containing the formatted timestamp (e.g., "20240601_123045")
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Console level for a `-v` count.
#[must_use]
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the global logger.
///
/// # Returns
/// The path of the log file when one was created.
pub fn init_logging(verbosity: u8, log_dir: Option<&Path>) -> CliResult<Option<PathBuf>> {
    let console_level = level_for_verbosity(verbosity);

    let Some(dir) = log_dir else {
        // A logger that is already installed (e.g. in tests) is not an error
        let _ = env_logger::Builder::new()
            .filter_level(console_level)
            .parse_default_env()
            .format_timestamp(None)
            .try_init();
        return Ok(None);
    };

    fs::create_dir_all(dir)?;
    let log_path = dir.join(format!("sonovid_{}.log", get_timestamp()));

    let console = fern::Dispatch::new()
        .level(console_level)
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message));
        })
        .chain(std::io::stderr());

    let file = fern::Dispatch::new()
        .level(LevelFilter::Debug.max(console_level))
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ));
        })
        .chain(fern::log_file(&log_path)?);

    fern::Dispatch::new()
        .chain(console)
        .chain(file)
        .apply()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logging: {e}")))?;

    log::debug!("Logging to {}", log_path.display());
    Ok(Some(log_path))
}

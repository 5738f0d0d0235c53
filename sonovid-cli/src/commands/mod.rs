//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command. Commands
//! return the process exit code; errors that abort a command early are
//! returned as `CoreError` and reported by `main`.

/// Converts one audio file into a video.
pub mod convert;
/// Lists or clears the conversion history.
pub mod history;
/// Reports the duration ffprobe sees for a file.
pub mod probe;
/// Shows or edits the persistent settings.
pub mod settings;

/// Exit code of a successful run.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when the command or the conversion failed.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when the user cancelled with Ctrl-C (128 + SIGINT).
pub const EXIT_CANCELLED: i32 = 130;

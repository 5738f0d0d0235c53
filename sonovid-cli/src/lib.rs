// sonovid-cli/src/lib.rs
//
// Library portion of the Sonovid CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ConvertArgs, HistoryArgs, SettingsCommand, SettingsSetArgs};
pub use commands::convert::run_convert;
pub use commands::history::run_history;
pub use commands::probe::run_probe;
pub use commands::settings::run_settings;
pub use error::{CliErrorContext, CliResult};

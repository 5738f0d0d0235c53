// ============================================================================
// sonovid-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core error type and helpers
//
// All fallible operations in sonovid-core return `CoreResult<T>`. Inside the
// conversion worker these errors never escape: they are folded into a failed
// `JobReport` at the job boundary.

use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by the sonovid-core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] std::io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, #[source] std::io::Error),

    #[error("Command '{command}' failed with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Required dependency '{0}' not found")]
    DependencyNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse settings file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("A conversion is already running")]
    JobAlreadyRunning,

    #[error("Conversion worker stopped without reporting an outcome")]
    WorkerDisconnected,

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for sonovid-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds the error for a command that could not be started.
pub fn command_start_error(command: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), err)
}

/// Builds the error for a command whose exit status could not be collected.
pub fn command_wait_error(command: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(command.into(), err)
}

/// Builds the error for a command that ran but exited unsuccessfully.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}

// ============================================================================
// sonovid-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and controlling the ffmpeg
// encoder process. The conversion pipeline reads the process's diagnostic
// stream line by line, so the trait exposes that stream as a plain reader
// rather than as parsed sidecar events.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
//
// ARCHITECTURE:
// The module follows a trait-based design that allows for flexible process
// management and testing through dependency injection patterns.

use crate::error::{CoreError, CoreResult, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use std::io::Read;
use std::process::ExitStatus;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess: Send {
    /// Takes the diagnostic (stderr) stream. Returns `None` once taken.
    fn take_diagnostics(&mut self) -> Option<Box<dyn Read + Send>>;

    /// Asks the process to finish gracefully.
    fn request_stop(&mut self) -> CoreResult<()>;

    /// Forcibly terminates the process.
    fn kill(&mut self) -> CoreResult<()>;

    /// Returns the exit status if the process has already finished.
    fn try_wait(&mut self) -> CoreResult<Option<ExitStatus>>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner: Send + Sync {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn take_diagnostics(&mut self) -> Option<Box<dyn Read + Send>> {
        self.0
            .take_stderr()
            .map(|stderr| Box::new(stderr) as Box<dyn Read + Send>)
    }

    fn request_stop(&mut self) -> CoreResult<()> {
        // ffmpeg treats "q" on stdin as a request to finalize and exit
        self.0
            .quit()
            .map_err(|e| CoreError::OperationFailed(format!("Failed to ask ffmpeg to quit: {e}")))
    }

    fn kill(&mut self) -> CoreResult<()> {
        self.0
            .kill()
            .map_err(|e| CoreError::OperationFailed(format!("Failed to kill ffmpeg: {e}")))
    }

    fn try_wait(&mut self) -> CoreResult<Option<ExitStatus>> {
        self.0
            .as_inner_mut()
            .try_wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        log::debug!("Spawning ffmpeg: {cmd:?}");
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}

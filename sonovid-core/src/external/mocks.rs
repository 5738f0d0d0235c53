// sonovid-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---
//
// Scripted implementations of the process traits. A mock process serves a
// fixed list of diagnostic lines and then exits with a chosen code; it can
// also set a job's cancellation flag partway through the script.

use super::{DurationProbe, FfmpegProcess, FfmpegSpawner};
use crate::error::{CoreError, CoreResult};
use crate::processing::CancellationFlag;
use ffmpeg_sidecar::command::FfmpegCommand;
use std::collections::VecDeque;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn exit_status(code: i32) -> ExitStatus {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(code << 8)
    }
    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(code as u32)
    }
}

/// Raw wait status of a process terminated by SIGKILL.
#[cfg(unix)]
fn signal_status() -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(9)
}

#[cfg(windows)]
fn signal_status() -> ExitStatus {
    exit_status(1)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What a mock process observed from the pipeline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MockProcessState {
    pub stop_requested: bool,
    pub killed: bool,
    pub waited: bool,
}

/// Mock implementation of FfmpegProcess.
pub struct MockFfmpegProcess {
    lines: Vec<String>,
    exit_status: ExitStatus,
    cancel_after: Option<(usize, CancellationFlag)>,
    honors_stop: bool,
    kill_fails: bool,
    diagnostics_taken: bool,
    state: Arc<Mutex<MockProcessState>>,
}

impl MockFfmpegProcess {
    /// A process that prints `lines` and exits with `exit_code`.
    #[must_use]
    pub fn new<I, S>(lines: I, exit_code: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            exit_status: exit_status(exit_code),
            cancel_after: None,
            honors_stop: true,
            kill_fails: false,
            diagnostics_taken: false,
            state: Arc::default(),
        }
    }

    /// Sets `flag` once `lines_read` lines have been served.
    #[must_use]
    pub fn cancel_after(mut self, lines_read: usize, flag: CancellationFlag) -> Self {
        self.cancel_after = Some((lines_read, flag));
        self
    }

    /// Makes the process ignore graceful stop requests, so only a kill ends it.
    #[must_use]
    pub fn ignore_stop(mut self) -> Self {
        self.honors_stop = false;
        self
    }

    /// Makes `kill` fail, as it does when the OS refuses the signal.
    #[must_use]
    pub fn failing_kill(mut self) -> Self {
        self.kill_fails = true;
        self
    }

    /// Handle for inspecting the process after it has been handed to the pipeline.
    #[must_use]
    pub fn state(&self) -> Arc<Mutex<MockProcessState>> {
        Arc::clone(&self.state)
    }

    fn terminated(&self) -> bool {
        let state = lock(&self.state);
        state.killed || (state.stop_requested && self.honors_stop)
    }
}

impl FfmpegProcess for MockFfmpegProcess {
    fn take_diagnostics(&mut self) -> Option<Box<dyn Read + Send>> {
        if self.diagnostics_taken {
            return None;
        }
        self.diagnostics_taken = true;
        Some(Box::new(ScriptedDiagnostics::new(
            std::mem::take(&mut self.lines),
            self.cancel_after.clone(),
        )))
    }

    fn request_stop(&mut self) -> CoreResult<()> {
        lock(&self.state).stop_requested = true;
        Ok(())
    }

    fn kill(&mut self) -> CoreResult<()> {
        if self.kill_fails {
            return Err(CoreError::OperationFailed(
                "MockFfmpegProcess: kill refused".to_string(),
            ));
        }
        lock(&self.state).killed = true;
        Ok(())
    }

    fn try_wait(&mut self) -> CoreResult<Option<ExitStatus>> {
        if self.terminated() {
            Ok(Some(self.wait()?))
        } else {
            Ok(None)
        }
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        let mut state = lock(&self.state);
        state.waited = true;
        if state.killed {
            Ok(signal_status())
        } else {
            Ok(self.exit_status)
        }
    }
}

/// Reader serving one scripted line per `read` call, newline-terminated.
struct ScriptedDiagnostics {
    lines: VecDeque<String>,
    served: usize,
    cancel_after: Option<(usize, CancellationFlag)>,
    pending: Vec<u8>,
}

impl ScriptedDiagnostics {
    fn new(lines: Vec<String>, cancel_after: Option<(usize, CancellationFlag)>) -> Self {
        let mut reader = Self {
            lines: lines.into(),
            served: 0,
            cancel_after,
            pending: Vec::new(),
        };
        reader.trip_cancel();
        reader
    }

    fn trip_cancel(&self) {
        if let Some((after, flag)) = &self.cancel_after {
            if self.served >= *after {
                flag.cancel();
            }
        }
    }
}

impl Read for ScriptedDiagnostics {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            let Some(line) = self.lines.pop_front() else {
                return Ok(0);
            };
            self.pending = line.into_bytes();
            self.pending.push(b'\n');
            self.served += 1;
            self.trip_cancel();
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}

/// Mock implementation of FfmpegSpawner handing out queued processes in order.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Arc<Mutex<VecDeque<CoreResult<MockFfmpegProcess>>>>,
    received_calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a process for the next spawn.
    pub fn add_process(&self, process: MockFfmpegProcess) {
        lock(&self.expectations).push_back(Ok(process));
    }

    /// Queues a spawn failure.
    pub fn add_spawn_error(&self, error: CoreError) {
        lock(&self.expectations).push_back(Err(error));
    }

    /// Argument lists of every spawn attempt, in order.
    #[must_use]
    pub fn received_calls(&self) -> Vec<Vec<String>> {
        lock(&self.received_calls).clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args = super::ffmpeg_builder::command_args(&mut cmd);
        log::debug!("MockFfmpegSpawner: spawn {args:?}");
        lock(&self.received_calls).push(args);

        lock(&self.expectations).pop_front().unwrap_or_else(|| {
            Err(CoreError::OperationFailed(
                "MockFfmpegSpawner: no process queued".to_string(),
            ))
        })
    }
}

/// Mock `DurationProbe` returning a fixed answer and recording the paths asked about.
#[derive(Clone, Default)]
pub struct MockDurationProbe {
    duration: Option<f64>,
    probed: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockDurationProbe {
    #[must_use]
    pub fn new(duration: Option<f64>) -> Self {
        Self {
            duration,
            probed: Arc::default(),
        }
    }

    /// Paths passed to `probe_duration`.
    #[must_use]
    pub fn probed_paths(&self) -> Vec<PathBuf> {
        lock(&self.probed).clone()
    }
}

impl DurationProbe for MockDurationProbe {
    fn probe_duration(&self, input_path: &Path) -> Option<f64> {
        lock(&self.probed).push(input_path.to_path_buf());
        self.duration
    }
}

// ============================================================================
// sonovid-core/src/processing/job.rs
// ============================================================================
//
// CONVERSION JOB: One audio file in, one video file out
//
// This module runs a single conversion end to end: probe the duration, spawn
// ffmpeg, feed its diagnostic lines through the stream monitor, honour
// cancellation between lines, and turn the exit status into a report.
//
// KEY COMPONENTS:
// - CancellationFlag: shared flag polled once per diagnostic line
// - ConversionJob: input path, output path and the job's flag
// - JobEvent / JobReport / JobOutcome: what the pipeline tells its consumer
// - run_conversion: the pipeline itself
//
// Every error inside run_conversion is folded into exactly one
// JobEvent::Finished carrying a failed report.

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{
    ConversionParams, DurationProbe, FfmpegProcess, FfmpegSpawner, build_conversion_command,
};
use crate::hardware_decode::log_hardware_decoding_status;
use crate::processing::lines::DiagnosticLines;
use crate::processing::monitor::{LineVerdict, StreamMonitor};
use crate::utils::{get_filename_safe, output_path_for};

// ---- Standard library imports ----
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Interval between exit checks while waiting out the grace period.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Cloneable cancellation request shared between a job and its owner.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A single conversion request.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
    cancel: CancellationFlag,
}

impl ConversionJob {
    #[must_use]
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            cancel: CancellationFlag::new(),
        }
    }

    /// Job writing `<output_dir>/<input stem>.mp4`.
    pub fn for_input(input: &Path, output_dir: &Path) -> CoreResult<Self> {
        Ok(Self::new(input.to_path_buf(), output_path_for(input, output_dir)?))
    }

    /// A handle that can cancel this job from another thread.
    #[must_use]
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Terminal outcome of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    Failed,
    Cancelled,
}

/// Final report of a job. `output_path` is only set on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub outcome: JobOutcome,
    pub message: String,
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
}

impl JobReport {
    #[must_use]
    pub fn succeeded(input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            outcome: JobOutcome::Succeeded,
            message: "Conversion succeeded".to_string(),
            input_path,
            output_path: Some(output_path),
        }
    }

    #[must_use]
    pub fn failed(input_path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            outcome: JobOutcome::Failed,
            message: message.into(),
            input_path,
            output_path: None,
        }
    }

    #[must_use]
    pub fn cancelled(input_path: PathBuf) -> Self {
        Self {
            outcome: JobOutcome::Cancelled,
            message: "Conversion cancelled by user".to_string(),
            input_path,
            output_path: None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome == JobOutcome::Succeeded
    }

    /// Output path as displayed and recorded: empty unless the job succeeded.
    #[must_use]
    pub fn output_display(&self) -> String {
        self.output_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}

/// Message from a running job, delivered in stream order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Progress(u8),
    Log(String),
    /// Always the last event of a job.
    Finished(JobReport),
}

/// Runs one conversion to completion on the current thread.
///
/// Emits progress and log events through `emit`, then exactly one
/// `JobEvent::Finished`, whose report is also returned.
pub fn run_conversion<S, P>(
    spawner: &S,
    probe: &P,
    config: &CoreConfig,
    job: &ConversionJob,
    emit: &mut dyn FnMut(JobEvent),
) -> JobReport
where
    S: FfmpegSpawner + ?Sized,
    P: DurationProbe + ?Sized,
{
    let mut process: Option<S::Process> = None;
    let report = match convert(spawner, probe, config, job, emit, &mut process) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Conversion of {} failed: {e}", job.input.display());
            if let Some(child) = process.as_mut() {
                // The child may still be running when the stream broke
                if matches!(child.try_wait(), Ok(None)) {
                    let _ = child.kill();
                    let _ = child.wait();
                }
            }
            emit(JobEvent::Log(format!("Critical error: {e}")));
            JobReport::failed(job.input.clone(), e.to_string())
        }
    };
    emit(JobEvent::Finished(report.clone()));
    report
}

fn convert<S, P>(
    spawner: &S,
    probe: &P,
    config: &CoreConfig,
    job: &ConversionJob,
    emit: &mut dyn FnMut(JobEvent),
    process_slot: &mut Option<S::Process>,
) -> CoreResult<JobReport>
where
    S: FfmpegSpawner + ?Sized,
    P: DurationProbe + ?Sized,
{
    let file_name = get_filename_safe(&job.input)?;
    let params = ConversionParams::from_config(&job.input, &job.output, config);

    emit(JobEvent::Log(format!("Starting conversion of {file_name}")));
    emit(JobEvent::Log(format!(
        "Using preset: {} with {} threads",
        params.preset, params.threads
    )));
    log_hardware_decoding_status(params.hardware_accel);

    let duration = match probe.probe_duration(&job.input).filter(|d| *d > 0.0) {
        Some(duration) => {
            log::debug!("Probed duration of {file_name}: {duration:.2}s");
            duration
        }
        None => {
            let fallback = config.fallback_duration_secs;
            emit(JobEvent::Log(format!("Using default duration: {fallback} seconds")));
            fallback
        }
    };

    let mut monitor = StreamMonitor::new(duration, config.log_throttle_interval);
    if job.is_cancelled() {
        monitor.cancel();
        emit(JobEvent::Log("Conversion cancelled".to_string()));
        return Ok(JobReport::cancelled(job.input.clone()));
    }

    let cmd = build_conversion_command(&params);
    let process = process_slot.insert(spawner.spawn(cmd)?);
    let diagnostics = process.take_diagnostics().ok_or_else(|| {
        CoreError::OperationFailed("ffmpeg diagnostic stream was not captured".to_string())
    })?;

    for line in DiagnosticLines::new(BufReader::new(diagnostics)) {
        let line = line?;
        log::trace!(target: "ffmpeg_log", "{line}");

        match monitor.observe(&line, job.is_cancelled()) {
            LineVerdict::Cancel => {
                log::info!(
                    "Cancellation observed after {} lines",
                    monitor.lines_seen()
                );
                // The outcome stays Cancelled even if the child resists stopping
                if let Err(e) = stop_process(process, config.terminate_grace_period()) {
                    log::error!("Failed to stop ffmpeg after cancellation: {e}");
                }
                emit(JobEvent::Log("Conversion cancelled".to_string()));
                return Ok(JobReport::cancelled(job.input.clone()));
            }
            LineVerdict::Continue { log, progress } => {
                if let Some(message) = log {
                    emit(JobEvent::Log(message));
                }
                if let Some(percent) = progress {
                    emit(JobEvent::Progress(percent));
                }
            }
        }
    }

    let status = process.wait()?;
    monitor.finish(status.success());

    if status.success() {
        emit(JobEvent::Progress(100));
        emit(JobEvent::Log(format!("File saved to: {}", job.output.display())));
        Ok(JobReport::succeeded(job.input.clone(), job.output.clone()))
    } else {
        let message = failure_message(status);
        log::warn!("{message}");
        Ok(JobReport::failed(job.input.clone(), message))
    }
}

/// Asks the process to quit, then kills it if the grace period runs out.
fn stop_process<Pr>(process: &mut Pr, grace: Duration) -> CoreResult<ExitStatus>
where
    Pr: FfmpegProcess + ?Sized,
{
    if let Err(e) = process.request_stop() {
        // stdin may already be closed; fall through to the kill below
        log::debug!("Graceful stop request failed: {e}");
    }

    let deadline = Instant::now() + grace;
    loop {
        if let Some(status) = process.try_wait()? {
            log::debug!("ffmpeg exited after stop request: {status}");
            return Ok(status);
        }
        if Instant::now() >= deadline {
            break;
        }
        thread::sleep(STOP_POLL_INTERVAL);
    }

    log::warn!(
        "ffmpeg still running {}s after stop request, killing it",
        grace.as_secs()
    );
    process.kill()?;
    process.wait()
}

fn failure_message(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("Conversion failed with exit code {code}"),
        None => "Conversion failed: terminated by signal".to_string(),
    }
}

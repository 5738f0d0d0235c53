// ============================================================================
// sonovid-core/src/processing/orchestrator.rs
// ============================================================================
//
// ORCHESTRATOR: Background execution of conversion jobs
//
// The Converter owns the tool implementations and runs each job on its own
// worker thread. Events flow one way, from the worker to whoever holds the
// JobHandle, over an mpsc channel. Only one job may run at a time.
//
// KEY COMPONENTS:
// - Converter: starts jobs and enforces the one-active-job rule
// - JobHandle: event receiver, cancellation and join for one job

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{DurationProbe, FfmpegSpawner};
use crate::processing::job::{CancellationFlag, ConversionJob, JobEvent, JobReport, run_conversion};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// Runs conversion jobs on a background worker thread.
pub struct Converter<S, P> {
    spawner: Arc<S>,
    probe: Arc<P>,
    busy: Arc<AtomicBool>,
}

impl<S, P> Converter<S, P>
where
    S: FfmpegSpawner + 'static,
    P: DurationProbe + 'static,
{
    pub fn new(spawner: S, probe: P) -> Self {
        Self {
            spawner: Arc::new(spawner),
            probe: Arc::new(probe),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a job is currently running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Starts `job` on a new worker thread.
    ///
    /// # Errors
    ///
    /// * `CoreError::JobAlreadyRunning` - If another job has not finished yet
    /// * `CoreError::Io` - If the worker thread cannot be spawned
    pub fn start(&self, job: ConversionJob, config: CoreConfig) -> CoreResult<JobHandle> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CoreError::JobAlreadyRunning);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let (tx, rx) = mpsc::channel();
        let cancel = job.cancellation_flag();
        let spawner = Arc::clone(&self.spawner);
        let probe = Arc::clone(&self.probe);

        log::debug!("Starting worker for {}", job.input.display());
        let worker = thread::Builder::new()
            .name("sonovid-worker".to_string())
            .spawn(move || {
                let _guard = guard;
                let mut emit = |event: JobEvent| {
                    // A dropped receiver means nobody is listening any more
                    let _ = tx.send(event);
                };
                run_conversion(spawner.as_ref(), probe.as_ref(), &config, &job, &mut emit);
            })?;

        Ok(JobHandle {
            events: rx,
            cancel,
            worker: Some(worker),
        })
    }
}

/// Clears the busy flag when the worker ends, however it ends.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Owner's side of a running job.
pub struct JobHandle {
    events: Receiver<JobEvent>,
    cancel: CancellationFlag,
    worker: Option<JoinHandle<()>>,
}

impl JobHandle {
    /// Raw event receiver, for consumers running their own loop.
    #[must_use]
    pub fn events(&self) -> &Receiver<JobEvent> {
        &self.events
    }

    /// Requests cancellation. Takes effect at the next diagnostic line.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Drains events until the job finishes, passing each one to `on_event`.
    ///
    /// # Returns
    ///
    /// * `Ok(JobReport)` - The report carried by `JobEvent::Finished`
    /// * `Err(CoreError::WorkerDisconnected)` - If the worker ended without one
    pub fn wait_with<F>(mut self, mut on_event: F) -> CoreResult<JobReport>
    where
        F: FnMut(&JobEvent),
    {
        let mut report = None;
        for event in self.events.iter() {
            on_event(&event);
            if let JobEvent::Finished(finished) = event {
                report = Some(finished);
                break;
            }
        }

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Conversion worker panicked");
            }
        }
        report.ok_or(CoreError::WorkerDisconnected)
    }

    /// Waits for the job to finish, discarding intermediate events.
    pub fn wait(self) -> CoreResult<JobReport> {
        self.wait_with(|_| {})
    }
}

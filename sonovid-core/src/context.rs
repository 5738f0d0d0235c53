// ============================================================================
// sonovid-core/src/context.rs
// ============================================================================
//
// APPLICATION CONTEXT: Settings, history and converter in one place
//
// A front end builds one AppContext at startup and passes it to whatever
// needs to start conversions or read history.

use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::external::{CrateFfprobeExecutor, DurationProbe, FfmpegSpawner, SidecarSpawner};
use crate::history::{HistoryRecord, HistoryStore};
use crate::processing::{ConversionJob, Converter, JobHandle, JobReport};
use std::path::Path;

/// Shared state of one application instance.
pub struct AppContext<S = SidecarSpawner, P = CrateFfprobeExecutor> {
    config: CoreConfig,
    history: HistoryStore,
    converter: Converter<S, P>,
}

impl AppContext {
    /// Context backed by the real ffmpeg and ffprobe.
    #[must_use]
    pub fn new(config: CoreConfig) -> Self {
        Self::with_tools(config, SidecarSpawner, CrateFfprobeExecutor::new())
    }
}

impl<S, P> AppContext<S, P>
where
    S: FfmpegSpawner + 'static,
    P: DurationProbe + 'static,
{
    /// Context using the given tool implementations.
    pub fn with_tools(config: CoreConfig, spawner: S, probe: P) -> Self {
        let history = HistoryStore::open(config.history_path());
        Self {
            config,
            history,
            converter: Converter::new(spawner, probe),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Starts converting `input` into the configured output directory.
    ///
    /// Creates the output directory first.
    pub fn start_conversion(&self, input: &Path) -> CoreResult<JobHandle> {
        std::fs::create_dir_all(&self.config.output_dir)?;
        let job = ConversionJob::for_input(input, &self.config.output_dir)?;
        log::info!(
            "Converting {} -> {}",
            job.input.display(),
            job.output.display()
        );
        self.converter.start(job, self.config.clone())
    }

    /// Appends a history record for a finished job, whatever its outcome.
    pub fn record(&mut self, report: &JobReport) {
        self.history.append(HistoryRecord::from_report(report));
    }
}

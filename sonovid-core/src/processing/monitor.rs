//! Stream monitor for ffmpeg's diagnostic output.
//!
//! The monitor is a pure state machine over diagnostic lines: it counts
//! them, decides which ones are forwarded as log messages, extracts the
//! `time=` marker and turns it into a percentage of the probed duration.
//! Process control lives in [`super::job`], which feeds it lines.

use crate::utils::{parse_ffmpeg_time, progress_percent};
use regex::Regex;
use std::sync::LazyLock;

static TIME_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"time=(\S+)").unwrap());

/// Lifecycle of one monitored process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Running,
    Cancelled,
    Failed,
    Succeeded,
}

/// What the caller should do after one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineVerdict {
    /// Cancellation was requested; stop reading and stop the process.
    Cancel,
    /// Keep reading. Carries the throttled log line and the progress sample, if any.
    Continue {
        log: Option<String>,
        progress: Option<u8>,
    },
}

/// Per-job monitoring state.
#[derive(Debug)]
pub struct StreamMonitor {
    duration_secs: f64,
    log_every: u64,
    lines_seen: u64,
    state: MonitorState,
}

impl StreamMonitor {
    /// # Arguments
    ///
    /// * `duration_secs` - Total duration the percentage is computed against
    /// * `log_every` - Forward every Nth line (values below 1 are treated as 1)
    #[must_use]
    pub fn new(duration_secs: f64, log_every: u64) -> Self {
        Self {
            duration_secs,
            log_every: log_every.max(1),
            lines_seen: 0,
            state: MonitorState::Running,
        }
    }

    #[must_use]
    pub fn state(&self) -> MonitorState {
        self.state
    }

    #[must_use]
    pub fn lines_seen(&self) -> u64 {
        self.lines_seen
    }

    /// Processes one diagnostic line.
    ///
    /// The cancellation check comes first, so a cancelled job never reports
    /// progress from the line that observed the flag.
    pub fn observe(&mut self, line: &str, cancelled: bool) -> LineVerdict {
        self.lines_seen += 1;

        if cancelled {
            self.state = MonitorState::Cancelled;
            return LineVerdict::Cancel;
        }

        let log = (self.lines_seen % self.log_every == 0).then(|| line.trim().to_string());
        let progress = extract_time_marker(line)
            .and_then(parse_ffmpeg_time)
            .and_then(|elapsed| progress_percent(elapsed, self.duration_secs));

        LineVerdict::Continue { log, progress }
    }

    /// Records the terminal state once the process has been awaited.
    pub fn finish(&mut self, success: bool) {
        if self.state == MonitorState::Running {
            self.state = if success {
                MonitorState::Succeeded
            } else {
                MonitorState::Failed
            };
        }
    }

    /// Marks the job cancelled outside the line loop (e.g. before spawning).
    pub fn cancel(&mut self) {
        self.state = MonitorState::Cancelled;
    }
}

/// Returns the raw value of the first `time=` marker in a line.
#[must_use]
pub fn extract_time_marker(line: &str) -> Option<&str> {
    TIME_MARKER
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

//! FFprobe integration for measuring input duration
//!
//! The conversion only needs one number from ffprobe: the container duration
//! in seconds. It drives the progress percentage; when it cannot be measured
//! the pipeline substitutes the configured fallback.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Measures the playback duration of a media file.
pub trait DurationProbe: Send + Sync {
    /// Duration in seconds, or `None` when it cannot be determined.
    fn probe_duration(&self, input_path: &Path) -> Option<f64>;
}

/// `DurationProbe` backed by the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Reads `format.duration` for the input, failing with a descriptive error.
    pub fn get_media_duration(&self, input_path: &Path) -> CoreResult<f64> {
        log::debug!(
            "Running ffprobe (via crate) for duration on: {}",
            input_path.display()
        );
        let metadata = ffprobe(input_path).map_err(|err| map_ffprobe_error(err, "duration"))?;

        let raw = metadata.format.duration.ok_or_else(|| {
            CoreError::OperationFailed(format!(
                "ffprobe reported no duration for {}",
                input_path.display()
            ))
        })?;

        parse_duration(&raw).ok_or_else(|| {
            CoreError::OperationFailed(format!(
                "Unusable duration '{raw}' for {}",
                input_path.display()
            ))
        })
    }
}

impl DurationProbe for CrateFfprobeExecutor {
    fn probe_duration(&self, input_path: &Path) -> Option<f64> {
        match self.get_media_duration(input_path) {
            Ok(duration) => Some(duration),
            Err(e) => {
                log::debug!("Duration probe failed: {e}");
                None
            }
        }
    }
}

/// Parses ffprobe's textual duration. Only positive finite values count.
fn parse_duration(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => CoreError::OperationFailed(format!(
            "ffprobe {context} output deserialization: {err}"
        )),
        _ => CoreError::OperationFailed(format!(
            "Unknown ffprobe error during {context}: {err:?}"
        )),
    }
}

//! Hardware decoding configuration.
//!
//! The conversion asks ffmpeg to pick a decoder backend on its own
//! (`-hwaccel auto`). ffmpeg falls back to software decoding when no backend
//! is usable, so enabling it is always safe.
//!
//! **Important**: This module is ONLY for hardware DECODING. The video track
//! is always encoded in software with libx264.

use ffmpeg_sidecar::command::FfmpegCommand;

/// Value passed to `-hwaccel`.
pub const HWACCEL_MODE: &str = "auto";

/// Adds hardware decoding options to an `FFmpeg` command.
///
/// IMPORTANT: This must be called BEFORE adding the input file to the command.
///
/// # Arguments
///
/// * `cmd` - The `FFmpeg` command to add hardware decoding options to
/// * `use_hw_decode` - Whether to use hardware decoding
///
/// # Returns
///
/// * `bool` - Whether hardware decoding was added
pub fn add_hardware_decoding_to_command(cmd: &mut FfmpegCommand, use_hw_decode: bool) -> bool {
    if use_hw_decode {
        cmd.hwaccel(HWACCEL_MODE);
        return true;
    }

    false
}

/// Logs hardware decoding status at debug level.
pub fn log_hardware_decoding_status(use_hw_decode: bool) {
    if use_hw_decode {
        log::debug!("Hardware decoding: {HWACCEL_MODE}");
    } else {
        log::debug!("Hardware decoding: disabled");
    }
}

/// Human-readable description for settings output.
#[must_use]
pub fn get_hardware_decoding_info(use_hw_decode: bool) -> Option<String> {
    use_hw_decode.then(|| format!("ffmpeg -hwaccel {HWACCEL_MODE}"))
}

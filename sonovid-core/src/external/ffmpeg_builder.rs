//! FFmpeg command construction for the audio-to-video conversion
//!
//! The command pairs the input audio with a synthesized black frame source,
//! copies the audio stream untouched and encodes the static picture with
//! libx264. Only the preset, hardware decoding and thread count vary; every
//! other flag is fixed.
//!
//! IMPORTANT: Hardware acceleration in this module refers ONLY to hardware
//! DECODING. The video track is always encoded in software.

use crate::config::{CoreConfig, EncoderPreset};
use crate::hardware_decode::add_hardware_decoding_to_command;
use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::{Path, PathBuf};

/// lavfi source for the static video track.
pub const COLOR_SOURCE: &str = "color=c=black:s=1280x720:r=30";
pub const VIDEO_CODEC: &str = "libx264";
pub const VIDEO_TUNE: &str = "fastdecode";
pub const PIXEL_FORMAT: &str = "yuv420p";

/// Everything that varies between two conversion commands.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionParams {
    pub input: PathBuf,
    pub output: PathBuf,
    pub preset: EncoderPreset,
    pub hardware_accel: bool,
    pub threads: usize,
}

impl ConversionParams {
    /// Takes preset, hardware decoding and thread count from the settings.
    #[must_use]
    pub fn from_config(input: &Path, output: &Path, config: &CoreConfig) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            preset: config.encoder_preset,
            hardware_accel: config.hardware_accel,
            threads: config.effective_threads(),
        }
    }
}

/// Builds the ffmpeg invocation for one conversion.
///
/// Argument order:
/// `-y [-hwaccel auto] -i <input> -f lavfi -i <color source> -shortest
/// -c:a copy -c:v libx264 -preset <preset> -tune fastdecode -pix_fmt yuv420p
/// -threads <n> <output>`
#[must_use]
pub fn build_conversion_command(params: &ConversionParams) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.overwrite();

    // Must precede the input it applies to
    add_hardware_decoding_to_command(&mut cmd, params.hardware_accel);

    cmd.input(params.input.as_os_str());
    cmd.format("lavfi");
    cmd.input(COLOR_SOURCE);
    cmd.arg("-shortest");
    cmd.args(["-c:a", "copy"]);
    cmd.args(["-c:v", VIDEO_CODEC]);
    cmd.args(["-preset", params.preset.as_str()]);
    cmd.args(["-tune", VIDEO_TUNE]);
    cmd.args(["-pix_fmt", PIXEL_FORMAT]);
    cmd.arg("-threads");
    cmd.arg(params.threads.to_string());
    cmd.output(params.output.as_os_str());
    cmd
}

/// Argument list of a command, for logging and assertions.
#[must_use]
pub fn command_args(cmd: &mut FfmpegCommand) -> Vec<String> {
    cmd.as_inner()
        .get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

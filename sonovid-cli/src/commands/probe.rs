// sonovid-cli/src/commands/probe.rs
//
// `probe` prints what ffprobe reports for a file and the duration the
// progress calculation would use for it.

use crate::commands::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::error::{CliResult, cli_error};
use crate::terminal;
use sonovid_core::external::CrateFfprobeExecutor;
use sonovid_core::{CoreConfig, format_bytes, format_duration, is_supported_audio_file};
use std::path::Path;

/// Runs the `probe` command.
///
/// Exits with 1 when no duration could be read, so scripts can tell.
pub fn run_probe(input: &Path, config: &CoreConfig) -> CliResult<i32> {
    let metadata = std::fs::metadata(input).map_err(|e| {
        cli_error(format!("Invalid input path '{}': {}", input.display(), e))
    })?;

    terminal::print_section("Probe");
    terminal::print_status("File", &input.display().to_string(), true);
    terminal::print_status("Size", &format_bytes(metadata.len()), false);
    terminal::print_status(
        "Supported",
        if is_supported_audio_file(input) { "yes" } else { "no" },
        false,
    );

    let probed = CrateFfprobeExecutor::new().get_media_duration(input);
    let (reported, used, code) = match probed {
        Ok(secs) => (
            format!("{} ({secs:.2}s)", format_duration(secs)),
            secs,
            EXIT_SUCCESS,
        ),
        Err(e) => {
            log::warn!("{e}");
            ("unknown".to_string(), config.fallback_duration_secs, EXIT_FAILURE)
        }
    };

    terminal::print_status("Duration", &reported, false);
    terminal::print_status("Progress basis", &format!("{used:.0} seconds"), false);
    Ok(code)
}

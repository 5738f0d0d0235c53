// ============================================================================
// sonovid-cli/src/commands/convert.rs
// ============================================================================
//
// CONVERT COMMAND: One audio file in, one MP4 out
//
// Validates the input, applies command-line overrides on top of the loaded
// settings, starts the background conversion and renders its events as a
// progress bar with log lines above it. Ctrl-C requests cancellation; a
// second Ctrl-C exits immediately.
//
// KEY COMPONENTS:
// - run_convert: Entry point for the `convert` subcommand
// - apply_overrides: Merges ConvertArgs into CoreConfig
// - exit_code_for: Maps a JobOutcome to a process exit code

// ---- Internal crate imports ----
use crate::cli::ConvertArgs;
use crate::commands::{EXIT_CANCELLED, EXIT_FAILURE, EXIT_SUCCESS};
use crate::error::{CliResult, cli_error};
use crate::terminal::{self, ConversionProgress};

// ---- External crate imports ----
use sonovid_core::hardware_decode::get_hardware_decoding_info;
use sonovid_core::utils::output_path_for;
use sonovid_core::{
    AppContext, CancellationFlag, CoreConfig, CoreConfigBuilder, JobEvent, JobOutcome, JobReport,
    check_dependency, format_bytes, format_duration, is_supported_audio_file,
};

// ---- Standard library imports ----
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Runs the `convert` command.
///
/// # Arguments
///
/// * `args` - Parsed command-line arguments for the conversion
/// * `config` - Settings loaded from file and environment
///
/// # Returns
///
/// * `Ok(i32)` - Exit code: 0 on success, 1 on failure, 130 when cancelled
/// * `Err(CoreError)` - If the conversion could not be started at all
pub fn run_convert(args: ConvertArgs, config: CoreConfig) -> CliResult<i32> {
    let total_start_time = Instant::now();

    // ---- Validate input ----
    let input_path = args.input.canonicalize().map_err(|e| {
        cli_error(format!(
            "Invalid input path '{}': {}",
            args.input.display(),
            e
        ))
    })?;
    let metadata = fs::metadata(&input_path)?;
    if !metadata.is_file() {
        return Err(cli_error(format!(
            "Input path '{}' is not a file",
            input_path.display()
        )));
    }
    if !is_supported_audio_file(&input_path) {
        terminal::print_warning(&format!(
            "'{}' does not have a recognised audio extension; trying anyway",
            input_path.display()
        ));
    }

    // ---- External tools ----
    check_dependency("ffmpeg")?;
    if let Err(e) = check_dependency("ffprobe") {
        log::warn!("{e}; progress will be estimated from the default duration");
    }

    let config = apply_overrides(&args, config);
    config.validate()?;
    let output_path = output_path_for(&input_path, &config.output_dir)?;

    terminal::print_section("Conversion");
    terminal::print_status("File", &display_name(&input_path), true);
    terminal::print_status("Size", &format_bytes(metadata.len()), false);
    terminal::print_status("Output", &output_path.display().to_string(), false);
    terminal::print_status("Preset", config.encoder_preset.as_str(), false);
    if let Some(info) = get_hardware_decoding_info(config.hardware_accel) {
        terminal::print_status("Decoding", &info, false);
    }

    // ---- Start the job ----
    let mut context = AppContext::new(config);
    let handle = context.start_conversion(&input_path)?;
    install_interrupt_handler(handle.cancellation_flag());

    let progress = ConversionProgress::new(&display_name(&input_path));
    let report = handle.wait_with(|event| match event {
        JobEvent::Progress(percent) => progress.set_percent(*percent),
        JobEvent::Log(line) => progress.println(line),
        JobEvent::Finished(_) => progress.finish(),
    })?;

    if !args.no_history {
        context.record(&report);
        log::debug!(
            "History at {} now holds {} record(s)",
            context.config().history_path().display(),
            context.history().len()
        );
    }

    print_summary(&report, total_start_time);
    Ok(exit_code_for(report.outcome))
}

/// Applies command-line overrides on top of the loaded settings.
#[must_use]
pub fn apply_overrides(args: &ConvertArgs, config: CoreConfig) -> CoreConfig {
    let mut builder = CoreConfigBuilder::from_config(config);
    if let Some(dir) = &args.output_dir {
        builder = builder.output_dir(dir.clone());
    }
    if let Some(preset) = args.preset {
        builder = builder.encoder_preset(preset);
    }
    if args.no_hwaccel {
        builder = builder.hardware_accel(false);
    }
    if let Some(threads) = args.threads {
        builder = builder.thread_count(usize::from(threads));
    }
    builder.build()
}

#[must_use]
pub fn exit_code_for(outcome: JobOutcome) -> i32 {
    match outcome {
        JobOutcome::Succeeded => EXIT_SUCCESS,
        JobOutcome::Failed => EXIT_FAILURE,
        JobOutcome::Cancelled => EXIT_CANCELLED,
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// First Ctrl-C cancels the job, a second one exits without waiting.
fn install_interrupt_handler(flag: CancellationFlag) {
    let interrupted = Arc::new(AtomicBool::new(false));
    let result = ctrlc::set_handler(move || {
        if interrupted.swap(true, Ordering::SeqCst) {
            eprintln!();
            std::process::exit(EXIT_CANCELLED);
        }
        eprintln!("\nCancelling conversion... (press Ctrl-C again to exit immediately)");
        flag.cancel();
    });
    if let Err(e) = result {
        log::warn!("Could not install Ctrl-C handler: {e}");
    }
}

fn print_summary(report: &JobReport, started: Instant) {
    terminal::print_section("Summary");
    let elapsed = format_duration(started.elapsed().as_secs_f64());
    match report.outcome {
        JobOutcome::Succeeded => {
            let output = report.output_path.clone().unwrap_or_else(PathBuf::new);
            terminal::print_success(&format!("File saved to: {}", output.display()));
            if let Ok(meta) = fs::metadata(&output) {
                terminal::print_status("Output size", &format_bytes(meta.len()), false);
            }
        }
        JobOutcome::Cancelled => terminal::print_cancelled(&report.message),
        JobOutcome::Failed => terminal::print_error(&report.message),
    }
    terminal::print_status("Elapsed", &elapsed, false);
}

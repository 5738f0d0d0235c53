// sonovid-cli/src/commands/settings.rs
//
// `settings show` prints the effective settings; `settings set` edits the
// settings file. Edits start from the file contents, not the environment,
// so a SONOVID_* variable never gets persisted by accident.

use crate::cli::{SettingsCommand, SettingsSetArgs};
use crate::commands::EXIT_SUCCESS;
use crate::config::{load_file_settings, load_settings};
use crate::error::{CliResult, cli_error};
use crate::terminal;
use sonovid_core::{CoreConfig, CoreConfigBuilder};
use std::path::Path;

/// Runs a `settings` subcommand against the file at `config_path`.
pub fn run_settings(command: &SettingsCommand, config_path: &Path) -> CliResult<i32> {
    match command {
        SettingsCommand::Show => {
            let config = load_settings(config_path)?;
            show_settings(&config, config_path);
        }
        SettingsCommand::Set(args) => {
            if args.is_empty() {
                return Err(cli_error(
                    "Nothing to change; pass --output-dir, --preset or --hwaccel",
                ));
            }
            let updated = apply_settings(args, load_file_settings(config_path)?);
            updated.save(config_path)?;
            terminal::print_success(&format!("Settings saved to {}", config_path.display()));
            show_settings(&updated, config_path);
        }
    }
    Ok(EXIT_SUCCESS)
}

/// Applies the given changes to `config`.
#[must_use]
pub fn apply_settings(args: &SettingsSetArgs, config: CoreConfig) -> CoreConfig {
    let mut builder = CoreConfigBuilder::from_config(config);
    if let Some(dir) = &args.output_dir {
        builder = builder.output_dir(dir.clone());
    }
    if let Some(preset) = args.preset {
        builder = builder.encoder_preset(preset);
    }
    if let Some(enabled) = args.hwaccel {
        builder = builder.hardware_accel(enabled);
    }
    builder.build()
}

fn show_settings(config: &CoreConfig, config_path: &Path) {
    terminal::print_section("Settings");
    terminal::print_status("Settings file", &config_path.display().to_string(), false);
    terminal::print_status("Output dir", &config.output_dir.display().to_string(), true);
    terminal::print_status("History file", &config.history_path().display().to_string(), false);
    terminal::print_status("Preset", config.encoder_preset.as_str(), false);
    terminal::print_status(
        "Hardware decode",
        if config.hardware_accel { "on" } else { "off" },
        false,
    );
    terminal::print_status("Threads", &config.effective_threads().to_string(), false);
}

// sonovid-cli/src/main.rs
//
// Entry point of the `sonovid` binary.
//
// Responsibilities:
// - Parsing command-line arguments.
// - Setting up console (and optional file) logging.
// - Loading settings from file and environment.
// - Dispatching to the subcommand and exiting with its code.

use clap::Parser;
use sonovid_cli::commands::EXIT_FAILURE;
use sonovid_cli::config::{load_settings, resolve_config_path};
use sonovid_cli::logging::init_logging;
use sonovid_cli::{
    Cli, CliResult, Commands, run_convert, run_history, run_probe, run_settings, terminal,
};
use std::process;

fn run(cli: Cli) -> CliResult<i32> {
    if let Some(log_path) = init_logging(cli.verbose, cli.log_dir.as_deref())? {
        log::info!("Log file: {}", log_path.display());
    }

    let config_path = resolve_config_path(cli.config.as_deref());
    log::debug!("Settings file: {}", config_path.display());

    match cli.command {
        Commands::Convert(args) => run_convert(args, load_settings(&config_path)?),
        Commands::Probe { input } => run_probe(&input, &load_settings(&config_path)?),
        Commands::History(args) => run_history(&args, &load_settings(&config_path)?),
        Commands::Settings(command) => run_settings(&command, &config_path),
    }
}

fn main() {
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::debug!("Command failed: {e:?}");
            terminal::print_error(&e.to_string());
            EXIT_FAILURE
        }
    };
    process::exit(code);
}

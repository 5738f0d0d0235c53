// sonovid-cli/src/config.rs
//
// Resolves and loads the settings file for a CLI invocation. Precedence,
// lowest to highest: built-in defaults, settings file, SONOVID_* environment
// variables, command-line flags (applied by each command).

use crate::error::{CliErrorContext, CliResult};
use sonovid_core::CoreConfig;
use std::path::{Path, PathBuf};

/// Settings path used when `--config` is not given.
pub const FALLBACK_CONFIG_FILE: &str = "sonovid.toml";

/// The settings file this invocation reads and writes.
#[must_use]
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(CoreConfig::default_config_path)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_CONFIG_FILE))
}

/// Loads settings from `path` and applies environment overrides.
pub fn load_settings(path: &Path) -> CliResult<CoreConfig> {
    let mut config = CoreConfig::load(path)
        .cli_with_context(|| format!("Failed to load settings from {}", path.display()))?;
    config.apply_env_overrides();
    config.validate()?;
    log::debug!("Effective settings: {config:?}");
    Ok(config)
}

/// Loads settings from `path` without environment overrides, for editing.
pub fn load_file_settings(path: &Path) -> CliResult<CoreConfig> {
    CoreConfig::load(path)
        .cli_with_context(|| format!("Failed to load settings from {}", path.display()))
}

//! Configuration structures and constants for the sonovid-core library.
//!
//! This module provides the settings that drive a conversion: where outputs
//! and history go, how the video track is encoded, and how the progress
//! monitor and cancellation behave. Settings persist as TOML and can be
//! overridden through `SONOVID_*` environment variables.

mod builder;
pub mod utils;

use crate::error::{CoreError, CoreResult};
use crate::system_info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub use builder::CoreConfigBuilder;

// Default constants

/// Name of the output directory created under the user's home directory.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "Sonovid_Output";

/// History file name, stored alongside the converted videos.
pub const HISTORY_FILE_NAME: &str = "conversion_history.json";

/// Duration assumed when ffprobe cannot measure the input.
pub const DEFAULT_FALLBACK_DURATION_SECS: f64 = 100.0;

/// Every Nth diagnostic line is surfaced as a log message.
pub const DEFAULT_LOG_THROTTLE_INTERVAL: u64 = 30;

/// Seconds a cancelled ffmpeg gets to quit before it is killed.
pub const DEFAULT_TERMINATE_GRACE_SECS: u64 = 5;

/// Environment variable names that override file settings.
pub const ENV_OUTPUT_DIR: &str = "SONOVID_OUTPUT_DIR";
pub const ENV_PRESET: &str = "SONOVID_PRESET";
pub const ENV_HWACCEL: &str = "SONOVID_HWACCEL";
pub const ENV_THREADS: &str = "SONOVID_THREADS";

/// x264 speed preset for the static video track.
///
/// The picture never changes, so the fastest preset is the default; slower
/// presets only shrink the (already tiny) video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderPreset {
    #[default]
    Ultrafast,
    Fast,
    Medium,
    Slow,
}

impl EncoderPreset {
    /// The value passed to `-preset`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ultrafast => "ultrafast",
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
        }
    }
}

impl fmt::Display for EncoderPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncoderPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ultrafast" => Ok(Self::Ultrafast),
            "fast" => Ok(Self::Fast),
            "medium" => Ok(Self::Medium),
            "slow" => Ok(Self::Slow),
            other => Err(format!(
                "unknown preset '{other}' (expected ultrafast, fast, medium or slow)"
            )),
        }
    }
}

/// Main configuration structure for the sonovid-core library.
///
/// All fields have defaults, so a partial (or empty) settings file is valid.
///
/// # Examples
///
/// ```rust
/// use sonovid_core::config::{CoreConfigBuilder, EncoderPreset};
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .output_dir(PathBuf::from("/tmp/videos"))
///     .encoder_preset(EncoderPreset::Fast)
///     .hardware_accel(false)
///     .build();
///
/// assert_eq!(config.history_path(), PathBuf::from("/tmp/videos/conversion_history.json"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Directory where converted videos (and, by default, the history) are written
    pub output_dir: PathBuf,

    /// Overrides the history location (defaults to `output_dir/conversion_history.json`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,

    /// x264 preset for the video track
    pub encoder_preset: EncoderPreset,

    /// Whether to pass `-hwaccel auto` ahead of the input
    pub hardware_accel: bool,

    /// Duration assumed when probing fails, in seconds
    pub fallback_duration_secs: f64,

    /// Every Nth diagnostic line is forwarded as a log event
    pub log_throttle_interval: u64,

    /// Encoder threads (defaults to the logical core count)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_count: Option<usize>,

    /// Seconds to wait for a graceful quit after cancellation
    pub terminate_grace_period_secs: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            output_dir: Self::default_output_dir(),
            history_file: None,
            encoder_preset: EncoderPreset::default(),
            hardware_accel: true,
            fallback_duration_secs: DEFAULT_FALLBACK_DURATION_SECS,
            log_throttle_interval: DEFAULT_LOG_THROTTLE_INTERVAL,
            thread_count: None,
            terminate_grace_period_secs: DEFAULT_TERMINATE_GRACE_SECS,
        }
    }
}

impl CoreConfig {
    /// `~/Sonovid_Output`, or a relative directory when no home is known.
    #[must_use]
    pub fn default_output_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_OUTPUT_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR_NAME))
    }

    /// Where the settings file lives: `<config dir>/sonovid/config.toml`.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sonovid").join("config.toml"))
    }

    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| self.output_dir.join(HISTORY_FILE_NAME))
    }

    /// Thread count handed to ffmpeg.
    #[must_use]
    pub fn effective_threads(&self) -> usize {
        self.thread_count
            .filter(|&n| n > 0)
            .unwrap_or_else(system_info::cpu_core_count)
    }

    #[must_use]
    pub fn terminate_grace_period(&self) -> Duration {
        Duration::from_secs(self.terminate_grace_period_secs)
    }

    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(CoreError::Config("output_dir must not be empty".to_string()));
        }
        if !self.fallback_duration_secs.is_finite() || self.fallback_duration_secs <= 0.0 {
            return Err(CoreError::Config(format!(
                "fallback_duration_secs must be positive, got {}",
                self.fallback_duration_secs
            )));
        }
        if self.log_throttle_interval == 0 {
            return Err(CoreError::Config(
                "log_throttle_interval must be at least 1".to_string(),
            ));
        }
        if self.thread_count == Some(0) {
            return Err(CoreError::Config("thread_count must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Loads settings from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Writes settings as TOML, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Applies `SONOVID_*` overrides. Unparsable values are logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(dir) = utils::env_path(ENV_OUTPUT_DIR) {
            self.output_dir = dir;
        }
        if let Some(preset) = utils::env_parse::<EncoderPreset>(ENV_PRESET) {
            self.encoder_preset = preset;
        }
        if let Some(enabled) = utils::env_bool(ENV_HWACCEL) {
            self.hardware_accel = enabled;
        }
        if let Some(threads) = utils::env_parse::<usize>(ENV_THREADS).filter(|&n| n > 0) {
            self.thread_count = Some(threads);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_conversion_constants() {
        let config = CoreConfig::default();
        assert_eq!(config.encoder_preset, EncoderPreset::Ultrafast);
        assert!(config.hardware_accel);
        assert_eq!(config.fallback_duration_secs, 100.0);
        assert_eq!(config.log_throttle_interval, 30);
        assert_eq!(config.terminate_grace_period(), Duration::from_secs(5));
        assert!(config.output_dir.ends_with(DEFAULT_OUTPUT_DIR_NAME));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_history_path_follows_output_dir() {
        let mut config = CoreConfig {
            output_dir: PathBuf::from("/data/out"),
            ..CoreConfig::default()
        };
        assert_eq!(
            config.history_path(),
            PathBuf::from("/data/out/conversion_history.json")
        );

        config.history_file = Some(PathBuf::from("/elsewhere/h.json"));
        assert_eq!(config.history_path(), PathBuf::from("/elsewhere/h.json"));
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("ultrafast".parse::<EncoderPreset>(), Ok(EncoderPreset::Ultrafast));
        assert_eq!(" Medium ".parse::<EncoderPreset>(), Ok(EncoderPreset::Medium));
        assert!("veryslow".parse::<EncoderPreset>().is_err());
        assert_eq!(EncoderPreset::Slow.to_string(), "slow");
    }

    #[test]
    fn test_effective_threads() {
        let mut config = CoreConfig::default();
        assert_eq!(config.effective_threads(), system_info::cpu_core_count());
        config.thread_count = Some(2);
        assert_eq!(config.effective_threads(), 2);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_duration = CoreConfig {
            fallback_duration_secs: 0.0,
            ..CoreConfig::default()
        };
        assert!(matches!(bad_duration.validate(), Err(CoreError::Config(_))));

        let bad_interval = CoreConfig {
            log_throttle_interval: 0,
            ..CoreConfig::default()
        };
        assert!(bad_interval.validate().is_err());

        let bad_threads = CoreConfig {
            thread_count: Some(0),
            ..CoreConfig::default()
        };
        assert!(bad_threads.validate().is_err());
    }
}

// ============================================================================
// sonovid-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of CoreConfig, used by the CLI when layering command
// line flags over the loaded settings and by tests that need a config with a
// temporary output directory.
//
// KEY COMPONENTS:
// - CoreConfigBuilder: Builder struct for creating CoreConfig instances
// - from_config: Starts a builder from an existing configuration

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{CoreConfig, EncoderPreset};

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use sonovid_core::config::{CoreConfig, CoreConfigBuilder, EncoderPreset};
///
/// let base = CoreConfig::default();
/// let config = CoreConfigBuilder::from_config(base)
///     .encoder_preset(EncoderPreset::Medium)
///     .thread_count(2)
///     .build();
///
/// assert_eq!(config.encoder_preset, EncoderPreset::Medium);
/// assert_eq!(config.effective_threads(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration, e.g. one loaded from disk.
    #[must_use]
    pub fn from_config(config: CoreConfig) -> Self {
        Self { config }
    }

    /// Sets the output directory.
    ///
    /// # Arguments
    ///
    /// * `output_dir` - The directory where converted videos will be saved
    ///
    /// # Returns
    ///
    /// * Self for method chaining
    #[must_use]
    pub fn output_dir(mut self, output_dir: PathBuf) -> Self {
        self.config.output_dir = output_dir;
        self
    }

    /// Sets an explicit history file location.
    #[must_use]
    pub fn history_file(mut self, history_file: PathBuf) -> Self {
        self.config.history_file = Some(history_file);
        self
    }

    /// Sets the encoder preset.
    #[must_use]
    pub fn encoder_preset(mut self, preset: EncoderPreset) -> Self {
        self.config.encoder_preset = preset;
        self
    }

    /// Sets whether to request hardware decoding.
    #[must_use]
    pub fn hardware_accel(mut self, enable: bool) -> Self {
        self.config.hardware_accel = enable;
        self
    }

    /// Sets the duration assumed when probing fails.
    ///
    /// # Arguments
    ///
    /// * `secs` - Fallback duration in seconds
    ///
    /// # Returns
    ///
    /// * Self for method chaining
    #[must_use]
    pub fn fallback_duration_secs(mut self, secs: f64) -> Self {
        self.config.fallback_duration_secs = secs;
        self
    }

    /// Sets how many diagnostic lines pass between forwarded log lines.
    #[must_use]
    pub fn log_throttle_interval(mut self, interval: u64) -> Self {
        self.config.log_throttle_interval = interval;
        self
    }

    /// Sets the encoder thread count.
    #[must_use]
    pub fn thread_count(mut self, threads: usize) -> Self {
        self.config.thread_count = Some(threads);
        self
    }

    /// Sets the graceful-quit window used on cancellation.
    #[must_use]
    pub fn terminate_grace_period_secs(mut self, secs: u64) -> Self {
        self.config.terminate_grace_period_secs = secs;
        self
    }

    /// Builds the CoreConfig instance.
    #[must_use]
    pub fn build(self) -> CoreConfig {
        self.config
    }
}

//! Core library for turning audio files into static-picture videos with ffmpeg.
//!
//! This crate probes the input duration with ffprobe, runs ffmpeg against a
//! synthesized black frame, follows its diagnostic stream to report
//! progress, supports cancellation between diagnostic lines, and keeps a
//! JSON history of finished conversions.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use sonovid_core::{AppContext, CoreConfig, JobEvent};
//! use std::path::Path;
//!
//! let mut context = AppContext::new(CoreConfig::default());
//! let handle = context.start_conversion(Path::new("/music/song.m4a")).unwrap();
//!
//! let report = handle
//!     .wait_with(|event| {
//!         if let JobEvent::Progress(percent) = event {
//!             println!("{percent}%");
//!         }
//!     })
//!     .unwrap();
//!
//! context.record(&report);
//! println!("{}", report.message);
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod external;
pub mod hardware_decode;
pub mod history;
pub mod processing;
pub mod system_info;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder, EncoderPreset};
pub use context::AppContext;
pub use error::{CoreError, CoreResult};
pub use external::check_dependency;
pub use history::{HistoryRecord, HistoryStats, HistoryStore};
pub use processing::{
    CancellationFlag, ConversionJob, Converter, JobEvent, JobHandle, JobOutcome, JobReport,
    run_conversion,
};
pub use utils::{
    format_bytes, format_duration, is_supported_audio_file, parse_ffmpeg_time, progress_percent,
    time_to_seconds,
};

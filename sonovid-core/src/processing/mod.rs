// ============================================================================
// sonovid-core/src/processing/mod.rs
// ============================================================================
//
// PROCESSING: The conversion-progress pipeline
//
// KEY COMPONENTS:
// - lines: splits ffmpeg's diagnostic stream on \n and \r
// - monitor: line counting, log throttling and progress computation
// - job: one conversion from probe to exit status
// - orchestrator: background worker and job handle
//
// Control flow: duration probe -> spawn -> monitor loop -> completion report,
// with cancellation checked once per diagnostic line.

pub mod job;
pub mod lines;
pub mod monitor;
pub mod orchestrator;

pub use job::{
    CancellationFlag, ConversionJob, JobEvent, JobOutcome, JobReport, run_conversion,
};
pub use monitor::{LineVerdict, MonitorState, StreamMonitor};
pub use orchestrator::{Converter, JobHandle};

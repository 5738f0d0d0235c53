//! Tests for the conversion-progress pipeline
//!
//! These tests drive `run_conversion` with scripted ffmpeg processes and
//! verify:
//! - Progress computation against probed and fallback durations
//! - Log throttling of the diagnostic stream
//! - Cancellation, including the forced kill after the grace period
//! - Success and failure reporting from the exit status

use sonovid_core::config::{CoreConfig, CoreConfigBuilder};
use sonovid_core::external::mocks::{MockDurationProbe, MockFfmpegProcess, MockFfmpegSpawner};
use sonovid_core::{ConversionJob, CoreError, JobEvent, JobOutcome, JobReport, run_conversion};
use std::path::PathBuf;

fn test_config() -> CoreConfig {
    CoreConfigBuilder::new()
        .output_dir(PathBuf::from("/videos"))
        .thread_count(2)
        .build()
}

fn test_job() -> ConversionJob {
    ConversionJob::new(
        PathBuf::from("/music/song.m4a"),
        PathBuf::from("/videos/song.mp4"),
    )
}

fn run(
    spawner: &MockFfmpegSpawner,
    probe: &MockDurationProbe,
    config: &CoreConfig,
    job: &ConversionJob,
) -> (JobReport, Vec<JobEvent>) {
    let mut events = Vec::new();
    let report = run_conversion(spawner, probe, config, job, &mut |event| events.push(event));
    (report, events)
}

fn progress(events: &[JobEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            JobEvent::Progress(p) => Some(*p),
            _ => None,
        })
        .collect()
}

fn logs(events: &[JobEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            JobEvent::Log(line) => Some(line.clone()),
            _ => None,
        })
        .collect()
}

fn assert_finished_last(events: &[JobEvent], report: &JobReport) {
    let finished: Vec<&JobEvent> = events
        .iter()
        .filter(|e| matches!(e, JobEvent::Finished(_)))
        .collect();
    assert_eq!(finished.len(), 1, "exactly one Finished event");
    assert_eq!(events.last(), Some(&JobEvent::Finished(report.clone())));
}

#[test]
fn test_half_way_marker_reports_fifty_percent() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_process(MockFfmpegProcess::new(
        [
            "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from '/music/song.m4a':",
            "frame=  750 fps=0.0 q=-1.0 size=    1536kB time=00:01:40.00 bitrate= 125.8kbits/s",
        ],
        0,
    ));
    let probe = MockDurationProbe::new(Some(200.0));

    let (report, events) = run(&spawner, &probe, &test_config(), &test_job());

    assert_eq!(progress(&events), vec![50, 100]);
    assert_eq!(report.outcome, JobOutcome::Succeeded);
    assert_eq!(report.message, "Conversion succeeded");
    assert_eq!(report.output_path, Some(PathBuf::from("/videos/song.mp4")));
    assert_eq!(probe.probed_paths(), vec![PathBuf::from("/music/song.m4a")]);
    assert_finished_last(&events, &report);
}

#[test]
fn test_probe_failure_uses_fallback_and_succeeds() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_process(MockFfmpegProcess::new(["no markers", "still none"], 0));
    let probe = MockDurationProbe::new(None);

    let (report, events) = run(&spawner, &probe, &test_config(), &test_job());

    assert!(report.is_success());
    assert_eq!(progress(&events), vec![100]);
    let logs = logs(&events);
    assert!(logs.contains(&"Using default duration: 100 seconds".to_string()));
    assert!(logs.contains(&"File saved to: /videos/song.mp4".to_string()));
}

#[test]
fn test_non_positive_duration_uses_fallback() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_process(MockFfmpegProcess::new(["time=00:00:50.00"], 0));
    let probe = MockDurationProbe::new(Some(0.0));

    let (_, events) = run(&spawner, &probe, &test_config(), &test_job());

    // 50 s against the 100 s fallback
    assert_eq!(progress(&events), vec![50, 100]);
}

#[test]
fn test_startup_log_lines() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_process(MockFfmpegProcess::new(Vec::<String>::new(), 0));
    let probe = MockDurationProbe::new(Some(10.0));

    let (_, events) = run(&spawner, &probe, &test_config(), &test_job());

    let logs = logs(&events);
    assert_eq!(logs[0], "Starting conversion of song.m4a");
    assert_eq!(logs[1], "Using preset: ultrafast with 2 threads");
}

#[test]
fn test_progress_is_reported_in_stream_order() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_process(MockFfmpegProcess::new(
        [
            "time=00:01:00.00",
            "time=00:00:30.00",
            "time=N/A",
            "time=00:05:00.00",
        ],
        0,
    ));
    let probe = MockDurationProbe::new(Some(100.0));

    let (_, events) = run(&spawner, &probe, &test_config(), &test_job());

    assert_eq!(progress(&events), vec![60, 30, 100, 100]);
}

#[test]
fn test_every_thirtieth_line_is_forwarded() {
    let lines: Vec<String> = (1..=95).map(|i| format!("  ffmpeg line {i}  ")).collect();
    let spawner = MockFfmpegSpawner::new();
    spawner.add_process(MockFfmpegProcess::new(lines, 0));
    let probe = MockDurationProbe::new(Some(100.0));

    let (_, events) = run(&spawner, &probe, &test_config(), &test_job());

    let forwarded: Vec<String> = logs(&events)
        .into_iter()
        .filter(|l| l.starts_with("ffmpeg line"))
        .collect();
    assert_eq!(
        forwarded,
        vec!["ffmpeg line 30", "ffmpeg line 60", "ffmpeg line 90"]
    );
}

#[test]
fn test_cancellation_after_fifteen_lines() {
    let job = test_job();
    let lines: Vec<String> = (1..=40).map(|i| format!("line {i}")).collect();
    let process = MockFfmpegProcess::new(lines, 0).cancel_after(15, job.cancellation_flag());
    let state = process.state();
    let spawner = MockFfmpegSpawner::new();
    spawner.add_process(process);
    let probe = MockDurationProbe::new(Some(100.0));

    let (report, events) = run(&spawner, &probe, &test_config(), &job);

    assert_eq!(report.outcome, JobOutcome::Cancelled);
    assert_eq!(report.message, "Conversion cancelled by user");
    assert_eq!(report.output_path, None);
    assert_eq!(report.output_display(), "");
    assert!(progress(&events).is_empty());
    assert!(logs(&events).contains(&"Conversion cancelled".to_string()));

    let state = *state.lock().unwrap();
    assert!(state.stop_requested);
    assert!(!state.killed);
    assert_finished_last(&events, &report);
}

#[test]
fn test_cancel_before_start_never_spawns() {
    let job = test_job();
    job.cancel();
    let spawner = MockFfmpegSpawner::new();
    let probe = MockDurationProbe::new(Some(100.0));

    let (report, _) = run(&spawner, &probe, &test_config(), &job);

    assert_eq!(report.outcome, JobOutcome::Cancelled);
    assert!(spawner.received_calls().is_empty());
}

#[test]
fn test_unresponsive_process_is_killed_after_grace_period() {
    let job = test_job();
    let process = MockFfmpegProcess::new(["a", "b", "c"], 0)
        .cancel_after(1, job.cancellation_flag())
        .ignore_stop();
    let state = process.state();
    let spawner = MockFfmpegSpawner::new();
    spawner.add_process(process);
    let probe = MockDurationProbe::new(Some(100.0));
    let config = CoreConfigBuilder::from_config(test_config())
        .terminate_grace_period_secs(0)
        .build();

    let (report, _) = run(&spawner, &probe, &config, &job);

    assert_eq!(report.outcome, JobOutcome::Cancelled);
    let state = *state.lock().unwrap();
    assert!(state.stop_requested);
    assert!(state.killed);
    assert!(state.waited);
}

#[test]
fn test_failed_kill_still_reports_cancellation() {
    let job = test_job();
    let process = MockFfmpegProcess::new(["a", "b", "c"], 0)
        .cancel_after(1, job.cancellation_flag())
        .ignore_stop()
        .failing_kill();
    let state = process.state();
    let spawner = MockFfmpegSpawner::new();
    spawner.add_process(process);
    let probe = MockDurationProbe::new(Some(100.0));
    let config = CoreConfigBuilder::from_config(test_config())
        .terminate_grace_period_secs(0)
        .build();

    let (report, events) = run(&spawner, &probe, &config, &job);

    assert_eq!(report.outcome, JobOutcome::Cancelled);
    assert_eq!(report.message, "Conversion cancelled by user");
    assert_eq!(report.output_path, None);
    assert!(logs(&events).contains(&"Conversion cancelled".to_string()));
    assert!(state.lock().unwrap().stop_requested);
    assert_finished_last(&events, &report);
}

#[test]
fn test_overflowing_time_marker_is_dropped() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_process(MockFfmpegProcess::new(
        [
            "time=3000000000000000:00:00.00",
            "time=0:200000000000000000:00",
            "time=00:00:20.00",
        ],
        0,
    ));
    let probe = MockDurationProbe::new(Some(100.0));

    let (report, events) = run(&spawner, &probe, &test_config(), &test_job());

    assert_eq!(report.outcome, JobOutcome::Succeeded);
    assert_eq!(progress(&events), vec![20, 100]);
    assert_finished_last(&events, &report);
}

#[test]
fn test_non_zero_exit_reports_failure() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_process(MockFfmpegProcess::new(["time=00:00:10.00", "Error"], 1));
    let probe = MockDurationProbe::new(Some(100.0));

    let (report, events) = run(&spawner, &probe, &test_config(), &test_job());

    assert_eq!(report.outcome, JobOutcome::Failed);
    assert_eq!(report.message, "Conversion failed with exit code 1");
    assert_eq!(report.output_path, None);
    assert_eq!(progress(&events), vec![10]);
}

#[test]
fn test_spawn_error_becomes_failed_report() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_spawn_error(CoreError::OperationFailed("ffmpeg exploded".to_string()));
    let probe = MockDurationProbe::new(Some(100.0));

    let (report, events) = run(&spawner, &probe, &test_config(), &test_job());

    assert_eq!(report.outcome, JobOutcome::Failed);
    assert_eq!(report.message, "ffmpeg exploded");
    assert!(logs(&events).contains(&"Critical error: ffmpeg exploded".to_string()));
    assert_finished_last(&events, &report);
}

#[test]
fn test_command_line_passed_to_spawner() {
    let spawner = MockFfmpegSpawner::new();
    spawner.add_process(MockFfmpegProcess::new(Vec::<String>::new(), 0));
    let probe = MockDurationProbe::new(Some(100.0));

    run(&spawner, &probe, &test_config(), &test_job());

    let calls = spawner.received_calls();
    assert_eq!(calls.len(), 1);
    let args = &calls[0];
    let after = |flag: &str| {
        let pos = args.iter().position(|a| a == flag).unwrap();
        args[pos + 1].clone()
    };
    assert_eq!(after("-hwaccel"), "auto");
    assert_eq!(after("-preset"), "ultrafast");
    assert_eq!(after("-threads"), "2");
    assert_eq!(after("-c:a"), "copy");
    assert_eq!(args.last().map(String::as_str), Some("/videos/song.mp4"));
}

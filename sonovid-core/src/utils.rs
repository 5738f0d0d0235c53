//! Utility functions for time parsing, formatting and path handling.
//!
//! The time helpers here are the arithmetic half of the stream monitor:
//! turning an ffmpeg `time=` marker into whole seconds and whole seconds into
//! a progress percentage.

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Extension given to every conversion output.
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Audio formats the converter is meant for. Other inputs are still passed
/// to ffmpeg, the CLI only warns about them.
pub const SUPPORTED_AUDIO_EXTENSIONS: &[&str] = &["m4a", "mp3", "wav", "flac", "ogg", "aac", "wma"];

/// Checks whether the path is an existing file with a supported audio extension
/// (case-insensitive).
#[must_use]
pub fn is_supported_audio_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                SUPPORTED_AUDIO_EXTENSIONS
                    .iter()
                    .any(|supported| ext.eq_ignore_ascii_case(supported))
            })
}

/// Parses an ffmpeg elapsed-time marker into whole seconds.
///
/// Accepts `H:MM:SS`, `M:SS` or a bare number of seconds. Any fractional part
/// of the seconds field is truncated. Returns `None` for anything else,
/// including negative totals (ffmpeg prints those before the first frame)
/// and totals that do not fit in 64 bits.
#[must_use]
pub fn parse_ffmpeg_time(time: &str) -> Option<u64> {
    let parts: Vec<&str> = time.split(':').collect();
    let total = match parts.as_slice() {
        [hours, minutes, seconds] => parse_whole(hours)?
            .checked_mul(3600)?
            .checked_add(parse_whole(minutes)?.checked_mul(60)?)?
            .checked_add(parse_whole_seconds(seconds)?)?,
        [minutes, seconds] => parse_whole(minutes)?
            .checked_mul(60)?
            .checked_add(parse_whole_seconds(seconds)?)?,
        [seconds] => parse_whole_seconds(seconds)?,
        _ => return None,
    };
    u64::try_from(total).ok()
}

/// Total version of [`parse_ffmpeg_time`]: malformed markers count as zero.
#[must_use]
pub fn time_to_seconds(time: &str) -> u64 {
    parse_ffmpeg_time(time).unwrap_or(0)
}

fn parse_whole(field: &str) -> Option<i64> {
    field.parse::<i64>().ok()
}

fn parse_whole_seconds(field: &str) -> Option<i64> {
    let whole = field.split('.').next()?;
    // "-0.04" loses its sign once the fraction is dropped
    if whole == "-" || whole == "-0" {
        return Some(0);
    }
    parse_whole(whole)
}

/// Converts elapsed seconds into an integer percentage of `duration_secs`.
///
/// Computes `floor(min(elapsed / duration * 100, 100))`. Returns `None` when
/// the duration is not a positive finite number.
#[must_use]
pub fn progress_percent(elapsed_secs: u64, duration_secs: f64) -> Option<u8> {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return None;
    }
    let percent = (elapsed_secs as f64 * 100.0 / duration_secs).floor();
    Some(percent.clamp(0.0, 100.0) as u8)
}

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Extracts the file name from a path, or fails if the path has none.
pub fn get_filename_safe(path: &Path) -> CoreResult<String> {
    Ok(path
        .file_name()
        .ok_or_else(|| CoreError::PathError(format!("Failed to get filename for {}", path.display())))?
        .to_string_lossy()
        .to_string())
}

/// Format label recorded in history: the upper-cased extension without the dot.
#[must_use]
pub fn format_label(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}

/// Output location for an input: `<output_dir>/<input stem>.mp4`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> CoreResult<PathBuf> {
    let stem = input.file_stem().ok_or_else(|| {
        CoreError::PathError(format!(
            "Cannot derive an output name from {}",
            input.display()
        ))
    })?;
    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(OUTPUT_EXTENSION);
    Ok(output_dir.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ffmpeg_time_hours_minutes_seconds() {
        assert_eq!(parse_ffmpeg_time("00:00:00"), Some(0));
        assert_eq!(parse_ffmpeg_time("00:01:40.00"), Some(100));
        assert_eq!(parse_ffmpeg_time("01:02:03"), Some(3723));
        assert_eq!(parse_ffmpeg_time("1:00:59.99"), Some(3659));
        assert_eq!(parse_ffmpeg_time("00:60:00"), Some(3600));
    }

    #[test]
    fn test_parse_ffmpeg_time_minutes_seconds_and_bare() {
        assert_eq!(parse_ffmpeg_time("2:05"), Some(125));
        assert_eq!(parse_ffmpeg_time("02:05.75"), Some(125));
        assert_eq!(parse_ffmpeg_time("42"), Some(42));
        assert_eq!(parse_ffmpeg_time("42.9"), Some(42));
    }

    #[test]
    fn test_parse_ffmpeg_time_rejects_malformed() {
        assert_eq!(parse_ffmpeg_time(""), None);
        assert_eq!(parse_ffmpeg_time("N/A"), None);
        assert_eq!(parse_ffmpeg_time("aa:bb:cc"), None);
        assert_eq!(parse_ffmpeg_time("00:00:00:00"), None);
        assert_eq!(parse_ffmpeg_time("1:"), None);
        assert_eq!(parse_ffmpeg_time("-577014:32:22.77"), None);
    }

    #[test]
    fn test_time_to_seconds_is_total() {
        assert_eq!(time_to_seconds("00:01:40.00"), 100);
        assert_eq!(time_to_seconds("N/A"), 0);
        assert_eq!(time_to_seconds("garbage"), 0);
        assert_eq!(time_to_seconds("-00:00:00.04"), 0);
    }

    #[test]
    fn test_oversized_fields_do_not_overflow() {
        assert_eq!(parse_ffmpeg_time("3000000000000000:00:00"), None);
        assert_eq!(parse_ffmpeg_time("0:200000000000000000:00"), None);
        assert_eq!(parse_ffmpeg_time("200000000000000000:00"), None);
        assert_eq!(parse_ffmpeg_time("0:0:99999999999999999999"), None);
        assert_eq!(time_to_seconds("3000000000000000:00:00.00"), 0);
        assert_eq!(parse_ffmpeg_time("2562047788015215:30:07"), Some(i64::MAX as u64));
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(100, 200.0), Some(50));
        assert_eq!(progress_percent(0, 200.0), Some(0));
        assert_eq!(progress_percent(29, 100.0), Some(29));
        assert_eq!(progress_percent(199, 200.0), Some(99));
        assert_eq!(progress_percent(500, 200.0), Some(100));
        assert_eq!(progress_percent(10, 0.0), None);
        assert_eq!(progress_percent(10, -5.0), None);
        assert_eq!(progress_percent(10, f64::NAN), None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(3661.0), "01:01:01");
        assert_eq!(format_duration(59.9), "00:00:59");
        assert_eq!(format_duration(-1.0), "??:??:??");
        assert_eq!(format_duration(f64::NAN), "??:??:??");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(1024 * 1024 * 2), "2.00 MiB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00 GiB");
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(Path::new("/music/song.m4a")), "M4A");
        assert_eq!(format_label(Path::new("track.Flac")), "FLAC");
        assert_eq!(format_label(Path::new("no_extension")), "");
    }

    #[test]
    fn test_output_path_for() {
        let out = output_path_for(Path::new("/music/My Song.mp3"), Path::new("/videos")).unwrap();
        assert_eq!(out, PathBuf::from("/videos/My Song.mp4"));

        let dotted = output_path_for(Path::new("a.b.wav"), Path::new("out")).unwrap();
        assert_eq!(dotted, PathBuf::from("out/a.b.mp4"));

        assert!(output_path_for(Path::new("/"), Path::new("out")).is_err());
    }

    #[test]
    fn test_get_filename_safe() {
        assert_eq!(get_filename_safe(Path::new("/path/to/file.m4a")).unwrap(), "file.m4a");
        assert!(get_filename_safe(Path::new("/")).is_err());
    }

    #[test]
    fn test_is_supported_audio_file() {
        let dir = tempfile::tempdir().unwrap();
        let upper = dir.path().join("song.MP3");
        let video = dir.path().join("clip.mkv");
        std::fs::write(&upper, b"x").unwrap();
        std::fs::write(&video, b"x").unwrap();

        assert!(is_supported_audio_file(&upper));
        assert!(!is_supported_audio_file(&video));
        assert!(!is_supported_audio_file(&dir.path().join("missing.wav")));
        assert!(!is_supported_audio_file(dir.path()));
    }
}

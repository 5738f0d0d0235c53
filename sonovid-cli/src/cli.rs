// sonovid-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use sonovid_core::EncoderPreset;
use sonovid_core::config::utils::parse_bool;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Sonovid: audio to static-picture video converter",
    long_about = "Pairs an audio file with a black 720p frame and encodes it to MP4 using ffmpeg via sonovid-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase console log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Settings file (defaults to <config dir>/sonovid/config.toml)
    #[arg(long, global = true, value_name = "FILE", env = "SONOVID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write a debug log file into this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts an audio file into an MP4 video with a static black picture
    Convert(ConvertArgs),

    /// Shows the duration ffprobe reports for a file
    Probe {
        /// Audio file to inspect
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Lists or clears the conversion history
    History(HistoryArgs),

    /// Shows or changes persistent settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Audio file to convert (m4a, mp3, wav, flac, ogg, aac, wma)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory where the video is written (overrides settings)
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// x264 preset: ultrafast, fast, medium or slow
    #[arg(long, value_name = "PRESET")]
    pub preset: Option<EncoderPreset>,

    /// Do not request hardware-accelerated decoding
    #[arg(long)]
    pub no_hwaccel: bool,

    /// Encoder thread count (defaults to the number of CPU cores)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,

    /// Do not add this conversion to the history
    #[arg(long)]
    pub no_history: bool,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Remove every history record
    #[arg(long)]
    pub clear: bool,

    /// Show at most N records (newest first)
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,

    /// Print the records as JSON
    #[arg(long, conflicts_with = "clear")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Prints the effective settings
    Show,

    /// Changes settings and saves them
    Set(SettingsSetArgs),
}

#[derive(Args, Debug)]
pub struct SettingsSetArgs {
    /// Default output directory
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Default x264 preset
    #[arg(long, value_name = "PRESET")]
    pub preset: Option<EncoderPreset>,

    /// Hardware-accelerated decoding: on or off
    #[arg(long, value_name = "on|off", value_parser = parse_toggle)]
    pub hwaccel: Option<bool>,
}

impl SettingsSetArgs {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output_dir.is_none() && self.preset.is_none() && self.hwaccel.is_none()
    }
}

fn parse_toggle(value: &str) -> Result<bool, String> {
    parse_bool(value).ok_or_else(|| format!("expected on or off, got '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert_defaults() {
        let cli = Cli::parse_from(["sonovid", "convert", "song.m4a"]);
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.input, PathBuf::from("song.m4a"));
                assert!(args.output_dir.is_none());
                assert!(args.preset.is_none());
                assert!(!args.no_hwaccel);
                assert!(!args.no_history);
            }
            other => panic!("Expected Convert command, got {other:?}"),
        }
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_convert_with_overrides() {
        let cli = Cli::parse_from([
            "sonovid", "-vv", "convert", "in.wav", "-o", "out", "--preset", "slow",
            "--no-hwaccel", "--threads", "2",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
                assert_eq!(args.preset, Some(EncoderPreset::Slow));
                assert!(args.no_hwaccel);
                assert_eq!(args.threads, Some(2));
            }
            other => panic!("Expected Convert command, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Cli::try_parse_from(["sonovid", "convert", "a.mp3", "--preset", "placebo"]).is_err());
        assert!(Cli::try_parse_from(["sonovid", "convert", "a.mp3", "--threads", "0"]).is_err());
        assert!(Cli::try_parse_from(["sonovid", "settings", "set", "--hwaccel", "maybe"]).is_err());
        assert!(Cli::try_parse_from(["sonovid", "history", "--clear", "--json"]).is_err());
    }

    #[test]
    fn test_parse_settings_set() {
        let cli = Cli::parse_from(["sonovid", "settings", "set", "--hwaccel", "off"]);
        match cli.command {
            Commands::Settings(SettingsCommand::Set(args)) => {
                assert_eq!(args.hwaccel, Some(false));
                assert!(!args.is_empty());
            }
            other => panic!("Expected settings set, got {other:?}"),
        }
    }
}

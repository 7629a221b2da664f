//! CLI argument parsing and configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::capture::CameraPolicy;
use crate::config::{AppConfig, Settings};
use crate::error::ConfigError;

/// Lock distracting apps until you finish your pushups
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "fitlock", version, about)]
pub struct Args {
    /// Config file (default: ~/.config/fitlock/config.json)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How the camera permission check resolves
    #[arg(long, value_enum)]
    pub camera: Option<CameraPolicy>,

    /// Device node checked by `--camera probe`
    #[arg(long, value_name = "PATH")]
    pub camera_device: Option<PathBuf>,

    /// Directory for the database and log file
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// JSON file replacing the built-in app catalog
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// JSON-lines pose landmarks to replay through the rep detector
    #[arg(long, value_name = "FILE")]
    pub pose_replay: Option<PathBuf>,

    /// Frames per second for --pose-replay
    #[arg(long, value_name = "N")]
    pub replay_fps: Option<u32>,

    /// How long rep feedback stays on screen, in milliseconds
    #[arg(long, value_name = "MS")]
    pub feedback_ms: Option<u64>,

    /// Don't ring the terminal bell on reps and completion
    #[arg(long)]
    pub no_bell: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse CLI arguments, merge the config file and return settings
pub fn parse_args() -> Result<Settings, ConfigError> {
    let args = Args::parse();
    let file = AppConfig::discover(args.config.as_deref())?;
    Settings::resolve(&args, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "fitlock",
            "--camera",
            "denied",
            "--replay-fps",
            "30",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.camera, Some(CameraPolicy::Denied));
        assert_eq!(args.replay_fps, Some(30));
        assert!(args.verbose);
        assert!(!args.no_bell);
    }

    #[test]
    fn test_rejects_unknown_camera_policy() {
        assert!(Args::try_parse_from(["fitlock", "--camera", "maybe"]).is_err());
    }
}

//! CLI argument parsing with clap

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Parser;
use std::path::PathBuf;

/// Pixel Porter - media file organization tool
///
/// Sorts photos and videos into date-named folders by their true capture
/// time, extracted from EXIF data, video metadata, or file system
/// timestamps. Files that cannot be classified or placed are diverted to
/// an untreated directory instead of being dropped.
#[derive(Parser, Debug)]
#[command(name = "pixel-porter")]
#[command(author, version, about, long_about = None)]
pub struct SortArgs {
    /// Input directory to scan for media files
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory for organized files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to configuration file (TOML format)
    ///
    /// Defaults to pixel_porter.toml next to the executable.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,
}

/// Retime - restore file system timestamps from timestamp-named files
///
/// For each file whose name starts with a YYYYMMDD_HHMMSS timestamp,
/// copies it into a fresh dated directory and rewrites the copy's
/// modification and access times (and creation time where the platform
/// allows) to match the name.
#[derive(Parser, Debug)]
#[command(name = "retime")]
#[command(author, version, about, long_about = None)]
pub struct RetimeArgs {
    /// Input directory containing timestamp-named files
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Regex matching the timestamp at the start of each filename
    #[arg(short, long, default_value = r"^(\d{8})_(\d{6})")]
    pub pattern: String,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to configuration file (TOML format)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,
}

/// Resolve the input/output directories from CLI flags and config defaults.
/// CLI arguments take precedence over config file settings; missing either
/// directory after merging is a fatal configuration error.
pub fn resolve_dirs(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<(PathBuf, PathBuf)> {
    let input = input.or_else(|| config.input.clone()).ok_or_else(|| {
        Error::Config("no input directory given (use --input or set it in the config file)".into())
    })?;
    let output = output.or_else(|| config.output.clone()).ok_or_else(|| {
        Error::Config("no output directory given (use --output or set it in the config file)".into())
    })?;
    Ok((input, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_config() {
        let config = Config {
            input: Some(PathBuf::from("/cfg/in")),
            output: Some(PathBuf::from("/cfg/out")),
            ..Config::default()
        };
        let (input, output) =
            resolve_dirs(Some(PathBuf::from("/cli/in")), None, &config).unwrap();
        assert_eq!(input, PathBuf::from("/cli/in"));
        assert_eq!(output, PathBuf::from("/cfg/out"));
    }

    #[test]
    fn test_missing_dirs_is_fatal() {
        let config = Config::default();
        assert!(resolve_dirs(None, Some(PathBuf::from("/out")), &config).is_err());
        assert!(resolve_dirs(Some(PathBuf::from("/in")), None, &config).is_err());
    }

    #[test]
    fn test_retime_default_pattern() {
        let args = RetimeArgs::parse_from(["retime"]);
        assert_eq!(args.pattern, r"^(\d{8})_(\d{6})");
    }
}

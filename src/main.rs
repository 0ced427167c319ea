//! Pixel Porter - media file organization tool
//!
//! Forward pipeline entry point: scans an input tree, resolves each media
//! file's capture time, and sorts copies into date-named output
//! directories. See the `retime` binary for the inverse pipeline.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use pixel_porter::{resolve_dirs, setup_logging, Config, SortArgs, Sorter};
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file name looked up next to the executable when -C is omitted
const DEFAULT_CONFIG_NAME: &str = "pixel_porter.toml";

fn main() -> Result<()> {
    let args = SortArgs::parse();

    let exe_dir = get_executable_dir()?;
    let log_path = exe_dir
        .join("Log")
        .join(format!("Sort_{}.log", Local::now().format("%Y%m%d")));
    let _guard = setup_logging(&log_path, args.verbose, args.json_log)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Pixel Porter starting");

    let config = load_config(args.config.as_deref(), &exe_dir)?;
    let (input_dir, output_dir) = resolve_dirs(args.input, args.output, &config)?;
    validate_input_dir(&input_dir)?;

    let sorter = Sorter::new(config, input_dir, output_dir)?;
    let stats = sorter.run()?;

    println!("Done. {}", stats.summary());
    println!("Log: {}", log_path.display());
    Ok(())
}

/// Get the directory where the executable is located
fn get_executable_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    Ok(exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Load the config file: an explicit -C path must exist, the default
/// beside the executable is optional.
fn load_config(explicit: Option<&Path>, exe_dir: &Path) -> Result<Config> {
    if let Some(path) = explicit {
        info!(config_file = %path.display(), "Loading configuration from file");
        return Ok(Config::load_from_file(path)?);
    }

    let default_path = exe_dir.join(DEFAULT_CONFIG_NAME);
    if default_path.exists() {
        info!(config_file = %default_path.display(), "Loading configuration from file");
        return Ok(Config::load_from_file(&default_path)?);
    }

    Ok(Config::default())
}

fn validate_input_dir(input_dir: &Path) -> Result<()> {
    if !input_dir.exists() {
        anyhow::bail!("input directory does not exist: {}", input_dir.display());
    }
    if !input_dir.is_dir() {
        anyhow::bail!("input path is not a directory: {}", input_dir.display());
    }
    Ok(())
}

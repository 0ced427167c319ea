//! Retime - restore file system timestamps from timestamp-named files
//!
//! Inverse of the pixel-porter forward pipeline: parses the leading
//! `YYYYMMDD_HHMMSS` timestamp of each filename and rewrites the file
//! copy's modification/access (and, where supported, creation) times to
//! match. Exits 0 only if at least one file succeeded.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use pixel_porter::{resolve_dirs, setup_logging, Config, RetimeArgs, Rewriter};
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CONFIG_NAME: &str = "pixel_porter.toml";

fn main() -> Result<()> {
    let args = RetimeArgs::parse();

    let exe_dir = get_executable_dir()?;
    let log_path = exe_dir
        .join("Log")
        .join(format!("Retime_{}.log", Local::now().format("%Y%m%d")));
    let _guard = setup_logging(&log_path, args.verbose, false)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Retime starting");

    let config = load_config(args.config.as_deref(), &exe_dir)?;
    let (input_dir, output_dir) = resolve_dirs(args.input, args.output, &config)?;
    validate_input_dir(&input_dir)?;

    let rewriter = Rewriter::new(input_dir, output_dir, &args.pattern)?;
    let stats = rewriter.run()?;

    println!(
        "Done. Succeeded: {}, Failed: {}",
        stats.succeeded, stats.failed
    );

    if stats.succeeded == 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn get_executable_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    Ok(exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

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

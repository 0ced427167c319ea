//! Forward pipeline orchestration
//!
//! Walks the input tree, classifies every file, resolves capture times,
//! sorts the resolvable media chronologically, and commits each file to
//! the primary or diff directory for this run. Per-file failures divert
//! to the untreated sink; the run itself never aborts on one file.

use crate::config::{Config, MediaKind};
use crate::error::Result;
use crate::place::{collision_free, select_bucket, timestamp_stem, Bucket, STAMP_FORMAT};
use crate::time::{self, resolve_time, ResolvedTime};
use crate::untreated::{attempt_or_divert, UntreatedSink};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// OS bookkeeping files excluded from enumeration by exact name
const EXCLUDED_NAMES: &[&str] = &[".DS_Store", ".gitkeep"];

/// Per-run destination directories, created once per invocation.
///
/// Re-running later creates fresh primary/diff directories under a new
/// run stamp; the untreated directory is fixed across runs.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Formatted instant captured at orchestrator start
    pub run_stamp: String,
    /// Destination for files whose capture time matches the fs creation time
    pub primary_dir: PathBuf,
    /// Destination for files whose timestamps disagree
    pub diff_dir: PathBuf,
}

impl RunContext {
    pub fn new(output_dir: &Path) -> Self {
        let run_stamp = Local::now().format(STAMP_FORMAT).to_string();
        Self {
            primary_dir: output_dir.join(&run_stamp),
            diff_dir: output_dir.join("diff").join(&run_stamp),
            run_stamp,
        }
    }
}

/// Counters for one forward run
#[derive(Debug, Default, Clone)]
pub struct SortStats {
    pub total: usize,
    pub primary: usize,
    pub diff: usize,
    pub untreated: usize,
}

impl SortStats {
    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Primary: {}, Diff: {}, Untreated: {}",
            self.total, self.primary, self.diff, self.untreated
        )
    }
}

/// Forward pipeline: ingest a directory tree and sort copies of its media
/// files into date-named output directories.
pub struct Sorter {
    config: Config,
    input_dir: PathBuf,
    output_dir: PathBuf,
    sink: UntreatedSink,
}

impl Sorter {
    /// Create a sorter. The output and untreated directories are created
    /// up front; the dated directories are created lazily at commit time.
    pub fn new(config: Config, input_dir: PathBuf, output_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&output_dir)?;
        let sink = UntreatedSink::new(output_dir.join("untreated"))?;
        Ok(Self {
            config,
            input_dir,
            output_dir,
            sink,
        })
    }

    /// Run the forward pipeline.
    pub fn run(&self) -> Result<SortStats> {
        let mut stats = SortStats::default();

        info!(input = %self.input_dir.display(), output = %self.output_dir.display(), "Sorting media files");

        let files = self.collect_files()?;
        stats.total = files.len();
        info!(count = files.len(), "Found files");

        // Classify and resolve; anything that fails goes straight to the sink
        let mut media: Vec<(PathBuf, ResolvedTime)> = Vec::new();
        for path in files {
            match self.config.classify(&path) {
                MediaKind::Other => {
                    info!(?path, "Non-media file");
                    if let Err(e) = self.sink.divert(&path) {
                        warn!(?path, error = %e, "Failed to divert non-media file");
                    }
                    stats.untreated += 1;
                }
                kind => {
                    match attempt_or_divert(&path, &self.sink, || resolve_time(&path, kind)) {
                        Some(resolved) => {
                            info!(
                                ?path,
                                source = ?resolved.source,
                                timestamp = %resolved.timestamp,
                                "Resolved capture time"
                            );
                            media.push((path, resolved));
                        }
                        None => stats.untreated += 1,
                    }
                }
            }
        }

        // Chronological order; stable sort keeps enumeration order on ties
        media.sort_by_key(|(_, resolved)| resolved.timestamp.timestamp());
        info!(count = media.len(), "Processing media files in chronological order");

        let ctx = RunContext::new(&self.output_dir);
        info!(run_stamp = %ctx.run_stamp, "Established run context");

        let bar = ProgressBar::new(media.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        for (path, resolved) in &media {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                bar.set_message(name.to_string());
            }

            let fs_created = time::fs::creation_time(path).ok().map(|(dt, _)| dt);
            let bucket = select_bucket(&resolved.timestamp, fs_created.as_ref());
            let target_dir = match bucket {
                Bucket::Primary => &ctx.primary_dir,
                Bucket::Diff => &ctx.diff_dir,
            };

            match attempt_or_divert(path, &self.sink, || {
                place_file(path, resolved, target_dir)
            }) {
                Some(dest) => {
                    info!(source = ?path, dest = ?dest, ?bucket, "Placed file");
                    match bucket {
                        Bucket::Primary => stats.primary += 1,
                        Bucket::Diff => stats.diff += 1,
                    }
                }
                None => stats.untreated += 1,
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        info!("{}", stats.summary());
        Ok(stats)
    }

    /// Recursively enumerate files under the input directory, excluding
    /// OS bookkeeping files by exact name.
    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.input_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if EXCLUDED_NAMES.contains(&name) {
                    continue;
                }
            }
            files.push(path.to_path_buf());
        }

        Ok(files)
    }
}

/// Copy `source` into `dir` under a collision-free timestamp name.
fn place_file(source: &Path, resolved: &ResolvedTime, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();

    let dest = collision_free(dir, &timestamp_stem(&resolved.timestamp), &ext)?;
    fs::copy(source, &dest)?;

    // Keep the source's mtime on the copy, like a metadata-preserving copy
    if let Ok(metadata) = fs::metadata(source) {
        if let Ok(mtime) = metadata.modified() {
            let _ = filetime::set_file_mtime(&dest, filetime::FileTime::from_system_time(mtime));
        }
    }

    Ok(dest)
}

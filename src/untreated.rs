//! Untreated holding area
//!
//! Files that are non-media, unresolvable, or failed during placement are
//! diverted here instead of aborting the run. Original filenames are kept,
//! with the numeric-suffix scheme applied on collision.

use crate::error::{Error, Result};
use crate::place::{collision_free, split_name};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Sink for files the pipelines could not treat
pub struct UntreatedSink {
    dir: PathBuf,
}

impl UntreatedSink {
    /// Create the sink, ensuring the holding directory exists.
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy a file into the holding directory, keeping its original name.
    pub fn divert(&self, file: &Path) -> Result<PathBuf> {
        let dest = self.slot_for(file)?;
        fs::copy(file, &dest)?;
        info!(source = ?file, dest = ?dest, "Diverted file to untreated directory");
        Ok(dest)
    }

    /// Move an already-placed copy into the holding directory.
    ///
    /// Used by the inverse pipeline when rewriting a copy's timestamps
    /// fails after the copy itself succeeded.
    pub fn claim(&self, file: &Path) -> Result<PathBuf> {
        let dest = self.slot_for(file)?;
        fs::rename(file, &dest)?;
        info!(source = ?file, dest = ?dest, "Moved file to untreated directory");
        Ok(dest)
    }

    fn slot_for(&self, file: &Path) -> Result<PathBuf> {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Config(format!("invalid filename: {}", file.display())))?;
        let (stem, ext) = split_name(name);
        collision_free(&self.dir, stem, &ext)
    }
}

/// Run `op` against `file`; on failure, log and divert the file.
///
/// All per-file failures are recovered here so one bad file never aborts
/// the batch. Only the diversion itself can still fail, and that is logged
/// rather than propagated.
pub fn attempt_or_divert<T>(
    file: &Path,
    sink: &UntreatedSink,
    op: impl FnOnce() -> Result<T>,
) -> Option<T> {
    match op() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = ?file, error = %e, "Diverting file to untreated directory");
            if let Err(e) = sink.divert(file) {
                error!(path = ?file, error = %e, "Failed to divert file");
            }
            None
        }
    }
}

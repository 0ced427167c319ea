//! Inverse pipeline: restore file system timestamps from filenames
//!
//! For files already named by timestamp (as produced by the forward
//! pipeline), copies each into a fresh dated directory and rewrites the
//! copy's modification and access times to match the name. Creation time
//! is also rewritten where the platform has a facility for it.

use crate::error::{Error, Result};
use crate::place::{collision_free, split_name, STAMP_FORMAT};
use crate::untreated::UntreatedSink;
use chrono::{Local, NaiveDateTime, TimeZone};
use filetime::FileTime;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Counters for one inverse run
#[derive(Debug, Default, Clone)]
pub struct RewriteStats {
    pub succeeded: usize,
    pub failed: usize,
}

/// Inverse pipeline driver
pub struct Rewriter {
    input_dir: PathBuf,
    dated_dir: PathBuf,
    pattern: Regex,
    sink: UntreatedSink,
}

impl Rewriter {
    /// Create a rewriter. `pattern` must capture the date and time halves
    /// of the filename's leading `YYYYMMDD_HHMMSS` timestamp.
    pub fn new(input_dir: PathBuf, output_dir: PathBuf, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)?;

        fs::create_dir_all(&output_dir)?;
        let sink = UntreatedSink::new(output_dir.join("untreated"))?;

        let run_stamp = Local::now().format(STAMP_FORMAT).to_string();
        let dated_dir = output_dir.join(run_stamp);
        fs::create_dir_all(&dated_dir)?;

        Ok(Self {
            input_dir,
            dated_dir,
            pattern,
            sink,
        })
    }

    /// Process every file directly inside the input directory
    /// (non-recursive).
    pub fn run(&self) -> Result<RewriteStats> {
        let mut stats = RewriteStats::default();

        info!(input = %self.input_dir.display(), "Rewriting file times from filenames");

        for entry in fs::read_dir(&self.input_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    warn!(?path, "Filename is not valid UTF-8");
                    self.divert_unmatched(&path, &mut stats);
                    continue;
                }
            };

            match self.extract_time(&name) {
                Some(target) => match self.rewrite_one(&path, &name, target) {
                    Ok(dest) => {
                        info!(source = ?path, dest = ?dest, target = %target, "Rewrote file times");
                        stats.succeeded += 1;
                    }
                    Err(e) => {
                        error!(?path, error = %e, "Failed to rewrite file times");
                        stats.failed += 1;
                    }
                },
                None => {
                    warn!(?path, "No timestamp in filename");
                    self.divert_unmatched(&path, &mut stats);
                }
            }
        }

        info!(
            succeeded = stats.succeeded,
            failed = stats.failed,
            dated_dir = %self.dated_dir.display(),
            untreated_dir = %self.sink.dir().display(),
            "Retime complete"
        );

        Ok(stats)
    }

    /// Match the pattern against the filename's leading characters and
    /// parse the captured halves as `YYYYMMDDHHMMSS`.
    fn extract_time(&self, name: &str) -> Option<NaiveDateTime> {
        let caps = self.pattern.captures(name)?;
        // The timestamp must sit at the very start of the name, even when
        // the user-supplied pattern carries no ^ anchor
        if caps.get(0)?.start() != 0 {
            return None;
        }
        let date = caps.get(1)?.as_str();
        let time = caps.get(2)?.as_str();
        NaiveDateTime::parse_from_str(&format!("{}{}", date, time), "%Y%m%d%H%M%S").ok()
    }

    fn rewrite_one(&self, path: &Path, name: &str, target: NaiveDateTime) -> Result<PathBuf> {
        let (stem, ext) = split_name(name);
        let dest = collision_free(&self.dated_dir, stem, &ext)?;
        fs::copy(path, &dest)?;

        if let Err(e) = set_file_times_to(&dest, target) {
            // Divert the copy, not the source
            if let Err(claim_err) = self.sink.claim(&dest) {
                error!(path = ?dest, error = %claim_err, "Failed to divert copy");
            }
            return Err(e);
        }

        Ok(dest)
    }

    fn divert_unmatched(&self, path: &Path, stats: &mut RewriteStats) {
        if let Err(e) = self.sink.divert(path) {
            error!(?path, error = %e, "Failed to divert file");
        }
        stats.failed += 1;
    }
}

/// Set the file's modification and access times to `target`, interpreted
/// as local wall-clock time, and its creation time where the platform
/// supports that.
fn set_file_times_to(path: &Path, target: NaiveDateTime) -> Result<()> {
    // Wall-clock times repeated by a DST fall-back resolve to the earlier
    // instant; only times that never existed locally are rejected.
    let local = Local
        .from_local_datetime(&target)
        .earliest()
        .ok_or_else(|| Error::TimestampParse {
            source_info: path.display().to_string(),
            message: format!("{} is not a valid local time", target),
        })?;

    let ft = FileTime::from_unix_time(local.timestamp(), 0);
    filetime::set_file_times(path, ft, ft).map_err(|e| Error::TimeSet {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // Creation time is best effort; a missing facility is not a failure,
    // but an attempted call that errors is.
    match crate::os::set_creation_time(path, &local) {
        Ok(true) => debug!(?path, "Creation time set"),
        Ok(false) => debug!(?path, "Platform has no creation time facility"),
        Err(e) => {
            return Err(Error::TimeSet {
                path: path.to_path_buf(),
                message: format!("creation time: {}", e),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Datelike, Timelike};

    const DEFAULT_PATTERN: &str = r"^(\d{8})_(\d{6})";

    fn rewriter(input: &Path, output: &Path) -> Rewriter {
        Rewriter::new(input.to_path_buf(), output.to_path_buf(), DEFAULT_PATTERN).unwrap()
    }

    #[test]
    fn test_extract_time_from_name() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let rw = rewriter(input.path(), output.path());

        let dt = rw.extract_time("20241224_074052.jpg").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 12);
        assert_eq!(dt.day(), 24);
        assert_eq!(dt.hour(), 7);
        assert_eq!(dt.minute(), 40);
        assert_eq!(dt.second(), 52);

        // Suffix after the leading timestamp is fine
        assert!(rw.extract_time("20250623_195415_1.png").is_some());

        // Non-matches
        assert!(rw.extract_time("IMG_20241224_074052.jpg").is_none());
        assert!(rw.extract_time("photo.jpg").is_none());
        // Matches the pattern but is not a real date
        assert!(rw.extract_time("20241399_074052.jpg").is_none());
    }

    #[test]
    fn test_round_trip_mtime() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("20241224_074052.jpg"), b"img").unwrap();

        let stats = rewriter(input.path(), output.path()).run().unwrap();
        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.failed, 0);

        // Find the copy under out/<RUNSTAMP>/
        let dated: Vec<_> = fs::read_dir(output.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "untreated")
            .collect();
        assert_eq!(dated.len(), 1);
        let copy = dated[0].path().join("20241224_074052.jpg");
        assert!(copy.exists());

        let mtime = fs::metadata(&copy).unwrap().modified().unwrap();
        let local: DateTime<Local> = mtime.into();
        assert_eq!(
            local.naive_local(),
            NaiveDateTime::parse_from_str("20241224074052", "%Y%m%d%H%M%S").unwrap()
        );
    }

    #[test]
    fn test_set_file_times_tolerates_repeated_wall_clock_times() {
        // Every half hour of a US DST fall-back day; in an affected zone
        // one hour of these is ambiguous and must still resolve.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("witness.jpg");
        fs::write(&path, b"img").unwrap();

        let day = chrono::NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();
        for half_hour in 0..48 {
            let target = day.and_hms_opt(half_hour / 2, (half_hour % 2) * 30, 0).unwrap();
            set_file_times_to(&path, target).unwrap();
        }
    }

    #[test]
    fn test_unmatched_goes_to_untreated() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("holiday.jpg"), b"img").unwrap();

        let stats = rewriter(input.path(), output.path()).run().unwrap();
        assert_eq!(stats.succeeded, 0);
        assert_eq!(stats.failed, 1);
        assert!(output.path().join("untreated").join("holiday.jpg").exists());
        // Source is copied, not moved
        assert!(input.path().join("holiday.jpg").exists());
    }

    #[test]
    fn test_subdirectories_are_ignored() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let sub = input.path().join("nested");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("20241224_074052.jpg"), b"img").unwrap();

        let stats = rewriter(input.path(), output.path()).run().unwrap();
        assert_eq!(stats.succeeded, 0);
        assert_eq!(stats.failed, 0);
    }

    #[test]
    fn test_unanchored_pattern_matches_only_at_name_start() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let rw = Rewriter::new(
            input.path().to_path_buf(),
            output.path().to_path_buf(),
            r"(\d{8})_(\d{6})",
        )
        .unwrap();

        assert!(rw.extract_time("20241224_074052.jpg").is_some());
        // A mid-name timestamp is not a leading timestamp
        assert!(rw.extract_time("IMG_20241224_074052.jpg").is_none());
    }

    #[test]
    fn test_custom_pattern() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("IMG-20241224-074052.jpg"), b"img").unwrap();

        let rw = Rewriter::new(
            input.path().to_path_buf(),
            output.path().to_path_buf(),
            r"^IMG-(\d{8})-(\d{6})",
        )
        .unwrap();
        let stats = rw.run().unwrap();
        assert_eq!(stats.succeeded, 1);
    }
}

//! Destination naming and bucket selection

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset};
use std::path::{Path, PathBuf};

/// Rendering used for run stamps, destination stems, and bucket comparison
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Render a resolved timestamp as a destination filename stem.
pub fn timestamp_stem(dt: &DateTime<FixedOffset>) -> String {
    dt.format(STAMP_FORMAT).to_string()
}

/// Destination bucket for a placed media file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Resolved timestamp matches the file system creation time
    Primary,
    /// Timestamps disagree, or the creation time is unavailable
    Diff,
}

/// Decide which dated directory a file belongs in.
///
/// Comparison is on the second-truncated `YYYYMMDD_HHMMSS` rendering, so
/// sub-second differences never split files across buckets.
pub fn select_bucket(
    resolved: &DateTime<FixedOffset>,
    fs_created: Option<&DateTime<FixedOffset>>,
) -> Bucket {
    match fs_created {
        Some(created) if timestamp_stem(resolved) == timestamp_stem(created) => Bucket::Primary,
        _ => Bucket::Diff,
    }
}

/// Build a path in `dir` for `stem` + `ext` that does not collide with any
/// existing file, probing `stem.ext`, `stem_1.ext`, `stem_2.ext`, ...
///
/// `ext` includes the leading dot, or is empty. The probe-then-use sequence
/// assumes a single sequential writer.
pub fn collision_free(dir: &Path, stem: &str, ext: &str) -> Result<PathBuf> {
    let candidate = dir.join(format!("{}{}", stem, ext));
    if !candidate.exists() {
        return Ok(candidate);
    }

    for i in 1..10000 {
        let candidate = dir.join(format!("{}_{}{}", stem, i, ext));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(Error::Config(format!(
        "could not resolve filename conflict for {}{} in {}",
        stem,
        ext,
        dir.display()
    )))
}

/// Split a filename into (stem, dot-prefixed lowercase extension).
pub fn split_name(name: &str) -> (&str, String) {
    let path = Path::new(name);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    (stem, ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::at_east8;
    use chrono::NaiveDate;

    fn east8_dt(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        at_east8(
            NaiveDate::from_ymd_opt(2024, 12, 24)
                .unwrap()
                .and_hms_opt(h, m, s)
                .unwrap(),
        )
    }

    #[test]
    fn test_timestamp_stem() {
        assert_eq!(timestamp_stem(&east8_dt(7, 40, 52)), "20241224_074052");
    }

    #[test]
    fn test_bucket_selection() {
        let resolved = east8_dt(7, 40, 52);
        let same = east8_dt(7, 40, 52);
        let one_second_off = east8_dt(7, 40, 53);

        assert_eq!(select_bucket(&resolved, Some(&same)), Bucket::Primary);
        assert_eq!(select_bucket(&resolved, Some(&one_second_off)), Bucket::Diff);
        assert_eq!(select_bucket(&resolved, None), Bucket::Diff);
    }

    #[test]
    fn test_collision_free_sequence() {
        let dir = tempfile::tempdir().unwrap();

        // N files with the same stem get TS.jpg, TS_1.jpg, ... TS_{N-1}.jpg
        let expected = ["20241224_074052.jpg", "20241224_074052_1.jpg", "20241224_074052_2.jpg"];
        for name in expected {
            let path = collision_free(dir.path(), "20241224_074052", ".jpg").unwrap();
            assert_eq!(path.file_name().unwrap().to_str().unwrap(), name);
            std::fs::write(&path, b"x").unwrap();
        }
    }

    #[test]
    fn test_collision_free_empty_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = collision_free(dir.path(), "README", "").unwrap();
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), "README");
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("note.TXT"), ("note", ".txt".to_string()));
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz".to_string()));
        assert_eq!(split_name("no_extension"), ("no_extension", String::new()));
    }
}

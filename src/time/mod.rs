//! Capture-time resolution
//!
//! This module determines the "true" capture timestamp of a media file
//! through a prioritized fallback chain:
//! - EXIF metadata for images (DateTimeOriginal, then DateTime)
//! - Container metadata for videos via FFprobe
//! - File system birth time, else status-change time
//!
//! Every resolved timestamp is normalized to a fixed UTC+8 offset and
//! truncated to whole seconds. A parse or read failure in one source is
//! never fatal; resolution falls through to the next source.

pub mod exif;
pub mod fs;
pub mod video;

use crate::config::MediaKind;
use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike};
use std::path::Path;
use tracing::{debug, warn};

/// The fixed offset all resolved timestamps are normalized to.
pub fn east8() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

/// Relabel a naive wall-clock time as UTC+8 without converting it.
pub(crate) fn at_east8(naive: NaiveDateTime) -> DateTime<FixedOffset> {
    let offset = east8();
    DateTime::from_naive_utc_and_offset(naive - offset, offset)
}

/// Source of the resolved timestamp, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// EXIF DateTimeOriginal - when the image was taken
    ExifOriginal,
    /// EXIF DateTime - generic file modification field
    ExifDateTime,
    /// Video container metadata (creation date family)
    ContainerMetadata,
    /// File system birth time
    FileBirth,
    /// File system status-change time
    FileChange,
}

/// Result of timestamp resolution
#[derive(Debug, Clone)]
pub struct ResolvedTime {
    /// The resolved timestamp at UTC+8, truncated to whole seconds
    pub timestamp: DateTime<FixedOffset>,
    /// Source of the timestamp
    pub source: TimeSource,
}

impl ResolvedTime {
    fn new(timestamp: DateTime<FixedOffset>, source: TimeSource) -> Self {
        // Sub-second precision never affects naming or bucketing
        let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);
        Self { timestamp, source }
    }
}

/// Resolve the capture time of a file using its classified kind.
///
/// Metadata errors degrade to the file system fallback; only a failing
/// stat call yields [`Error::Unresolved`].
pub fn resolve_time(path: &Path, kind: MediaKind) -> Result<ResolvedTime> {
    if kind == MediaKind::Image {
        match exif::extract_exif_time(path) {
            Ok((dt, source)) => {
                debug!(?path, ?source, "Resolved time from EXIF");
                return Ok(ResolvedTime::new(dt, source));
            }
            Err(e) => debug!(?path, error = %e, "No usable EXIF time, falling back"),
        }
    }

    if kind == MediaKind::Video {
        match video::extract_video_time(path) {
            Ok(dt) => {
                debug!(?path, "Resolved time from video metadata");
                return Ok(ResolvedTime::new(dt, TimeSource::ContainerMetadata));
            }
            Err(e) => debug!(?path, error = %e, "No usable video metadata, falling back"),
        }
    }

    match fs::creation_time(path) {
        Ok((dt, source)) => {
            debug!(?path, ?source, "Resolved time from file system");
            Ok(ResolvedTime::new(dt, source))
        }
        Err(e) => {
            warn!(?path, error = %e, "All timestamp sources failed");
            Err(Error::Unresolved {
                path: path.to_path_buf(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    #[test]
    fn test_at_east8_relabels_without_converting() {
        let naive = NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let dt = at_east8(naive);
        assert_eq!(dt.naive_local(), naive);
        assert_eq!(dt.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_resolved_time_truncates_subseconds() {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_milli_opt(14, 30, 0, 123)
            .unwrap();
        let resolved = ResolvedTime::new(at_east8(naive), TimeSource::ExifOriginal);
        assert_eq!(resolved.timestamp.nanosecond(), 0);
    }

    #[test]
    fn test_exif_time_wins_over_file_system() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.jpg");
        exif::write_exif_fixture(&path, ::exif::Tag::DateTimeOriginal, "2023:05:01 10:00:00");

        // The file was just created, but the embedded capture time is what
        // the resolver must report.
        let resolved = resolve_time(&path, MediaKind::Image).unwrap();
        assert_eq!(resolved.source, TimeSource::ExifOriginal);
        let expected = NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(resolved.timestamp.naive_local(), expected);
        assert_eq!(resolved.timestamp.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_corrupt_image_falls_back_to_file_system() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"not a jpeg at all").unwrap();
        drop(f);

        let resolved = resolve_time(&path, MediaKind::Image).unwrap();
        assert!(matches!(
            resolved.source,
            TimeSource::FileBirth | TimeSource::FileChange
        ));
    }

    #[test]
    fn test_missing_file_is_unresolved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.jpg");
        let err = resolve_time(&path, MediaKind::Image).unwrap_err();
        assert!(matches!(err, Error::Unresolved { .. }));
    }
}

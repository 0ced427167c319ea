//! EXIF time extraction for images

use super::{at_east8, TimeSource};
use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use exif::{In, Reader, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

/// EXIF tags to try for date extraction, in priority order
const DATE_TAGS: &[(Tag, TimeSource)] = &[
    (Tag::DateTimeOriginal, TimeSource::ExifOriginal),
    (Tag::DateTime, TimeSource::ExifDateTime),
];

/// Extract capture time from EXIF metadata.
///
/// EXIF values carry no timezone; the literal value is relabeled as UTC+8
/// with no conversion.
pub fn extract_exif_time(path: &Path) -> Result<(DateTime<FixedOffset>, TimeSource)> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| Error::ExifRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    for (tag, source) in DATE_TAGS {
        if let Some(field) = exif.get_field(*tag, In::PRIMARY) {
            if let Some(naive) = parse_exif_datetime(&field.display_value().to_string()) {
                trace!(?path, ?tag, "Found EXIF date");
                return Ok((at_east8(naive), *source));
            }
        }
    }

    Err(Error::ExifRead {
        path: path.to_path_buf(),
        message: "No valid date tag found in EXIF data".to_string(),
    })
}

/// Parse EXIF datetime string format: "YYYY:MM:DD HH:MM:SS"
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches('"');

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }

    // Some writers include subseconds
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S%.f") {
        return Some(dt);
    }

    None
}

/// Write a minimal TIFF byte stream carrying a single EXIF date field.
/// Container detection is content based, so any extension works.
#[cfg(test)]
pub(crate) fn write_exif_fixture(path: &Path, tag: Tag, datetime: &str) {
    use exif::experimental::Writer;
    use exif::{Field, Value};
    use std::io::Cursor;

    let field = Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![datetime.as_bytes().to_vec()]),
    };
    let mut writer = Writer::new();
    writer.push_field(&field);
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).unwrap();
    std::fs::write(path, buf.into_inner()).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike};

    #[test]
    fn test_parse_exif_datetime() {
        let dt = parse_exif_datetime("2023:05:01 10:00:00").unwrap();
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.month(), 5);
        assert_eq!(dt.day(), 1);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 0);
        assert_eq!(dt.second(), 0);

        // With quotes, as rendered by some display values
        let dt = parse_exif_datetime("\"2024:01:15 14:30:00\"").unwrap();
        assert_eq!(dt.year(), 2024);

        // Subseconds are tolerated on parse, truncated later
        let dt = parse_exif_datetime("2024:01:15 14:30:00.25").unwrap();
        assert_eq!(dt.second(), 0);

        assert!(parse_exif_datetime("invalid").is_none());
        assert!(parse_exif_datetime("2024-01-15 14:30:00").is_none());
    }

    #[test]
    fn test_extract_datetime_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.jpg");
        write_exif_fixture(&path, Tag::DateTimeOriginal, "2023:05:01 10:00:00");

        let (dt, source) = extract_exif_time(&path).unwrap();
        assert_eq!(source, TimeSource::ExifOriginal);
        // The literal value is relabeled at UTC+8, never converted
        assert_eq!(
            dt.naive_local(),
            NaiveDate::from_ymd_opt(2023, 5, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
        assert_eq!(dt.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_generic_datetime_is_second_choice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edited.jpg");
        write_exif_fixture(&path, Tag::DateTime, "2024:01:15 14:30:00");

        let (dt, source) = extract_exif_time(&path).unwrap();
        assert_eq!(source, TimeSource::ExifDateTime);
        assert_eq!(dt.naive_local().hour(), 14);
    }
}

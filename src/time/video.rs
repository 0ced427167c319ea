//! Video container metadata extraction via FFprobe

use super::east8;
use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Metadata keys to try for the capture date, in priority order
const CREATION_DATE_KEYS: &[&str] = &[
    "creation_time",
    "com.apple.quicktime.creationdate",
    "date_time_original",
];

/// Cached FFprobe availability check
static FFPROBE_AVAILABLE: OnceLock<bool> = OnceLock::new();

fn is_ffprobe_available() -> bool {
    *FFPROBE_AVAILABLE.get_or_init(|| Command::new("ffprobe").arg("-version").output().is_ok())
}

/// Extract capture time from video container metadata using FFprobe.
///
/// Timezone-aware values are converted to UTC+8; naive values are assumed
/// to be UTC and converted.
pub fn extract_video_time(path: &Path) -> Result<DateTime<FixedOffset>> {
    if !is_ffprobe_available() {
        return Err(Error::FfprobeNotFound);
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| Error::VideoMetadata {
            path: path.to_path_buf(),
            message: format!("Failed to execute ffprobe: {}", e),
        })?;

    if !output.status.success() {
        return Err(Error::VideoMetadata {
            path: path.to_path_buf(),
            message: format!(
                "FFprobe failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ),
        });
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    trace!(?path, "FFprobe output: {}", json_str);

    let json: serde_json::Value =
        serde_json::from_str(&json_str).map_err(|e| Error::VideoMetadata {
            path: path.to_path_buf(),
            message: format!("Failed to parse FFprobe JSON: {}", e),
        })?;

    // Format-level tags first, then per-stream tags
    if let Some(tags) = json.get("format").and_then(|f| f.get("tags")) {
        if let Some(dt) = find_date_in_tags(tags) {
            debug!(?path, "Found creation time in format tags");
            return Ok(dt);
        }
    }

    if let Some(streams) = json.get("streams").and_then(|s| s.as_array()) {
        for stream in streams {
            if let Some(tags) = stream.get("tags") {
                if let Some(dt) = find_date_in_tags(tags) {
                    debug!(?path, "Found creation time in stream tags");
                    return Ok(dt);
                }
            }
        }
    }

    Err(Error::VideoMetadata {
        path: path.to_path_buf(),
        message: "No creation time found in video metadata".to_string(),
    })
}

fn find_date_in_tags(tags: &serde_json::Value) -> Option<DateTime<FixedOffset>> {
    for key in CREATION_DATE_KEYS {
        for tag_key in [*key, &key.to_uppercase()] {
            if let Some(value) = tags.get(tag_key).and_then(|v| v.as_str()) {
                if let Some(dt) = parse_video_datetime(value) {
                    return Some(dt);
                }
            }
        }
    }
    None
}

/// Parse a container datetime value and normalize it to UTC+8.
fn parse_video_datetime(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();

    // Timezone-aware forms convert to UTC+8
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&east8()));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&east8()));
        }
    }

    // Naive forms are assumed to be UTC
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y:%m:%d %H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive).with_timezone(&east8()));
        }
    }

    None
}

//! File system timestamp fallback
//!
//! Birth time is platform-dependent; where the platform does not expose
//! it, the status-change time stands in. The resulting local wall-clock
//! time is relabeled as UTC+8 without conversion.

use super::{at_east8, TimeSource};
use crate::error::Result;
use chrono::{DateTime, FixedOffset, Local};
use std::path::Path;
use std::time::SystemTime;

/// Read the file's birth time, else its status-change time.
pub fn creation_time(path: &Path) -> Result<(DateTime<FixedOffset>, TimeSource)> {
    let metadata = std::fs::metadata(path)?;

    if let Ok(birth) = metadata.created() {
        return Ok((reinterpret_as_east8(birth), TimeSource::FileBirth));
    }

    Ok((change_time(path, &metadata)?, TimeSource::FileChange))
}

#[cfg(unix)]
fn change_time(_path: &Path, metadata: &std::fs::Metadata) -> Result<DateTime<FixedOffset>> {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    let ctime = UNIX_EPOCH + Duration::new(metadata.ctime() as u64, metadata.ctime_nsec() as u32);
    Ok(reinterpret_as_east8(ctime))
}

#[cfg(not(unix))]
fn change_time(_path: &Path, metadata: &std::fs::Metadata) -> Result<DateTime<FixedOffset>> {
    // No ctime off Unix; last-write time is the closest attribute
    Ok(reinterpret_as_east8(metadata.modified()?))
}

fn reinterpret_as_east8(t: SystemTime) -> DateTime<FixedOffset> {
    let local: DateTime<Local> = t.into();
    at_east8(local.naive_local())
}

//! Platform-specific module for operating system features.
//!
//! Creation (birth) time mutation has no portable API; each platform that
//! exposes a facility gets its own implementation, and everywhere else
//! the call reports that no facility exists.

#[cfg(windows)]
pub mod windows;

#[cfg(target_os = "macos")]
pub mod macos;

use chrono::{DateTime, Local};
use std::io;
use std::path::Path;

/// Set the file's creation time.
///
/// Returns `Ok(true)` when the time was set, `Ok(false)` when the
/// platform has no facility for it, and `Err` when the facility exists
/// but the call failed.
#[cfg(windows)]
pub fn set_creation_time(path: &Path, time: &DateTime<Local>) -> io::Result<bool> {
    windows::set_creation_time(path, std::time::SystemTime::from(*time))?;
    Ok(true)
}

/// Set the file's creation time.
///
/// Returns `Ok(true)` when the time was set, `Ok(false)` when the
/// platform has no facility for it, and `Err` when the facility exists
/// but the call failed.
#[cfg(target_os = "macos")]
pub fn set_creation_time(path: &Path, time: &DateTime<Local>) -> io::Result<bool> {
    macos::set_creation_time(path, time)?;
    Ok(true)
}

/// Set the file's creation time.
///
/// Returns `Ok(true)` when the time was set, `Ok(false)` when the
/// platform has no facility for it, and `Err` when the facility exists
/// but the call failed.
#[cfg(not(any(windows, target_os = "macos")))]
pub fn set_creation_time(_path: &Path, _time: &DateTime<Local>) -> io::Result<bool> {
    Ok(false)
}

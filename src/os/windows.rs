//! Windows-specific operating system features.

use std::fs::OpenOptions;
use std::io;
use std::os::windows::io::AsRawHandle;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use winapi::um::fileapi::SetFileTime;
use winapi::um::minwinbase::FILETIME;

/// 100ns intervals per second
const INTERVALS_PER_SEC: u64 = 10_000_000;
/// Seconds between the Windows epoch (1601-01-01) and the Unix epoch
const EPOCH_DIFF_SECS: u64 = 11_644_473_600;

/// Set the file's creation time via `SetFileTime`.
pub fn set_creation_time(path: &Path, time: SystemTime) -> io::Result<()> {
    let since_epoch = time
        .duration_since(UNIX_EPOCH)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let intervals = (since_epoch.as_secs() + EPOCH_DIFF_SECS) * INTERVALS_PER_SEC
        + u64::from(since_epoch.subsec_nanos()) / 100;

    let creation = FILETIME {
        dwLowDateTime: intervals as u32,
        dwHighDateTime: (intervals >> 32) as u32,
    };

    let file = OpenOptions::new().write(true).open(path)?;
    let ok = unsafe {
        SetFileTime(
            file.as_raw_handle() as *mut _,
            &creation,
            std::ptr::null(),
            std::ptr::null(),
        )
    };

    if ok == 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

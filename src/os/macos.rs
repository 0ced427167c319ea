//! macOS-specific operating system features.

use chrono::{DateTime, Local};
use std::io;
use std::path::Path;
use std::process::Command;

/// Set the file's creation time via the `SetFile` developer tool.
pub fn set_creation_time(path: &Path, time: &DateTime<Local>) -> io::Result<()> {
    let status = Command::new("/usr/bin/SetFile")
        .arg("-d")
        .arg(time.format("%m/%d/%Y %H:%M:%S").to_string())
        .arg(path)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("SetFile exited with {}", status)))
    }
}

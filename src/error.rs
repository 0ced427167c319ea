//! Error types for pixel-porter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pixel-porter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pixel-porter
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read EXIF data from {path}: {message}")]
    ExifRead { path: PathBuf, message: String },

    #[error("Failed to extract video metadata from {path}: {message}")]
    VideoMetadata { path: PathBuf, message: String },

    #[error("Failed to parse timestamp from {source_info}: {message}")]
    TimestampParse { source_info: String, message: String },

    #[error("No timestamp source succeeded for {path}")]
    Unresolved { path: PathBuf },

    #[error("Failed to set file times on {path}: {message}")]
    TimeSet { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("FFprobe not found. Please install FFmpeg and ensure ffprobe is in PATH")]
    FfprobeNotFound,

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

//! Pixel Porter - media file organization by true capture time
//!
//! This library provides:
//! - A multi-source capture-time resolver (EXIF, video container
//!   metadata via FFprobe, file system timestamps) normalized to UTC+8
//! - Collision-safe timestamp naming and primary/diff bucketing
//! - A batch orchestrator that copies media into date-named run
//!   directories and diverts anything untreatable to a holding area
//! - An inverse pipeline that rewrites file system timestamps from
//!   timestamp-encoded filenames

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod os;
pub mod place;
pub mod rewrite;
pub mod sorter;
pub mod time;
pub mod untreated;

pub use cli::{resolve_dirs, RetimeArgs, SortArgs};
pub use config::{Config, ConfigError, MediaKind};
pub use error::{Error, Result};
pub use logging::setup_logging;
pub use place::{select_bucket, timestamp_stem, Bucket};
pub use rewrite::{RewriteStats, Rewriter};
pub use sorter::{RunContext, SortStats, Sorter};
pub use time::{resolve_time, ResolvedTime, TimeSource};
pub use untreated::UntreatedSink;

//! Configuration types for pixel-porter

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Classification of a file by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Photo files (jpg, png, heic, ...)
    Image,
    /// Video files (mp4, mov, ...)
    Video,
    /// Anything else - routed to the untreated directory
    Other,
}

fn default_image_extensions() -> Vec<String> {
    vec![
        "jpg".into(), "jpeg".into(), "png".into(), "gif".into(),
        "bmp".into(), "tiff".into(), "webp".into(), "heic".into(),
    ]
}

fn default_video_extensions() -> Vec<String> {
    vec![
        "mp4".into(), "mov".into(), "avi".into(), "mkv".into(),
        "flv".into(), "wmv".into(), "webm".into(), "mpeg".into(),
        "mpg".into(),
    ]
}

/// Configuration for pixel-porter
///
/// Loaded from a TOML file next to the executable; all fields are optional
/// so a config file can supply just the default directories. CLI arguments
/// override config file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default input directory used when the CLI flag is omitted
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Default output directory used when the CLI flag is omitted
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Supported image extensions
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    /// Supported video extensions
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            image_extensions: default_image_extensions(),
            video_extensions: default_video_extensions(),
        }
    }
}

impl Config {
    /// Check if a file extension is a supported image format
    pub fn is_image(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.image_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Check if a file extension is a supported video format
    pub fn is_video(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.video_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Classify a file as image, video, or other by its extension alone.
    /// Content is never inspected.
    pub fn classify(&self, path: &Path) -> MediaKind {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if self.is_image(ext) {
            MediaKind::Image
        } else if self.is_video(ext) {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_extension() {
        let config = Config::default();
        assert_eq!(config.classify(Path::new("a.jpg")), MediaKind::Image);
        assert_eq!(config.classify(Path::new("a.JPG")), MediaKind::Image);
        assert_eq!(config.classify(Path::new("b.mp4")), MediaKind::Video);
        assert_eq!(config.classify(Path::new("clip.MOV")), MediaKind::Video);
        assert_eq!(config.classify(Path::new("note.txt")), MediaKind::Other);
        assert_eq!(config.classify(Path::new("no_extension")), MediaKind::Other);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str("input = \"/photos\"").unwrap();
        assert_eq!(config.input, Some(PathBuf::from("/photos")));
        assert_eq!(config.output, None);
        assert!(config.is_image("heic"));
        assert!(config.is_video("webm"));
    }
}

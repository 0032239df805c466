//! Run options and server configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Target SRS used when a caller does not name one
pub const DEFAULT_TARGET_SRS: &str = "EPSG:4326";

/// Error type for configuration handling
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid bounding box '{0}': expected minX,minY,maxX,maxY")]
    InvalidBoundingBox(String),
}

/// Bounding box in target SRS units
///
/// Carried through a run and echoed in reports; it does not filter anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl FromStr for BoundingBox {
    type Err = ConfigError;

    /// Parse `minX,minY,maxX,maxY`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidBoundingBox(s.to_string());
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        match values.as_slice() {
            [min_x, min_y, max_x, max_y] if values.iter().all(|v| v.is_finite()) => Ok(Self {
                min_x: *min_x,
                min_y: *min_y,
                max_x: *max_x,
                max_y: *max_y,
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// Options of one extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOptions {
    /// Target spatial reference system, e.g. `EPSG:4326`
    #[serde(default = "default_target_srs")]
    pub target_srs: String,
    /// Optional area of interest
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            target_srs: default_target_srs(),
            bbox: None,
        }
    }
}

impl ExtractOptions {
    /// Options with a target SRS; a blank value falls back to the default
    pub fn new(target_srs: &str, bbox: Option<BoundingBox>) -> Self {
        let target_srs = match target_srs.trim() {
            "" => default_target_srs(),
            srs => srs.to_string(),
        };
        Self { target_srs, bbox }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Expected upload extensions; others are accepted with a warning
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Upper bound for a request body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Directory for uploaded files while they are processed; system temp dir when unset
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,
}

fn default_target_srs() -> String {
    DEFAULT_TARGET_SRS.to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_allowed_extensions() -> Vec<String> {
    vec![".gdb".to_string(), ".geodatabase".to_string()]
}

fn default_max_upload_bytes() -> usize {
    512 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            allowed_extensions: default_allowed_extensions(),
            max_upload_bytes: default_max_upload_bytes(),
            upload_dir: None,
        }
    }
}

impl ServerConfig {
    /// Parse configuration from TOML text; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Whether a file name carries one of the expected extensions (case-insensitive)
    pub fn is_allowed_file_name(&self, file_name: &str) -> bool {
        let lowered = file_name.to_lowercase();
        self.allowed_extensions
            .iter()
            .any(|ext| lowered.ends_with(&ext.to_lowercase()))
    }
}

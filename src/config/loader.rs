//! Configuration loading from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::defaults::{apply_defaults, DefaultsError};
use crate::config::format::{ConfigFormat, FormatHint};
use crate::config::schema::ConfigSnapshot;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("config file {} not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("invalid config: {0}")]
    Defaults(#[from] DefaultsError),
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}

/// Format-specific deserialization failure.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A configuration file together with its resolved format.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    path: PathBuf,
    format: ConfigFormat,
}

impl ConfigSource {
    /// The format hint is resolved once, here.
    pub fn new(path: impl Into<PathBuf>, hint: FormatHint) -> Self {
        let path = path.into();
        let format = hint.resolve(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    /// Read, parse and complete the configuration.
    pub fn load(&self) -> Result<ConfigSnapshot, LoadError> {
        let content = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound {
                path: self.path.clone(),
            },
            _ => LoadError::Io {
                path: self.path.clone(),
                source: e,
            },
        })?;

        let mut config = parse_config(&content, self.format).map_err(|source| LoadError::Parse {
            path: self.path.clone(),
            source,
        })?;

        apply_defaults(&mut config)?;

        Ok(config)
    }
}

/// Deserialize a snapshot without populating defaults.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<ConfigSnapshot, ParseError> {
    let config = match format {
        ConfigFormat::Toml => toml::from_str(content)?,
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
    };
    Ok(config)
}

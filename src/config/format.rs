//! Configuration file formats and format detection.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// A serialization format the loader can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect the format from a file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// How the format of a config file is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatHint {
    /// Detect from the file extension, falling back to TOML.
    #[default]
    Auto,
    /// Use this format regardless of the extension.
    Explicit(ConfigFormat),
}

impl FormatHint {
    pub fn resolve(self, path: &Path) -> ConfigFormat {
        match self {
            FormatHint::Explicit(format) => format,
            FormatHint::Auto => ConfigFormat::from_extension(path).unwrap_or(ConfigFormat::Toml),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown config format '{0}' (expected toml, yaml, json or auto)")]
pub struct UnknownFormat(String);

impl FromStr for FormatHint {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(FormatHint::Auto),
            "toml" => Ok(FormatHint::Explicit(ConfigFormat::Toml)),
            "yaml" | "yml" => Ok(FormatHint::Explicit(ConfigFormat::Yaml)),
            "json" => Ok(FormatHint::Explicit(ConfigFormat::Json)),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_extension() {
        assert_eq!(ConfigFormat::from_extension(Path::new("/etc/bgpd.toml")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension(Path::new("bgpd.yml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension(Path::new("bgpd.YAML")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension(Path::new("bgpd.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension(Path::new("bgpd.conf")), None);
        assert_eq!(ConfigFormat::from_extension(Path::new("bgpd")), None);
    }

    #[test]
    fn test_hint_resolution() {
        let path = Path::new("bgpd.yaml");
        assert_eq!(FormatHint::Auto.resolve(path), ConfigFormat::Yaml);
        assert_eq!(FormatHint::Explicit(ConfigFormat::Json).resolve(path), ConfigFormat::Json);

        // Unrecognised extension falls back to TOML
        assert_eq!(FormatHint::Auto.resolve(Path::new("bgpd.conf")), ConfigFormat::Toml);
    }

    #[test]
    fn test_parse_hint() {
        assert_eq!("auto".parse::<FormatHint>().unwrap(), FormatHint::Auto);
        assert_eq!("TOML".parse::<FormatHint>().unwrap(), FormatHint::Explicit(ConfigFormat::Toml));
        assert_eq!("yml".parse::<FormatHint>().unwrap(), FormatHint::Explicit(ConfigFormat::Yaml));
        assert!("ini".parse::<FormatHint>().is_err());
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::format::FormatKind;

/// Service settings read from `config.toml`. Every key is optional.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Profile file syntax.
    pub format: FormatKind,
    pub port: u16,
    pub bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            format: FormatKind::default(),
            port: 8080,
            bind: "127.0.0.1".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from the default location when `path`
    /// is `None`. A missing default file gives the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match config_path() {
                Ok(p) if p.exists() => p,
                _ => return Ok(Settings::default()),
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("wifi-conf").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = Settings::from_toml("").expect("should parse");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.format, FormatKind::Netctl);
    }

    #[test]
    fn test_partial_file() {
        let settings = Settings::from_toml("format = \"dotfile\"\nport = 9000\n").expect("should parse");
        assert_eq!(settings.format, FormatKind::Dotfile);
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.bind, "127.0.0.1");
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Settings::from_toml("format = \"wpa_supplicant\"").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(Settings::load(Some(dir.path().join("nope.toml").as_path())).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "bind = \"0.0.0.0\"\n").expect("write");

        let settings = Settings::load(Some(path.as_path())).expect("should load");
        assert_eq!(settings.bind, "0.0.0.0");
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::error::{Result, WifiConfError};
use crate::format::ConfigFormat;

/// One WiFi profile, backed by one file.
///
/// A record is only ever built complete: either every field was parsed from
/// its file, or every field was supplied by the caller. Edits replace the
/// whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigRecord {
    #[serde(rename = "profile")]
    profile_name: String,
    #[serde(serialize_with = "serialize_path_lossy")]
    path: PathBuf,
    ssid: String,
    #[serde(skip)]
    passphrase: String,
}

impl ConfigRecord {
    pub fn new(
        profile_name: impl Into<String>,
        path: impl Into<PathBuf>,
        ssid: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        ConfigRecord {
            profile_name: profile_name.into(),
            path: path.into(),
            ssid: ssid.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Reads and parses the profile stored at `path`.
    /// The profile name is the file's base name.
    pub fn load(path: &Path, format: &dyn ConfigFormat) -> Result<Self> {
        let profile_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| WifiConfError::ParseFile {
                path: path.to_path_buf(),
                reason: "path has no file name".to_string(),
            })?;

        let text = fs::read_to_string(path).map_err(|source| WifiConfError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let (ssid, passphrase) = format.parse(&text).map_err(|e| match e {
            WifiConfError::Parse { reason } => WifiConfError::ParseFile {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        Ok(ConfigRecord {
            profile_name,
            path: path.to_path_buf(),
            ssid,
            passphrase,
        })
    }

    /// Overwrites the record's file with its serialized form.
    pub fn write(&self, format: &dyn ConfigFormat) -> Result<()> {
        fs::write(&self.path, format.serialize(self)).map_err(|source| WifiConfError::Persist {
            profile: self.profile_name.clone(),
            path: self.path.clone(),
            source,
        })
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }
}

// file names need not be UTF-8; the JSON view is for display only
fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

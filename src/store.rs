use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{Result, WifiConfError};
use crate::format::ConfigFormat;
use crate::profile::ConfigRecord;

/// Result of scanning a profile directory.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Files that parsed, in directory listing order.
    pub records: Vec<ConfigRecord>,
    /// Regular files that could not be read or parsed.
    pub skipped: Vec<PathBuf>,
}

/// Loads every regular file in `dir` as a profile.
///
/// Never fails: an unreadable directory gives an empty outcome, and files
/// that don't parse are logged and listed in [`ScanOutcome::skipped`].
/// Symlinks are not followed.
pub fn scan_dir(dir: &Path, format: &dyn ConfigFormat) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            let err = WifiConfError::DirectoryOpen {
                path: dir.to_path_buf(),
                source,
            };
            warn!("{}", err);
            return outcome;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to read entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        // DirEntry::file_type does not traverse symlinks
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }

        let path = entry.path();
        match ConfigRecord::load(&path, format) {
            Ok(record) => {
                debug!("Loaded profile '{}'", record.profile_name());
                outcome.records.push(record);
            }
            Err(e) => {
                warn!("{}", e);
                outcome.skipped.push(path);
            }
        }
    }

    outcome
}

/// What [`ProfileStore::submit`] did with the submitted profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Created,
    Updated,
}

impl Submission {
    pub fn message(self) -> &'static str {
        match self {
            Submission::Created => "Profile created",
            Submission::Updated => "Profile updated",
        }
    }
}

/// Owns the profile collection for the lifetime of the service.
///
/// Not synchronised; wrap it in a mutex when handlers can run concurrently.
pub struct ProfileStore {
    dir: PathBuf,
    format: Box<dyn ConfigFormat>,
    records: Vec<ConfigRecord>,
}

impl ProfileStore {
    /// Scans `dir` and builds the initial collection.
    pub fn open(dir: impl Into<PathBuf>, format: Box<dyn ConfigFormat>) -> Self {
        let dir = dir.into();
        let outcome = scan_dir(&dir, format.as_ref());

        info!(
            "Loaded {} {} profile(s) from {} ({} skipped)",
            outcome.records.len(),
            format.name(),
            dir.display(),
            outcome.skipped.len()
        );

        ProfileStore {
            dir,
            format,
            records: outcome.records,
        }
    }

    pub fn format(&self) -> &dyn ConfigFormat {
        self.format.as_ref()
    }

    pub fn profiles(&self) -> &[ConfigRecord] {
        &self.records
    }

    pub fn find(&self, profile_name: &str) -> Option<&ConfigRecord> {
        self.records.iter().find(|r| r.profile_name() == profile_name)
    }

    /// Creates or replaces the profile named `profile_name`, then writes
    /// every profile in the collection back to disk.
    ///
    /// The record's path is always `dir/profile_name`. Writing stops at the
    /// first failure; files written before it keep their new content, and the
    /// in-memory edit is undone so a record that can't be written doesn't
    /// block later submissions.
    pub fn submit(&mut self, profile_name: &str, ssid: &str, passphrase: &str) -> Result<Submission> {
        validate_submission(profile_name, ssid, passphrase)?;

        let record = ConfigRecord::new(profile_name, self.dir.join(profile_name), ssid, passphrase);

        let (submission, previous) = match self
            .records
            .iter()
            .position(|r| r.profile_name() == profile_name)
        {
            Some(index) => {
                let previous = std::mem::replace(&mut self.records[index], record);
                (Submission::Updated, Some((index, previous)))
            }
            None => {
                self.records.push(record);
                (Submission::Created, None)
            }
        };

        if let Err(e) = self.persist_all() {
            match previous {
                Some((index, previous)) => self.records[index] = previous,
                None => {
                    self.records.pop();
                }
            }
            warn!("Reverted '{}' after failed write", profile_name);
            return Err(e);
        }

        info!("{} '{}'", submission.message(), profile_name);
        Ok(submission)
    }

    fn persist_all(&self) -> Result<()> {
        for record in &self.records {
            record.write(self.format.as_ref())?;
            debug!("Wrote {}", record.path().display());
        }
        Ok(())
    }
}

fn validate_submission(profile_name: &str, ssid: &str, passphrase: &str) -> Result<()> {
    if profile_name.is_empty() || profile_name == "." || profile_name == ".." {
        return Err(WifiConfError::InvalidSubmission(format!(
            "'{}' is not a valid profile name",
            profile_name
        )));
    }
    if profile_name.contains(['/', '\\', '\0']) {
        return Err(WifiConfError::InvalidSubmission(
            "profile name must not contain path separators".to_string(),
        ));
    }

    for (field, value) in [("ssid", ssid), ("password", passphrase)] {
        if value.is_empty() {
            return Err(WifiConfError::InvalidSubmission(format!("{} is empty", field)));
        }
        if value.contains(['\n', '\r']) {
            return Err(WifiConfError::InvalidSubmission(format!(
                "{} must be a single line",
                field
            )));
        }
    }

    Ok(())
}

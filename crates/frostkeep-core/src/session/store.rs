//! Persistent session record (bearer token + user profile).
//!
//! Stored as `session.json` under the frostkeep home with restricted
//! permissions (0600). The record is all-or-nothing: a reader treats a
//! partial or unparsable file as "no session" rather than failing.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::types::User;
use crate::config::paths;

/// The on-disk session record. Token and profile are written together;
/// one without the other reads as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: String,
    pub user: User,
}

/// File-backed store for the session record. No network access; the
/// session state machine is its only writer.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store at the default location under the frostkeep home.
    pub fn new() -> Self {
        Self {
            path: paths::session_path(),
        }
    }

    /// Creates a store at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the persisted record.
    ///
    /// Returns `None` for a missing file, a record missing either field, an
    /// empty token, or a profile that fails to parse. Never raises; parse
    /// failures are logged at debug level and treated as "signed out".
    pub fn load(&self) -> Option<PersistedSession> {
        let contents = fs::read_to_string(&self.path).ok()?;

        match serde_json::from_str::<PersistedSession>(&contents) {
            Ok(record) if record.token.is_empty() => {
                tracing::debug!("stored session has an empty token; treating as signed out");
                None
            }
            Ok(record) => Some(record),
            Err(err) => {
                tracing::debug!("stored session is unreadable ({err}); treating as signed out");
                None
            }
        }
    }

    /// Writes token and profile together, atomically, with restricted
    /// permissions (0600).
    pub fn save(&self, record: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(record).context("Failed to serialize session")?;

        let tmp_path = self.path.with_extension("json.tmp");

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&tmp_path)
                .with_context(|| format!("Failed to open {} for writing", tmp_path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", tmp_path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&tmp_path, contents)
                .with_context(|| format!("Failed to write to {}", tmp_path.display()))?;
        }

        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Removes the record. Idempotent; a missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }

    /// Returns true when a record file is present (readable or not).
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

//! File-backed [`IdentityStore`] keeping one JSON record.
//!
//! The record has the shape `{"username": "...", "id": 42, "theme": "blue"}`.
//! Unreadable or unresolved records load as the empty identity.

use std::io;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::atomic_io::write_atomic;
use crate::domain::ports::{IdentityStore, IdentityStoreError};
use crate::domain::{AccentColor, Identity};

/// File name of the stored record inside the store directory.
pub const IDENTITY_FILE_NAME: &str = "anicomplete-user.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredIdentity {
    #[serde(default)]
    username: String,
    #[serde(default)]
    id: i64,
    #[serde(default)]
    theme: AccentColor,
}

impl From<&Identity> for StoredIdentity {
    fn from(identity: &Identity) -> Self {
        Self {
            username: identity.username.clone(),
            id: i64::try_from(identity.user_id).unwrap_or(i64::MAX),
            theme: identity.accent_color.clone(),
        }
    }
}

impl StoredIdentity {
    fn into_identity(self) -> Option<Identity> {
        let user_id = u64::try_from(self.id).ok()?;
        Identity::resolved(self.username, user_id, self.theme)
    }
}

/// Identity store persisted as a JSON file in a capability-scoped directory.
pub struct JsonFileIdentityStore {
    dir: Dir,
}

impl JsonFileIdentityStore {
    /// Open (creating if needed) the store directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Io`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Utf8Path) -> Result<Self, IdentityStoreError> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(path, ambient_authority()))
            .map(Self::from_dir)
            .map_err(|err| IdentityStoreError::io(format!("opening {path}: {err}")))
    }

    /// Use an already-open directory handle.
    pub fn from_dir(dir: Dir) -> Self {
        Self { dir }
    }

    fn file(&self) -> &Utf8Path {
        Utf8Path::new(IDENTITY_FILE_NAME)
    }
}

impl IdentityStore for JsonFileIdentityStore {
    fn load(&self) -> Identity {
        let raw = match self.dir.read_to_string(self.file()) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no stored identity");
                return Identity::empty();
            }
            Err(err) => {
                warn!(%err, "stored identity unreadable; starting empty");
                return Identity::empty();
            }
        };

        match serde_json::from_str::<StoredIdentity>(&raw) {
            Ok(stored) => stored.into_identity().unwrap_or_else(|| {
                debug!("stored identity is unresolved; starting empty");
                Identity::empty()
            }),
            Err(err) => {
                warn!(%err, "stored identity is corrupt; starting empty");
                Identity::empty()
            }
        }
    }

    fn save(&self, identity: &Identity) -> Result<(), IdentityStoreError> {
        let encoded = serde_json::to_vec(&StoredIdentity::from(identity))
            .map_err(|err| IdentityStoreError::encode(err.to_string()))?;
        write_atomic(&self.dir, self.file(), &encoded)
    }

    fn clear(&self) -> Result<(), IdentityStoreError> {
        match self.dir.remove_file(self.file()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(IdentityStoreError::io(format!(
                "removing {IDENTITY_FILE_NAME}: {err}"
            ))),
        }
    }
}

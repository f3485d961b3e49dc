//! Port for remembering the last resolved identity across restarts.
//!
//! Access is synchronous: the store is a single local record with one
//! consumer. Loading never fails; a missing or unreadable record loads as
//! [`Identity::empty`].

use std::sync::Mutex;

use super::define_port_error;
use crate::domain::Identity;

define_port_error! {
    /// Errors raised while writing or wiping the stored identity.
    pub enum IdentityStoreError {
        /// Filesystem access failed.
        Io { message: String } =>
            "identity store I/O failed: {message}",
        /// The identity could not be serialised.
        Encode { message: String } =>
            "identity store encoding failed: {message}",
    }
}

/// Durable single-record store for the session identity.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityStore: Send + Sync {
    /// Read the stored identity, or the empty identity when there is none.
    fn load(&self) -> Identity;

    /// Replace the stored record wholesale.
    ///
    /// Readers observe either the previous record or the new one, never a
    /// partial write.
    fn save(&self, identity: &Identity) -> Result<(), IdentityStoreError>;

    /// Remove the stored record. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), IdentityStoreError>;
}

/// Process-local store used by tests and by sessions that should not persist.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    record: Mutex<Option<Identity>>,
}

impl InMemoryIdentityStore {
    /// Start with `identity` already stored.
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            record: Mutex::new(Some(identity)),
        }
    }

    /// Return the raw stored record, `None` after a clear.
    pub fn stored(&self) -> Option<Identity> {
        self.record.lock().ok().and_then(|record| (*record).clone())
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn load(&self) -> Identity {
        self.stored()
            .filter(Identity::is_resolved)
            .unwrap_or_default()
    }

    fn save(&self, identity: &Identity) -> Result<(), IdentityStoreError> {
        let mut record = self
            .record
            .lock()
            .map_err(|_| IdentityStoreError::io("in-memory identity store poisoned"))?;
        *record = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), IdentityStoreError> {
        let mut record = self
            .record
            .lock()
            .map_err(|_| IdentityStoreError::io("in-memory identity store poisoned"))?;
        *record = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccentColor;

    fn reader() -> Identity {
        Identity::resolved("reader", 42, AccentColor::Token("blue".to_owned()))
            .expect("valid identity")
    }

    #[test]
    fn empty_store_loads_empty_identity() {
        let store = InMemoryIdentityStore::default();
        assert_eq!(store.load(), Identity::empty());
    }

    #[test]
    fn save_then_load_returns_saved_identity() {
        let store = InMemoryIdentityStore::default();
        store.save(&reader()).expect("save succeeds");
        assert_eq!(store.load(), reader());
    }

    #[test]
    fn clear_then_load_returns_empty_identity() {
        let store = InMemoryIdentityStore::with_identity(reader());
        store.clear().expect("clear succeeds");
        assert_eq!(store.load(), Identity::empty());
        assert!(store.stored().is_none());
    }

    #[test]
    fn unresolved_records_load_as_empty() {
        let store = InMemoryIdentityStore::with_identity(Identity {
            username: "typed-but-never-resolved".to_owned(),
            user_id: 0,
            accent_color: AccentColor::Default,
        });
        assert_eq!(store.load(), Identity::empty());
    }
}
